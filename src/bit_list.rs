// MIT License
//
// Copyright (c) 2020 Gregory Meyer
//
// Permission is hereby granted, free of charge, to any person
// obtaining a copy of this software and associated documentation files
// (the "Software"), to deal in the Software without restriction,
// including without limitation the rights to use, copy, modify, merge,
// publish, distribute, sublicense, and/or sell copies of the Software,
// and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS
// BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN
// ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! A growable list of bits with rank and bit-scan queries.

use std::{
    fmt::{self, Debug, Formatter},
    hash::{Hash, Hasher},
};

use crate::array;

/// A growable sequence of bits. Every bit at or beyond `len` is kept clear,
/// so reads past the end see `false`.
#[derive(Clone, Default)]
pub struct BitList {
    words: Vec<u64>,
    len: usize,
}

impl BitList {
    pub fn new() -> BitList {
        BitList::default()
    }

    pub fn with_capacity(bits: usize) -> BitList {
        BitList {
            words: Vec::with_capacity(words_for(bits)),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns bit `index`; `false` at or beyond `len`.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        index < self.len && self.words[index >> 6] & (1 << (index & 63)) != 0
    }

    /// Sets bit `index` to `value`, extending the list with clear bits if
    /// `index >= len`.
    pub fn set(&mut self, index: usize, value: bool) {
        if index >= self.len {
            self.set_len(index + 1);
        }

        let word = &mut self.words[index >> 6];

        if value {
            *word |= 1 << (index & 63);
        } else {
            *word &= !(1 << (index & 63));
        }
    }

    pub fn add(&mut self, value: bool) {
        self.set(self.len, value);
    }

    /// Inserts a bit at `index`, moving every later bit up by one position.
    /// Inserting at or beyond `len` behaves like [`set`].
    ///
    /// [`set`]: #method.set
    pub fn insert(&mut self, index: usize, value: bool) {
        if index >= self.len {
            return self.set(index, value);
        }

        self.set_len(self.len + 1);

        let first = index >> 6;
        let last = (self.len - 1) >> 6;
        let mut carry = 0;

        for t in first..=last {
            let old = self.words[t];

            self.words[t] = if t == first {
                let keep = low_bits(index & 63);

                (old & keep) | ((old << 1) & !keep)
            } else {
                (old << 1) | carry
            };

            carry = old >> 63;
        }

        self.set(index, value);
    }

    /// Removes bit `index`, moving every later bit down by one position.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> bool {
        assert!(
            index < self.len,
            "index {} out of bounds for BitList of length {}",
            index,
            self.len
        );

        let removed = self.get(index);
        let first = index >> 6;
        let last = (self.len - 1) >> 6;

        for t in first..=last {
            let old = self.words[t];
            let carry = self.words.get(t + 1).map_or(0, |next| next << 63);

            self.words[t] = if t == first {
                let keep = low_bits(index & 63);

                (old & keep) | ((old >> 1) & !keep) | carry
            } else {
                (old >> 1) | carry
            };
        }

        self.len -= 1;
        self.clear_tail();

        removed
    }

    /// The number of set bits at positions `<= index`.
    pub fn rank(&self, index: usize) -> usize {
        if index >= self.len {
            return self.cardinality();
        }

        let word = index >> 6;
        let below: usize = self.words[..word]
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum();

        below + (self.words[word] & low_bits((index & 63) + 1)).count_ones() as usize
    }

    /// The number of set bits.
    pub fn cardinality(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// The first set bit at or after `from`.
    pub fn next_set_bit(&self, from: usize) -> Option<usize> {
        self.scan_forward(from, |w| w)
    }

    /// The first clear bit at or after `from` and before `len`.
    pub fn next_clear_bit(&self, from: usize) -> Option<usize> {
        self.scan_forward(from, |w| !w)
    }

    /// The last set bit at or before `from`.
    pub fn prev_set_bit(&self, from: usize) -> Option<usize> {
        self.scan_backward(from, |w| w)
    }

    /// The last clear bit at or before `from`, looking only below `len`.
    pub fn prev_clear_bit(&self, from: usize) -> Option<usize> {
        self.scan_backward(from, |w| !w)
    }

    /// Truncates to `len` bits, or extends with clear bits.
    pub fn set_len(&mut self, len: usize) {
        let words = words_for(len);

        if words > self.words.len() {
            let grown = match array::grow_capacity(self.words.len(), words) {
                Ok(grown) => grown,
                Err(e) => panic!("{}", e),
            };

            self.words.resize(grown, 0);
        }

        let shrinking = len < self.len;
        self.len = len;

        if shrinking {
            self.clear_tail();
        }
    }

    /// Removes every bit, keeping the storage.
    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
        self.len = 0;
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = bool> + ExactSizeIterator + '_ {
        (0..self.len).map(move |i| self.get(i))
    }

    /// The indices of set bits, ascending.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        let mut next = self.next_set_bit(0);

        std::iter::from_fn(move || {
            let current = next?;
            next = self.next_set_bit(current + 1);

            Some(current)
        })
    }

    fn scan_forward(&self, from: usize, view: impl Fn(u64) -> u64) -> Option<usize> {
        if from >= self.len {
            return None;
        }

        let last = (self.len - 1) >> 6;
        let mut t = from >> 6;
        let mut word = view(self.words[t]) & !low_bits(from & 63);

        loop {
            if word != 0 {
                let found = (t << 6) + word.trailing_zeros() as usize;

                return if found < self.len { Some(found) } else { None };
            }

            t += 1;

            if t > last {
                return None;
            }

            word = view(self.words[t]);
        }
    }

    fn scan_backward(&self, from: usize, view: impl Fn(u64) -> u64) -> Option<usize> {
        if self.len == 0 {
            return None;
        }

        let from = from.min(self.len - 1);
        let mut t = from >> 6;
        let mut word = view(self.words[t]) & low_bits((from & 63) + 1);

        loop {
            if word != 0 {
                return Some((t << 6) + 63 - word.leading_zeros() as usize);
            }

            if t == 0 {
                return None;
            }

            t -= 1;
            word = view(self.words[t]);
        }
    }

    /// Clears every bit at or beyond `len`.
    fn clear_tail(&mut self) {
        let used = words_for(self.len);

        if let Some(last) = used.checked_sub(1) {
            if self.len & 63 != 0 {
                self.words[last] &= low_bits(self.len & 63);
            }
        }

        self.words[used..].iter_mut().for_each(|w| *w = 0);
    }

    fn as_words(&self) -> &[u64] {
        &self.words[..words_for(self.len)]
    }
}

#[inline]
fn words_for(bits: usize) -> usize {
    (bits + 63) >> 6
}

/// A word with its low `n` bits set, `0 <= n <= 64`.
#[inline]
fn low_bits(n: usize) -> u64 {
    if n == 0 {
        0
    } else {
        u64::MAX >> (64 - n)
    }
}

impl PartialEq for BitList {
    fn eq(&self, other: &BitList) -> bool {
        self.len == other.len && self.as_words() == other.as_words()
    }
}

impl Eq for BitList {}

impl Hash for BitList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        self.as_words().hash(state);
    }
}

impl Debug for BitList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_str(bits: &str) -> BitList {
        let mut list = BitList::new();

        for c in bits.chars() {
            list.add(c == '1');
        }

        list
    }

    #[test]
    fn get_set_and_extend() {
        let mut list = BitList::new();

        list.set(70, true);
        assert_eq!(list.len(), 71);
        assert!(list.get(70));
        assert!(!list.get(69));
        assert!(!list.get(1000));

        list.set(70, false);
        assert_eq!(list.cardinality(), 0);
    }

    #[test]
    fn rank_counts_inclusive() {
        let list = from_str("1011001");

        assert_eq!(list.rank(0), 1);
        assert_eq!(list.rank(1), 1);
        assert_eq!(list.rank(3), 3);
        assert_eq!(list.rank(6), 4);
        assert_eq!(list.rank(100), 4);
    }

    #[test]
    fn insert_and_remove_carry_across_words() {
        let mut list = BitList::new();
        let mut reference = Vec::new();

        for i in 0..200 {
            let bit = i % 3 == 0;
            list.add(bit);
            reference.push(bit);
        }

        for &(i, bit) in &[(0, true), (63, false), (64, true), (127, true), (150, false)] {
            list.insert(i, bit);
            reference.insert(i, bit);
        }

        assert_eq!(list.iter().collect::<Vec<_>>(), reference);

        for &i in &[0, 62, 63, 64, 128, 190] {
            assert_eq!(list.remove_at(i), reference.remove(i));
        }

        assert_eq!(list.iter().collect::<Vec<_>>(), reference);
        assert_eq!(
            list.cardinality(),
            reference.iter().filter(|&&b| b).count()
        );
    }

    #[test]
    fn bit_scans() {
        let mut list = from_str("0010000001");
        list.set(130, true);

        assert_eq!(list.next_set_bit(0), Some(2));
        assert_eq!(list.next_set_bit(3), Some(9));
        assert_eq!(list.next_set_bit(10), Some(130));
        assert_eq!(list.next_set_bit(131), None);

        assert_eq!(list.prev_set_bit(129), Some(9));
        assert_eq!(list.prev_set_bit(1), None);
        assert_eq!(list.prev_set_bit(1000), Some(130));

        assert_eq!(list.next_clear_bit(2), Some(3));
        assert_eq!(list.next_clear_bit(130), None);
        assert_eq!(list.prev_clear_bit(2), Some(1));

        assert_eq!(list.ones().collect::<Vec<_>>(), vec![2, 9, 130]);
    }

    #[test]
    fn truncation_clears_tail() {
        let mut list = from_str("1111111111");

        list.set_len(3);
        list.set_len(10);

        assert_eq!(format!("{:?}", list), "1110000000");
        assert_eq!(list, from_str("1110000000"));
    }
}
