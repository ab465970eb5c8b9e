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

//! A growable list of fixed-width unsigned integers packed into 64-bit words.

use std::{
    fmt::{self, Debug, Formatter},
    hash::{Hash, Hasher},
    iter::FusedIterator,
};

use crate::{
    array,
    error::{Error, Result},
};

#[cfg(test)]
mod tests;

/// A list of `bits`-wide unsigned integers, `1 <= bits <= 64`, packed
/// back to back into 64-bit words.
///
/// Item `i` occupies bits `[i * bits, (i + 1) * bits)` of the conceptual bit
/// stream, where bit `n` of the stream is bit `n & 63` of word `n >> 6`. An
/// item may therefore straddle two words. Every bit at or beyond
/// `len * bits` is kept zero.
///
/// Values written are truncated to their low `bits` bits. Positions created
/// implicitly by [`set`] past the end of the list hold the list's default
/// value.
///
/// ```
/// use primcoll::BitsList;
///
/// let mut list = BitsList::new(3);
/// list.add(5);
/// list.add(1);
/// list.add(7);
///
/// assert_eq!(list.remove_at(1), 1);
/// assert_eq!(list.to_vec(), vec![5, 7]);
/// ```
///
/// [`set`]: #method.set
#[derive(Clone)]
pub struct BitsList {
    words: Vec<u64>,
    len: usize,
    bits: u32,
    mask: u64,
    default_value: u64,
}

impl BitsList {
    /// Creates an empty list of `bits`-wide items whose default value is 0.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is not in `1..=64`.
    pub fn new(bits: u32) -> BitsList {
        match BitsList::try_new(bits) {
            Ok(list) => list,
            Err(e) => panic!("{}", e),
        }
    }

    /// Fallible version of [`new`].
    ///
    /// [`new`]: #method.new
    pub fn try_new(bits: u32) -> Result<BitsList> {
        if !(1..=64).contains(&bits) {
            return Err(Error::InvalidBitWidth(bits));
        }

        Ok(BitsList {
            words: Vec::new(),
            len: 0,
            bits,
            mask: mask_for(bits),
            default_value: 0,
        })
    }

    /// Creates an empty list of `bits`-wide items that fills implicitly
    /// created positions with `default_value` (truncated to `bits` bits).
    ///
    /// # Panics
    ///
    /// Panics if `bits` is not in `1..=64`.
    pub fn with_default(bits: u32, default_value: u64) -> BitsList {
        let mut list = BitsList::new(bits);
        list.default_value = default_value & list.mask;

        list
    }

    /// Creates an empty list with room for `items` items.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is not in `1..=64` or the storage would exceed
    /// [`MAX_CAPACITY`] words.
    ///
    /// [`MAX_CAPACITY`]: ../constant.MAX_CAPACITY.html
    pub fn with_capacity(bits: u32, items: usize) -> BitsList {
        let mut list = BitsList::new(bits);
        list.reserve(items);

        list
    }

    /// Creates a list holding `values`, each truncated to `bits` bits.
    pub fn from_values<I: IntoIterator<Item = u64>>(bits: u32, values: I) -> BitsList {
        let mut list = BitsList::new(bits);
        list.extend(values);

        list
    }

    /// The number of items in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The width of every item, in bits.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// The largest value an item can hold.
    pub fn mask(&self) -> u64 {
        self.mask
    }

    /// The value written into positions that growth creates.
    pub fn default_value(&self) -> u64 {
        self.default_value
    }

    /// The number of items the current storage can hold without growing.
    pub fn capacity(&self) -> usize {
        self.words.len() * 64 / self.bits as usize
    }

    /// Returns the item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn get(&self, index: usize) -> u64 {
        assert!(
            index < self.len,
            "index {} out of bounds for BitsList of length {}",
            index,
            self.len
        );

        self.read(index)
    }

    /// Returns the item at `index`, or `None` if `index >= len`.
    pub fn try_get(&self, index: usize) -> Option<u64> {
        if index < self.len {
            Some(self.read(index))
        } else {
            None
        }
    }

    /// Returns the first item, if any.
    pub fn first(&self) -> Option<u64> {
        self.try_get(0)
    }

    /// Returns the last item, if any.
    pub fn last(&self) -> Option<u64> {
        self.len.checked_sub(1).map(|i| self.read(i))
    }

    /// Writes the low `bits` bits of `value` at `index`.
    ///
    /// If `index >= len` the list is extended to `index + 1` items, and the
    /// positions between the old end and `index` take the default value.
    ///
    /// # Panics
    ///
    /// Panics if the storage would exceed [`MAX_CAPACITY`] words.
    ///
    /// [`MAX_CAPACITY`]: ../constant.MAX_CAPACITY.html
    pub fn set(&mut self, index: usize, value: u64) {
        if index >= self.len {
            self.grow_to(index + 1);
        }

        self.write(index, value);
    }

    /// Appends `value`.
    pub fn add(&mut self, value: u64) {
        self.set(self.len, value);
    }

    /// Inserts `value` at `index`, moving every later item up by one
    /// position. Inserting at or beyond `len` behaves like [`set`].
    ///
    /// [`set`]: #method.set
    pub fn insert(&mut self, index: usize, value: u64) {
        if index >= self.len {
            return self.set(index, value);
        }

        self.ensure_capacity(self.len + 1);
        self.shift_up(index * self.bits as usize);
        self.len += 1;
        self.write(index, value);
    }

    /// Removes and returns the item at `index`, moving every later item down
    /// by one position.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> u64 {
        let value = self.get(index);

        self.shift_down(index * self.bits as usize);
        self.len -= 1;

        value
    }

    /// Removes the first occurrence of `value`, returning true if there was
    /// one.
    pub fn remove_value(&mut self, value: u64) -> bool {
        match self.index_of(value) {
            Some(i) => {
                self.remove_at(i);

                true
            }
            None => false,
        }
    }

    /// Removes and returns the last item.
    pub fn pop(&mut self) -> Option<u64> {
        let last = self.last()?;
        self.set_len(self.len - 1);

        Some(last)
    }

    /// The first position holding `value`. Values wider than the list
    /// never match.
    pub fn index_of(&self, value: u64) -> Option<usize> {
        if value & !self.mask != 0 {
            return None;
        }

        (0..self.len).find(|&i| self.read(i) == value)
    }

    /// The last position holding `value`.
    pub fn last_index_of(&self, value: u64) -> Option<usize> {
        if value & !self.mask != 0 {
            return None;
        }

        (0..self.len).rev().find(|&i| self.read(i) == value)
    }

    /// Returns true if any item equals `value`.
    pub fn contains(&self, value: u64) -> bool {
        self.index_of(value).is_some()
    }

    /// Truncates the list to `len` items, or extends it with the default
    /// value.
    pub fn set_len(&mut self, len: usize) {
        if len > self.len {
            self.grow_to(len);
        } else {
            let bits = self.bits as usize;
            self.clear_bits(len * bits, self.len * bits);
            self.len = len;
        }
    }

    /// Removes every item. The storage is kept, zeroed.
    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
        self.len = 0;
    }

    /// Shrinks the storage to the smallest number of words that holds the
    /// current items.
    pub fn fit(&mut self) {
        self.words.truncate(self.words_for(self.len));
        self.words.shrink_to_fit();
    }

    /// Grows the storage so that `additional` more items fit without
    /// reallocating.
    ///
    /// # Panics
    ///
    /// Panics if the storage would exceed [`MAX_CAPACITY`] words.
    ///
    /// [`MAX_CAPACITY`]: ../constant.MAX_CAPACITY.html
    pub fn reserve(&mut self, additional: usize) {
        if let Err(e) = self.try_reserve(additional) {
            panic!("{}", e);
        }
    }

    /// Fallible version of [`reserve`].
    ///
    /// [`reserve`]: #method.reserve
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        let items = self
            .len
            .checked_add(additional)
            .ok_or(Error::CapacityOverflow {
                requested: usize::MAX,
            })?;

        self.try_ensure_capacity(items)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            front: 0,
            back: self.len,
        }
    }

    pub fn to_vec(&self) -> Vec<u64> {
        self.iter().collect()
    }

    /// The packed words holding the items. Bits past the last item are zero.
    pub fn as_words(&self) -> &[u64] {
        &self.words[..self.words_for(self.len)]
    }

    fn read(&self, index: usize) -> u64 {
        let bit_pos = index * self.bits as usize;
        let word = bit_pos >> 6;
        let bit = (bit_pos & 63) as u32;

        if bit + self.bits <= 64 {
            value(self.words[word], bit, self.mask)
        } else {
            value_across(self.words[word], self.words[word + 1], bit, self.mask)
        }
    }

    fn write(&mut self, index: usize, value: u64) {
        let value = value & self.mask;
        let bit_pos = index * self.bits as usize;
        let word = bit_pos >> 6;
        let bit = (bit_pos & 63) as u32;

        self.words[word] = (self.words[word] & !(self.mask << bit)) | (value << bit);

        if bit + self.bits > 64 {
            let carried = 64 - bit;
            let next = &mut self.words[word + 1];

            *next = (*next & !(self.mask >> carried)) | (value >> carried);
        }
    }

    /// Moves every stream bit at or above `from` up by `bits`, word by word
    /// from the tail down. The `bits` bits at `from` are left stale for the
    /// caller to overwrite. Needs room for one more item.
    fn shift_up(&mut self, from: usize) {
        let shift = self.bits;
        let end = (self.len + 1) * self.bits as usize;
        let first = from >> 6;
        let last = (end - 1) >> 6;

        for t in (first + 1..=last).rev() {
            // the 64 stream bits ending `shift` bits below the top of word t
            self.words[t] = if shift == 64 {
                self.words[t - 1]
            } else {
                (self.words[t - 1] >> (64 - shift)) | (self.words[t] << shift)
            };
        }

        let keep = low_bits(from & 63);
        let old = self.words[first];
        self.words[first] = (old & keep) | (old.checked_shl(shift).unwrap_or(0) & !keep);
    }

    /// Moves every stream bit above `from + bits` down by `bits`, word by word
    /// from `from` up, dropping the item at `from`.
    fn shift_down(&mut self, from: usize) {
        let shift = self.bits as usize;
        let end = self.len * shift;
        let first = from >> 6;
        let last = (end - 1) >> 6;

        let keep = low_bits(from & 63);
        let old = self.words[first];
        self.words[first] = (old & keep) | (self.stream_word(first * 64 + shift) & !keep);

        for t in first + 1..=last {
            self.words[t] = self.stream_word(t * 64 + shift);
        }
    }

    /// The 64 stream bits starting at bit `start`, reading zeros past the end
    /// of the storage.
    fn stream_word(&self, start: usize) -> u64 {
        let word = start >> 6;
        let bit = (start & 63) as u32;
        let lo = self.words.get(word).copied().unwrap_or(0);

        if bit == 0 {
            lo
        } else {
            let hi = self.words.get(word + 1).copied().unwrap_or(0);

            (lo >> bit) | (hi << (64 - bit))
        }
    }

    /// Zeroes stream bits `[from, to)`.
    fn clear_bits(&mut self, from: usize, to: usize) {
        let mut pos = from;

        while pos < to {
            let word = pos >> 6;
            let bit = pos & 63;
            let span = (64 - bit).min(to - pos);
            let mask = low_bits(span).checked_shl(bit as u32).unwrap_or(0);

            self.words[word] &= !mask;
            pos += span;
        }
    }

    /// Extends the list to `len` items, filling new positions with the
    /// default value.
    fn grow_to(&mut self, len: usize) {
        debug_assert!(len > self.len);

        self.ensure_capacity(len);

        let old_len = self.len;
        self.len = len;

        if self.default_value != 0 {
            for i in old_len..len {
                self.write(i, self.default_value);
            }
        }
    }

    fn ensure_capacity(&mut self, items: usize) {
        if let Err(e) = self.try_ensure_capacity(items) {
            panic!("{}", e);
        }
    }

    fn try_ensure_capacity(&mut self, items: usize) -> Result<()> {
        let required = items
            .checked_mul(self.bits as usize)
            .map(|bits| (bits + 63) >> 6)
            .ok_or(Error::CapacityOverflow { requested: items })?;

        if required <= self.words.len() {
            return Ok(());
        }

        let words = array::grow_capacity(self.words.len(), required)?;

        log::trace!(
            "growing {}-bit list: {} -> {} words for {} items",
            self.bits,
            self.words.len(),
            words,
            items
        );

        self.words.resize(words, 0);

        Ok(())
    }

    fn words_for(&self, items: usize) -> usize {
        (items * self.bits as usize + 63) >> 6
    }
}

/// Reads a `mask`-wide value that lies within one word.
#[inline]
fn value(word: u64, bit: u32, mask: u64) -> u64 {
    (word >> bit) & mask
}

/// Reads a `mask`-wide value starting at `bit` of `prev` and continuing into
/// `next`. `bit` is never 0 here.
#[inline]
fn value_across(prev: u64, next: u64, bit: u32, mask: u64) -> u64 {
    ((prev >> bit) | (next << (64 - bit))) & mask
}

#[inline]
fn mask_for(bits: u32) -> u64 {
    u64::MAX >> (64 - bits)
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

impl PartialEq for BitsList {
    fn eq(&self, other: &BitsList) -> bool {
        self.bits == other.bits && self.len == other.len && self.as_words() == other.as_words()
    }
}

impl Eq for BitsList {}

impl Hash for BitsList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.bits);
        state.write_usize(self.len);
        self.as_words().hash(state);
    }
}

impl Debug for BitsList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Extend<u64> for BitsList {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);

        for value in iter {
            self.add(value);
        }
    }
}

impl<'a> IntoIterator for &'a BitsList {
    type Item = u64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for BitsList {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// An iterator over the items of a [`BitsList`].
///
/// [`BitsList`]: struct.BitsList.html
pub struct Iter<'a> {
    list: &'a BitsList,
    front: usize,
    back: usize,
}

impl Iterator for Iter<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.front == self.back {
            return None;
        }

        let value = self.list.read(self.front);
        self.front += 1;

        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;

        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<u64> {
        if self.front == self.back {
            return None;
        }

        self.back -= 1;

        Some(self.list.read(self.back))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
