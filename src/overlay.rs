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

//! Rank-indexed value overlays.
//!
//! A [`RankedValues`] pairs a presence set with a dense value list: the value
//! of present position `i` lives at `rank(i) - 1` in the dense list, where
//! `rank(i)` counts present positions `<= i`. Absent positions cost one bit.
//!
//! [`RankedValues`]: struct.RankedValues.html

use crate::{bit_list::BitList, bits_list::BitsList};

/// A set of positions supporting rank queries.
pub trait Presence {
    fn contains(&self, index: usize) -> bool;

    /// The number of present positions `<= index`.
    fn rank(&self, index: usize) -> usize;

    fn mark(&mut self, index: usize);

    fn unmark(&mut self, index: usize);

    fn cardinality(&self) -> usize;

    fn clear(&mut self);
}

/// A densely packed list of values addressed by position.
pub trait DenseValues<T> {
    fn len(&self) -> usize;

    fn value(&self, index: usize) -> T
    where
        T: Clone;

    fn insert(&mut self, index: usize, value: T);

    fn remove(&mut self, index: usize) -> T;

    /// Overwrites position `index`, returning what was there.
    fn replace(&mut self, index: usize, value: T) -> T;

    fn swap(&mut self, a: usize, b: usize);

    fn clear(&mut self);
}

impl Presence for BitList {
    fn contains(&self, index: usize) -> bool {
        self.get(index)
    }

    fn rank(&self, index: usize) -> usize {
        BitList::rank(self, index)
    }

    fn mark(&mut self, index: usize) {
        self.set(index, true)
    }

    fn unmark(&mut self, index: usize) {
        self.set(index, false)
    }

    fn cardinality(&self) -> usize {
        BitList::cardinality(self)
    }

    fn clear(&mut self) {
        BitList::clear(self)
    }
}

impl<T> DenseValues<T> for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn value(&self, index: usize) -> T
    where
        T: Clone,
    {
        self[index].clone()
    }

    fn insert(&mut self, index: usize, value: T) {
        Vec::insert(self, index, value)
    }

    fn remove(&mut self, index: usize) -> T {
        Vec::remove(self, index)
    }

    fn replace(&mut self, index: usize, value: T) -> T {
        std::mem::replace(&mut self[index], value)
    }

    fn swap(&mut self, a: usize, b: usize) {
        <[T]>::swap(self, a, b)
    }

    fn clear(&mut self) {
        Vec::clear(self)
    }
}

impl DenseValues<u64> for BitsList {
    fn len(&self) -> usize {
        BitsList::len(self)
    }

    fn value(&self, index: usize) -> u64 {
        self.get(index)
    }

    fn insert(&mut self, index: usize, value: u64) {
        BitsList::insert(self, index, value)
    }

    fn remove(&mut self, index: usize) -> u64 {
        self.remove_at(index)
    }

    fn replace(&mut self, index: usize, value: u64) -> u64 {
        let old = self.get(index);
        self.set(index, value);

        old
    }

    fn swap(&mut self, a: usize, b: usize) {
        let first = self.get(a);
        let second = self.replace(b, first);
        self.set(a, second);
    }

    fn clear(&mut self) {
        BitsList::clear(self)
    }
}

/// Values stored only for the positions present in `P`, packed densely in
/// `D` in position order.
///
/// Invariant: `values.len() == presence.cardinality()`.
#[derive(Clone, Default, PartialEq, Eq, Hash, Debug)]
pub struct RankedValues<P, D> {
    presence: P,
    values: D,
}

impl<P: Presence, D> RankedValues<P, D> {
    pub fn new(presence: P, values: D) -> RankedValues<P, D> {
        RankedValues { presence, values }
    }

    pub fn presence(&self) -> &P {
        &self.presence
    }

    pub fn values(&self) -> &D {
        &self.values
    }

    pub fn contains(&self, index: usize) -> bool {
        self.presence.contains(index)
    }

    /// The position of `index`'s value in the dense list, if present.
    #[inline]
    pub fn dense_index(&self, index: usize) -> Option<usize> {
        if self.presence.contains(index) {
            Some(self.presence.rank(index) - 1)
        } else {
            None
        }
    }

    pub fn get<T: Clone>(&self, index: usize) -> Option<T>
    where
        D: DenseValues<T>,
    {
        self.dense_index(index).map(|i| self.values.value(i))
    }

    /// Stores `value` at `index`, returning the value it replaced.
    pub fn put<T>(&mut self, index: usize, value: T) -> Option<T>
    where
        D: DenseValues<T>,
    {
        let previous = match self.dense_index(index) {
            Some(i) => Some(self.values.replace(i, value)),
            None => {
                self.presence.mark(index);
                self.values.insert(self.presence.rank(index) - 1, value);

                None
            }
        };

        self.debug_check::<T>();

        previous
    }

    /// Removes and returns the value at `index`.
    pub fn take<T>(&mut self, index: usize) -> Option<T>
    where
        D: DenseValues<T>,
    {
        let i = self.dense_index(index)?;
        let value = self.values.remove(i);
        self.presence.unmark(index);

        self.debug_check::<T>();

        Some(value)
    }

    pub fn clear<T>(&mut self)
    where
        D: DenseValues<T>,
    {
        self.presence.clear();
        self.values.clear();
    }

    /// Direct access for owners that reshape the presence set themselves.
    /// They must restore the rank invariant before returning.
    pub(crate) fn parts_mut(&mut self) -> (&mut P, &mut D) {
        (&mut self.presence, &mut self.values)
    }

    #[inline]
    fn debug_check<T>(&self)
    where
        D: DenseValues<T>,
    {
        debug_assert_eq!(self.values.len(), self.presence.cardinality());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_follow_rank() {
        let mut overlay: RankedValues<BitList, Vec<&str>> = RankedValues::default();

        assert_eq!(overlay.put(5, "five"), None);
        assert_eq!(overlay.put(1, "one"), None);
        assert_eq!(overlay.put(9, "nine"), None);

        assert_eq!(overlay.values(), &vec!["one", "five", "nine"]);
        assert_eq!(overlay.dense_index(9), Some(2));
        assert_eq!(overlay.dense_index(2), None);

        assert_eq!(overlay.put(5, "FIVE"), Some("five"));
        assert_eq!(overlay.take(1), Some("one"));
        assert_eq!(overlay.take(1), None);

        assert_eq!(overlay.values(), &vec!["FIVE", "nine"]);
        assert_eq!(overlay.get::<&str>(9), Some("nine"));
    }

    #[test]
    fn bit_packed_values() {
        let mut overlay = RankedValues::new(BitList::new(), BitsList::new(4));

        overlay.put(3, 7u64);
        overlay.put(0, 2u64);
        overlay.put(100, 15u64);

        assert_eq!(overlay.values().to_vec(), vec![2, 7, 15]);
        assert_eq!(overlay.take::<u64>(3), Some(7));
        assert_eq!(overlay.get::<u64>(100), Some(15));
        assert_eq!(overlay.presence().cardinality(), 2);
    }
}
