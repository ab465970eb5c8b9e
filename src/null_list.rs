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

//! Lists whose positions may hold no value.

use std::{
    fmt::{self, Debug, Formatter},
    hash::{Hash, Hasher},
    iter,
    marker::PhantomData,
};

use crate::{
    bit_list::BitList,
    bits_list::BitsList,
    overlay::{DenseValues, RankedValues},
};

/// A list of optional values that stores only the present ones.
///
/// Presence is tracked in a [`BitList`]; the present values are packed into
/// `D` in position order, so the value of position `i` is found by ranking
/// `i` in the presence bits. `D` is a `Vec<T>` by default, or a
/// [`BitsList`] for narrow unsigned values.
///
/// ```
/// use primcoll::NullList;
///
/// let mut list = NullList::new();
/// list.add(Some('a'));
/// list.add(None);
/// list.add(Some('c'));
///
/// assert_eq!(list.get(1), None);
/// assert_eq!(list.get(2), Some('c'));
/// assert_eq!(list.cardinality(), 2);
/// ```
///
/// [`BitList`]: ../struct.BitList.html
/// [`BitsList`]: ../struct.BitsList.html
pub struct NullList<T, D = Vec<T>> {
    slots: RankedValues<BitList, D>,
    marker: PhantomData<fn() -> T>,
}

impl<T> NullList<T, Vec<T>> {
    pub fn new() -> NullList<T, Vec<T>> {
        NullList::with_storage(Vec::new())
    }
}

impl NullList<u64, BitsList> {
    /// Creates a list whose present values are packed `bits` wide.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is not in `1..=64`.
    pub fn packed(bits: u32) -> NullList<u64, BitsList> {
        NullList::with_storage(BitsList::new(bits))
    }
}

impl<T, D: DenseValues<T>> NullList<T, D> {
    /// Creates an empty list that packs its values into `values`, which is
    /// cleared first.
    pub fn with_storage(mut values: D) -> NullList<T, D> {
        values.clear();

        NullList {
            slots: RankedValues::new(BitList::new(), values),
            marker: PhantomData,
        }
    }

    /// The number of positions, present or not.
    pub fn len(&self) -> usize {
        self.nulls().len()
    }

    /// Returns true if the list has no positions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of positions holding a value.
    pub fn cardinality(&self) -> usize {
        self.slots.values().len()
    }

    /// Returns true if position `index` holds a value; false beyond the end.
    #[inline]
    pub fn has_value(&self, index: usize) -> bool {
        self.slots.contains(index)
    }

    /// Returns the value at `index`, or `None` for an empty position or
    /// one beyond the end.
    pub fn get(&self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        self.slots.get(index)
    }

    /// Stores `value` at `index`, returning the previous value. Writing past
    /// the end extends the list with empty positions.
    pub fn set(&mut self, index: usize, value: Option<T>) -> Option<T> {
        if index >= self.len() {
            self.slots.parts_mut().0.set_len(index + 1);
        }

        match value {
            Some(value) => self.slots.put(index, value),
            None => self.slots.take(index),
        }
    }

    /// Appends `value` as a new last position.
    pub fn add(&mut self, value: Option<T>) {
        self.set(self.len(), value);
    }

    /// Inserts `value` at `index`, moving every later position up by one.
    /// Inserting at or beyond the end behaves like [`set`].
    ///
    /// [`set`]: #method.set
    pub fn insert(&mut self, index: usize, value: Option<T>) {
        if index >= self.len() {
            self.set(index, value);

            return;
        }

        let (nulls, values) = self.slots.parts_mut();
        nulls.insert(index, value.is_some());

        if let Some(value) = value {
            let at = nulls.rank(index) - 1;
            values.insert(at, value);
        }
    }

    /// Removes position `index`, moving every later position down by one,
    /// and returns its value.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        assert!(
            index < self.len(),
            "index {} out of bounds for NullList of length {}",
            index,
            self.len()
        );

        let value = self.slots.take(index);
        self.slots.parts_mut().0.remove_at(index);

        value
    }

    /// Exchanges the contents of positions `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn swap(&mut self, a: usize, b: usize) {
        let len = self.len();
        assert!(
            a < len && b < len,
            "swap indices ({}, {}) out of bounds for NullList of length {}",
            a,
            b,
            len
        );

        match (self.slots.dense_index(a), self.slots.dense_index(b)) {
            (Some(i), Some(j)) => self.slots.parts_mut().1.swap(i, j),
            (Some(_), None) => self.move_value(a, b),
            (None, Some(_)) => self.move_value(b, a),
            (None, None) => {}
        }
    }

    /// The first position at or after `from` holding a value.
    pub fn next_value_index(&self, from: usize) -> Option<usize> {
        self.nulls().next_set_bit(from)
    }

    /// The last position at or before `from` holding a value.
    pub fn prev_value_index(&self, from: usize) -> Option<usize> {
        self.nulls().prev_set_bit(from)
    }

    /// The first empty position at or after `from`.
    pub fn next_null_index(&self, from: usize) -> Option<usize> {
        self.nulls().next_clear_bit(from)
    }

    /// The last empty position at or before `from`.
    pub fn prev_null_index(&self, from: usize) -> Option<usize> {
        self.nulls().prev_clear_bit(from)
    }

    pub fn clear(&mut self) {
        self.slots.clear::<T>();
    }

    /// The dense values, in position order.
    pub fn values(&self) -> &D {
        self.slots.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<T>> + '_
    where
        T: Clone,
    {
        let values = self.slots.values();
        let mut dense = 0;

        self.nulls().iter().map(move |present| {
            if present {
                dense += 1;

                Some(values.value(dense - 1))
            } else {
                None
            }
        })
    }

    fn nulls(&self) -> &BitList {
        self.slots.presence()
    }

    /// Moves the value at present position `from` to empty position `to`.
    fn move_value(&mut self, from: usize, to: usize) {
        if let Some(value) = self.slots.take(from) {
            self.slots.put(to, value);
        }
    }
}

impl<T> Default for NullList<T, Vec<T>> {
    fn default() -> Self {
        NullList::new()
    }
}

impl<T, D: Clone> Clone for NullList<T, D> {
    fn clone(&self) -> Self {
        NullList {
            slots: self.slots.clone(),
            marker: PhantomData,
        }
    }
}

impl<T, D: PartialEq> PartialEq for NullList<T, D> {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots
    }
}

impl<T, D: Eq> Eq for NullList<T, D> {}

impl<T, D: Hash> Hash for NullList<T, D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slots.hash(state)
    }
}

impl<T: Clone + Debug, D: DenseValues<T>> Debug for NullList<T, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, D: DenseValues<T>> Extend<Option<T>> for NullList<T, D> {
    fn extend<I: IntoIterator<Item = Option<T>>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T> iter::FromIterator<Option<T>> for NullList<T, Vec<T>> {
    fn from_iter<I: IntoIterator<Item = Option<T>>>(iter: I) -> Self {
        let mut list = NullList::new();
        list.extend(iter);

        list
    }
}

#[cfg(feature = "serde")]
impl<T, D> serde::Serialize for NullList<T, D>
where
    T: Clone + serde::Serialize,
    D: DenseValues<T>,
{
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// A bit-packed list that reserves one value of its width to mean "no
/// value".
///
/// The reserved value defaults to the largest value of the width, so a
/// 3-bit list stores `0..=6` and uses `7` as null. Positions created by
/// writing past the end are null.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitsNullList {
    list: BitsList,
    null_value: u64,
}

impl BitsNullList {
    /// # Panics
    ///
    /// Panics if `bits` is not in `1..=64`.
    pub fn new(bits: u32) -> BitsNullList {
        let mask = BitsList::new(bits).mask();

        BitsNullList::with_null_value(bits, mask)
    }

    /// Creates a list that uses `null_value` (truncated to `bits` bits) as
    /// its null marker.
    pub fn with_null_value(bits: u32, null_value: u64) -> BitsNullList {
        let list = BitsList::with_default(bits, null_value);
        let null_value = list.default_value();

        BitsNullList { list, null_value }
    }

    /// The raw value that marks an empty position.
    pub fn null_value(&self) -> u64 {
        self.null_value
    }

    pub fn bits(&self) -> u32 {
        self.list.bits()
    }

    /// The number of positions, null or not.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns true if position `index` holds a value; false beyond the end.
    pub fn has_value(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Returns the value at `index`, or `None` for a null position or one
    /// beyond the end.
    pub fn get(&self, index: usize) -> Option<u64> {
        self.list
            .try_get(index)
            .filter(|&value| value != self.null_value)
    }

    /// Writes `value` at `index`, extending the list with nulls if needed,
    /// and returns the previous value.
    ///
    /// # Panics
    ///
    /// Panics if `value` is the reserved null value.
    pub fn set(&mut self, index: usize, value: Option<u64>) -> Option<u64> {
        let raw = self.encode(value);
        let previous = self.get(index);
        self.list.set(index, raw);

        previous
    }

    pub fn add(&mut self, value: Option<u64>) {
        let raw = self.encode(value);
        self.list.add(raw);
    }

    pub fn insert(&mut self, index: usize, value: Option<u64>) {
        let raw = self.encode(value);
        self.list.insert(index, raw);
    }

    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> Option<u64> {
        Some(self.list.remove_at(index)).filter(|&value| value != self.null_value)
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<u64>> + '_ {
        let null = self.null_value;

        self.list
            .iter()
            .map(move |value| if value == null { None } else { Some(value) })
    }

    /// The packed list underneath, nulls included as the reserved value.
    pub fn as_bits_list(&self) -> &BitsList {
        &self.list
    }

    fn encode(&self, value: Option<u64>) -> u64 {
        match value {
            Some(v) => {
                let v = v & self.list.mask();
                assert!(
                    v != self.null_value,
                    "{} is reserved as the null value of this list",
                    v
                );

                v
            }
            None => self.null_value,
        }
    }
}

impl Debug for BitsNullList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for BitsNullList {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn set_covers_every_transition() {
        let mut list = NullList::new();

        // value on absent, extending
        assert_eq!(list.set(3, Some(30)), None);
        assert_eq!(list.len(), 4);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![None, None, None, Some(30)]);

        // value on present
        assert_eq!(list.set(3, Some(31)), Some(30));

        // value on absent, in range
        assert_eq!(list.set(1, Some(10)), None);
        assert_eq!(list.values(), &vec![10, 31]);

        // null on present
        assert_eq!(list.set(3, None), Some(31));
        assert_eq!(list.values(), &vec![10]);
        assert_eq!(list.len(), 4);

        // null on absent, extending
        assert_eq!(list.set(6, None), None);
        assert_eq!(list.len(), 7);
        assert_eq!(list.cardinality(), 1);
    }

    #[test]
    fn swap_all_four_cases() {
        let mut list: NullList<i32> = vec![Some(1), None, Some(3), None].into_iter().collect();

        list.swap(0, 2);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![Some(3), None, Some(1), None]);

        list.swap(0, 1);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![None, Some(3), Some(1), None]);

        list.swap(3, 2);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![None, Some(3), None, Some(1)]);

        list.swap(0, 2);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![None, Some(3), None, Some(1)]);

        assert_eq!(list.values(), &vec![3, 1]);
    }

    #[test]
    fn insert_and_remove_shift_positions() {
        let mut list: NullList<&str> = vec![Some("a"), None, Some("c")].into_iter().collect();

        list.insert(1, Some("b"));
        list.insert(0, None);
        assert_eq!(
            list.iter().collect::<Vec<_>>(),
            vec![None, Some("a"), Some("b"), None, Some("c")]
        );

        assert_eq!(list.remove_at(2), Some("b"));
        assert_eq!(list.remove_at(0), None);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![Some("a"), None, Some("c")]);
    }

    #[test]
    fn value_and_null_scans() {
        let list: NullList<u8> = vec![None, Some(1), None, None, Some(4)].into_iter().collect();

        assert_eq!(list.next_value_index(0), Some(1));
        assert_eq!(list.next_value_index(2), Some(4));
        assert_eq!(list.prev_value_index(3), Some(1));
        assert_eq!(list.next_null_index(1), Some(2));
        assert_eq!(list.prev_null_index(4), Some(3));
        assert_eq!(list.next_null_index(4), None);
    }

    #[test]
    fn packed_values() {
        let mut list = NullList::packed(5);

        list.add(Some(31));
        list.add(None);
        list.add(Some(40));

        assert_eq!(list.get(0), Some(31));
        assert_eq!(list.get(2), Some(8));
        assert_eq!(list.values().to_vec(), vec![31, 8]);

        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.cardinality(), 0);
    }

    #[test]
    fn equality_and_clone() {
        let a: NullList<i64> = vec![Some(1), None].into_iter().collect();
        let mut b = a.clone();

        assert_eq!(a, b);

        b.set(1, Some(2));
        assert_ne!(a, b);
        assert_eq!(format!("{:?}", a), "[Some(1), None]");
    }

    #[test]
    fn bits_null_list_sentinel() {
        let mut list = BitsNullList::new(3);

        assert_eq!(list.null_value(), 7);

        list.set(2, Some(5));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![None, None, Some(5)]);
        assert!(list.has_value(2));
        assert!(!list.has_value(0));
        assert!(!list.has_value(10));

        list.insert(0, Some(6));
        assert_eq!(list.remove_at(1), None);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![Some(6), None, Some(5)]);
    }

    #[test]
    #[should_panic(expected = "reserved")]
    fn bits_null_list_rejects_sentinel() {
        let mut list = BitsNullList::with_null_value(4, 0);

        list.add(Some(0));
    }

    proptest! {
        #[test]
        fn rank_invariant_and_last_write_wins(ops in prop::collection::vec((0..64usize, any::<Option<u16>>()), 0..200)) {
            let mut list = NullList::new();
            let mut reference: Vec<Option<u16>> = Vec::new();

            for (index, value) in ops {
                list.set(index, value);

                if index >= reference.len() {
                    reference.resize(index + 1, None);
                }
                reference[index] = value;

                prop_assert_eq!(list.cardinality(), list.nulls().cardinality());
                prop_assert_eq!(list.get(index), value);
            }

            prop_assert_eq!(list.iter().collect::<Vec<_>>(), reference);
        }
    }
}
