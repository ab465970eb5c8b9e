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

//! A hash set of primitives, backed by [`PrimitiveMap`].
//!
//! [`PrimitiveMap`]: ../map/struct.PrimitiveMap.html

use crate::{
    error::Result,
    map::{DefaultHashBuilder, PrimitiveMap},
    primitive::Primitive,
    token::Token,
};

use std::{
    fmt::{self, Debug, Formatter},
    hash::{BuildHasher, Hash, Hasher},
};

/// A hash set of unboxed primitives with the same open-addressing layout,
/// out-of-band zero element and optional null element as [`PrimitiveMap`].
///
/// [`PrimitiveMap`]: ../map/struct.PrimitiveMap.html
#[derive(Clone)]
pub struct PrimitiveSet<T: Primitive, S = DefaultHashBuilder> {
    map: PrimitiveMap<T, (), S>,
}

impl<T: Primitive> PrimitiveSet<T, DefaultHashBuilder> {
    pub fn new() -> PrimitiveSet<T, DefaultHashBuilder> {
        PrimitiveSet {
            map: PrimitiveMap::new(),
        }
    }

    pub fn with_capacity(expected_items: usize) -> PrimitiveSet<T, DefaultHashBuilder> {
        PrimitiveSet {
            map: PrimitiveMap::with_capacity(expected_items),
        }
    }

    pub fn with_capacity_and_load_factor(
        expected_items: usize,
        load_factor: f32,
    ) -> PrimitiveSet<T, DefaultHashBuilder> {
        PrimitiveSet {
            map: PrimitiveMap::with_capacity_and_load_factor(expected_items, load_factor),
        }
    }
}

impl<T: Primitive, S: BuildHasher> PrimitiveSet<T, S> {
    pub fn with_hasher(hash_builder: S) -> PrimitiveSet<T, S> {
        PrimitiveSet {
            map: PrimitiveMap::with_hasher(hash_builder),
        }
    }

    pub fn with_capacity_and_hasher(expected_items: usize, hash_builder: S) -> PrimitiveSet<T, S> {
        PrimitiveSet {
            map: PrimitiveMap::with_capacity_and_hasher(expected_items, hash_builder),
        }
    }

    pub fn try_with_config(
        expected_items: usize,
        load_factor: f32,
        hash_builder: S,
    ) -> Result<PrimitiveSet<T, S>> {
        PrimitiveMap::try_with_config(expected_items, load_factor, hash_builder)
            .map(|map| PrimitiveSet { map })
    }

    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains(&self, value: T) -> bool {
        self.map.contains_key(value)
    }

    pub fn contains_null(&self) -> bool {
        self.map.contains_null_key()
    }

    /// Adds `value`, returning true if it was not present before.
    pub fn insert(&mut self, value: T) -> bool {
        self.map.put(value, ())
    }

    /// Adds the null element, returning true if it was not present before.
    pub fn insert_null(&mut self) -> bool {
        self.map.put_null(())
    }

    /// Adds `value`, where `None` stands for the null element.
    pub fn insert_nullable(&mut self, value: Option<T>) -> bool {
        self.map.put_nullable(value, ())
    }

    pub fn remove(&mut self, value: T) -> bool {
        self.map.remove(value)
    }

    pub fn remove_null(&mut self) -> bool {
        self.map.remove_null()
    }

    pub fn remove_nullable(&mut self, value: Option<T>) -> bool {
        self.map.remove_nullable(value)
    }

    pub fn clear(&mut self) {
        self.map.clear()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.map.reserve(additional)
    }

    pub fn token(&self, value: T) -> Token {
        self.map.token(value)
    }

    pub fn first_token(&self) -> Token {
        self.map.first_token()
    }

    pub fn next_token(&self, token: Token) -> Token {
        self.map.next_token(token)
    }

    /// The element `token` refers to; `None` for the null element's token.
    pub fn element(&self, token: Token) -> Option<T> {
        self.map.key(token)
    }

    /// An iterator over every element except the null element.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.map.keys()
    }
}

impl<T: Primitive> Default for PrimitiveSet<T, DefaultHashBuilder> {
    fn default() -> Self {
        PrimitiveSet::new()
    }
}

impl<T: Primitive, S: BuildHasher, U: BuildHasher> PartialEq<PrimitiveSet<T, U>>
    for PrimitiveSet<T, S>
{
    fn eq(&self, other: &PrimitiveSet<T, U>) -> bool {
        self.map == other.map
    }
}

impl<T: Primitive, S: BuildHasher> Eq for PrimitiveSet<T, S> {}

impl<T: Primitive, S: BuildHasher> Hash for PrimitiveSet<T, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.map.hash(state)
    }
}

impl<T: Primitive, S: BuildHasher> Debug for PrimitiveSet<T, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(Some))
            .entries(self.contains_null().then_some(None::<T>))
            .finish()
    }
}

impl<T: Primitive, S: BuildHasher> Extend<T> for PrimitiveSet<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.map.extend(iter.into_iter().map(|v| (v, ())))
    }
}

impl<T: Primitive, S: BuildHasher + Default> FromIterator<T> for PrimitiveSet<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        PrimitiveSet {
            map: iter.into_iter().map(|v| (v, ())).collect(),
        }
    }
}

#[cfg(feature = "serde")]
impl<T, S> serde::Serialize for PrimitiveSet<T, S>
where
    T: Primitive + serde::Serialize,
    S: BuildHasher,
{
    fn serialize<Z: serde::Serializer>(&self, serializer: Z) -> std::result::Result<Z::Ok, Z::Error> {
        serializer.collect_seq(
            self.iter()
                .map(Some)
                .chain(self.contains_null().then_some(None)),
        )
    }
}
