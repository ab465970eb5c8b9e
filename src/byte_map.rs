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

//! Maps keyed by bytes: a 256-bit presence set plus a dense value array.

use std::{
    fmt::{self, Debug, Formatter},
    hash::{Hash, Hasher},
    iter::{self, FusedIterator},
};

use crate::{
    overlay::{Presence, RankedValues},
    token::Token,
};

/// A set of bytes stored as a 256-bit bitmap, with an optional null element.
///
/// Inside a [`ByteMap`] the null element tracks whether the map has an entry
/// under the null key.
///
/// [`ByteMap`]: struct.ByteMap.html
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ByteSet {
    bits: [u64; 4],
    len: usize,
    has_null: bool,
}

impl ByteSet {
    pub fn new() -> ByteSet {
        ByteSet::default()
    }

    /// The number of bytes in the set, not counting the null element.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0 && !self.has_null
    }

    #[inline]
    pub fn contains(&self, key: u8) -> bool {
        self.bits[word(key)] & bit(key) != 0
    }

    pub fn contains_null(&self) -> bool {
        self.has_null
    }

    /// Adds `key`, returning true if it was not present.
    pub fn insert(&mut self, key: u8) -> bool {
        if self.contains(key) {
            return false;
        }

        self.bits[word(key)] |= bit(key);
        self.len += 1;

        true
    }

    /// Removes `key`, returning true if it was present.
    pub fn remove(&mut self, key: u8) -> bool {
        if !self.contains(key) {
            return false;
        }

        self.bits[word(key)] &= !bit(key);
        self.len -= 1;

        true
    }

    pub fn insert_null(&mut self) -> bool {
        !std::mem::replace(&mut self.has_null, true)
    }

    pub fn remove_null(&mut self) -> bool {
        std::mem::replace(&mut self.has_null, false)
    }

    /// The number of bytes in the set that are `<= key`.
    pub fn rank(&self, key: u8) -> usize {
        let w = word(key);
        let below: u32 = self.bits[..w].iter().map(|b| b.count_ones()).sum();
        let upto = self.bits[w] & (u64::MAX >> (63 - (key & 63)));

        (below + upto.count_ones()) as usize
    }

    /// The smallest byte in the set that is `>= from`.
    pub fn next_key(&self, from: u8) -> Option<u8> {
        let mut w = word(from);
        let mut bits = self.bits[w] & (u64::MAX << (from & 63));

        loop {
            if bits != 0 {
                return Some((w * 64) as u8 + bits.trailing_zeros() as u8);
            }

            w += 1;

            if w == 4 {
                return None;
            }

            bits = self.bits[w];
        }
    }

    /// The largest byte in the set that is `<= from`.
    pub fn prev_key(&self, from: u8) -> Option<u8> {
        let mut w = word(from);
        let mut bits = self.bits[w] & (u64::MAX >> (63 - (from & 63)));

        loop {
            if bits != 0 {
                return Some((w * 64) as u8 + 63 - bits.leading_zeros() as u8);
            }

            if w == 0 {
                return None;
            }

            w -= 1;
            bits = self.bits[w];
        }
    }

    pub fn first(&self) -> Option<u8> {
        self.next_key(0)
    }

    pub fn last(&self) -> Option<u8> {
        self.prev_key(u8::MAX)
    }

    /// Removes every byte and the null element.
    pub fn clear(&mut self) {
        *self = ByteSet::default();
    }

    /// The bytes in the set, ascending. The null element is not included.
    pub fn iter(&self) -> ByteSetIter<'_> {
        ByteSetIter {
            set: self,
            next: self.first(),
        }
    }
}

#[inline]
fn word(key: u8) -> usize {
    (key >> 6) as usize
}

#[inline]
fn bit(key: u8) -> u64 {
    1 << (key & 63)
}

impl Presence for ByteSet {
    fn contains(&self, index: usize) -> bool {
        index <= u8::MAX as usize && ByteSet::contains(self, index as u8)
    }

    fn rank(&self, index: usize) -> usize {
        ByteSet::rank(self, index.min(u8::MAX as usize) as u8)
    }

    fn mark(&mut self, index: usize) {
        debug_assert!(index <= u8::MAX as usize);

        self.insert(index as u8);
    }

    fn unmark(&mut self, index: usize) {
        debug_assert!(index <= u8::MAX as usize);

        self.remove(index as u8);
    }

    fn cardinality(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        ByteSet::clear(self)
    }
}

impl Debug for ByteSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(Some))
            .entries(self.has_null.then_some(None::<u8>))
            .finish()
    }
}

impl Extend<u8> for ByteSet {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl iter::FromIterator<u8> for ByteSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = ByteSet::new();
        set.extend(iter);

        set
    }
}

pub struct ByteSetIter<'a> {
    set: &'a ByteSet,
    next: Option<u8>,
}

impl Iterator for ByteSetIter<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let current = self.next?;
        self.next = current.checked_add(1).and_then(|k| self.set.next_key(k));

        Some(current)
    }
}

impl FusedIterator for ByteSetIter<'_> {}

/// A map from bytes to values, plus an optional entry under the null key.
///
/// Presence lives in a [`ByteSet`] and the values sit in a dense `Vec` in
/// key order: the value of `key` is at `rank(key) - 1`. Tokens are the keys
/// themselves, so iteration by token visits keys in ascending order and then
/// the null key.
///
/// ```
/// use primcoll::ByteMap;
///
/// let mut map = ByteMap::new();
/// map.put(200, "two hundred");
/// map.put(7, "seven");
///
/// assert_eq!(map.keys().collect::<Vec<_>>(), vec![7, 200]);
/// assert_eq!(map.get(200), Some(&"two hundred"));
/// ```
///
/// [`ByteSet`]: struct.ByteSet.html
#[derive(Clone)]
pub struct ByteMap<V> {
    entries: RankedValues<ByteSet, Vec<V>>,
    null_value: Option<V>,
}

impl<V> ByteMap<V> {
    pub fn new() -> ByteMap<V> {
        ByteMap {
            entries: RankedValues::new(ByteSet::new(), Vec::new()),
            null_value: None,
        }
    }

    /// The number of entries, including the null key's.
    pub fn len(&self) -> usize {
        self.keys_set().len() + self.null_value.is_some() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: u8) -> bool {
        self.keys_set().contains(key)
    }

    pub fn contains_null_key(&self) -> bool {
        self.null_value.is_some()
    }

    /// Maps `key` to `value`, returning true if `key` was not present.
    pub fn put(&mut self, key: u8, value: V) -> bool {
        self.insert(key, value).is_none()
    }

    /// Maps `key` to `value`, returning the value it replaced.
    pub fn insert(&mut self, key: u8, value: V) -> Option<V> {
        self.entries.put(key as usize, value)
    }

    pub fn put_null(&mut self, value: V) -> bool {
        self.entries.parts_mut().0.insert_null();

        self.null_value.replace(value).is_none()
    }

    pub fn put_nullable(&mut self, key: Option<u8>, value: V) -> bool {
        match key {
            Some(key) => self.put(key, value),
            None => self.put_null(value),
        }
    }

    pub fn get(&self, key: u8) -> Option<&V> {
        self.entries
            .dense_index(key as usize)
            .map(|i| &self.entries.values()[i])
    }

    pub fn get_mut(&mut self, key: u8) -> Option<&mut V> {
        let i = self.entries.dense_index(key as usize)?;
        let (_, values) = self.entries.parts_mut();

        values.get_mut(i)
    }

    pub fn null_value(&self) -> Option<&V> {
        self.null_value.as_ref()
    }

    pub fn remove(&mut self, key: u8) -> bool {
        self.take(key).is_some()
    }

    pub fn take(&mut self, key: u8) -> Option<V> {
        self.entries.take(key as usize)
    }

    pub fn remove_null(&mut self) -> bool {
        self.entries.parts_mut().0.remove_null();

        self.null_value.take().is_some()
    }

    pub fn remove_nullable(&mut self, key: Option<u8>) -> bool {
        match key {
            Some(key) => self.remove(key),
            None => self.remove_null(),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear::<V>();
        self.null_value = None;
    }

    /// Returns the token for `key`, or [`Token::NONE`] if it is absent.
    ///
    /// [`Token::NONE`]: ../struct.Token.html#associatedconstant.NONE
    pub fn token(&self, key: u8) -> Token {
        if self.contains_key(key) {
            Token::slot(key as usize)
        } else {
            Token::NONE
        }
    }

    pub fn null_token(&self) -> Token {
        if self.contains_null_key() {
            Token::NULL_KEY
        } else {
            Token::NONE
        }
    }

    pub fn token_nullable(&self, key: Option<u8>) -> Token {
        match key {
            Some(key) => self.token(key),
            None => self.null_token(),
        }
    }

    pub fn value(&self, token: Token) -> Option<&V> {
        if token.is_null_key() {
            return self.null_value.as_ref();
        }

        self.get(self.key(token)??)
    }

    /// The key `token` refers to: `Some(None)` for the null key, `None` for
    /// tokens that refer to no entry.
    pub fn key(&self, token: Token) -> Option<Option<u8>> {
        if token.is_null_key() {
            return self.contains_null_key().then_some(None);
        }

        let key = u8::try_from(token.index()?).ok()?;

        self.contains_key(key).then_some(Some(key))
    }

    pub fn first_token(&self) -> Token {
        match self.keys_set().first() {
            Some(key) => Token::slot(key as usize),
            None => self.null_token(),
        }
    }

    pub fn next_token(&self, token: Token) -> Token {
        if token.is_null_key() || token.is_none() {
            return Token::NONE;
        }

        let next = token
            .index()
            .and_then(|i| u8::try_from(i + 1).ok())
            .and_then(|from| self.keys_set().next_key(from));

        match next {
            Some(key) => Token::slot(key as usize),
            None => self.null_token(),
        }
    }

    /// Entries in ascending key order. The null key's entry is not included.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &V)> + '_ {
        self.keys_set().iter().zip(self.entries.values().iter())
    }

    pub fn keys(&self) -> ByteSetIter<'_> {
        self.keys_set().iter()
    }

    /// Values in ascending key order, then the null key's value.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.values().iter().chain(self.null_value.as_ref())
    }

    fn keys_set(&self) -> &ByteSet {
        self.entries.presence()
    }
}

impl<V> Default for ByteMap<V> {
    fn default() -> Self {
        ByteMap::new()
    }
}

impl<V: PartialEq> PartialEq for ByteMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries && self.null_value == other.null_value
    }
}

impl<V: Eq> Eq for ByteMap<V> {}

impl<V: Hash> Hash for ByteMap<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.hash(state);
        self.null_value.hash(state);
    }
}

impl<V: Debug> Debug for ByteMap<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (Some(k), v)))
            .entries(self.null_value.iter().map(|v| (None::<u8>, v)))
            .finish()
    }
}

impl<V> Extend<(u8, V)> for ByteMap<V> {
    fn extend<I: IntoIterator<Item = (u8, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V> iter::FromIterator<(u8, V)> for ByteMap<V> {
    fn from_iter<I: IntoIterator<Item = (u8, V)>>(iter: I) -> Self {
        let mut map = ByteMap::new();
        map.extend(iter);

        map
    }
}

#[cfg(feature = "serde")]
impl<V: serde::Serialize> serde::Serialize for ByteMap<V> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            self.iter()
                .map(|(k, v)| (Some(k), v))
                .chain(self.null_value.iter().map(|v| (None, v))),
        )
    }
}

/// A [`ByteMap`] keyed by `i8`. Keys are stored by their unsigned bit
/// pattern, so iteration visits `0..=127` and then `-128..=-1`.
///
/// [`ByteMap`]: struct.ByteMap.html
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SignedByteMap<V> {
    map: ByteMap<V>,
}

impl<V> SignedByteMap<V> {
    pub fn new() -> SignedByteMap<V> {
        SignedByteMap { map: ByteMap::new() }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains_key(&self, key: i8) -> bool {
        self.map.contains_key(key as u8)
    }

    pub fn contains_null_key(&self) -> bool {
        self.map.contains_null_key()
    }

    pub fn put(&mut self, key: i8, value: V) -> bool {
        self.map.put(key as u8, value)
    }

    pub fn insert(&mut self, key: i8, value: V) -> Option<V> {
        self.map.insert(key as u8, value)
    }

    pub fn put_null(&mut self, value: V) -> bool {
        self.map.put_null(value)
    }

    pub fn put_nullable(&mut self, key: Option<i8>, value: V) -> bool {
        self.map.put_nullable(key.map(|k| k as u8), value)
    }

    pub fn get(&self, key: i8) -> Option<&V> {
        self.map.get(key as u8)
    }

    pub fn get_mut(&mut self, key: i8) -> Option<&mut V> {
        self.map.get_mut(key as u8)
    }

    pub fn null_value(&self) -> Option<&V> {
        self.map.null_value()
    }

    pub fn remove(&mut self, key: i8) -> bool {
        self.map.remove(key as u8)
    }

    pub fn take(&mut self, key: i8) -> Option<V> {
        self.map.take(key as u8)
    }

    pub fn remove_null(&mut self) -> bool {
        self.map.remove_null()
    }

    pub fn remove_nullable(&mut self, key: Option<i8>) -> bool {
        self.map.remove_nullable(key.map(|k| k as u8))
    }

    pub fn clear(&mut self) {
        self.map.clear()
    }

    pub fn token(&self, key: i8) -> Token {
        self.map.token(key as u8)
    }

    pub fn null_token(&self) -> Token {
        self.map.null_token()
    }

    pub fn token_nullable(&self, key: Option<i8>) -> Token {
        self.map.token_nullable(key.map(|k| k as u8))
    }

    pub fn value(&self, token: Token) -> Option<&V> {
        self.map.value(token)
    }

    pub fn key(&self, token: Token) -> Option<Option<i8>> {
        self.map.key(token).map(|key| key.map(|k| k as i8))
    }

    pub fn first_token(&self) -> Token {
        self.map.first_token()
    }

    pub fn next_token(&self, token: Token) -> Token {
        self.map.next_token(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i8, &V)> + '_ {
        self.map.iter().map(|(k, v)| (k as i8, v))
    }

    /// Keys in bit-pattern order. The null key is not included.
    pub fn keys(&self) -> impl Iterator<Item = i8> + '_ {
        self.map.keys().map(|k| k as i8)
    }

    /// Values in key order, then the null key's value.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.map.values()
    }
}

impl<V> Default for SignedByteMap<V> {
    fn default() -> Self {
        SignedByteMap::new()
    }
}

impl<V: Debug> Debug for SignedByteMap<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (Some(k), v)))
            .entries(self.null_value().map(|v| (None::<i8>, v)))
            .finish()
    }
}

impl<V> Extend<(i8, V)> for SignedByteMap<V> {
    fn extend<I: IntoIterator<Item = (i8, V)>>(&mut self, iter: I) {
        self.map
            .extend(iter.into_iter().map(|(key, value)| (key as u8, value)));
    }
}

impl<V> iter::FromIterator<(i8, V)> for SignedByteMap<V> {
    fn from_iter<I: IntoIterator<Item = (i8, V)>>(iter: I) -> Self {
        let mut map = SignedByteMap::new();
        map.extend(iter);

        map
    }
}

#[cfg(feature = "serde")]
impl<V: serde::Serialize> serde::Serialize for SignedByteMap<V> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            self.iter()
                .map(|(k, v)| (Some(k), v))
                .chain(self.null_value().map(|v| (None, v))),
        )
    }
}
