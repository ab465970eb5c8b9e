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

//! A hash map for primitive keys implemented with open addressing, linear
//! probing and backward-shift deletion.

use std::{
    env,
    fmt::{self, Debug, Formatter},
    hash::{BuildHasher, Hash, Hasher},
    iter,
    mem,
    sync::atomic::{AtomicU32, Ordering},
};

use crate::{
    array,
    error::{Error, Result, MAX_CAPACITY},
    primitive::Primitive,
    token::Token,
};


/// Default hasher for `PrimitiveMap`.
///
/// This is currently [aHash], a hashing algorithm designed around acceleration
/// by the [AES-NI] instruction set on x86 processors. Keys are fed to the
/// hasher as their raw 64-bit pattern.
///
/// [aHash]: https://docs.rs/ahash
/// [AES-NI]: https://en.wikipedia.org/wiki/AES_instruction_set
pub type DefaultHashBuilder = ahash::RandomState;

const MIN_LOAD_FACTOR: f32 = 0.01;
const MAX_LOAD_FACTOR: f32 = 0.99;
const MIN_CAPACITY: usize = 4;
const DEFAULT_EXPECTED_ITEMS: usize = 4;

/// Returns the load factor used by maps that are not given one explicitly.
///
/// The value is read once from the `PRIMCOLL_LOAD_FACTOR` environment
/// variable and defaults to `0.5`. Like every load factor it is clamped to
/// `[0.01, 0.99]`.
pub fn default_load_factor() -> f32 {
    const DEFAULT: f32 = 0.5;
    static STORAGE: AtomicU32 = AtomicU32::new(u32::MAX);

    let mut storage = STORAGE.load(Ordering::Relaxed);

    if storage == u32::MAX {
        storage = clamp_load_factor(
            env::var("PRIMCOLL_LOAD_FACTOR")
                .ok()
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT),
        )
        .to_bits();

        STORAGE
            .compare_exchange(u32::MAX, storage, Ordering::Relaxed, Ordering::Relaxed)
            .ok();
    }

    f32::from_bits(storage)
}

/// Forces `load_factor` into `[0.01, 0.99]`. `NaN` becomes the default.
pub(crate) fn clamp_load_factor(load_factor: f32) -> f32 {
    if load_factor.is_nan() {
        log::debug!("load factor is NaN, using 0.5");

        return 0.5;
    }

    let clamped = load_factor.clamp(MIN_LOAD_FACTOR, MAX_LOAD_FACTOR);

    if clamped != load_factor {
        log::debug!("load factor {} clamped to {}", load_factor, clamped);
    }

    clamped
}

/// A hash map from unboxed primitive keys to values, implemented with open
/// addressing and linear probing.
///
/// Keys live in one flat array and values in a parallel one; a slot is empty
/// when its key has the all-zero bit pattern. Because of that, the zero key
/// itself (`0`, `'\0'`, `0.0`) is stored out of band, as is the optional
/// *null key* reachable through the [`put_nullable`] family of methods.
///
/// Removal uses backward-shift deletion: the entries following a removed slot
/// are moved back to close the gap, so the table never holds tombstones and
/// probe sequences never degrade over time.
///
/// The table grows by doubling whenever the number of occupied slots reaches
/// `capacity * load_factor`; load factors are clamped to `[0.01, 0.99]`.
///
/// Values must implement [`Default`], which fills the value array for empty
/// slots.
///
/// Lookups can be split into a [`token`] lookup and an O(1) [`value`] read:
///
/// ```
/// use primcoll::PrimitiveMap;
///
/// let mut map: PrimitiveMap<i64, i64> = PrimitiveMap::new();
/// map.put(5, 50);
///
/// let token = map.token(5);
/// assert!(token.is_some());
/// assert_eq!(map.value(token), Some(&50));
/// assert!(map.token(6).is_none());
/// ```
///
/// [`put_nullable`]: #method.put_nullable
/// [`token`]: #method.token
/// [`value`]: #method.value
/// [`Default`]: https://doc.rust-lang.org/std/default/trait.Default.html
#[derive(Clone)]
pub struct PrimitiveMap<K: Primitive, V, S = DefaultHashBuilder> {
    keys: Vec<K>,   // len() is a power of 2
    values: Vec<V>, // len() == keys.len()
    assigned: usize,
    mask: usize,
    resize_at: usize,
    load_factor: f32,
    zero_value: Option<V>,
    null_value: Option<V>,
    hash_builder: S,
}

impl<K: Primitive, V: Default> PrimitiveMap<K, V, DefaultHashBuilder> {
    /// Creates an empty `PrimitiveMap` sized for a handful of entries and
    /// using [`default_load_factor`].
    ///
    /// [`default_load_factor`]: fn.default_load_factor.html
    pub fn new() -> PrimitiveMap<K, V, DefaultHashBuilder> {
        PrimitiveMap::with_capacity(DEFAULT_EXPECTED_ITEMS)
    }

    /// Creates an empty `PrimitiveMap` that can hold `expected_items` entries
    /// without growing.
    ///
    /// # Panics
    ///
    /// Panics if the required table would exceed [`MAX_CAPACITY`] slots.
    ///
    /// [`MAX_CAPACITY`]: ../constant.MAX_CAPACITY.html
    pub fn with_capacity(expected_items: usize) -> PrimitiveMap<K, V, DefaultHashBuilder> {
        PrimitiveMap::with_capacity_and_load_factor(expected_items, default_load_factor())
    }

    /// Creates an empty `PrimitiveMap` that can hold `expected_items` entries
    /// without growing and grows once `load_factor` of its slots are in use.
    ///
    /// `load_factor` is clamped to `[0.01, 0.99]`.
    ///
    /// # Panics
    ///
    /// Panics if the required table would exceed [`MAX_CAPACITY`] slots.
    ///
    /// [`MAX_CAPACITY`]: ../constant.MAX_CAPACITY.html
    pub fn with_capacity_and_load_factor(
        expected_items: usize,
        load_factor: f32,
    ) -> PrimitiveMap<K, V, DefaultHashBuilder> {
        match PrimitiveMap::try_with_capacity_and_load_factor(expected_items, load_factor) {
            Ok(map) => map,
            Err(e) => panic!("{}", e),
        }
    }

    /// Fallible version of [`with_capacity_and_load_factor`].
    ///
    /// [`with_capacity_and_load_factor`]: #method.with_capacity_and_load_factor
    pub fn try_with_capacity_and_load_factor(
        expected_items: usize,
        load_factor: f32,
    ) -> Result<PrimitiveMap<K, V, DefaultHashBuilder>> {
        PrimitiveMap::try_with_config(expected_items, load_factor, DefaultHashBuilder::default())
    }
}

impl<K: Primitive, V: Default, S: BuildHasher> PrimitiveMap<K, V, S> {
    /// Creates an empty `PrimitiveMap` that will use `hash_builder` to hash
    /// keys.
    pub fn with_hasher(hash_builder: S) -> PrimitiveMap<K, V, S> {
        PrimitiveMap::with_capacity_and_hasher(DEFAULT_EXPECTED_ITEMS, hash_builder)
    }

    /// Creates an empty `PrimitiveMap` that can hold `expected_items` entries
    /// without growing and that uses `hash_builder` to hash keys.
    ///
    /// # Panics
    ///
    /// Panics if the required table would exceed [`MAX_CAPACITY`] slots.
    ///
    /// [`MAX_CAPACITY`]: ../constant.MAX_CAPACITY.html
    pub fn with_capacity_and_hasher(expected_items: usize, hash_builder: S) -> PrimitiveMap<K, V, S> {
        match PrimitiveMap::try_with_config(expected_items, default_load_factor(), hash_builder) {
            Ok(map) => map,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates an empty `PrimitiveMap` from every tunable at once.
    ///
    /// `load_factor` is clamped to `[0.01, 0.99]`. Fails if the table needed
    /// to hold `expected_items` would exceed [`MAX_CAPACITY`] slots.
    ///
    /// [`MAX_CAPACITY`]: ../constant.MAX_CAPACITY.html
    pub fn try_with_config(
        expected_items: usize,
        load_factor: f32,
        hash_builder: S,
    ) -> Result<PrimitiveMap<K, V, S>> {
        let load_factor = clamp_load_factor(load_factor);
        let capacity = table_capacity(expected_items, load_factor)?;

        log::trace!(
            "allocating primitive map: {} slots for {} expected items",
            capacity,
            expected_items
        );

        Ok(PrimitiveMap {
            keys: vec![K::default(); capacity],
            values: default_values(capacity),
            assigned: 0,
            mask: capacity - 1,
            resize_at: resize_threshold(capacity, load_factor),
            load_factor,
            zero_value: None,
            null_value: None,
            hash_builder,
        })
    }

    /// Associates `value` with `key`, returning true if `key` was not present
    /// before.
    ///
    /// # Panics
    ///
    /// Panics if growing the table would exceed [`MAX_CAPACITY`] slots.
    ///
    /// [`MAX_CAPACITY`]: ../constant.MAX_CAPACITY.html
    pub fn put(&mut self, key: K, value: V) -> bool {
        self.insert(key, value).is_none()
    }

    /// Associates `value` with `key`, returning the value previously
    /// associated with `key`, if any.
    ///
    /// # Panics
    ///
    /// Panics if growing the table would exceed [`MAX_CAPACITY`] slots.
    ///
    /// [`MAX_CAPACITY`]: ../constant.MAX_CAPACITY.html
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if key.is_zero() {
            return self.zero_value.replace(value);
        }

        let mut slot = self.ideal_slot(key);

        loop {
            let this_key = self.keys[slot];

            if this_key.is_zero() {
                break;
            } else if this_key.bit_eq(key) {
                return Some(mem::replace(&mut self.values[slot], value));
            }

            slot = (slot + 1) & self.mask;
        }

        self.keys[slot] = key;
        self.values[slot] = value;
        self.assigned += 1;

        if self.assigned >= self.resize_at {
            let doubled = self.keys.len() * 2;

            if let Err(e) = self.allocate(doubled) {
                panic!("{}", e);
            }
        }

        None
    }

    /// Associates `value` with the null key, returning true if the null key
    /// was not present before.
    pub fn put_null(&mut self, value: V) -> bool {
        self.null_value.replace(value).is_none()
    }

    /// Associates `value` with `key`, where `None` stands for the null key.
    /// Returns true if the key was not present before.
    pub fn put_nullable(&mut self, key: Option<K>, value: V) -> bool {
        match key {
            Some(key) => self.put(key, value),
            None => self.put_null(value),
        }
    }

    /// Removes `key` from the map, returning true if it was present.
    pub fn remove(&mut self, key: K) -> bool {
        self.take(key).is_some()
    }

    /// Removes `key` from the map, returning the value it was associated with.
    pub fn take(&mut self, key: K) -> Option<V> {
        if key.is_zero() {
            return self.zero_value.take();
        }

        let slot = self.find_slot(key)?;
        let value = mem::take(&mut self.values[slot]);
        self.shift_back(slot);

        Some(value)
    }

    /// Removes the null key, returning true if it was present.
    pub fn remove_null(&mut self) -> bool {
        self.null_value.take().is_some()
    }

    /// Removes `key`, where `None` stands for the null key. Returns true if
    /// the key was present.
    pub fn remove_nullable(&mut self, key: Option<K>) -> bool {
        match key {
            Some(key) => self.remove(key),
            None => self.remove_null(),
        }
    }

    /// Removes every entry. The table keeps its current capacity.
    pub fn clear(&mut self) {
        self.keys.iter_mut().for_each(|k| *k = K::default());
        self.values.iter_mut().for_each(|v| *v = V::default());
        self.assigned = 0;
        self.zero_value = None;
        self.null_value = None;
    }

    /// Grows the table so that `additional` more keys can be inserted without
    /// rehashing.
    ///
    /// # Panics
    ///
    /// Panics if the table would exceed [`MAX_CAPACITY`] slots.
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
        let wanted = self
            .assigned
            .checked_add(additional)
            .ok_or(Error::CapacityOverflow {
                requested: usize::MAX,
            })?;

        if wanted < self.resize_at {
            return Ok(());
        }

        let capacity = table_capacity(wanted, self.load_factor)?;

        if capacity > self.keys.len() {
            self.allocate(capacity)?;
        }

        Ok(())
    }

    /// Rehashes every in-table entry into a fresh table of `capacity` slots.
    fn allocate(&mut self, capacity: usize) -> Result<()> {
        if capacity > MAX_CAPACITY {
            return Err(Error::CapacityOverflow {
                requested: capacity,
            });
        }

        debug_assert!(capacity.is_power_of_two());
        debug_assert!(capacity > self.assigned);

        log::trace!(
            "rehashing primitive map: {} -> {} slots, {} entries",
            self.keys.len(),
            capacity,
            self.assigned
        );

        let old_keys = mem::replace(&mut self.keys, vec![K::default(); capacity]);
        let old_values = mem::replace(&mut self.values, default_values(capacity));
        self.mask = capacity - 1;
        self.resize_at = resize_threshold(capacity, self.load_factor);

        for (key, value) in old_keys.into_iter().zip(old_values) {
            if key.is_zero() {
                continue;
            }

            let mut slot = self.ideal_slot(key);

            while !self.keys[slot].is_zero() {
                slot = (slot + 1) & self.mask;
            }

            self.keys[slot] = key;
            self.values[slot] = value;
        }

        Ok(())
    }

    /// Closes the gap left at `gap` by moving back every following entry whose
    /// probe sequence passes through the gap.
    ///
    /// The value at `gap` must already have been moved out.
    fn shift_back(&mut self, mut gap: usize) {
        let mut distance = 0;

        loop {
            distance += 1;
            let slot = (gap + distance) & self.mask;
            let key = self.keys[slot];

            if key.is_zero() {
                break;
            }

            let displacement = slot.wrapping_sub(self.ideal_slot(key)) & self.mask;

            if displacement >= distance {
                self.keys[gap] = key;
                self.values.swap(gap, slot);
                gap = slot;
                distance = 0;
            }
        }

        self.keys[gap] = K::default();
        self.assigned -= 1;
    }
}

impl<K: Primitive, V, S: BuildHasher> PrimitiveMap<K, V, S> {
    /// Returns the number of entries, including the zero key and the null key.
    pub fn len(&self) -> usize {
        self.assigned + self.zero_value.is_some() as usize + self.null_value.is_some() as usize
    }

    /// Returns true if this map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of slots in the table.
    pub fn capacity(&self) -> usize {
        self.keys.len()
    }

    /// Returns the clamped load factor this map grows at.
    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    /// Returns a reference to this map's hash builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: K) -> bool {
        self.token(key).is_some()
    }

    /// Returns true if the null key is present.
    pub fn contains_null_key(&self) -> bool {
        self.null_value.is_some()
    }

    /// Looks up `key`, returning a token for its entry or [`Token::NONE`].
    ///
    /// [`Token::NONE`]: ../struct.Token.html#associatedconstant.NONE
    pub fn token(&self, key: K) -> Token {
        if key.is_zero() {
            return if self.zero_value.is_some() {
                Token::ZERO_KEY
            } else {
                Token::NONE
            };
        }

        match self.find_slot(key) {
            Some(slot) => Token::slot(slot),
            None => Token::NONE,
        }
    }

    /// Looks up the null key, returning a token for its entry or
    /// [`Token::NONE`].
    ///
    /// [`Token::NONE`]: ../struct.Token.html#associatedconstant.NONE
    pub fn null_token(&self) -> Token {
        if self.null_value.is_some() {
            Token::NULL_KEY
        } else {
            Token::NONE
        }
    }

    /// Looks up `key`, where `None` stands for the null key.
    pub fn token_nullable(&self, key: Option<K>) -> Token {
        match key {
            Some(key) => self.token(key),
            None => self.null_token(),
        }
    }

    /// Returns the value of the entry `token` refers to.
    ///
    /// Returns `None` for [`Token::NONE`] and for tokens that do not refer to
    /// a live entry.
    ///
    /// [`Token::NONE`]: ../struct.Token.html#associatedconstant.NONE
    pub fn value(&self, token: Token) -> Option<&V> {
        match token {
            Token::ZERO_KEY => self.zero_value.as_ref(),
            Token::NULL_KEY => self.null_value.as_ref(),
            _ => token
                .index()
                .filter(|&slot| slot < self.keys.len() && !self.keys[slot].is_zero())
                .map(|slot| &self.values[slot]),
        }
    }

    /// Mutable version of [`value`].
    ///
    /// [`value`]: #method.value
    pub fn value_mut(&mut self, token: Token) -> Option<&mut V> {
        match token {
            Token::ZERO_KEY => self.zero_value.as_mut(),
            Token::NULL_KEY => self.null_value.as_mut(),
            _ => match token.index() {
                Some(slot) if slot < self.keys.len() && !self.keys[slot].is_zero() => {
                    Some(&mut self.values[slot])
                }
                _ => None,
            },
        }
    }

    /// Returns the key of the entry `token` refers to.
    ///
    /// Returns `None` for [`Token::NONE`], for the null key's token and for
    /// tokens that do not refer to a live entry.
    ///
    /// [`Token::NONE`]: ../struct.Token.html#associatedconstant.NONE
    pub fn key(&self, token: Token) -> Option<K> {
        match token {
            Token::ZERO_KEY if self.zero_value.is_some() => Some(K::default()),
            _ => token
                .index()
                .filter(|&slot| slot < self.keys.len())
                .map(|slot| self.keys[slot])
                .filter(|k| !k.is_zero()),
        }
    }

    /// Returns a reference to the value associated with `key`.
    pub fn get(&self, key: K) -> Option<&V> {
        self.value(self.token(key))
    }

    /// Returns a mutable reference to the value associated with `key`.
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        let token = self.token(key);

        self.value_mut(token)
    }

    /// Returns a reference to the value associated with the null key.
    pub fn null_value(&self) -> Option<&V> {
        self.null_value.as_ref()
    }

    /// Returns the token of the first entry in iteration order, or
    /// [`Token::NONE`] if the map is empty.
    ///
    /// Entries are visited in slot order, then the zero key, then the null
    /// key.
    ///
    /// ```
    /// use primcoll::PrimitiveMap;
    ///
    /// let mut map: PrimitiveMap<u32, u32> = PrimitiveMap::new();
    /// map.put(1, 10);
    /// map.put(0, 0);
    /// map.put_null(7);
    ///
    /// let mut sum = 0;
    /// let mut token = map.first_token();
    ///
    /// while token.is_some() {
    ///     sum += map.value(token).unwrap();
    ///     token = map.next_token(token);
    /// }
    ///
    /// assert_eq!(sum, 17);
    /// ```
    ///
    /// [`Token::NONE`]: ../struct.Token.html#associatedconstant.NONE
    pub fn first_token(&self) -> Token {
        self.scan_from(0)
    }

    /// Returns the token following `token` in iteration order, or
    /// [`Token::NONE`] once every entry has been visited.
    ///
    /// [`Token::NONE`]: ../struct.Token.html#associatedconstant.NONE
    pub fn next_token(&self, token: Token) -> Token {
        match token {
            Token::NONE | Token::NULL_KEY => Token::NONE,
            Token::ZERO_KEY => self.null_token(),
            _ => match token.index() {
                Some(slot) => self.scan_from(slot + 1),
                None => Token::NONE,
            },
        }
    }

    /// An iterator over every entry except the null key's, in iteration
    /// order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            keys: &self.keys,
            values: &self.values,
            index: 0,
            zero_value: self.zero_value.as_ref(),
        }
    }

    /// An iterator over every key except the null key.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// An iterator over every value, including the null key's.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v).chain(self.null_value.iter())
    }

    fn scan_from(&self, start: usize) -> Token {
        if let Some(offset) = self.keys[start.min(self.keys.len())..]
            .iter()
            .position(|k| !k.is_zero())
        {
            return Token::slot(start + offset);
        }

        if self.zero_value.is_some() {
            Token::ZERO_KEY
        } else {
            self.null_token()
        }
    }

    fn find_slot(&self, key: K) -> Option<usize> {
        debug_assert!(!key.is_zero());

        let mut slot = self.ideal_slot(key);

        loop {
            let this_key = self.keys[slot];

            if this_key.is_zero() {
                return None;
            } else if this_key.bit_eq(key) {
                return Some(slot);
            }

            slot = (slot + 1) & self.mask;
        }
    }

    #[inline]
    fn ideal_slot(&self, key: K) -> usize {
        (self.hash_builder.hash_one(key.to_bits()) as usize) & self.mask
    }
}

impl<K: Primitive, V: Default> Default for PrimitiveMap<K, V, DefaultHashBuilder> {
    fn default() -> Self {
        PrimitiveMap::new()
    }
}

impl<K: Primitive, V: PartialEq, S: BuildHasher, T: BuildHasher> PartialEq<PrimitiveMap<K, V, T>>
    for PrimitiveMap<K, V, S>
{
    fn eq(&self, other: &PrimitiveMap<K, V, T>) -> bool {
        self.len() == other.len()
            && self.null_value == other.null_value
            && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Primitive, V: Eq, S: BuildHasher> Eq for PrimitiveMap<K, V, S> {}

/// Entries are combined by wrapping addition, so equal maps hash equally no
/// matter how their tables are laid out.
impl<K: Primitive, V: Hash, S: BuildHasher> Hash for PrimitiveMap<K, V, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sum = 0u32;

        for (key, value) in self.iter() {
            sum = sum.wrapping_add(array::mix(array::hash(key.to_bits()), array::hash_value(value)));
        }

        if let Some(value) = &self.null_value {
            sum = sum.wrapping_add(array::mix(NULL_KEY_SEED, array::hash_value(value)));
        }

        state.write_u32(array::finalize_hash(sum, self.len()));
    }
}

const NULL_KEY_SEED: u32 = 0x9e37_79b9;

impl<K: Primitive, V: Debug, S: BuildHasher> Debug for PrimitiveMap<K, V, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (Some(k), v)))
            .entries(self.null_value.iter().map(|v| (None::<K>, v)))
            .finish()
    }
}

impl<K: Primitive, V: Default, S: BuildHasher> Extend<(K, V)> for PrimitiveMap<K, V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Primitive, V: Default, S: BuildHasher + Default> FromIterator<(K, V)>
    for PrimitiveMap<K, V, S>
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = PrimitiveMap::with_capacity_and_hasher(iter.size_hint().0, S::default());
        map.extend(iter);

        map
    }
}

impl<'a, K: Primitive, V, S: BuildHasher> IntoIterator for &'a PrimitiveMap<K, V, S> {
    type Item = (K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(feature = "serde")]
impl<K, V, S> serde::Serialize for PrimitiveMap<K, V, S>
where
    K: Primitive + serde::Serialize,
    V: serde::Serialize,
    S: BuildHasher,
{
    fn serialize<Z: serde::Serializer>(&self, serializer: Z) -> std::result::Result<Z::Ok, Z::Error> {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.len()))?;

        for (key, value) in self.iter() {
            seq.serialize_element(&(Some(key), value))?;
        }

        if let Some(value) = &self.null_value {
            seq.serialize_element(&(None::<K>, value))?;
        }

        seq.end()
    }
}

/// An iterator over the non-null entries of a [`PrimitiveMap`].
///
/// [`PrimitiveMap`]: struct.PrimitiveMap.html
pub struct Iter<'a, K, V> {
    keys: &'a [K],
    values: &'a [V],
    index: usize,
    zero_value: Option<&'a V>,
}

impl<'a, K: Primitive, V> Iterator for Iter<'a, K, V> {
    type Item = (K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.keys.len() {
            let i = self.index;
            self.index += 1;

            if !self.keys[i].is_zero() {
                return Some((self.keys[i], &self.values[i]));
            }
        }

        self.zero_value.take().map(|v| (K::default(), v))
    }
}

/// Number of slots needed to hold `expected_items` at `load_factor`.
fn table_capacity(expected_items: usize, load_factor: f32) -> Result<usize> {
    let needed = (expected_items as f64 / load_factor as f64).ceil();

    if needed >= MAX_CAPACITY as f64 {
        return Err(Error::CapacityOverflow {
            requested: expected_items,
        });
    }

    let capacity = array::next_power_of_2((needed as usize + 1).max(MIN_CAPACITY))?;

    // the growth check runs once `resize_threshold` slots are in use
    if resize_threshold(capacity, load_factor) <= expected_items {
        array::next_power_of_2(capacity * 2)
    } else {
        Ok(capacity)
    }
}

/// Number of occupied slots at which a table of `capacity` slots grows. At
/// least one slot always stays empty so probe loops terminate.
fn resize_threshold(capacity: usize, load_factor: f32) -> usize {
    ((capacity as f64 * load_factor as f64).floor() as usize).clamp(1, capacity - 1)
}

fn default_values<V: Default>(length: usize) -> Vec<V> {
    iter::repeat_with(V::default).take(length).collect()
}
