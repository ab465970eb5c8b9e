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

//! Hashing and sizing helpers shared by every collection in the crate.
//!
//! The structural hash functions follow MurmurHash3's 32-bit block mixing and
//! finalization, so collections with equal contents hash equally regardless
//! of their internal slot layout.

use std::hash::{Hash, Hasher};

use fxhash::FxHasher;

use crate::error::{Error, Result, MAX_CAPACITY};

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// Hashes a 64-bit pattern down to 32 well-mixed bits.
#[inline]
pub fn hash(x: u64) -> u32 {
    finalize_hash(mix(mix(0, x as u32), (x >> 32) as u32), 8)
}

/// Mixes one 32-bit block of `data` into the running `hash`.
#[inline]
pub fn mix(hash: u32, data: u32) -> u32 {
    let k = data.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);

    (hash ^ k)
        .rotate_left(13)
        .wrapping_mul(5)
        .wrapping_add(0xe654_6b64)
}

/// Avalanches `hash` after all blocks have been mixed in. `length` is the
/// number of items (or bytes) that were mixed.
#[inline]
pub fn finalize_hash(hash: u32, length: usize) -> u32 {
    let mut h = hash ^ (length as u32);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^ (h >> 16)
}

/// Hashes an arbitrary value with a fixed-seed hasher, for the parts of a
/// structural hash that are not primitives.
pub fn hash_value<T: Hash + ?Sized>(value: &T) -> u32 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);

    hash(hasher.finish())
}

/// Returns the smallest power of two that is at least `n` (and at least 1).
pub fn next_power_of_2(n: usize) -> Result<usize> {
    match n.max(1).checked_next_power_of_two() {
        Some(p) if p <= MAX_CAPACITY => Ok(p),
        _ => Err(Error::CapacityOverflow { requested: n }),
    }
}

/// Returns the new length of a growable backing array that currently holds
/// `current` elements and must hold at least `required`.
///
/// Arrays grow by half of their current length, so appends are amortized
/// constant time.
pub fn grow_capacity(current: usize, required: usize) -> Result<usize> {
    if required > MAX_CAPACITY {
        return Err(Error::CapacityOverflow {
            requested: required,
        });
    }

    let grown = current.saturating_add(current / 2).min(MAX_CAPACITY);

    Ok(grown.max(required).max(4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_of_two_rounding() {
        assert_eq!(next_power_of_2(0), Ok(1));
        assert_eq!(next_power_of_2(1), Ok(1));
        assert_eq!(next_power_of_2(5), Ok(8));
        assert_eq!(next_power_of_2(64), Ok(64));
        assert_eq!(next_power_of_2(MAX_CAPACITY), Ok(MAX_CAPACITY));
        assert_eq!(
            next_power_of_2(MAX_CAPACITY + 1),
            Err(Error::CapacityOverflow {
                requested: MAX_CAPACITY + 1
            })
        );
    }

    #[test]
    fn growth_policy() {
        assert_eq!(grow_capacity(0, 1), Ok(4));
        assert_eq!(grow_capacity(8, 9), Ok(12));
        assert_eq!(grow_capacity(8, 100), Ok(100));
        assert!(grow_capacity(8, MAX_CAPACITY + 1).is_err());
    }

    #[test]
    fn hashing_is_deterministic() {
        assert_eq!(hash(42), hash(42));
        assert_ne!(hash(1), hash(2));
        assert_eq!(hash_value("foo"), hash_value("foo"));

        let h = mix(mix(0, 1), 2);
        assert_ne!(finalize_hash(h, 2), finalize_hash(h, 3));
    }
}
