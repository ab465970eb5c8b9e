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

use std::hash::{BuildHasher, Hasher};

use crate::{primitive::Primitive, PrimitiveMap};

/// Hashes every key to the same value, so every key probes from the same
/// slot and the whole table degenerates into one long cluster.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ConstantHashBuilder;

impl BuildHasher for ConstantHashBuilder {
    type Hasher = ConstantHasher;

    fn build_hasher(&self) -> ConstantHasher {
        ConstantHasher
    }
}

pub(crate) struct ConstantHasher;

impl Hasher for ConstantHasher {
    fn finish(&self) -> u64 {
        0
    }

    fn write(&mut self, _: &[u8]) {}
}

/// Hashes a key to its own bit pattern, so a key's ideal slot is
/// `key & mask`. Useful to build collisions and wrap-around clusters by hand.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct IdentityHashBuilder;

impl BuildHasher for IdentityHashBuilder {
    type Hasher = IdentityHasher;

    fn build_hasher(&self) -> IdentityHasher {
        IdentityHasher(0)
    }
}

pub(crate) struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = (self.0 << 8) | b as u64;
        }
    }

    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }
}

/// Asserts the open-addressing invariant: walking back from every occupied
/// slot to its ideal slot never crosses an empty slot, and the occupied slot
/// count matches `assigned`.
pub(crate) fn assert_probe_invariant<K: Primitive, V, S: BuildHasher>(map: &PrimitiveMap<K, V, S>) {
    let capacity = map.keys.len();
    let mut occupied = 0;

    assert!(capacity.is_power_of_two());
    assert_eq!(map.mask, capacity - 1);
    assert!(map.assigned < capacity, "table must keep an empty slot");

    for (slot, &key) in map.keys.iter().enumerate() {
        if key.is_zero() {
            continue;
        }

        occupied += 1;

        let ideal = map.ideal_slot(key);
        let mut i = ideal;

        while i != slot {
            assert!(
                !map.keys[i].is_zero(),
                "empty slot {} between ideal slot {} and slot {} of {:?}",
                i,
                ideal,
                slot,
                key
            );

            i = (i + 1) & map.mask;
        }
    }

    assert_eq!(occupied, map.assigned);
}
