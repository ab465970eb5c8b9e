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

//! The primitive types usable as keys and elements.

use std::fmt::Debug;

/// A primitive type that can be stored unboxed in the collections of this
/// crate.
///
/// Keys are compared and hashed by their raw bit pattern, so `f32` and `f64`
/// keys behave like their `to_bits` representation: every `NaN` payload is a
/// distinct, stable key and `-0.0` is distinct from `0.0`.
///
/// The value whose bit pattern is all zeroes doubles as the empty-slot marker
/// inside open-addressing tables and is therefore kept out of band.
pub trait Primitive: Copy + Default + Debug + 'static {
    /// Returns the bit pattern of `self`, zero-extended to 64 bits.
    fn to_bits(self) -> u64;

    /// Returns true if the bit pattern of `self` is all zeroes.
    #[inline]
    fn is_zero(self) -> bool {
        self.to_bits() == 0
    }

    /// Bit-pattern equality.
    #[inline]
    fn bit_eq(self, other: Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

macro_rules! impl_primitive_int {
    ($($signed:ty => $unsigned:ty),* $(,)?) => {
        $(
            impl Primitive for $signed {
                #[inline]
                fn to_bits(self) -> u64 {
                    self as $unsigned as u64
                }
            }

            impl Primitive for $unsigned {
                #[inline]
                fn to_bits(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_primitive_int!(i8 => u8, i16 => u16, i32 => u32, i64 => u64);

impl Primitive for char {
    #[inline]
    fn to_bits(self) -> u64 {
        self as u32 as u64
    }
}

impl Primitive for f32 {
    #[inline]
    fn to_bits(self) -> u64 {
        f32::to_bits(self) as u64
    }
}

impl Primitive for f64 {
    #[inline]
    fn to_bits(self) -> u64 {
        f64::to_bits(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_patterns() {
        assert!(0i8.is_zero());
        assert!(0u64.is_zero());
        assert!('\0'.is_zero());
        assert!(0.0f32.is_zero());
        assert!(0.0f64.is_zero());

        assert!(!(-0.0f64).is_zero());
        assert!(!(-1i8).is_zero());
        assert!(!'a'.is_zero());
    }

    #[test]
    fn signed_bits_do_not_sign_extend() {
        assert_eq!((-1i8).to_bits(), 0xff);
        assert_eq!((-1i16).to_bits(), 0xffff);
        assert_eq!((-1i32).to_bits(), 0xffff_ffff);
        assert_eq!((-1i64).to_bits(), u64::MAX);
    }

    #[test]
    fn floats_compare_by_bits() {
        assert!(f64::NAN.bit_eq(f64::NAN));
        assert!(!0.0f32.bit_eq(-0.0));
        assert!(1.5f32.bit_eq(1.5));
    }
}
