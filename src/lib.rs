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

//! Collections specialized for primitive types.
//!
//! [`PrimitiveMap`] and [`PrimitiveSet`] are open-addressing hash tables with
//! linear probing that store keys unboxed, keep the zero key and an optional
//! null key out of band, and delete by backward shift instead of leaving
//! tombstones. Lookups return [`Token`]s that read values in O(1).
//!
//! [`BitsList`] packs unsigned integers of any width from 1 to 64 bits into
//! words. [`NullList`] and [`BitsNullList`] add absent positions on top of
//! dense storage, and [`ByteMap`] indexes a dense value array by the rank of
//! a byte key in a 256-bit set. [`RingBuffer`] and [`SpinRingBuffer`] are
//! bounded FIFO buffers.
//!
//! The default load factor of the hash tables is 0.5 and can be changed
//! process-wide with the `PRIMCOLL_LOAD_FACTOR` environment variable.
//!
//! [`PrimitiveMap`]: map/struct.PrimitiveMap.html
//! [`PrimitiveSet`]: set/struct.PrimitiveSet.html
//! [`Token`]: struct.Token.html
//! [`BitsList`]: struct.BitsList.html
//! [`NullList`]: struct.NullList.html
//! [`BitsNullList`]: struct.BitsNullList.html
//! [`ByteMap`]: struct.ByteMap.html
//! [`RingBuffer`]: struct.RingBuffer.html
//! [`SpinRingBuffer`]: struct.SpinRingBuffer.html

pub mod array;
pub mod bit_list;
pub mod bits_list;
pub mod byte_map;
pub mod error;
pub mod map;
pub mod null_list;
pub mod overlay;
pub mod primitive;
pub mod ring_buffer;
pub mod set;
pub mod token;

pub use bit_list::BitList;
pub use bits_list::BitsList;
pub use byte_map::{ByteMap, ByteSet, SignedByteMap};
pub use error::{Error, Result, MAX_CAPACITY};
pub use map::PrimitiveMap;
pub use null_list::{BitsNullList, NullList};
pub use primitive::Primitive;
pub use ring_buffer::{RingBuffer, SpinRingBuffer};
pub use set::PrimitiveSet;
pub use token::Token;
