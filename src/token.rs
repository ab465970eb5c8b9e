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

//! Lookup tokens.

/// An opaque handle to an entry of a map or set, returned by `token` lookups
/// and consumed by `value` and `next_token`.
///
/// A token is either a slot position, one of the two out-of-band pseudo-slots
/// (the zero key and the null key), or [`Token::NONE`] for a miss. Tokens are
/// only meaningful for the collection that produced them and only until that
/// collection is next mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(usize);

impl Token {
    /// The token returned for absent keys and at the end of iteration.
    pub const NONE: Token = Token(usize::MAX);

    pub(crate) const NULL_KEY: Token = Token(usize::MAX - 1);
    pub(crate) const ZERO_KEY: Token = Token(usize::MAX - 2);

    #[inline]
    pub(crate) fn slot(index: usize) -> Token {
        debug_assert!(index < Self::ZERO_KEY.0);

        Token(index)
    }

    /// Returns true if this token represents a miss.
    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Returns true if this token refers to an entry.
    #[inline]
    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Returns true if this token refers to the entry stored under the null
    /// key.
    #[inline]
    pub fn is_null_key(self) -> bool {
        self == Self::NULL_KEY
    }

    /// The slot position for in-table tokens.
    #[inline]
    pub(crate) fn index(self) -> Option<usize> {
        if self.0 < Self::ZERO_KEY.0 {
            Some(self.0)
        } else {
            None
        }
    }
}
