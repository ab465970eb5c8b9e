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

//! Fixed-capacity circular buffers of `Copy` values.

use std::{
    cell::UnsafeCell,
    fmt::{self, Debug, Formatter},
    sync::atomic::{AtomicBool, Ordering},
};

use crossbeam_utils::Backoff;

use crate::{array, error::Result};

/// A first-in first-out buffer with a fixed, power-of-two capacity.
///
/// `put` refuses new values when the buffer is full rather than
/// overwriting, and `get` hands back a caller-supplied default when it is
/// empty.
#[derive(Clone)]
pub struct RingBuffer<T> {
    slots: Box<[T]>,
    mask: usize,
    read: usize,
    write: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Creates a buffer holding at least `capacity` values; the capacity is
    /// rounded up to a power of two.
    ///
    /// # Panics
    ///
    /// Panics if the rounded capacity would exceed [`MAX_CAPACITY`].
    ///
    /// [`MAX_CAPACITY`]: ../constant.MAX_CAPACITY.html
    pub fn new(capacity: usize) -> RingBuffer<T> {
        match RingBuffer::try_new(capacity) {
            Ok(buffer) => buffer,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_new(capacity: usize) -> Result<RingBuffer<T>> {
        let capacity = array::next_power_of_2(capacity)?;

        Ok(RingBuffer {
            slots: vec![T::default(); capacity].into_boxed_slice(),
            mask: capacity - 1,
            read: 0,
            write: 0,
        })
    }
}

impl<T: Copy> RingBuffer<T> {
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.write.wrapping_sub(self.read)
    }

    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Appends `value`, returning false if the buffer is full.
    pub fn put(&mut self, value: T) -> bool {
        if self.is_full() {
            return false;
        }

        self.slots[self.write & self.mask] = value;
        self.write = self.write.wrapping_add(1);

        true
    }

    /// Removes and returns the oldest value, or `default` if the buffer is
    /// empty.
    pub fn get(&mut self, default: T) -> T {
        self.pop().unwrap_or(default)
    }

    /// Removes and returns the oldest value.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let value = self.slots[self.read & self.mask];
        self.read = self.read.wrapping_add(1);

        Some(value)
    }

    /// Returns the oldest value without removing it.
    pub fn peek(&self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            Some(self.slots[self.read & self.mask])
        }
    }

    pub fn clear(&mut self) {
        self.read = self.write;
    }

    /// The buffered values, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len()).map(move |i| self.slots[self.read.wrapping_add(i) & self.mask])
    }
}

impl<T: Copy + Debug> Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// A [`RingBuffer`] that may be shared between threads. Access through
/// `&self` takes a spin lock.
///
/// [`RingBuffer`]: struct.RingBuffer.html
pub struct SpinRingBuffer<T> {
    locked: AtomicBool,
    buffer: UnsafeCell<RingBuffer<T>>,
}

// The buffer is only reached through `with_lock`, or through `&mut self`.
unsafe impl<T: Send> Sync for SpinRingBuffer<T> {}

impl<T: Copy + Default> SpinRingBuffer<T> {
    /// # Panics
    ///
    /// Panics if the rounded capacity would exceed [`MAX_CAPACITY`].
    ///
    /// [`MAX_CAPACITY`]: ../constant.MAX_CAPACITY.html
    pub fn new(capacity: usize) -> SpinRingBuffer<T> {
        SpinRingBuffer::from(RingBuffer::new(capacity))
    }
}

impl<T: Copy> SpinRingBuffer<T> {
    pub fn capacity(&self) -> usize {
        self.with_lock(|buffer| buffer.capacity())
    }

    pub fn len_multithreaded(&self) -> usize {
        self.with_lock(|buffer| buffer.len())
    }

    /// Appends `value` under the lock, returning false if the buffer is
    /// full.
    pub fn put_multithreaded(&self, value: T) -> bool {
        self.with_lock(|buffer| buffer.put(value))
    }

    /// Removes the oldest value under the lock, or returns `default` if the
    /// buffer is empty.
    pub fn get_multithreaded(&self, default: T) -> T {
        self.with_lock(|buffer| buffer.get(default))
    }

    /// Unsynchronized access for a thread that owns the buffer exclusively.
    pub fn get_mut(&mut self) -> &mut RingBuffer<T> {
        self.buffer.get_mut()
    }

    pub fn into_inner(self) -> RingBuffer<T> {
        self.buffer.into_inner()
    }

    fn with_lock<R>(&self, f: impl FnOnce(&mut RingBuffer<T>) -> R) -> R {
        let _guard = self.lock();

        // SAFETY: `_guard` gives this thread exclusive access until dropped.
        f(unsafe { &mut *self.buffer.get() })
    }

    fn lock(&self) -> SpinGuard<'_> {
        let backoff = Backoff::new();

        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            backoff.snooze();
        }

        SpinGuard {
            locked: &self.locked,
        }
    }
}

impl<T> From<RingBuffer<T>> for SpinRingBuffer<T> {
    fn from(buffer: RingBuffer<T>) -> Self {
        SpinRingBuffer {
            locked: AtomicBool::new(false),
            buffer: UnsafeCell::new(buffer),
        }
    }
}

impl<T: Copy + Debug> Debug for SpinRingBuffer<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.with_lock(|buffer| f.debug_tuple("SpinRingBuffer").field(buffer).finish())
    }
}

struct SpinGuard<'a> {
    locked: &'a AtomicBool,
}

impl Drop for SpinGuard<'_> {
    fn drop(&mut self) {
        self.locked.store(false, Ordering::Release);
    }
}
