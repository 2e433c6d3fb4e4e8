//! Mutex decorator for sharing a container between threads.
//!
//! The queue itself is single-threaded. [`Guarded`] wraps any container in a
//! `parking_lot::Mutex`; every helper takes the lock exactly once, so each
//! call is atomic with respect to the others. For compound operations use
//! [`Guarded::with`] or hold the guard from [`Guarded::lock`].

use parking_lot::{Mutex, MutexGuard};

use crate::alloc::RawAlloc;
use crate::error::Result;
use crate::queue::Queue;

/// A container behind a mutex.
#[derive(Debug, Default)]
pub struct Guarded<C> {
    inner: Mutex<C>,
}

impl<C> Guarded<C> {
    /// Wraps `inner` in a fresh mutex.
    pub fn new(inner: C) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Blocks until the lock is available.
    pub fn lock(&self) -> MutexGuard<'_, C> {
        self.inner.lock()
    }

    /// Runs `f` with the lock held.
    pub fn with<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Consumes the wrapper and returns the container.
    pub fn into_inner(self) -> C {
        self.inner.into_inner()
    }

    /// Access without locking; `&mut self` already proves exclusivity.
    pub fn get_mut(&mut self) -> &mut C {
        self.inner.get_mut()
    }
}

impl<C> From<C> for Guarded<C> {
    fn from(inner: C) -> Self {
        Self::new(inner)
    }
}

impl<T, A: RawAlloc> Guarded<Queue<T, A>> {
    /// Appends `value` at the back; panics if the block cannot grow.
    pub fn enqueue(&self, value: T) {
        self.inner.lock().enqueue(value);
    }

    /// Appends `value` at the back, reporting allocation failure.
    pub fn try_enqueue(&self, value: T) -> Result<()> {
        self.inner.lock().try_enqueue(value)
    }

    /// Removes the front element; `OutOfRange` when empty.
    pub fn dequeue(&self) -> Result<T> {
        self.inner.lock().dequeue()
    }

    /// Grows the block to at least `capacity` slots; panics on failure.
    pub fn reserve(&self, capacity: usize) {
        self.inner.lock().reserve(capacity);
    }

    /// Grows the block to at least `capacity` slots, reporting failure.
    pub fn try_reserve(&self, capacity: usize) -> Result<()> {
        self.inner.lock().try_reserve(capacity)
    }

    /// Number of live elements at the moment of the call.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the queue was empty at the moment of the call.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Drops every element, keeping the block.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Removes every element under one lock and returns them in FIFO order.
    pub fn drain_all(&self) -> Vec<T> {
        let mut queue = self.inner.lock();
        let mut out = Vec::with_capacity(queue.len());
        while let Ok(value) = queue.dequeue() {
            out.push(value);
        }
        out
    }
}
