//! Owned block of uninitialized slots.
//!
//! [`RawBuf`] knows how many slots it has and which allocator produced them,
//! nothing more. It never reads, writes or drops a `T`; tracking which slots
//! are live is the job of the container on top of it. Dropping a `RawBuf`
//! only releases the block.

use core::alloc::Layout;
use core::marker::PhantomData;
use core::mem::{self, ManuallyDrop};
use core::ptr::{self, NonNull};

use crate::alloc::{Global, RawAlloc};
use crate::error::{QueueError, Result};

pub(crate) struct RawBuf<T, A: RawAlloc = Global> {
    ptr: NonNull<T>,
    cap: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

impl<T, A: RawAlloc> RawBuf<T, A> {
    /// A buffer with no block behind it.
    pub(crate) const fn new_in(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Acquires a block of exactly `cap` slots.
    pub(crate) fn try_with_capacity_in(cap: usize, alloc: A) -> Result<Self> {
        let mut buf = Self::new_in(alloc);
        if cap > 0 {
            buf.ptr = Self::acquire(&buf.alloc, cap)?;
            buf.cap = cap;
        }
        Ok(buf)
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    #[inline(always)]
    pub(crate) fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    #[inline(always)]
    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    fn layout(cap: usize) -> Result<Layout> {
        Layout::array::<T>(cap).map_err(|_| QueueError::CapacityOverflow)
    }

    fn acquire(alloc: &A, cap: usize) -> Result<NonNull<T>> {
        let layout = Self::layout(cap)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        match alloc.allocate(layout) {
            Ok(block) => {
                log::trace!("allocated block of {} slots ({} bytes)", cap, layout.size());
                Ok(block.cast())
            }
            Err(_) => {
                log::warn!("allocator refused block of {} slots ({} bytes)", cap, layout.size());
                Err(QueueError::AllocFailed { layout })
            }
        }
    }

    fn release(&mut self) {
        unsafe { Self::release_block(&self.alloc, self.ptr, self.cap) };
        self.ptr = NonNull::dangling();
        self.cap = 0;
    }

    /// # Safety
    /// `block` must come from `acquire(alloc, cap)` and hold no live slot.
    unsafe fn release_block(alloc: &A, block: NonNull<T>, cap: usize) {
        if cap == 0 {
            return;
        }
        // A layout that was valid at allocation time is still valid now.
        if let Ok(layout) = Self::layout(cap) {
            if layout.size() != 0 {
                unsafe { alloc.deallocate(block.cast(), layout) };
                log::trace!("released block of {} slots", cap);
            }
        }
    }

    /// Moves `len` live slots starting at `from` into a fresh block of
    /// `new_cap` slots, landing at `to`, then releases the old block.
    ///
    /// If the new block cannot be acquired nothing is touched and the error is
    /// returned. Relocation is a bitwise move and cannot fail part-way.
    ///
    /// # Safety
    /// `[from, from + len)` must be exactly the live slots, and
    /// `to + len <= new_cap`.
    pub(crate) unsafe fn relocate(
        &mut self,
        new_cap: usize,
        from: usize,
        to: usize,
        len: usize,
    ) -> Result<()> {
        debug_assert!(to + len <= new_cap);
        let fresh = self.acquire_block(new_cap)?;
        unsafe {
            ptr::copy_nonoverlapping(self.ptr().add(from), fresh.as_ptr().add(to), len);
            self.adopt(fresh, new_cap);
        }
        Ok(())
    }

    /// Acquires a block of `cap` slots from this buffer's allocator without
    /// installing it. Pair with [`adopt`](Self::adopt).
    pub(crate) fn acquire_block(&self, cap: usize) -> Result<NonNull<T>> {
        Self::acquire(&self.alloc, cap)
    }

    /// Acquires a block of `cap` slots that is released again when the
    /// returned [`Staged`] is dropped, unless it is installed first.
    pub(crate) fn stage(&self, cap: usize) -> Result<Staged<'_, T, A>> {
        Ok(Staged {
            alloc: &self.alloc,
            block: Self::acquire(&self.alloc, cap)?,
            cap,
        })
    }

    /// Releases the current block and installs `block`.
    ///
    /// # Safety
    /// No slot of the current block may be live. `block` must come from
    /// [`acquire_block`](Self::acquire_block) or [`Staged::into_raw`] with the same `cap`.
    pub(crate) unsafe fn adopt(&mut self, block: NonNull<T>, cap: usize) {
        self.release();
        self.ptr = block;
        self.cap = cap;
    }

    /// Releases the block, leaving an empty buffer.
    ///
    /// # Safety
    /// No slot of the block may be live.
    pub(crate) unsafe fn reset(&mut self) {
        self.release();
    }

    /// Swaps the blocks (not the allocators) of two buffers.
    pub(crate) fn swap_block(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.cap, &mut other.cap);
    }

    /// Detaches the block into a new buffer sharing a clone of the allocator,
    /// leaving `self` with no block.
    pub(crate) fn take_block(&mut self) -> Self
    where
        A: Clone,
    {
        let mut out = Self::new_in(self.alloc.clone());
        self.swap_block(&mut out);
        out
    }
}

/// A block acquired for a buffer but not installed in it yet.
pub(crate) struct Staged<'a, T, A: RawAlloc> {
    alloc: &'a A,
    block: NonNull<T>,
    cap: usize,
}

impl<T, A: RawAlloc> Staged<'_, T, A> {
    #[inline(always)]
    pub(crate) fn ptr(&self) -> *mut T {
        self.block.as_ptr()
    }

    /// Hands the block over for [`RawBuf::adopt`]; it is no longer released
    /// on drop.
    pub(crate) fn into_raw(self) -> (NonNull<T>, usize) {
        let this = ManuallyDrop::new(self);
        (this.block, this.cap)
    }
}

impl<T, A: RawAlloc> Drop for Staged<'_, T, A> {
    fn drop(&mut self) {
        unsafe { RawBuf::<T, A>::release_block(self.alloc, self.block, self.cap) };
    }
}

impl<T, A: RawAlloc> Drop for RawBuf<T, A> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::LimitedAlloc;

    #[test]
    fn test_raw_empty_has_no_block() {
        let alloc = LimitedAlloc::unbounded();
        let buf: RawBuf<u32, _> = RawBuf::try_with_capacity_in(0, alloc.clone()).unwrap();
        assert_eq!(buf.capacity(), 0);
        assert_eq!(alloc.in_use(), 0);
    }

    #[test]
    fn test_raw_alloc_and_release() {
        let alloc = LimitedAlloc::unbounded();
        {
            let buf: RawBuf<u64, _> = RawBuf::try_with_capacity_in(4, alloc.clone()).unwrap();
            assert_eq!(buf.capacity(), 4);
            assert_eq!(alloc.in_use(), 32);
        }
        assert_eq!(alloc.in_use(), 0);
    }

    #[test]
    fn test_raw_relocate_moves_live_run() {
        let alloc = LimitedAlloc::unbounded();
        let mut buf: RawBuf<u32, _> = RawBuf::try_with_capacity_in(4, alloc.clone()).unwrap();
        unsafe {
            for i in 0..4 {
                ptr::write(buf.ptr().add(i), i as u32 * 10);
            }
            // slots 1..4 are the live run; relocate them to offset 0
            buf.relocate(8, 1, 0, 3).unwrap();
            assert_eq!(buf.capacity(), 8);
            assert_eq!(*buf.ptr(), 10);
            assert_eq!(*buf.ptr().add(2), 30);
        }
        assert_eq!(alloc.in_use(), 32);
    }

    #[test]
    fn test_raw_relocate_failure_leaves_block() {
        let alloc = LimitedAlloc::new(16);
        let mut buf: RawBuf<u32, _> = RawBuf::try_with_capacity_in(4, alloc.clone()).unwrap();
        let before = buf.ptr();
        let err = unsafe { buf.relocate(8, 0, 0, 0) }.unwrap_err();
        assert!(matches!(err, QueueError::AllocFailed { .. }));
        assert_eq!(buf.ptr(), before);
        assert_eq!(buf.capacity(), 4);
        assert_eq!(alloc.in_use(), 16);
    }

    #[test]
    fn test_raw_capacity_overflow() {
        let err = RawBuf::<u64, Global>::try_with_capacity_in(usize::MAX, Global)
            .err()
            .unwrap();
        assert!(matches!(err, QueueError::CapacityOverflow));
    }

    #[test]
    fn test_raw_zero_sized_never_allocates() {
        let alloc = LimitedAlloc::new(0);
        let buf: RawBuf<(), _> = RawBuf::try_with_capacity_in(1000, alloc.clone()).unwrap();
        assert_eq!(buf.capacity(), 1000);
        assert_eq!(alloc.in_use(), 0);
    }

    #[test]
    fn test_raw_staged_block_released_unless_adopted() {
        let alloc = LimitedAlloc::unbounded();
        let mut buf: RawBuf<u32, _> = RawBuf::try_with_capacity_in(2, alloc.clone()).unwrap();
        {
            let staged = buf.stage(8).unwrap();
            assert!(!staged.ptr().is_null());
            assert_eq!(alloc.in_use(), 40);
        }
        assert_eq!(alloc.in_use(), 8);

        let (block, cap) = buf.stage(8).unwrap().into_raw();
        unsafe { buf.adopt(block, cap) };
        assert_eq!(buf.capacity(), 8);
        assert_eq!(alloc.in_use(), 32);
    }

    #[test]
    fn test_raw_take_block() {
        let alloc = LimitedAlloc::unbounded();
        let mut buf: RawBuf<u8, _> = RawBuf::try_with_capacity_in(16, alloc.clone()).unwrap();
        let moved = buf.take_block();
        assert_eq!(buf.capacity(), 0);
        assert_eq!(moved.capacity(), 16);
        drop(buf);
        assert_eq!(alloc.in_use(), 16);
        drop(moved);
        assert_eq!(alloc.in_use(), 0);
    }
}
