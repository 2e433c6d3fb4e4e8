//! Allocation capability consumed by [`Queue`](crate::Queue).
//!
//! A queue never talks to the global allocator directly. It asks its
//! [`RawAlloc`] for whole blocks and hands them back when done, so the same
//! container works over the process heap ([`Global`]), a budgeted heap
//! ([`LimitedAlloc`]), or anything else honouring the contract.

use core::alloc::Layout;
use core::ptr::{self, NonNull};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::AllocError;

/// Raw memory capability: acquire and release whole blocks, and construct or
/// destroy single slots inside them.
///
/// # Safety
/// Implementations must return blocks that are valid for reads and writes of
/// `layout.size()` bytes, aligned to `layout.align()`, and not aliased by any
/// other live block until passed back to [`deallocate`](RawAlloc::deallocate).
/// Callers never pass zero-sized layouts.
pub unsafe trait RawAlloc {
    /// Acquires a block for `layout`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Releases a block obtained from `allocate` on this allocator (or one
    /// [interchangeable](RawAlloc::is_interchangeable) with it).
    ///
    /// # Safety
    /// `ptr` must denote a live block allocated with exactly `layout`.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Constructs `value` in the vacant slot `slot`.
    ///
    /// # Safety
    /// `slot` must be aligned, writable and currently vacant.
    #[inline(always)]
    unsafe fn construct<T>(&self, slot: *mut T, value: T) {
        unsafe { ptr::write(slot, value) }
    }

    /// Destroys the live value in `slot`, leaving it vacant.
    ///
    /// # Safety
    /// `slot` must hold a live value that is not used afterwards.
    #[inline(always)]
    unsafe fn destroy<T>(&self, slot: *mut T) {
        unsafe { ptr::drop_in_place(slot) }
    }

    /// Whether a block allocated by `other` may be released through `self`.
    ///
    /// Decides if [`Queue::move_from`](crate::Queue::move_from) can steal the
    /// source block or has to move element by element.
    fn is_interchangeable(&self, _other: &Self) -> bool {
        true
    }
}

/// The process heap, via `std::alloc`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Global;

unsafe impl RawAlloc for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        debug_assert!(layout.size() != 0);
        let ptr = unsafe { std::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

#[derive(Debug)]
struct Budget {
    limit: usize,
    in_use: AtomicUsize,
    refused: AtomicUsize,
}

/// Heap allocator with a byte budget.
///
/// Clones share the same budget, so a queue and its clones draw from one pool.
/// Requests that would push the live total above the limit are refused with
/// [`AllocError`]. Also usable as a leak detector: [`in_use`](Self::in_use)
/// drops back to zero once every block has been released.
#[derive(Debug, Clone)]
pub struct LimitedAlloc {
    budget: Arc<Budget>,
}

impl LimitedAlloc {
    /// Creates an allocator that refuses to hold more than `limit` bytes at once.
    pub fn new(limit: usize) -> Self {
        Self {
            budget: Arc::new(Budget {
                limit,
                in_use: AtomicUsize::new(0),
                refused: AtomicUsize::new(0),
            }),
        }
    }

    /// An allocator with no practical limit, still counting bytes.
    pub fn unbounded() -> Self {
        Self::new(usize::MAX)
    }

    pub fn limit(&self) -> usize {
        self.budget.limit
    }

    /// Bytes currently handed out and not yet released.
    pub fn in_use(&self) -> usize {
        self.budget.in_use.load(Ordering::Acquire)
    }

    /// Number of requests refused so far.
    pub fn refused(&self) -> usize {
        self.budget.refused.load(Ordering::Acquire)
    }
}

unsafe impl RawAlloc for LimitedAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let size = layout.size();
        let reserved = self
            .budget
            .in_use
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                used.checked_add(size).filter(|&total| total <= self.budget.limit)
            });
        if reserved.is_err() {
            self.budget.refused.fetch_add(1, Ordering::AcqRel);
            return Err(AllocError);
        }
        match Global.allocate(layout) {
            Ok(ptr) => Ok(ptr),
            Err(e) => {
                self.budget.in_use.fetch_sub(size, Ordering::AcqRel);
                Err(e)
            }
        }
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { Global.deallocate(ptr, layout) };
        self.budget.in_use.fetch_sub(layout.size(), Ordering::AcqRel);
    }

    /// Two handles are interchangeable when they share a budget.
    fn is_interchangeable(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.budget, &other.budget)
    }
}
