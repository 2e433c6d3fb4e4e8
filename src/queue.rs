//! Growable FIFO queue over one contiguous block.
//!
//! # Layout
//! The block holds `capacity` slots. Live elements occupy the contiguous run
//! `[head, head + len)`; every other slot is vacant and never read or dropped.
//!
//! ```text
//!  slot:   0    1    2    3    4    5    6    7
//!        [ .  | .  | A  | B  | C  | .  | .  | .  ]
//!                    ^head          ^head+len     ^capacity
//! ```
//!
//! `dequeue` moves the element out of `head` and advances it: O(1), no data
//! is shifted and the block is never compacted in place. The dequeued prefix
//! is reclaimed only when the tail runs out of room and the live run moves to
//! offset 0 of a block twice the size, which keeps `enqueue` amortized O(1).
//!
//! # Error safety
//! Every operation that can fail (`try_*`, `at`, `dequeue`, `erase*`) leaves
//! the queue exactly as it found it when it returns `Err`: same elements, same
//! capacity, same offset. Elements that need a bigger block are built in a
//! staged block that is installed only once all of them exist. Panics raised
//! by user code (`Clone`, `Default`, closures) never leave a vacant slot
//! counted as live.

use core::cmp::Ordering;
use core::convert::Infallible;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::{self, FusedIterator};
use core::mem::{self, ManuallyDrop};
use core::ops::{Bound, Index, IndexMut, RangeBounds};
use core::ptr;
use core::slice;

use crate::alloc::{Global, RawAlloc};
use crate::cursor::{Cursor, RevCursor};
use crate::error::{BoxError, QueueError, Result};
use crate::raw::{RawBuf, Staged};

/// Capacity of the first block allocated by implicit growth.
pub const MIN_NON_ZERO_CAP: usize = 4;

/// Factor applied to the capacity when implicit growth reallocates.
pub const GROWTH_FACTOR: usize = 2;

/// A growable FIFO queue with random access, generic over its allocator.
///
/// ```
/// use con_queue::Queue;
///
/// let mut q = Queue::new();
/// q.enqueue(1);
/// q.enqueue(2);
/// q.enqueue(3);
/// assert_eq!(q.len(), 3);
/// assert_eq!(q.dequeue().unwrap(), 1);
/// assert_eq!(q.iter().copied().collect::<Vec<_>>(), [2, 3]);
/// ```
pub struct Queue<T, A: RawAlloc = Global> {
    buf: RawBuf<T, A>,
    head: usize,
    len: usize,
}

#[cold]
#[inline(never)]
#[track_caller]
fn fail(err: QueueError) -> ! {
    panic!("{err}")
}

impl<T> Queue<T, Global> {
    /// Creates an empty queue. Does not allocate.
    pub const fn new() -> Self {
        Self::new_in(Global)
    }

    /// Creates an empty queue with room for exactly `capacity` elements.
    ///
    /// # Panics
    /// If the allocation fails.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        Self::try_with_capacity_in(capacity, Global)
    }

    /// Creates a queue holding clones of `items`, in order, with capacity
    /// `items.len()`.
    pub fn from_slice(items: &[T]) -> Self
    where
        T: Clone,
    {
        let mut q = Self::with_capacity(items.len());
        q.extend(items.iter().cloned());
        q
    }
}

impl<T, A: RawAlloc> Queue<T, A> {
    /// Creates an empty queue drawing memory from `alloc`. Does not allocate.
    pub const fn new_in(alloc: A) -> Self {
        Self {
            buf: RawBuf::new_in(alloc),
            head: 0,
            len: 0,
        }
    }

    /// # Panics
    /// If the allocation fails.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        Self::try_with_capacity_in(capacity, alloc).unwrap_or_else(|e| fail(e))
    }

    /// Creates an empty queue with room for exactly `capacity` elements.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self> {
        Ok(Self {
            buf: RawBuf::try_with_capacity_in(capacity, alloc)?,
            head: 0,
            len: 0,
        })
    }

    // ─── size & storage ──────────────────────────────────────────────────────

    /// Number of live elements.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the current block, live or vacant.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Slot index of the front element inside the block.
    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.head
    }

    #[inline(always)]
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    #[inline(always)]
    fn live_ptr(&self) -> *mut T {
        // head <= capacity always holds, so this stays inside (or one past) the block.
        unsafe { self.buf.ptr().add(self.head) }
    }

    /// The live elements, front to back.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.live_ptr(), self.len) }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.live_ptr(), self.len) }
    }

    // ─── capacity management ─────────────────────────────────────────────────

    /// Ensures `capacity() >= capacity`, keeping live elements at their
    /// current offset. A request at or below the current capacity does
    /// nothing.
    ///
    /// On error the queue is unchanged.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<()> {
        let old_cap = self.buf.capacity();
        if capacity <= old_cap {
            return Ok(());
        }
        unsafe { self.buf.relocate(capacity, self.head, self.head, self.len)? };
        log::debug!("reserved queue capacity {} -> {}", old_cap, capacity);
        Ok(())
    }

    /// # Panics
    /// If the allocation fails.
    pub fn reserve(&mut self, capacity: usize) {
        if let Err(e) = self.try_reserve(capacity) {
            fail(e)
        }
    }

    /// Makes room for `additional` elements after the tail.
    fn reserve_tail(&mut self, additional: usize) -> Result<()> {
        let cap = self.buf.capacity();
        if additional <= cap - self.head - self.len {
            return Ok(());
        }
        let new_cap = self.grown_capacity(additional)?;
        unsafe { self.buf.relocate(new_cap, self.head, 0, self.len)? };
        log::debug!("grew queue capacity {} -> {}", cap, new_cap);
        self.head = 0;
        Ok(())
    }

    /// Capacity of the block that replaces a full one when `additional`
    /// more elements have to fit.
    fn grown_capacity(&self, additional: usize) -> Result<usize> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(QueueError::CapacityOverflow)?;
        Ok(self
            .buf
            .capacity()
            .saturating_mul(GROWTH_FACTOR)
            .max(required)
            .max(MIN_NON_ZERO_CAP))
    }

    // ─── insertion ───────────────────────────────────────────────────────────

    /// Appends `value` at the back.
    ///
    /// On error the queue is unchanged and `value` is dropped.
    pub fn try_enqueue(&mut self, value: T) -> Result<()> {
        self.reserve_tail(1)?;
        unsafe { self.write_tail(value) };
        Ok(())
    }

    /// Appends `value` at the back.
    ///
    /// # Panics
    /// If growing the block fails.
    pub fn enqueue(&mut self, value: T) {
        if let Err(e) = self.try_enqueue(value) {
            fail(e)
        }
    }

    /// Appends a clone of `value`.
    pub fn enqueue_cloned(&mut self, value: &T)
    where
        T: Clone,
    {
        self.enqueue(value.clone());
    }

    /// Builds the element directly in the tail slot with `make`.
    ///
    /// If `make` panics the queue is unchanged.
    ///
    /// # Panics
    /// If growing the block fails.
    pub fn emplace_with<F>(&mut self, make: F)
    where
        F: FnOnce() -> T,
    {
        match self.fill_tail(1, iter::once_with(|| Ok::<T, Infallible>(make()))) {
            Ok(()) => {}
            Err(FillError::Alloc(e)) => fail(e),
            Err(FillError::Make(never)) => match never {},
        }
    }

    /// Like [`emplace_with`](Self::emplace_with) for a fallible constructor;
    /// its error comes back as [`QueueError::Construction`].
    pub fn try_emplace_with<F, E>(&mut self, make: F) -> Result<()>
    where
        F: FnOnce() -> core::result::Result<T, E>,
        E: Into<BoxError>,
    {
        self.fill_tail(1, iter::once_with(make))
            .map_err(FillError::into_queue_error)
    }

    /// # Safety
    /// The slot at `head + len` must exist.
    #[inline(always)]
    unsafe fn write_tail(&mut self, value: T) {
        debug_assert!(self.head + self.len < self.buf.capacity());
        unsafe {
            let slot = self.buf.ptr().add(self.head + self.len);
            self.buf.allocator().construct(slot, value);
        }
        self.len += 1;
    }

    // ─── removal ─────────────────────────────────────────────────────────────

    /// Removes and returns the front element.
    ///
    /// Fails with [`QueueError::OutOfRange`] when the queue is empty.
    pub fn dequeue(&mut self) -> Result<T> {
        if self.len == 0 {
            return Err(QueueError::empty());
        }
        let value = unsafe { ptr::read(self.live_ptr()) };
        self.head += 1;
        self.len -= 1;
        if self.len == 0 {
            self.head = 0;
        }
        Ok(value)
    }

    /// Drops the element at logical `index`, closing the gap.
    pub fn erase(&mut self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(QueueError::OutOfRange {
                index,
                len: self.len,
            });
        }
        self.erase_range(index..index + 1)
    }

    /// Drops every element in `range` (logical indices).
    ///
    /// A range starting at 0 behaves like that many dequeues: the head just
    /// advances. Any other range shifts the elements after it left.
    pub fn erase_range<R>(&mut self, range: R) -> Result<()>
    where
        R: RangeBounds<usize>,
    {
        let (start, end) = self.resolve(range)?;
        let count = end - start;
        if count == 0 {
            return Ok(());
        }
        let base = self.live_ptr();

        if start == 0 {
            self.head += count;
            self.len -= count;
            if self.len == 0 {
                self.head = 0;
            }
            unsafe { destroy_run(self.buf.allocator(), base, count) };
            return Ok(());
        }

        let tail = self.len - end;
        self.len = start;
        let gap = CloseGap {
            base,
            start,
            end,
            tail,
            len: &mut self.len,
        };
        unsafe { destroy_run(self.buf.allocator(), base.add(start), count) };
        drop(gap);
        Ok(())
    }

    fn resolve<R: RangeBounds<usize>>(&self, range: R) -> Result<(usize, usize)> {
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.checked_add(1).ok_or(QueueError::OutOfRange {
                index: s,
                len: self.len,
            })?,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.checked_add(1).ok_or(QueueError::OutOfRange {
                index: e,
                len: self.len,
            })?,
            Bound::Excluded(&e) => e,
            Bound::Unbounded => self.len,
        };
        if end > self.len {
            return Err(QueueError::OutOfRange {
                index: end,
                len: self.len,
            });
        }
        if start > end {
            return Err(QueueError::OutOfRange {
                index: start,
                len: self.len,
            });
        }
        Ok((start, end))
    }

    /// Erases the first element equal to `value`. Returns whether one was found.
    pub fn remove_first(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self.as_slice().iter().position(|x| x == value) {
            Some(i) => self.erase(i).is_ok(),
            None => false,
        }
    }

    /// Erases the last element equal to `value`. Returns whether one was found.
    pub fn remove_last(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self.as_slice().iter().rposition(|x| x == value) {
            Some(i) => self.erase(i).is_ok(),
            None => false,
        }
    }

    /// Drops the elements past the first `len`. No-op if `len >= self.len()`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let base = unsafe { self.live_ptr().add(len) };
        let count = self.len - len;
        self.len = len;
        if len == 0 {
            self.head = 0;
        }
        unsafe { destroy_run(self.buf.allocator(), base, count) };
    }

    /// Drops every element and rewinds the head. The block is kept.
    pub fn clear(&mut self) {
        self.truncate(0);
        self.head = 0;
    }

    // ─── access ──────────────────────────────────────────────────────────────

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Bounds-checked access.
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len;
        self.get(index)
            .ok_or(QueueError::OutOfRange { index, len })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        self.get_mut(index)
            .ok_or(QueueError::OutOfRange { index, len })
    }

    /// # Safety
    /// `index < self.len()`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        unsafe { &*self.live_ptr().add(index) }
    }

    /// # Safety
    /// `index < self.len()`.
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        unsafe { &mut *self.live_ptr().add(index) }
    }

    pub fn front(&self) -> Result<&T> {
        self.at(0)
    }

    pub fn front_mut(&mut self) -> Result<&mut T> {
        self.at_mut(0)
    }

    pub fn back(&self) -> Result<&T> {
        match self.len {
            0 => Err(QueueError::empty()),
            n => self.at(n - 1),
        }
    }

    pub fn back_mut(&mut self) -> Result<&mut T> {
        match self.len {
            0 => Err(QueueError::empty()),
            n => self.at_mut(n - 1),
        }
    }

    // ─── iteration ───────────────────────────────────────────────────────────

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Cursor on the front element.
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), 0)
    }

    /// Cursor one past the back element.
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), self.len as isize)
    }

    /// Cursor on logical `index` (which may be out of range).
    pub fn cursor_at(&self, index: usize) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), index as isize)
    }

    /// Reverse cursor on the back element.
    pub fn rbegin(&self) -> RevCursor<'_, T> {
        RevCursor::new(self.end())
    }

    /// Reverse cursor one before the front element.
    pub fn rend(&self) -> RevCursor<'_, T> {
        RevCursor::new(self.begin())
    }

    // ─── resize ──────────────────────────────────────────────────────────────

    /// Resizes to `new_len`, filling new tail slots with `T::default()`.
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }

    /// Resizes to `new_len`, filling new tail slots with values from `make`.
    ///
    /// If `make` panics, the values built so far are dropped and the length
    /// is unchanged.
    pub fn resize_with<F>(&mut self, new_len: usize, mut make: F)
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }
        let additional = new_len - self.len;
        match self.fill_tail(additional, iter::repeat_with(|| Ok::<T, Infallible>(make()))) {
            Ok(()) => {}
            Err(FillError::Alloc(e)) => fail(e),
            Err(FillError::Make(never)) => match never {},
        }
    }

    /// Fallible [`resize_with`](Self::resize_with). If `make` fails part-way
    /// the values built so far are dropped, the queue keeps its length,
    /// capacity and offset, and the failure is returned as
    /// [`QueueError::Construction`].
    pub fn try_resize_with<F, E>(&mut self, new_len: usize, make: F) -> Result<()>
    where
        F: FnMut() -> core::result::Result<T, E>,
        E: Into<BoxError>,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        let additional = new_len - self.len;
        self.fill_tail(additional, iter::repeat_with(make))
            .map_err(FillError::into_queue_error)
    }

    /// Builds `count` elements from `items` after the tail.
    ///
    /// With room in the current block they are built in place. Otherwise a
    /// bigger block is staged, the new elements are built at its tail, and
    /// only then are the live elements moved over and the block installed.
    /// The queue is untouched until every element exists; on error or panic
    /// the built elements are dropped and a staged block is released.
    fn fill_tail<I, E>(&mut self, count: usize, mut items: I) -> core::result::Result<(), FillError<E>>
    where
        I: Iterator<Item = core::result::Result<T, E>>,
    {
        let cap = self.buf.capacity();
        let staged = if count <= cap - self.head - self.len {
            None
        } else {
            let new_cap = self.grown_capacity(count).map_err(FillError::Alloc)?;
            Some(self.buf.stage(new_cap).map_err(FillError::Alloc)?)
        };
        let tail = match &staged {
            Some(block) => unsafe { block.ptr().add(self.len) },
            None => unsafe { self.live_ptr().add(self.len) },
        };

        let mut built = Built {
            alloc: self.buf.allocator(),
            base: tail,
            count: 0,
        };
        while built.count < count {
            match items.next() {
                Some(Ok(value)) => {
                    unsafe { built.alloc.construct(tail.add(built.count), value) };
                    built.count += 1;
                }
                Some(Err(e)) => return Err(FillError::Make(e)),
                None => break,
            }
        }
        let made = built.count;
        mem::forget(built);

        if let Some((block, new_cap)) = staged.map(Staged::into_raw) {
            unsafe {
                ptr::copy_nonoverlapping(self.live_ptr(), block.as_ptr(), self.len);
                self.buf.adopt(block, new_cap);
            }
            log::debug!("grew queue capacity {} -> {}", cap, new_cap);
            self.head = 0;
        }
        self.len += made;
        Ok(())
    }

    // ─── copy & move ─────────────────────────────────────────────────────────

    /// Clone into a block of exactly `len()` slots, reporting allocation failure.
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
        A: Clone,
    {
        let mut out = Self::try_with_capacity_in(self.len, self.allocator().clone())?;
        out.extend(self.iter().cloned());
        Ok(out)
    }

    /// Moves the whole block out, leaving `self` empty with no block.
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        let out = Self {
            buf: self.buf.take_block(),
            head: self.head,
            len: self.len,
        };
        self.head = 0;
        self.len = 0;
        out
    }

    /// Move-assignment: replaces the contents of `self` with those of `other`,
    /// leaving `other` empty with no block.
    ///
    /// When the two allocators are interchangeable the block changes owner
    /// outright. Otherwise the elements are moved one by one into storage
    /// owned by `self`'s allocator. Allocators are never exchanged. On error
    /// neither queue is changed.
    pub fn move_from(&mut self, other: &mut Self) -> Result<()> {
        if self.allocator().is_interchangeable(other.allocator()) {
            self.clear();
            self.buf.swap_block(&mut other.buf);
            self.head = mem::take(&mut other.head);
            self.len = mem::take(&mut other.len);
            unsafe { other.buf.reset() };
            return Ok(());
        }

        let count = other.len;
        if count > self.buf.capacity() {
            let block = self.buf.acquire_block(count)?;
            self.clear();
            unsafe { self.buf.adopt(block, count) };
        } else {
            self.clear();
        }
        unsafe { ptr::copy_nonoverlapping(other.live_ptr(), self.buf.ptr(), count) };
        self.len = count;
        other.head = 0;
        other.len = 0;
        unsafe { other.buf.reset() };
        Ok(())
    }
}

/// Destroys `count` live slots starting at `base` through `alloc`.
///
/// # Safety
/// The slots must be live and are vacant afterwards.
unsafe fn destroy_run<T, A: RawAlloc>(alloc: &A, base: *mut T, count: usize) {
    if mem::needs_drop::<T>() {
        for i in 0..count {
            unsafe { alloc.destroy(base.add(i)) };
        }
    }
}

/// Shifts the live tail left over an erased gap, on success or unwind.
struct CloseGap<'a, T> {
    base: *mut T,
    start: usize,
    end: usize,
    tail: usize,
    len: &'a mut usize,
}

impl<T> Drop for CloseGap<'_, T> {
    fn drop(&mut self) {
        unsafe { ptr::copy(self.base.add(self.end), self.base.add(self.start), self.tail) };
        *self.len = self.start + self.tail;
    }
}

/// Why building tail elements stopped.
enum FillError<E> {
    Alloc(QueueError),
    Make(E),
}

impl<E: Into<BoxError>> FillError<E> {
    fn into_queue_error(self) -> QueueError {
        match self {
            FillError::Alloc(e) => e,
            FillError::Make(e) => QueueError::Construction(e.into()),
        }
    }
}

/// Destroys partially built tail elements unless forgotten.
struct Built<'a, T, A: RawAlloc> {
    alloc: &'a A,
    base: *mut T,
    count: usize,
}

impl<T, A: RawAlloc> Drop for Built<'_, T, A> {
    fn drop(&mut self) {
        unsafe { destroy_run(self.alloc, self.base, self.count) };
    }
}

// ─── trait impls ─────────────────────────────────────────────────────────────

impl<T, A: RawAlloc> Drop for Queue<T, A> {
    fn drop(&mut self) {
        unsafe { destroy_run(self.buf.allocator(), self.live_ptr(), self.len) };
    }
}

impl<T: Clone, A: RawAlloc + Clone> Clone for Queue<T, A> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|e| fail(e))
    }

    /// Copy-assignment: clears `self`, makes room for `source.len()` and
    /// clones each element in order.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.reserve(source.len);
        self.extend(source.iter().cloned());
    }
}

impl<T, A: RawAlloc + Default> Default for Queue<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: fmt::Debug, A: RawAlloc> fmt::Debug for Queue<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, A: RawAlloc, B: RawAlloc> PartialEq<Queue<T, B>> for Queue<T, A> {
    fn eq(&self, other: &Queue<T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: RawAlloc> Eq for Queue<T, A> {}

impl<T: PartialEq, A: RawAlloc> PartialEq<[T]> for Queue<T, A> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq, A: RawAlloc, const N: usize> PartialEq<[T; N]> for Queue<T, A> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialOrd, A: RawAlloc> PartialOrd for Queue<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, A: RawAlloc> Ord for Queue<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash, A: RawAlloc> Hash for Queue<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, A: RawAlloc> Index<usize> for Queue<T, A> {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: usize) -> &T {
        self.get(index).expect("queue index out of range")
    }
}

impl<T, A: RawAlloc> IndexMut<usize> for Queue<T, A> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut T {
        self.get_mut(index).expect("queue index out of range")
    }
}

impl<T, A: RawAlloc> AsRef<[T]> for Queue<T, A> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: RawAlloc> AsMut<[T]> for Queue<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: RawAlloc> Extend<T> for Queue<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if let Err(e) = self.reserve_tail(lower) {
            fail(e)
        }
        for item in iter {
            self.enqueue(item);
        }
    }
}

impl<'a, T: Copy + 'a, A: RawAlloc> Extend<&'a T> for Queue<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, A: RawAlloc + Default> FromIterator<T> for Queue<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut q = Self::new_in(A::default());
        q.extend(iter);
        q
    }
}

impl<T> From<Vec<T>> for Queue<T> {
    fn from(items: Vec<T>) -> Self {
        let mut q = Self::with_capacity(items.len());
        q.extend(items);
        q
    }
}

impl<T, const N: usize> From<[T; N]> for Queue<T> {
    fn from(items: [T; N]) -> Self {
        let mut q = Self::with_capacity(N);
        q.extend(items);
        q
    }
}

impl<'a, T, A: RawAlloc> IntoIterator for &'a Queue<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: RawAlloc> IntoIterator for &'a mut Queue<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, A: RawAlloc> IntoIterator for Queue<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        let this = ManuallyDrop::new(self);
        let buf = unsafe { ptr::read(&this.buf) };
        IntoIter {
            buf,
            front: this.head,
            back: this.head + this.len,
        }
    }
}

/// Owning iterator over a queue's elements, front to back.
pub struct IntoIter<T, A: RawAlloc = Global> {
    buf: RawBuf<T, A>,
    front: usize,
    back: usize,
}

impl<T, A: RawAlloc> IntoIter<T, A> {
    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.ptr().add(self.front), self.back - self.front) }
    }
}

impl<T, A: RawAlloc> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        let value = unsafe { ptr::read(self.buf.ptr().add(self.front)) };
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T, A: RawAlloc> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(unsafe { ptr::read(self.buf.ptr().add(self.back)) })
    }
}

impl<T, A: RawAlloc> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: RawAlloc> FusedIterator for IntoIter<T, A> {}

impl<T, A: RawAlloc> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        let remaining = self.back - self.front;
        unsafe {
            destroy_run(self.buf.allocator(), self.buf.ptr().add(self.front), remaining)
        };
    }
}

impl<T: fmt::Debug, A: RawAlloc> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

// The block is exclusively owned; sharing rules follow `T` and `A`.
unsafe impl<T: Send, A: RawAlloc + Send> Send for Queue<T, A> {}
unsafe impl<T: Sync, A: RawAlloc + Sync> Sync for Queue<T, A> {}
unsafe impl<T: Send, A: RawAlloc + Send> Send for IntoIter<T, A> {}
unsafe impl<T: Sync, A: RawAlloc + Sync> Sync for IntoIter<T, A> {}
