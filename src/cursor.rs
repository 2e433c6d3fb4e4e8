//! Random-access cursors over the live range of a queue.
//!
//! A [`Cursor`] is a position with pointer-like arithmetic: it can step,
//! jump by an offset, be subtracted from another cursor and be ordered against
//! one. Unlike a raw pointer it borrows the range it walks, so the queue
//! cannot reallocate underneath it, and dereferencing outside the live range
//! yields `None` instead of reading vacant memory.
//!
//! [`RevCursor`] is the reverse adapter: it sits one slot after the element it
//! designates, exactly like a reverse iterator built from a forward one.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Add, AddAssign, Index, Sub, SubAssign};

/// A copyable position inside a borrowed run of elements.
pub struct Cursor<'a, T> {
    live: &'a [T],
    pos: isize,
}

impl<'a, T> Cursor<'a, T> {
    /// A cursor at `pos` within `live`. `pos` may lie outside the run; such a
    /// cursor can still be moved and compared but not dereferenced.
    #[inline(always)]
    pub fn new(live: &'a [T], pos: isize) -> Self {
        Self { live, pos }
    }

    /// Signed distance from the start of the run.
    #[inline(always)]
    pub fn position(&self) -> isize {
        self.pos
    }

    /// The logical index of the element under the cursor, suitable for
    /// [`Queue::erase`](crate::Queue::erase). `None` whenever [`get`](Self::get)
    /// is: at the end position, outside the run, or for a default cursor.
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.pos)
            .ok()
            .filter(|&i| i < self.live.len())
    }

    /// The element under the cursor, or `None` when it does not designate a
    /// live element (end position, default cursor, out of range).
    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        usize::try_from(self.pos).ok().and_then(|i| self.live.get(i))
    }

    /// The element `n` slots away, same as `(self + n).get()`.
    #[inline]
    pub fn at(&self, n: isize) -> Option<&'a T> {
        (*self + n).get()
    }

    /// Pre-increment: advances by one slot and returns the moved cursor.
    #[inline(always)]
    pub fn inc(&mut self) -> &mut Self {
        self.pos += 1;
        self
    }

    /// Pre-decrement.
    #[inline(always)]
    pub fn dec(&mut self) -> &mut Self {
        self.pos -= 1;
        self
    }

    /// Post-increment: advances by one slot and returns the previous cursor.
    #[inline(always)]
    pub fn post_inc(&mut self) -> Self {
        let prev = *self;
        self.pos += 1;
        prev
    }

    /// Post-decrement.
    #[inline(always)]
    pub fn post_dec(&mut self) -> Self {
        let prev = *self;
        self.pos -= 1;
        prev
    }

    fn key(&self) -> (usize, isize) {
        (self.live.as_ptr() as usize, self.pos)
    }
}

impl<T> Default for Cursor<'_, T> {
    /// The "no position" cursor. Compares equal to other default cursors and
    /// never dereferences.
    fn default() -> Self {
        Self { live: &[], pos: 0 }
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("pos", &self.pos)
            .field("len", &self.live.len())
            .finish()
    }
}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> PartialOrd for Cursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Cursor<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl<T> Hash for Cursor<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl<'a, T> Add<isize> for Cursor<'a, T> {
    type Output = Cursor<'a, T>;
    #[inline(always)]
    fn add(self, n: isize) -> Self::Output {
        Cursor { live: self.live, pos: self.pos + n }
    }
}

impl<'a, T> Add<Cursor<'a, T>> for isize {
    type Output = Cursor<'a, T>;
    #[inline(always)]
    fn add(self, cursor: Cursor<'a, T>) -> Self::Output {
        cursor + self
    }
}

impl<'a, T> Sub<isize> for Cursor<'a, T> {
    type Output = Cursor<'a, T>;
    #[inline(always)]
    fn sub(self, n: isize) -> Self::Output {
        Cursor { live: self.live, pos: self.pos - n }
    }
}

/// Number of slots between two cursors.
impl<'a, T> Sub<Cursor<'a, T>> for Cursor<'a, T> {
    type Output = isize;
    #[inline(always)]
    fn sub(self, other: Cursor<'a, T>) -> isize {
        debug_assert!(
            core::ptr::eq(self.live.as_ptr(), other.live.as_ptr()),
            "cursors from different ranges"
        );
        self.pos - other.pos
    }
}

impl<T> AddAssign<isize> for Cursor<'_, T> {
    #[inline(always)]
    fn add_assign(&mut self, n: isize) {
        self.pos += n;
    }
}

impl<T> SubAssign<isize> for Cursor<'_, T> {
    #[inline(always)]
    fn sub_assign(&mut self, n: isize) {
        self.pos -= n;
    }
}

impl<T> Index<isize> for Cursor<'_, T> {
    type Output = T;
    fn index(&self, n: isize) -> &T {
        self.at(n).expect("cursor offset out of range")
    }
}

// ─── RevCursor ────────────────────────────────────────────────────────────────

/// Reverse cursor: moving forward walks towards the front of the queue.
///
/// Holds a forward [`Cursor`] (`base`) and designates the element just before
/// it, so `rbegin` wraps `end` and `rend` wraps `begin`.
pub struct RevCursor<'a, T> {
    base: Cursor<'a, T>,
}

impl<'a, T> RevCursor<'a, T> {
    #[inline(always)]
    pub fn new(base: Cursor<'a, T>) -> Self {
        Self { base }
    }

    /// The underlying forward cursor.
    #[inline(always)]
    pub fn base(&self) -> Cursor<'a, T> {
        self.base
    }

    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        (self.base - 1).get()
    }

    #[inline]
    pub fn at(&self, n: isize) -> Option<&'a T> {
        (*self + n).get()
    }

    pub fn inc(&mut self) -> &mut Self {
        self.base.dec();
        self
    }

    pub fn dec(&mut self) -> &mut Self {
        self.base.inc();
        self
    }

    pub fn post_inc(&mut self) -> Self {
        let prev = *self;
        self.base.dec();
        prev
    }

    pub fn post_dec(&mut self) -> Self {
        let prev = *self;
        self.base.inc();
        prev
    }
}

impl<T> Default for RevCursor<'_, T> {
    fn default() -> Self {
        Self { base: Cursor::default() }
    }
}

impl<T> Clone for RevCursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RevCursor<'_, T> {}

impl<T> fmt::Debug for RevCursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RevCursor").field(&self.base).finish()
    }
}

impl<T> PartialEq for RevCursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl<T> Eq for RevCursor<'_, T> {}

impl<T> PartialOrd for RevCursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for RevCursor<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.base.cmp(&self.base)
    }
}

impl<'a, T> Add<isize> for RevCursor<'a, T> {
    type Output = RevCursor<'a, T>;
    fn add(self, n: isize) -> Self::Output {
        RevCursor { base: self.base - n }
    }
}

impl<'a, T> Add<RevCursor<'a, T>> for isize {
    type Output = RevCursor<'a, T>;
    fn add(self, cursor: RevCursor<'a, T>) -> Self::Output {
        cursor + self
    }
}

impl<'a, T> Sub<isize> for RevCursor<'a, T> {
    type Output = RevCursor<'a, T>;
    fn sub(self, n: isize) -> Self::Output {
        RevCursor { base: self.base + n }
    }
}

impl<'a, T> Sub<RevCursor<'a, T>> for RevCursor<'a, T> {
    type Output = isize;
    fn sub(self, other: RevCursor<'a, T>) -> isize {
        other.base - self.base
    }
}

impl<T> AddAssign<isize> for RevCursor<'_, T> {
    fn add_assign(&mut self, n: isize) {
        self.base -= n;
    }
}

impl<T> SubAssign<isize> for RevCursor<'_, T> {
    fn sub_assign(&mut self, n: isize) {
        self.base += n;
    }
}

impl<T> Index<isize> for RevCursor<'_, T> {
    type Output = T;
    fn index(&self, n: isize) -> &T {
        self.at(n).expect("cursor offset out of range")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static DATA: [i32; 5] = [10, 20, 30, 40, 50];

    #[test]
    fn test_cursor_deref_and_bounds() {
        let begin = Cursor::new(&DATA, 0);
        let end = Cursor::new(&DATA, 5);
        assert_eq!(begin.get(), Some(&10));
        assert_eq!(end.get(), None);
        assert_eq!((begin - 1).get(), None);
        assert_eq!(begin.at(4), Some(&50));
        assert_eq!(begin[2], 30);
    }

    #[test]
    fn test_cursor_default_is_no_position() {
        let a: Cursor<'_, i32> = Cursor::default();
        let b: Cursor<'_, i32> = Cursor::default();
        assert_eq!(a, b);
        assert_eq!(a.get(), None);
        assert_eq!(a.index(), None);
    }

    #[test]
    fn test_cursor_increment_decrement() {
        let mut c = Cursor::new(&DATA, 0);
        assert_eq!(c.inc().get(), Some(&20));
        let prev = c.post_inc();
        assert_eq!(prev.get(), Some(&20));
        assert_eq!(c.get(), Some(&30));
        let prev = c.post_dec();
        assert_eq!(prev.get(), Some(&30));
        assert_eq!(c.dec().get(), Some(&10));
    }

    #[test]
    fn test_cursor_arithmetic() {
        let begin = Cursor::new(&DATA, 0);
        let end = Cursor::new(&DATA, 5);
        assert_eq!(end - begin, 5);
        assert_eq!(begin - end, -5);
        assert_eq!((begin + 3).get(), Some(&40));
        assert_eq!((3 + begin).get(), Some(&40));
        assert_eq!((end - 2).get(), Some(&40));

        let mut c = begin;
        c += 4;
        assert_eq!(c.get(), Some(&50));
        c -= 3;
        assert_eq!(c.get(), Some(&20));
        assert_eq!(c.index(), Some(1));
        assert_eq!((begin - 1).index(), None);
        assert_eq!(end.index(), None);
        assert_eq!((end - 1).index(), Some(4));
        assert_eq!((end + 1).index(), None);
    }

    #[test]
    fn test_cursor_ordering() {
        let begin = Cursor::new(&DATA, 0);
        let mid = begin + 2;
        let end = Cursor::new(&DATA, 5);
        assert!(begin < mid && mid < end);
        assert!(end >= mid && mid <= end);
        assert!(begin != end);
        assert_eq!(begin + 5, end);

        let mut cursors = vec![end, begin, mid];
        cursors.sort();
        assert_eq!(cursors, vec![begin, mid, end]);
    }

    #[test]
    fn test_cursor_walk_range() {
        let mut c = Cursor::new(&DATA, 0);
        let end = Cursor::new(&DATA, 5);
        let mut seen = Vec::new();
        while c != end {
            seen.push(*c.post_inc().get().unwrap());
        }
        assert_eq!(seen, DATA);
    }

    #[test]
    fn test_rev_cursor_walks_backwards() {
        let rbegin = RevCursor::new(Cursor::new(&DATA, 5));
        let rend = RevCursor::new(Cursor::new(&DATA, 0));
        assert_eq!(rend - rbegin, 5);
        assert!(rbegin < rend);

        let mut c = rbegin;
        let mut seen = Vec::new();
        while c != rend {
            seen.push(*c.get().unwrap());
            c.inc();
        }
        assert_eq!(seen, vec![50, 40, 30, 20, 10]);
        assert_eq!(rend.get(), None);
    }

    #[test]
    fn test_rev_cursor_arithmetic() {
        let rbegin = RevCursor::new(Cursor::new(&DATA, 5));
        assert_eq!(rbegin[0], 50);
        assert_eq!(rbegin.at(1), Some(&40));
        assert_eq!((rbegin + 4).get(), Some(&10));
        assert_eq!((2 + rbegin).get(), Some(&30));
        let mut c = rbegin + 3;
        c -= 1;
        assert_eq!(c.get(), Some(&30));
        assert_eq!(c.post_dec().get(), Some(&30));
        assert_eq!(c.get(), Some(&40));
        assert_eq!(c.base().position(), 4);
    }
}
