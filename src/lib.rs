//! # Con Queue
//!
//! A growable FIFO queue backed by a single contiguous block of memory that it
//! manages by hand, plus random-access cursors over its live elements.
//!
//! The crate provides `Queue`, a drop-in alternative to `VecDeque` for the
//! common "push at the back, pop at the front" pattern when the elements have
//! to stay contiguous (`as_slice` always works, no ring wrap-around).
//!
//! ## Key Features
//!
//! * **O(1) Dequeue:** Removing the front element only advances an offset; nothing is shifted.
//! * **Amortized O(1) Enqueue:** The block doubles when full; the dequeued prefix is reclaimed only then, when the live run moves to the new block.
//! * **Pluggable Memory:** Every block comes from a `RawAlloc` (`Global` by default, `LimitedAlloc` for byte budgets).
//! * **Error Safety:** `try_*` operations return a `QueueError` and leave the queue untouched on failure.
//! * **Cursors:** `Cursor`/`RevCursor` support pointer-style arithmetic, ordering and distance.
//!
//! ## Cargo Features
//!
//! * `sync` (default): `Guarded<C>`, a `parking_lot` mutex decorator for sharing a queue between threads.
//! * `serde`: `Serialize`/`Deserialize` for `Queue` as a plain sequence.
//!
//! ## Examples
//!
//! ### Queue
//!
//! ```rust
//! use con_queue::Queue;
//!
//! let mut q = Queue::from([6, 8, 7, 9]);
//! q.enqueue(5);
//! q.enqueue(5);
//! q.resize(10);
//!
//! assert_eq!(q.len(), 10);
//! assert_eq!(q.dequeue().unwrap(), 6);
//! assert_eq!(q[0], 8);
//! ```
//!
//! ### Bounded Memory
//!
//! ```rust
//! use con_queue::{LimitedAlloc, Queue};
//!
//! // 4 x u64 fits, 8 x u64 does not.
//! let alloc = LimitedAlloc::new(32);
//! let mut q: Queue<u64, _> = Queue::new_in(alloc.clone());
//!
//! for i in 0..4 {
//!     q.try_enqueue(i).unwrap();
//! }
//! assert!(q.try_enqueue(4).unwrap_err().is_alloc_failure());
//! assert_eq!(q.as_slice(), &[0, 1, 2, 3]);
//! ```
//!
//! ### Cursors
//!
//! ```rust
//! use con_queue::Queue;
//!
//! let q = Queue::from([10, 20, 30]);
//! let begin = q.begin();
//! let end = q.end();
//!
//! assert_eq!(end - begin, 3);
//! assert_eq!((begin + 2).get(), Some(&30));
//! assert_eq!(q.rbegin().get(), Some(&30));
//! ```

// --- Module Declarations ---

pub mod alloc;
pub mod cursor;
pub mod error;
pub mod queue;
mod raw;
#[cfg(feature = "serde")]
mod serialize;
#[cfg(feature = "sync")]
pub mod sync;

// --- Re-exports ---

pub use alloc::{Global, LimitedAlloc, RawAlloc};
pub use cursor::{Cursor, RevCursor};
pub use error::{AllocError, BoxError, QueueError, Result};
pub use queue::{GROWTH_FACTOR, IntoIter, MIN_NON_ZERO_CAP, Queue};
#[cfg(feature = "sync")]
pub use sync::Guarded;
