//! Error taxonomy shared by every fallible queue operation.
//!
//! Fallible operations come in `try_*` form and return [`Result`]. Their
//! infallible counterparts (`reserve`, `enqueue`, ...) panic with the
//! [`Display`](core::fmt::Display) text of the same error, mirroring
//! `Vec::try_reserve` / `Vec::reserve`.

use core::alloc::Layout;

/// Boxed error produced by a fallible element constructor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T, E = QueueError> = core::result::Result<T, E>;

/// Everything that can go wrong inside a [`Queue`](crate::Queue).
///
/// Whenever one of these is returned the queue is in exactly the state it was
/// in before the call.
#[derive(thiserror::Error, Debug)]
pub enum QueueError {
    /// An index or range fell outside `[0, len)`, or the queue was empty.
    #[error("index {index} out of range for queue of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// The requested number of slots does not fit in a `Layout`.
    #[error("capacity overflow")]
    CapacityOverflow,

    /// The allocator could not provide a block of the requested layout.
    #[error("allocator failed to provide {} bytes (align {})", .layout.size(), .layout.align())]
    AllocFailed { layout: Layout },

    /// A fallible element constructor returned an error.
    #[error("element construction failed: {0}")]
    Construction(#[source] BoxError),
}

impl QueueError {
    /// `true` for [`QueueError::OutOfRange`].
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, QueueError::OutOfRange { .. })
    }

    /// `true` for the two allocation failures: overflow and refused block.
    pub fn is_alloc_failure(&self) -> bool {
        matches!(
            self,
            QueueError::CapacityOverflow | QueueError::AllocFailed { .. }
        )
    }

    pub(crate) fn empty() -> Self {
        QueueError::OutOfRange { index: 0, len: 0 }
    }
}

/// Failure reported by a [`RawAlloc`](crate::RawAlloc) implementation.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("memory allocation failed")]
pub struct AllocError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_out_of_range() {
        let e = QueueError::OutOfRange { index: 7, len: 3 };
        assert_eq!(e.to_string(), "index 7 out of range for queue of length 3");
        assert!(e.is_out_of_range());
        assert!(!e.is_alloc_failure());
    }

    #[test]
    fn test_error_display_alloc() {
        let layout = Layout::array::<u64>(4).unwrap();
        let e = QueueError::AllocFailed { layout };
        assert_eq!(e.to_string(), "allocator failed to provide 32 bytes (align 8)");
        assert!(e.is_alloc_failure());
        assert!(QueueError::CapacityOverflow.is_alloc_failure());
    }

    #[test]
    fn test_error_construction_source() {
        use std::error::Error;
        let inner: BoxError = "bad input".into();
        let e = QueueError::Construction(inner);
        assert_eq!(e.to_string(), "element construction failed: bad input");
        assert_eq!(e.source().map(|s| s.to_string()), Some("bad input".to_string()));
    }

    #[test]
    fn test_error_empty_is_out_of_range() {
        assert!(matches!(
            QueueError::empty(),
            QueueError::OutOfRange { index: 0, len: 0 }
        ));
    }
}
