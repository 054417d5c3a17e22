//! Recoverable failures surfaced to arena callers.
//!
//! A segment running out of room is not in here: that is the `None` of
//! [`Region::allocate`](crate::Region::allocate) and the arena handles it by
//! growing. Bad alignments and broken growth arithmetic panic instead.

use std::alloc::LayoutError;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArenaError {
  /// The backing memory source could not supply a new segment.
  #[error("out of memory: backing allocation of {requested} bytes failed")]
  OutOfMemory { requested: usize },

  /// Sizing a segment for the request overflowed `usize`.
  #[error("segment size overflow for request of {size} bytes aligned to {alignment}")]
  CapacityOverflow { size: usize, alignment: usize },

  /// An arena was configured with a zero-byte default segment.
  #[error("default segment size must be nonzero")]
  InvalidSegmentSize,

  /// A typed request produced a layout the allocator cannot describe.
  #[error("invalid layout: {0}")]
  Layout(#[from] LayoutError),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
