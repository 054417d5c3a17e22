//! # byteforge - Region-Based Arena Allocation
//!
//! This crate provides a **bump allocator** over fixed buffers ([`Region`])
//! and a growable chain of them ([`Arena`]) for frame-scoped or
//! request-scoped storage: O(1) allocation, no per-object frees, and one
//! `reset` to reclaim everything.
//!
//! ## Overview
//!
//! ```text
//!   Region (one buffer):
//!
//!   ┌─────┬─────┬─────┬─────┬───────────────────────────────────────┐
//!   │ A1  │ A2  │ A3  │ A4  │            Free Space                 │
//!   └─────┴─────┴─────┴─────┴───────────────────────────────────────┘
//!                           ▲                                       ▲
//!                       base + offset                        base + capacity
//!                       (next alloc)
//!
//!   Arena (chain of regions):
//!
//!   ┌──────────┐   ┌──────────┐   ┌──────────────────┐
//!   │ segment0 │──►│ segment1 │──►│ segment2 (active)│
//!   │   full   │   │   full   │   │ ████░░░░░░░░░░░░ │
//!   └──────────┘   └──────────┘   └──────────────────┘
//!
//!   When the active segment cannot hold a request, a new one of
//!   max(size, segment_size) + align - 1 bytes is appended.
//!   reset() rewinds every segment and keeps them all.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   byteforge
//!   ├── align      - align_to! macro, MAX_ALIGN
//!   ├── arena      - Arena: segment chain + typed storage
//!   ├── backing    - Backing / Chunk: where segment memory comes from
//!   ├── config     - ArenaConfig
//!   ├── error      - ArenaError
//!   └── region     - Region: single-buffer bump allocator
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use byteforge::Arena;
//!
//! struct Particle {
//!     x: f32,
//!     y: f32,
//! }
//!
//! let mut arena = Arena::new(64 * 1024)?;
//!
//! for frame in 0..3 {
//!     let p = arena.store(Particle { x: frame as f32, y: 0.0 })?;
//!     p.y += 1.0;
//!     assert_eq!(p.y, 1.0);
//!
//!     arena.reset();
//!     assert_eq!(arena.used(), 0);
//! }
//! # Ok::<(), byteforge::ArenaError>(())
//! ```
//!
//! A [`Region`] can also run directly over memory you already own:
//!
//! ```rust
//! use byteforge::Region;
//!
//! let mut buffer = [0u8; 1024];
//! let region = Region::new(&mut buffer);
//!
//! let ptr = region.allocate(8, 8).unwrap();
//! assert_eq!(ptr.as_ptr() as usize % 8, 0);
//! assert!(region.used() >= 8);
//! ```
//!
//! ## Failures
//!
//! - A full segment is never an error; the arena just grows.
//! - [`ArenaError::OutOfMemory`] means the [`Backing`] could not supply a new
//!   segment. Nothing was modified.
//! - A zero or non-power-of-two alignment panics.
//!
//! ## Limitations
//!
//! - **Single owner**: an arena can move between threads but is not `Sync`.
//!   Use one arena per worker, or wrap it in a mutex.
//! - **No destructors**: values stored in an arena are never dropped. The
//!   arena releases storage, not objects.
//! - **No individual frees**: memory comes back only through `reset` or by
//!   dropping the arena.

pub mod align;
mod arena;
pub mod backing;
mod config;
mod error;
mod region;

pub use align::MAX_ALIGN;
pub use arena::Arena;
#[cfg(unix)]
pub use backing::Mmap;
pub use backing::{Backing, Chunk, Heap};
pub use config::{ArenaConfig, DEFAULT_SEGMENT_SIZE};
pub use error::{ArenaError, Result};
pub use region::Region;
