use std::{cell::Cell, fmt, marker::PhantomData, ptr::NonNull};

use crate::{
  align::{checked_align_up, is_valid_alignment},
  backing::Chunk,
};

/// Who is responsible for releasing a region's bytes.
enum Buffer<'buf> {
  /// Released when the region drops.
  Owned { _chunk: Box<dyn Chunk> },
  /// Caller-owned; the region only borrows it.
  Borrowed(PhantomData<&'buf mut [u8]>),
}

/// A fixed-capacity bump allocator over one contiguous buffer.
///
/// ```text
///   base                         base + offset          base + capacity
///   │                            │                      │
///   ▼                            ▼                      ▼
///   ┌────┬──┬────────┬──┬────────┬──────────────────────┐
///   │ A1 │p │   A2   │p │   A3   │      free space      │
///   └────┴──┴────────┴──┴────────┴──────────────────────┘
///           p = alignment padding
/// ```
///
/// Allocation only ever moves `offset` forward, so handed-out ranges never
/// overlap until [`Region::reset`] rewinds it to zero.
pub struct Region<'buf> {
  base: NonNull<u8>,
  capacity: usize,
  offset: Cell<usize>,
  buffer: Buffer<'buf>,
}

// The buffer is either exclusively borrowed or exclusively owned, so moving
// the region to another thread moves sole access along with it.
unsafe impl Send for Region<'_> {}

impl<'buf> Region<'buf> {
  /// Creates a region over a buffer the caller owns. The buffer is never
  /// released by the region.
  pub fn new(buf: &'buf mut [u8]) -> Self {
    Self {
      base: NonNull::from(&mut *buf).cast::<u8>(),
      capacity: buf.len(),
      offset: Cell::new(0),
      buffer: Buffer::Borrowed(PhantomData),
    }
  }

  /// Bumps the cursor to carve `size` bytes aligned to `alignment`.
  ///
  /// Returns `None` without touching any state when the remaining space,
  /// padding included, is too small.
  ///
  /// A zero-byte request on an exactly full region returns `base + capacity`,
  /// one past the end of the buffer. Such a pointer must not be dereferenced.
  ///
  /// # Panics
  ///
  /// If `alignment` is zero or not a power of two.
  pub fn allocate(
    &self,
    size: usize,
    alignment: usize,
  ) -> Option<NonNull<u8>> {
    assert!(
      is_valid_alignment(alignment),
      "alignment must be a nonzero power of two, got {alignment}"
    );

    let offset = self.offset.get();
    let current = (self.base.as_ptr() as usize).checked_add(offset)?;
    let aligned = checked_align_up(current, alignment)?;
    let padding = aligned - current;

    let end = offset.checked_add(padding)?.checked_add(size)?;
    if end > self.capacity {
      return None;
    }

    self.offset.set(end);

    Some(unsafe { self.base.add(offset + padding) })
  }

  /// Rewinds the cursor to the start of the buffer.
  ///
  /// Everything previously allocated from this region is logically dead
  /// afterwards. Raw pointers obtained from [`Region::allocate`] must not be
  /// dereferenced again.
  pub fn reset(&mut self) {
    *self.offset.get_mut() = 0;
  }

  pub fn used(&self) -> usize {
    self.offset.get()
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn remaining(&self) -> usize {
    self.capacity - self.offset.get()
  }

  pub fn is_owned(&self) -> bool {
    matches!(self.buffer, Buffer::Owned { .. })
  }

  /// Whether `ptr` points into this region's buffer.
  pub fn contains(
    &self,
    ptr: *const u8,
  ) -> bool {
    let start = self.base.as_ptr() as usize;
    let addr = ptr as usize;
    addr >= start && addr - start < self.capacity
  }
}

impl Region<'static> {
  /// Creates a region that owns `chunk` and releases it on drop.
  pub fn from_chunk(chunk: Box<dyn Chunk>) -> Self {
    Self {
      base: chunk.base(),
      capacity: chunk.len(),
      offset: Cell::new(0),
      buffer: Buffer::Owned { _chunk: chunk },
    }
  }
}

impl fmt::Debug for Region<'_> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("Region")
      .field("base", &self.base)
      .field("capacity", &self.capacity)
      .field("used", &self.offset.get())
      .field("owned", &self.is_owned())
      .finish()
  }
}
