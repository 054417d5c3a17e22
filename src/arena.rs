use std::{
  alloc::Layout,
  cell::{Cell, RefCell},
  mem::{self, MaybeUninit},
  ptr::{self, NonNull},
  slice, str,
};

use crate::{
  align::{MAX_ALIGN, is_valid_alignment},
  backing::{Backing, Heap},
  config::ArenaConfig,
  error::{ArenaError, Result},
  region::Region,
};

/// A growable chain of [`Region`] segments behind one allocation interface.
///
/// Requests go to the segment under the cursor, which is the last segment
/// until the first reset. When it is full a new segment of at least
/// `segment_size` bytes is appended and the request is retried there;
/// segments behind the cursor are never allocated into again until the next
/// [`Arena::reset`]. After a reset the cursor walks the retained segments
/// before appending anything.
///
/// ```text
///   segments:  [ seg 0 ][ seg 1 ][ seg 2 ]
///                 full     full     ▲ cursor
///   allocate ─────────────────────────┘
///   (miss)   ──► append seg 3 sized max(size, segment_size) + align - 1
/// ```
///
/// Allocation takes `&self`, so any number of values stored in the arena can
/// be alive at once. `reset` takes `&mut self`, so none of them can survive
/// it.
///
/// The arena frees storage, not objects: destructors of stored values never
/// run. Types that own resources (a `String`, a `Vec`, a file handle) leak
/// those resources when the arena is reset or dropped.
#[derive(Debug)]
pub struct Arena<B: Backing = Heap> {
  segments: RefCell<Vec<Region<'static>>>,
  /// Index of the segment currently being bumped.
  current: Cell<usize>,
  segment_size: usize,
  backing: B,
}

impl Arena<Heap> {
  /// Creates a heap-backed arena whose first segment holds `segment_size`
  /// bytes.
  ///
  /// # Errors
  ///
  /// [`ArenaError::InvalidSegmentSize`] for a zero size, or
  /// [`ArenaError::OutOfMemory`] if the first segment cannot be allocated.
  pub fn new(segment_size: usize) -> Result<Self> {
    Self::with_config(ArenaConfig::default().with_segment_size(segment_size))
  }

  pub fn with_config(config: ArenaConfig) -> Result<Self> {
    Self::with_backing(config, Heap)
  }
}

impl<B: Backing> Arena<B> {
  /// Creates an arena that draws its segments from `backing`.
  pub fn with_backing(
    config: ArenaConfig,
    backing: B,
  ) -> Result<Self> {
    config.validate()?;

    let first = Region::from_chunk(backing.acquire(config.segment_size)?);

    Ok(Self {
      segments: RefCell::new(vec![first]),
      current: Cell::new(0),
      segment_size: config.segment_size,
      backing,
    })
  }

  /// Reserves `size` bytes aligned to `alignment`, growing the chain when
  /// no retained segment at or after the cursor can take the request.
  ///
  /// # Errors
  ///
  /// [`ArenaError::CapacityOverflow`] if no segment size can describe the
  /// request, [`ArenaError::OutOfMemory`] if the backing cannot supply the
  /// new segment. Either way no segment is modified.
  ///
  /// # Panics
  ///
  /// If `alignment` is zero or not a power of two.
  pub fn allocate(
    &self,
    size: usize,
    alignment: usize,
  ) -> Result<NonNull<u8>> {
    assert!(
      is_valid_alignment(alignment),
      "alignment must be a nonzero power of two, got {alignment}"
    );

    let mut segments = self.segments.borrow_mut();

    // Segments past the cursor are only non-empty before the first reset,
    // when the cursor always sits on the tail.
    let mut index = self.current.get();
    while let Some(segment) = segments.get(index) {
      if let Some(ptr) = segment.allocate(size, alignment) {
        self.current.set(index);
        return Ok(ptr);
      }
      index += 1;
    }

    // Worst case the new segment starts one byte past an alignment boundary.
    let needed = size
      .max(self.segment_size)
      .checked_add(alignment - 1)
      .ok_or(ArenaError::CapacityOverflow { size, alignment })?;

    let chunk = self.backing.acquire(needed).inspect_err(|err| {
      tracing::warn!(needed, size, alignment, %err, "failed to acquire arena segment");
    })?;

    let segment = Region::from_chunk(chunk);

    let Some(ptr) = segment.allocate(size, alignment) else {
      unreachable!(
        "fresh segment of {} bytes cannot hold {size} bytes aligned to {alignment}",
        segment.capacity()
      );
    };

    tracing::debug!(
      segment = segments.len(),
      capacity = segment.capacity(),
      size,
      alignment,
      "arena grew a new segment"
    );

    segments.push(segment);
    self.current.set(segments.len() - 1);

    Ok(ptr)
  }

  /// [`Arena::allocate`] with the platform's maximum fundamental alignment.
  pub fn allocate_bytes(
    &self,
    size: usize,
  ) -> Result<NonNull<u8>> {
    self.allocate(size, MAX_ALIGN)
  }

  /// Reserves an uninitialized slot for a `T`.
  ///
  /// This is the first half of in-place construction: reserve, then write.
  pub fn alloc_uninit<T>(&self) -> Result<&mut MaybeUninit<T>> {
    let ptr = self.allocate(mem::size_of::<T>(), mem::align_of::<T>())?;

    Ok(unsafe { ptr.cast::<MaybeUninit<T>>().as_mut() })
  }

  /// Moves `value` into the arena.
  ///
  /// On failure `value` is dropped without having been placed anywhere.
  pub fn store<T>(
    &self,
    value: T,
  ) -> Result<&mut T> {
    let slot = self.alloc_uninit::<T>()?;
    Ok(slot.write(value))
  }

  /// Builds a `T` directly in a freshly reserved slot.
  ///
  /// `init` only runs once the slot exists, so nothing is constructed when
  /// reservation fails.
  pub fn store_with<T, F>(
    &self,
    init: F,
  ) -> Result<&mut T>
  where
    F: FnOnce() -> T,
  {
    let slot = self.alloc_uninit::<T>()?;
    Ok(slot.write(init()))
  }

  /// Copies `src` into the arena.
  pub fn store_slice_copy<T: Copy>(
    &self,
    src: &[T],
  ) -> Result<&mut [T]> {
    let layout = Layout::array::<T>(src.len())?;
    let ptr = self.allocate(layout.size(), layout.align())?.cast::<T>();

    unsafe {
      ptr::copy_nonoverlapping(src.as_ptr(), ptr.as_ptr(), src.len());
      Ok(slice::from_raw_parts_mut(ptr.as_ptr(), src.len()))
    }
  }

  pub fn store_str(
    &self,
    src: &str,
  ) -> Result<&mut str> {
    let bytes = self.store_slice_copy(src.as_bytes())?;
    Ok(unsafe { str::from_utf8_unchecked_mut(bytes) })
  }

  /// Rewinds every segment. Segments are kept and refilled in order by the
  /// next cycle, so the capacity built up so far is reused without asking the
  /// backing again.
  pub fn reset(&mut self) {
    let segments = self.segments.get_mut();
    let reclaimed: usize = segments.iter().map(Region::used).sum();

    for segment in segments.iter_mut() {
      segment.reset();
    }
    *self.current.get_mut() = 0;

    tracing::trace!(segments = segments.len(), reclaimed, "arena reset");
  }

  /// Bytes handed out since the last reset, alignment padding included.
  pub fn used(&self) -> usize {
    self.segments.borrow().iter().map(Region::used).sum()
  }

  pub fn capacity(&self) -> usize {
    self.segments.borrow().iter().map(Region::capacity).sum()
  }

  pub fn segment_count(&self) -> usize {
    self.segments.borrow().len()
  }

  pub fn default_segment_size(&self) -> usize {
    self.segment_size
  }
}
