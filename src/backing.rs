//! Where segment memory comes from.
//!
//! An [`Arena`](crate::Arena) never talks to the system allocator directly.
//! It asks a [`Backing`] for a [`Chunk`] whenever it needs a new segment and
//! drops the chunk when the segment goes away. Two sources ship with the
//! crate:
//!
//! ```text
//!   Heap  ── std::alloc::alloc / dealloc, base aligned to MAX_ALIGN
//!   Mmap  ── anonymous private mmap(2) / munmap(2), base page aligned (unix)
//! ```

use std::{
  alloc::{self, Layout},
  ptr::NonNull,
};

use crate::{
  align::MAX_ALIGN,
  error::{ArenaError, Result},
};

/// A contiguous byte range owned exclusively by whoever holds the chunk.
///
/// Dropping the chunk releases the range.
///
/// # Safety
///
/// Implementors must guarantee that `[base, base + len)` is valid for reads
/// and writes, is not aliased by anything else, and stays valid until the
/// chunk is dropped. `base` must not move while the chunk is alive.
pub unsafe trait Chunk: Send {
  fn base(&self) -> NonNull<u8>;

  fn len(&self) -> usize;
}

/// Source of segment memory.
pub trait Backing {
  /// Acquires a chunk of at least `size` bytes.
  ///
  /// # Errors
  ///
  /// Returns [`ArenaError::OutOfMemory`] when the range cannot be supplied.
  fn acquire(
    &self,
    size: usize,
  ) -> Result<Box<dyn Chunk>>;
}

/// Segments allocated through the global allocator.
#[derive(Debug, Default, Clone, Copy)]
pub struct Heap;

pub struct HeapChunk {
  ptr: NonNull<u8>,
  layout: Layout,
}

unsafe impl Send for HeapChunk {}

unsafe impl Chunk for HeapChunk {
  fn base(&self) -> NonNull<u8> {
    self.ptr
  }

  fn len(&self) -> usize {
    self.layout.size()
  }
}

impl Drop for HeapChunk {
  fn drop(&mut self) {
    unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
  }
}

impl Backing for Heap {
  fn acquire(
    &self,
    size: usize,
  ) -> Result<Box<dyn Chunk>> {
    if size == 0 {
      return Err(ArenaError::OutOfMemory { requested: size });
    }

    let layout = Layout::from_size_align(size, MAX_ALIGN)
      .map_err(|_| ArenaError::OutOfMemory { requested: size })?;

    let ptr = unsafe { alloc::alloc(layout) };

    match NonNull::new(ptr) {
      Some(ptr) => Ok(Box::new(HeapChunk { ptr, layout })),
      None => Err(ArenaError::OutOfMemory { requested: size }),
    }
  }
}

/// Segments mapped straight from the kernel with anonymous private `mmap`.
///
/// Lengths are rounded up to whole pages, so a chunk may be larger than
/// requested.
#[cfg(unix)]
#[derive(Debug, Default, Clone, Copy)]
pub struct Mmap;

#[cfg(unix)]
pub struct MmapChunk {
  ptr: NonNull<u8>,
  len: usize,
}

#[cfg(unix)]
unsafe impl Send for MmapChunk {}

#[cfg(unix)]
unsafe impl Chunk for MmapChunk {
  fn base(&self) -> NonNull<u8> {
    self.ptr
  }

  fn len(&self) -> usize {
    self.len
  }
}

#[cfg(unix)]
impl Drop for MmapChunk {
  fn drop(&mut self) {
    let rc = unsafe { libc::munmap(self.ptr.as_ptr().cast(), self.len) };
    if rc != 0 {
      tracing::warn!(len = self.len, "munmap failed while releasing segment");
    }
  }
}

#[cfg(unix)]
fn page_size() -> usize {
  let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
  if size > 0 { size as usize } else { 4096 }
}

#[cfg(unix)]
impl Backing for Mmap {
  fn acquire(
    &self,
    size: usize,
  ) -> Result<Box<dyn Chunk>> {
    let page = page_size();

    if size == 0 || size > usize::MAX - (page - 1) {
      return Err(ArenaError::OutOfMemory { requested: size });
    }

    let len = crate::align_to!(size, page);

    let addr = unsafe {
      libc::mmap(
        std::ptr::null_mut(),
        len,
        libc::PROT_READ | libc::PROT_WRITE,
        libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
        -1,
        0,
      )
    };

    if addr == libc::MAP_FAILED {
      return Err(ArenaError::OutOfMemory { requested: size });
    }

    match NonNull::new(addr.cast::<u8>()) {
      Some(ptr) => Ok(Box::new(MmapChunk { ptr, len })),
      None => Err(ArenaError::OutOfMemory { requested: size }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn fill_and_check(chunk: &dyn Chunk) {
    unsafe {
      let base = chunk.base().as_ptr();
      std::ptr::write_bytes(base, 0xAB, chunk.len());
      assert_eq!(*base, 0xAB);
      assert_eq!(*base.add(chunk.len() - 1), 0xAB);
    }
  }

  #[test]
  fn test_heap_chunk() {
    let chunk = Heap.acquire(1000).unwrap();

    assert_eq!(chunk.len(), 1000);
    assert_eq!(chunk.base().as_ptr() as usize % MAX_ALIGN, 0);
    fill_and_check(&*chunk);
  }

  #[test]
  fn test_heap_rejects_impossible_sizes() {
    assert_eq!(
      Heap.acquire(0).err(),
      Some(ArenaError::OutOfMemory { requested: 0 })
    );
    assert_eq!(
      Heap.acquire(usize::MAX).err(),
      Some(ArenaError::OutOfMemory { requested: usize::MAX })
    );
  }

  #[cfg(unix)]
  #[test]
  fn test_mmap_chunk_is_page_rounded() {
    let page = page_size();
    let chunk = Mmap.acquire(page + 1).unwrap();

    assert_eq!(chunk.len(), 2 * page);
    assert_eq!(chunk.base().as_ptr() as usize % page, 0);
    fill_and_check(&*chunk);
  }

  #[cfg(unix)]
  #[test]
  fn test_mmap_rejects_impossible_sizes() {
    assert!(Mmap.acquire(0).is_err());
    assert!(Mmap.acquire(usize::MAX).is_err());
  }
}
