use std::time::Instant;

use byteforge::{Arena, MAX_ALIGN};
use tracing_subscriber::EnvFilter;

#[repr(C)]
struct BigPod {
  x: i32,
  y: f32,
  buf: [u8; 100],
}

impl BigPod {
  fn new(v: i32) -> Self {
    Self {
      x: v,
      y: v as f32 * 0.5,
      buf: [b'a'; 100],
    }
  }
}

fn main() -> byteforge::Result<()> {
  // RUST_LOG=byteforge=debug shows segment growth.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let mut arena = Arena::new(1024)?;
  println!("Arena started. Base alignment is: {MAX_ALIGN}");

  arena.allocate_bytes(100)?;
  arena.allocate_bytes(900)?;
  println!("Space used: {} / {}", arena.used(), arena.capacity());

  arena.reset();

  arena.allocate_bytes(100)?;
  arena.allocate_bytes(1025)?;
  println!(
    "Space used: {} / {} across {} segments",
    arena.used(),
    arena.capacity(),
    arena.segment_count()
  );

  // ----------------------------------------------------------------------
  // Frames of short-lived objects, reclaimed in one go per frame.
  // ----------------------------------------------------------------------
  const FRAMES: i32 = 50;
  const PER_FRAME: i32 = 20_000;

  let mut frames = Arena::new(64 * 1024 * 1024)?;
  let mut checksum = 0i64;

  let start = Instant::now();
  for _ in 0..FRAMES {
    for i in 0..PER_FRAME {
      let pod = frames.store(BigPod::new(i))?;
      checksum += i64::from(pod.x) + pod.y as i64 + i64::from(pod.buf[0]);
    }
    frames.reset();
  }
  let arena_elapsed = start.elapsed();

  let start = Instant::now();
  for _ in 0..FRAMES {
    for i in 0..PER_FRAME {
      let pod = Box::new(BigPod::new(i));
      checksum -= i64::from(pod.x) + pod.y as i64 + i64::from(pod.buf[0]);
    }
  }
  let box_elapsed = start.elapsed();

  println!("Arena BigPod:      {arena_elapsed:?}");
  println!("Box::new BigPod:   {box_elapsed:?}");
  println!("checksum (expect 0): {checksum}");

  Ok(())
}
