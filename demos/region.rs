use std::mem;

use byteforge::Region;

#[repr(C, align(64))]
struct Buffer([u8; 1024]);

fn main() {
  // The region borrows this buffer; it never frees it.
  let mut buffer = Buffer([0; 1024]);
  let mut region = Region::new(&mut buffer.0);

  unsafe {
    // --------------------------------------------------------------------
    // 1) A couple of primitives with their natural alignment.
    // --------------------------------------------------------------------
    let a = region
      .allocate(mem::size_of::<i32>(), mem::align_of::<i32>())
      .expect("region has room for an i32")
      .cast::<i32>();
    let b = region
      .allocate(mem::size_of::<f64>(), mem::align_of::<f64>())
      .expect("region has room for an f64")
      .cast::<f64>();

    a.write(32);
    b.write(345.94);

    println!("[1] i32 at {:?} = {}", a, a.read());
    println!("[1] f64 at {:?} = {}", b, b.read());

    // --------------------------------------------------------------------
    // 2) Over-aligned block, e.g. for SIMD lanes.
    // --------------------------------------------------------------------
    let block = region.allocate(128, 64).expect("region has room for 128 bytes");
    println!(
      "[2] 128 bytes at {:?}, addr % 64 = {}",
      block,
      block.as_ptr() as usize % 64
    );
  }

  println!("used: {} / {}", region.used(), region.capacity());

  // ----------------------------------------------------------------------
  // 3) Reset rewinds the cursor. Everything above is now dead.
  // ----------------------------------------------------------------------
  region.reset();
  println!("[3] region has been reset, used: {} / {}", region.used(), region.capacity());

  let again = region.allocate(500, 32);
  println!("[3] 500 bytes after reset: {:?}", again);
  println!("used: {} / {}", region.used(), region.capacity());
}
