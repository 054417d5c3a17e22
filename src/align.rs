/// Largest fundamental alignment on the platforms we target (the equivalent of
/// C's `max_align_t`). Heap-backed segments start on this boundary.
pub const MAX_ALIGN: usize = 16;

/// Rounds `value` up to the next multiple of `alignment`.
///
/// `alignment` must be a nonzero power of two; the result is meaningless
/// otherwise. Callers that accept user alignments check this first with
/// [`is_valid_alignment`].
///
/// # Examples
///
/// ```rust
/// use byteforge::align_to;
///
/// assert_eq!(align_to!(13usize, 8), 16);
/// assert_eq!(align_to!(16usize, 8), 16);
/// assert_eq!(align_to!(0usize, 64), 0);
/// ```
#[macro_export]
macro_rules! align_to {
  ($value:expr, $alignment:expr) => {
    ($value + ($alignment - 1)) & !($alignment - 1)
  };
}

/// Same as [`align_to!`] but returns `None` instead of wrapping when the
/// rounded value does not fit in a `usize`.
#[inline(always)]
pub fn checked_align_up(
  value: usize,
  alignment: usize,
) -> Option<usize> {
  value
    .checked_add(alignment - 1)
    .map(|v| v & !(alignment - 1))
}

/// Whether `alignment` is usable for an allocation request.
#[inline(always)]
pub const fn is_valid_alignment(alignment: usize) -> bool {
  alignment != 0 && alignment.is_power_of_two()
}
