use crate::error::{ArenaError, Result};

/// Segment size used when none is configured.
pub const DEFAULT_SEGMENT_SIZE: usize = 64 * 1024;

/// Arena construction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaConfig {
  /// Capacity of the first segment and the minimum capacity of every segment
  /// added on growth.
  pub segment_size: usize,
}

impl Default for ArenaConfig {
  fn default() -> Self {
    Self {
      segment_size: DEFAULT_SEGMENT_SIZE,
    }
  }
}

impl ArenaConfig {
  pub fn with_segment_size(
    mut self,
    segment_size: usize,
  ) -> Self {
    self.segment_size = segment_size;
    self
  }

  /// # Errors
  ///
  /// [`ArenaError::InvalidSegmentSize`] for a zero segment size.
  pub fn validate(&self) -> Result<()> {
    if self.segment_size == 0 {
      return Err(ArenaError::InvalidSegmentSize);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_config() {
    let config = ArenaConfig::default();
    assert_eq!(config.segment_size, DEFAULT_SEGMENT_SIZE);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_zero_segment_size_is_rejected() {
    let config = ArenaConfig::default().with_segment_size(0);
    assert_eq!(config.validate(), Err(ArenaError::InvalidSegmentSize));
  }
}
