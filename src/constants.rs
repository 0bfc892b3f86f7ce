/// Default number of postings per chunk when the caller does not override
/// it. 0 (single chunk for the whole list) is a legal override, not this
/// default.
pub const DEFAULT_CHUNK_SIZE: usize = 128;

/// Default bound on concurrently running partial indexers.
pub const DEFAULT_MAX_CHILD_INDEXERS: usize = 2;

/// Default partial-index memory budget, expressed as the number of
/// postings a worker accumulates before flushing a temp run. Tuned so a
/// typical corpus slice produces on the order of 4 runs.
pub const DEFAULT_RESOURCES_FACTOR: usize = 1 << 16;

/// Fraction (out of 100) of values that must fit in PForDelta's base
/// bit-width before the remainder are treated as exceptions.
pub const PFOR_COVERAGE_PERCENT: usize = 90;

pub const TEMP_RUN_MAGIC: [u8; 4] = [105, 120, 116, 114]; // ascii "ixtr"

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_pfor_coverage_is_a_percentage() {
    assert!(PFOR_COVERAGE_PERCENT > 0 && PFOR_COVERAGE_PERCENT <= 100);
  }

  #[test]
  fn test_default_chunk_size_is_reasonable() {
    assert!(DEFAULT_CHUNK_SIZE > 0);
  }
}
