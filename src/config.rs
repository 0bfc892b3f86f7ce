//! Builder-style configuration for the indexer and the loader, mirroring
//! the crate's `CompressorConfig`/`DecompressorConfig` split.

use crate::codecs::CodecId;
use crate::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_CHILD_INDEXERS, DEFAULT_RESOURCES_FACTOR};

/// All configuration available to `create_index`.
///
/// Some fields, like `chunk_size`, affect the on-disk representation.
/// Others, like `max_child_indexers`, only affect build-time resource use.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct IndexerConfig {
  /// Number of postings per chunk. `0` means a single chunk holding the
  /// entire posting list (default `128`).
  pub chunk_size: usize,
  /// Codec candidates considered for the docs (d-gap) stream. An empty
  /// list falls back to `[VariableByte]`.
  pub docs_codec_candidates: Vec<CodecId>,
  /// Codec candidates considered for the freqs stream. `EliasFano` is
  /// ignored here even if present, since freqs are not monotonic. An empty
  /// list falls back to `[VariableByte]`.
  pub freqs_codec_candidates: Vec<CodecId>,
  /// Upper bound on concurrently running partial indexers (default `2`).
  pub max_child_indexers: usize,
  /// Tunes the in-memory budget of each partial indexer before it flushes
  /// a temp run; higher produces fewer, larger runs (default tuned for
  /// roughly 4 runs on a typical corpus).
  pub resources_factor: usize,
  /// If `false` and a sealed index already exists at the output directory,
  /// `create_index` returns `Status::AlreadyIndexed` without touching it.
  pub overwrite: bool,
  /// If `true`, a retry after a worker crash may reuse still-valid temp
  /// runs left behind by the previous attempt instead of re-reading the
  /// corpus from scratch.
  pub reuse_tmp: bool,
  /// Emit `encoder_docs_statistics.txt` / `encoder_freqs_statistics.txt`
  /// (only for streams whose candidate set has more than one entry).
  pub emit_statistics: bool,
}

impl Default for IndexerConfig {
  fn default() -> Self {
    Self {
      chunk_size: DEFAULT_CHUNK_SIZE,
      docs_codec_candidates: vec![CodecId::VariableByte],
      freqs_codec_candidates: vec![CodecId::VariableByte],
      max_child_indexers: DEFAULT_MAX_CHILD_INDEXERS,
      resources_factor: DEFAULT_RESOURCES_FACTOR,
      overwrite: false,
      reuse_tmp: false,
      emit_statistics: false,
    }
  }
}

impl IndexerConfig {
  /// Sets [`chunk_size`][IndexerConfig::chunk_size].
  pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
    self.chunk_size = chunk_size;
    self
  }

  /// Sets [`docs_codec_candidates`][IndexerConfig::docs_codec_candidates].
  pub fn with_docs_codec_candidates(mut self, candidates: Vec<CodecId>) -> Self {
    self.docs_codec_candidates = candidates;
    self
  }

  /// Sets [`freqs_codec_candidates`][IndexerConfig::freqs_codec_candidates].
  pub fn with_freqs_codec_candidates(mut self, candidates: Vec<CodecId>) -> Self {
    self.freqs_codec_candidates = candidates;
    self
  }

  /// Sets [`max_child_indexers`][IndexerConfig::max_child_indexers].
  pub fn with_max_child_indexers(mut self, n: usize) -> Self {
    self.max_child_indexers = n;
    self
  }

  /// Sets [`resources_factor`][IndexerConfig::resources_factor].
  pub fn with_resources_factor(mut self, factor: usize) -> Self {
    self.resources_factor = factor;
    self
  }

  /// Sets [`overwrite`][IndexerConfig::overwrite].
  pub fn with_overwrite(mut self, overwrite: bool) -> Self {
    self.overwrite = overwrite;
    self
  }

  /// Sets [`reuse_tmp`][IndexerConfig::reuse_tmp].
  pub fn with_reuse_tmp(mut self, reuse_tmp: bool) -> Self {
    self.reuse_tmp = reuse_tmp;
    self
  }

  /// Sets [`emit_statistics`][IndexerConfig::emit_statistics].
  pub fn with_emit_statistics(mut self, emit: bool) -> Self {
    self.emit_statistics = emit;
    self
  }

  /// Effective docs candidates, falling back to `VariableByte` if empty.
  pub(crate) fn effective_docs_candidates(&self) -> Vec<CodecId> {
    if self.docs_codec_candidates.is_empty() {
      vec![CodecId::VariableByte]
    } else {
      self.docs_codec_candidates.clone()
    }
  }

  /// Effective freqs candidates: falls back to `VariableByte` if empty,
  /// and Elias-Fano is always dropped since freqs aren't monotonic.
  pub(crate) fn effective_freqs_candidates(&self) -> Vec<CodecId> {
    let filtered: Vec<CodecId> = self
      .freqs_codec_candidates
      .iter()
      .copied()
      .filter(|&c| !c.requires_monotonic_input())
      .collect();
    if filtered.is_empty() {
      vec![CodecId::VariableByte]
    } else {
      filtered
    }
  }
}

/// Configuration for mounting a sealed index for querying.
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub struct LoaderConfig {
  /// If `true`, the entirety of `chunksinfo.bin` is read into memory once
  /// and term lookups are pointer-chases. If `false`, only `vocabulary.txt`
  /// is resident and each lookup performs a seek+read into `chunksinfo.bin`.
  pub chunks_info_in_memory: bool,
}

impl Default for LoaderConfig {
  fn default() -> Self {
    Self {
      chunks_info_in_memory: true,
    }
  }
}

impl LoaderConfig {
  /// Sets [`chunks_info_in_memory`][LoaderConfig::chunks_info_in_memory].
  pub fn with_chunks_info_in_memory(mut self, in_memory: bool) -> Self {
    self.chunks_info_in_memory = in_memory;
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_indexer_config_defaults() {
    let config = IndexerConfig::default();
    assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
    assert_eq!(config.docs_codec_candidates, vec![CodecId::VariableByte]);
    assert!(!config.overwrite);
  }

  #[test]
  fn test_effective_freqs_candidates_drops_elias_fano() {
    let config = IndexerConfig::default()
      .with_freqs_codec_candidates(vec![CodecId::EliasFano, CodecId::BitPacking]);
    assert_eq!(config.effective_freqs_candidates(), vec![CodecId::BitPacking]);
  }

  #[test]
  fn test_effective_freqs_candidates_falls_back_when_all_filtered() {
    let config = IndexerConfig::default().with_freqs_codec_candidates(vec![CodecId::EliasFano]);
    assert_eq!(config.effective_freqs_candidates(), vec![CodecId::VariableByte]);
  }

  #[test]
  fn test_builder_chains() {
    let config = IndexerConfig::default()
      .with_chunk_size(64)
      .with_max_child_indexers(4)
      .with_overwrite(true);
    assert_eq!(config.chunk_size, 64);
    assert_eq!(config.max_child_indexers, 4);
    assert!(config.overwrite);
  }
}
