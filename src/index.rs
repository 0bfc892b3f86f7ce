//! The driver: ties doc-id allocation, bounded-parallel partial indexing,
//! merging, and query evaluation into the public `create_index` / `load` /
//! `browse` surface.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use rayon::prelude::*;

use crate::chunks_info::ChunksInfoSource;
use crate::config::{IndexerConfig, LoaderConfig};
use crate::corpus::{CorpusSource, Document};
use crate::cursor::PostingListCursor;
use crate::doc_table::DocTable;
use crate::errors::IxResult;
use crate::evaluator;
use crate::merger;
use crate::partial_index;
use crate::postings_store::PostingsStore;
use crate::vocabulary;

/// Outcome of [`create_index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
  /// A new sealed index was written to `out_dir`.
  Created,
  /// `out_dir` already held a sealed index and `config.overwrite` was
  /// `false`; nothing was touched.
  AlreadyIndexed,
}

/// A handle to a directory holding (or about to hold) a sealed index.
/// Carries no open file descriptors; [`IndexHandle::load`] is what actually
/// opens the sealed files for querying.
#[derive(Clone, Debug)]
pub struct IndexHandle {
  dir: PathBuf,
}

impl IndexHandle {
  pub fn new(dir: PathBuf) -> Self {
    IndexHandle { dir }
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  /// Mounts the sealed index at `self.dir()` for querying.
  pub fn load(&self, loader_config: LoaderConfig) -> IxResult<LoadedIndex> {
    let doc_table = DocTable::load(&self.dir.join("collection.txt"))?;
    let vocab = vocabulary::load_vocabulary(&self.dir.join("vocabulary.txt"))?;
    let chunksinfo_path = self.dir.join("chunksinfo.bin");
    let chunks_info = if loader_config.chunks_info_in_memory {
      ChunksInfoSource::InMemory(fs::read(&chunksinfo_path)?)
    } else {
      ChunksInfoSource::OnDisk(chunksinfo_path)
    };
    let postings = PostingsStore::open(&self.dir.join("postings.bin"));
    Ok(LoadedIndex {
      doc_table,
      vocab,
      chunks_info,
      postings,
    })
  }
}

fn sealed_files_exist(dir: &Path) -> bool {
  dir.join("vocabulary.txt").exists() && dir.join("chunksinfo.bin").exists() && dir.join("postings.bin").exists()
}

fn ceil_div(a: usize, b: usize) -> usize {
  if b == 0 {
    a
  } else {
    (a + b - 1) / b
  }
}

/// Drains `corpus`, assigns doc-ids in order of appearance, partitions the
/// assigned documents across up to `config.max_child_indexers` workers run
/// on a bounded `rayon` pool, merges their temp runs, and seals the four
/// index files into `out_dir`.
///
/// If `out_dir` already holds a sealed index and `config.overwrite` is
/// `false`, returns `Status::AlreadyIndexed` without reading the corpus or
/// touching any file.
pub fn create_index<C: CorpusSource>(out_dir: &Path, corpus: C, config: &IndexerConfig) -> IxResult<(IndexHandle, Status)> {
  if !config.overwrite && sealed_files_exist(out_dir) {
    info!("sealed index already present at {:?}, leaving it untouched", out_dir);
    return Ok((IndexHandle::new(out_dir.to_path_buf()), Status::AlreadyIndexed));
  }

  fs::create_dir_all(out_dir)?;
  let temp_dir = out_dir.join("tmp");
  fs::create_dir_all(&temp_dir)?;

  let mut doc_table = DocTable::new();
  let mut assigned: Vec<(u32, Document)> = Vec::new();
  for doc in corpus.documents() {
    let id = doc_table.allocate(doc.name.clone());
    assigned.push((id, doc));
  }
  info!("index build starting: {} documents", assigned.len());

  let worker_count = config.max_child_indexers.max(1);
  let run_paths = if assigned.is_empty() {
    Vec::new()
  } else {
    let slice_len = ceil_div(assigned.len(), worker_count).max(1);
    let slices: Vec<&[(u32, Document)]> = assigned.chunks(slice_len).collect();

    let pool = rayon::ThreadPoolBuilder::new()
      .num_threads(worker_count)
      .build()
      .map_err(|e| crate::errors::IxError::precondition(e.to_string()))?;

    let results: Vec<IxResult<partial_index::PartialIndexResult>> = pool.install(|| {
      slices
        .par_iter()
        .copied()
        .enumerate()
        .map(|(i, slice)| {
          info!("worker {} assigned {} documents", i, slice.len());
          partial_index::index_slice(slice, config.resources_factor, &temp_dir, &format!("worker{}", i))
        })
        .collect()
    });

    let mut paths = Vec::new();
    for r in results {
      paths.extend(r?.paths);
    }
    paths
  };

  let summary = merger::merge_runs(&run_paths, out_dir, config)?;
  doc_table.write(&out_dir.join("collection.txt"))?;
  let _ = fs::remove_dir_all(&temp_dir);

  info!("index build finished: {} terms sealed", summary.term_count);
  Ok((IndexHandle::new(out_dir.to_path_buf()), Status::Created))
}

/// A mounted sealed index, ready for boolean-AND queries.
pub struct LoadedIndex {
  doc_table: DocTable,
  vocab: Vec<(Vec<u8>, u64)>,
  chunks_info: ChunksInfoSource,
  postings: PostingsStore,
}

impl LoadedIndex {
  pub fn doc_count(&self) -> usize {
    self.doc_table.len()
  }

  pub fn doc_name(&self, doc_id: u32) -> Option<&str> {
    self.doc_table.name(doc_id)
  }

  /// Intersects the posting lists of `query_terms`. A term absent from the
  /// vocabulary resolves the whole query to an empty result, matching a
  /// conjunctive query where one clause can never match.
  pub fn browse(&self, query_terms: &[Vec<u8>]) -> IxResult<Vec<u32>> {
    let mut skip_tables = Vec::with_capacity(query_terms.len());
    for term in query_terms {
      let offset = match vocabulary::find_term(&self.vocab, term) {
        Some(offset) => offset,
        None => return Ok(Vec::new()),
      };
      skip_tables.push(self.chunks_info.read_block(offset)?);
    }
    let cursors: Vec<PostingListCursor<'_>> = skip_tables.iter().map(|st| PostingListCursor::new(st, &self.postings)).collect();
    evaluator::intersect(cursors)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::codecs::CodecId;
  use crate::corpus::VecCorpus;
  use tempfile::tempdir;

  fn doc(name: &str, terms: &[&str]) -> Document {
    Document {
      name: name.to_string(),
      terms: terms.iter().map(|t| t.as_bytes().to_vec()).collect(),
    }
  }

  #[test]
  fn test_create_index_then_browse_single_term() {
    let corpus = VecCorpus::new(vec![
      doc("d0", &["apple", "banana"]),
      doc("d1", &["banana", "cherry"]),
      doc("d2", &["apple", "cherry"]),
    ]);
    let dir = tempdir().unwrap();
    let config = IndexerConfig::default().with_max_child_indexers(1);
    let (handle, status) = create_index(dir.path(), corpus, &config).unwrap();
    assert_eq!(status, Status::Created);

    let loaded = handle.load(LoaderConfig::default()).unwrap();
    assert_eq!(loaded.doc_count(), 3);
    assert_eq!(loaded.doc_name(1), Some("d1"));

    let result = loaded.browse(&[b"banana".to_vec()]).unwrap();
    assert_eq!(result, vec![0, 1]);
  }

  #[test]
  fn test_browse_conjunctive_intersection() {
    let corpus = VecCorpus::new(vec![
      doc("d0", &["apple", "banana"]),
      doc("d1", &["banana", "cherry"]),
      doc("d2", &["apple", "banana", "cherry"]),
    ]);
    let dir = tempdir().unwrap();
    let config = IndexerConfig::default().with_max_child_indexers(2);
    let (handle, _) = create_index(dir.path(), corpus, &config).unwrap();
    let loaded = handle.load(LoaderConfig::default()).unwrap();

    let result = loaded.browse(&[b"apple".to_vec(), b"banana".to_vec()]).unwrap();
    assert_eq!(result, vec![0, 2]);
  }

  #[test]
  fn test_browse_missing_term_yields_empty_result() {
    let corpus = VecCorpus::new(vec![doc("d0", &["apple"])]);
    let dir = tempdir().unwrap();
    let (handle, _) = create_index(dir.path(), corpus, &IndexerConfig::default()).unwrap();
    let loaded = handle.load(LoaderConfig::default()).unwrap();
    assert_eq!(loaded.browse(&[b"missing".to_vec()]).unwrap(), Vec::<u32>::new());
  }

  #[test]
  fn test_overwrite_gate_leaves_existing_index_untouched() {
    let corpus = VecCorpus::new(vec![doc("d0", &["apple"])]);
    let dir = tempdir().unwrap();
    let config = IndexerConfig::default();
    let (_, status) = create_index(dir.path(), corpus, &config).unwrap();
    assert_eq!(status, Status::Created);

    let vocab_path = dir.path().join("vocabulary.txt");
    let before = fs::metadata(&vocab_path).unwrap().modified().unwrap();

    let second_corpus = VecCorpus::new(vec![doc("other", &["pear"])]);
    let (_, status2) = create_index(dir.path(), second_corpus, &config).unwrap();
    assert_eq!(status2, Status::AlreadyIndexed);

    let after = fs::metadata(&vocab_path).unwrap().modified().unwrap();
    assert_eq!(before, after);
    let vocab = vocabulary::load_vocabulary(&vocab_path).unwrap();
    assert_eq!(vocab.len(), 1);
    assert_eq!(vocab[0].0, b"apple".to_vec());
  }

  #[test]
  fn test_overwrite_true_replaces_existing_index() {
    let corpus = VecCorpus::new(vec![doc("d0", &["apple"])]);
    let dir = tempdir().unwrap();
    create_index(dir.path(), corpus, &IndexerConfig::default()).unwrap();

    let second_corpus = VecCorpus::new(vec![doc("other", &["pear"])]);
    let config = IndexerConfig::default().with_overwrite(true);
    let (handle, status) = create_index(dir.path(), second_corpus, &config).unwrap();
    assert_eq!(status, Status::Created);

    let loaded = handle.load(LoaderConfig::default()).unwrap();
    assert_eq!(loaded.browse(&[b"apple".to_vec()]).unwrap(), Vec::<u32>::new());
    assert_eq!(loaded.browse(&[b"pear".to_vec()]).unwrap(), vec![0]);
  }

  #[test]
  fn test_empty_corpus_seals_an_empty_index() {
    let corpus = VecCorpus::new(vec![]);
    let dir = tempdir().unwrap();
    let (handle, status) = create_index(dir.path(), corpus, &IndexerConfig::default()).unwrap();
    assert_eq!(status, Status::Created);
    let loaded = handle.load(LoaderConfig::default()).unwrap();
    assert_eq!(loaded.doc_count(), 0);
    assert_eq!(loaded.browse(&[b"anything".to_vec()]).unwrap(), Vec::<u32>::new());
  }

  #[test]
  fn test_loader_config_on_disk_chunks_info_agrees_with_in_memory() {
    let corpus = VecCorpus::new(vec![doc("d0", &["apple", "banana"]), doc("d1", &["banana"])]);
    let dir = tempdir().unwrap();
    let (handle, _) = create_index(dir.path(), corpus, &IndexerConfig::default()).unwrap();

    let in_memory = handle.load(LoaderConfig::default().with_chunks_info_in_memory(true)).unwrap();
    let on_disk = handle.load(LoaderConfig::default().with_chunks_info_in_memory(false)).unwrap();

    assert_eq!(
      in_memory.browse(&[b"banana".to_vec()]).unwrap(),
      on_disk.browse(&[b"banana".to_vec()]).unwrap()
    );
  }

  #[test]
  fn test_codec_candidates_roundtrip_through_create_and_load() {
    let docs: Vec<Document> = (0..50)
      .map(|i| doc(&format!("d{}", i), &["term"]))
      .collect();
    let corpus = VecCorpus::new(docs);
    let dir = tempdir().unwrap();
    let config = IndexerConfig::default()
      .with_chunk_size(8)
      .with_docs_codec_candidates(vec![CodecId::VariableByte, CodecId::BitPacking, CodecId::Gamma])
      .with_max_child_indexers(1);
    let (handle, _) = create_index(dir.path(), corpus, &config).unwrap();
    let loaded = handle.load(LoaderConfig::default()).unwrap();
    let result = loaded.browse(&[b"term".to_vec()]).unwrap();
    assert_eq!(result, (0..50).collect::<Vec<u32>>());
  }
}
