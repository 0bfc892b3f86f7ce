//! Streaming k-way merge over sorted temp runs. Each run contributes at
//! most one buffered `(term, postings)` record at a time, held by a
//! [`RunCursor`]; a min-heap keyed on `(term, run_index)` finds the next
//! term to seal without ever holding more than one record per run in
//! memory, so overall memory stays bounded in the number of runs rather
//! than the size of the index. Runs are passed in ascending doc-id-range
//! order by the driver, so when several runs tie on the minimum term their
//! postings are concatenated in ascending run-index order — already the
//! doc-id order — without needing to inspect the postings themselves.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::chunk::doc_gaps;
use crate::chunks_info;
use crate::config::IndexerConfig;
use crate::errors::{IxError, IxResult};
use crate::posting::{self, Posting};
use crate::stats::StatsCollector;
use crate::temp_run::TempRunReader;
use crate::vocabulary;

pub struct MergeSummary {
  pub term_count: usize,
}

/// One input run's read position: its reader plus whatever term record is
/// currently buffered (`None` once the run is exhausted).
struct RunCursor {
  reader: TempRunReader,
  current: Option<(Vec<u8>, Vec<Posting>)>,
}

impl RunCursor {
  fn open(path: &Path) -> IxResult<Self> {
    let mut reader = TempRunReader::open(path)?;
    let current = reader.next_term()?;
    Ok(RunCursor { reader, current })
  }

  fn advance(&mut self) -> IxResult<()> {
    self.current = self.reader.next_term()?;
    Ok(())
  }
}

pub fn merge_runs(run_paths: &[PathBuf], out_dir: &Path, config: &IndexerConfig) -> IxResult<MergeSummary> {
  info!("merge starting over {} temp runs", run_paths.len());

  let mut runs: Vec<RunCursor> = run_paths.iter().map(|p| RunCursor::open(p)).collect::<IxResult<_>>()?;
  let mut heap: BinaryHeap<Reverse<(Vec<u8>, usize)>> = BinaryHeap::new();
  for (idx, run) in runs.iter().enumerate() {
    if let Some((term, _)) = &run.current {
      heap.push(Reverse((term.clone(), idx)));
    }
  }

  let docs_candidates = config.effective_docs_candidates();
  let freqs_candidates = config.effective_freqs_candidates();

  let mut postings_bin = Vec::new();
  let mut chunksinfo_bin = Vec::new();
  let mut vocab_entries = Vec::new();
  let mut stats = StatsCollector::new(docs_candidates.len(), freqs_candidates.len());

  while let Some(Reverse((min_term, _))) = heap.peek().cloned() {
    // Pop every run tied on the minimum term.
    let mut contributing = Vec::new();
    while let Some(Reverse((term, idx))) = heap.peek().cloned() {
      if term != min_term {
        break;
      }
      heap.pop();
      contributing.push(idx);
    }
    contributing.sort_unstable();

    let mut postings = Vec::new();
    for idx in &contributing {
      let run = &mut runs[*idx];
      let (_, sub) = run.current.take().expect("heap entry implies a buffered record");
      postings.extend(sub);
      run.advance()?;
      if let Some((next_term, _)) = &run.current {
        heap.push(Reverse((next_term.clone(), *idx)));
      }
    }

    for w in postings.windows(2) {
      if w[1].doc_id <= w[0].doc_id {
        return Err(IxError::corruption(format!(
          "term {:?} has non-increasing doc-ids after merge",
          String::from_utf8_lossy(&min_term)
        )));
      }
    }

    let chunksinfo_offset = chunksinfo_bin.len() as u64;
    let skip_table = posting::assemble_term(&postings, config.chunk_size, &docs_candidates, &freqs_candidates, &mut postings_bin)?;
    debug!("term {:?} sealed into {} chunks", String::from_utf8_lossy(&min_term), skip_table.len());

    let effective_chunk_size = if config.chunk_size == 0 { postings.len() } else { config.chunk_size };
    for (group, entry) in postings.chunks(effective_chunk_size).zip(skip_table.iter()) {
      let gaps = doc_gaps(&group.iter().map(|p| p.doc_id).collect::<Vec<_>>());
      let freqs: Vec<u64> = group.iter().map(|p| p.tf as u64).collect();
      stats.record_docs(&min_term, entry.docs_codec, &gaps);
      stats.record_freqs(&min_term, entry.freqs_codec, &freqs);
    }

    chunks_info::write_term_block(&mut chunksinfo_bin, &skip_table);
    vocab_entries.push((min_term, chunksinfo_offset));
  }

  fs::write(out_dir.join("postings.bin"), &postings_bin)?;
  fs::write(out_dir.join("chunksinfo.bin"), &chunksinfo_bin)?;
  vocabulary::write_vocabulary(&out_dir.join("vocabulary.txt"), &vocab_entries)?;
  if config.emit_statistics {
    stats.flush(out_dir)?;
  }

  info!("merge finished: {} terms sealed", vocab_entries.len());
  Ok(MergeSummary {
    term_count: vocab_entries.len(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::codecs::CodecId;
  use tempfile::tempdir;

  #[test]
  fn test_merge_concatenates_disjoint_ranges_in_order() {
    let dir = tempdir().unwrap();
    let run_a = dir.path().join("a.run");
    let run_b = dir.path().join("b.run");
    crate::temp_run::write_run(
      &run_a,
      &[(b"common".to_vec(), vec![Posting { doc_id: 0, tf: 1 }, Posting { doc_id: 2, tf: 1 }])],
      (0, 2),
    )
    .unwrap();
    crate::temp_run::write_run(
      &run_b,
      &[(b"common".to_vec(), vec![Posting { doc_id: 5, tf: 2 }])],
      (3, 5),
    )
    .unwrap();

    let out_dir = tempdir().unwrap();
    let config = IndexerConfig::default().with_chunk_size(0).with_docs_codec_candidates(vec![CodecId::VariableByte]);
    let summary = merge_runs(&[run_a, run_b], out_dir.path(), &config).unwrap();
    assert_eq!(summary.term_count, 1);

    let vocab = vocabulary::load_vocabulary(&out_dir.path().join("vocabulary.txt")).unwrap();
    assert_eq!(vocab.len(), 1);
    assert_eq!(vocab[0].0, b"common".to_vec());

    let chunksinfo_bin = fs::read(out_dir.path().join("chunksinfo.bin")).unwrap();
    let mut pos = vocab[0].1 as usize;
    let skip_table = chunks_info::read_term_block(&chunksinfo_bin, &mut pos).unwrap();
    assert_eq!(skip_table.len(), 1);
    assert_eq!(skip_table[0].last_doc, 5);
  }

  #[test]
  fn test_merge_is_sorted_even_when_runs_arrive_out_of_range_order() {
    let dir = tempdir().unwrap();
    let run_b = dir.path().join("b.run");
    let run_a = dir.path().join("a.run");
    // Write the later-range run first to exercise the sort-by-first-doc-id step.
    crate::temp_run::write_run(&run_b, &[(b"t".to_vec(), vec![Posting { doc_id: 10, tf: 1 }])], (10, 10)).unwrap();
    crate::temp_run::write_run(&run_a, &[(b"t".to_vec(), vec![Posting { doc_id: 1, tf: 1 }])], (1, 1)).unwrap();

    let out_dir = tempdir().unwrap();
    let config = IndexerConfig::default().with_chunk_size(0);
    merge_runs(&[run_b, run_a], out_dir.path(), &config).unwrap();

    let postings_bin = fs::read(out_dir.path().join("postings.bin")).unwrap();
    let (_, doc_ids, _, _) = crate::chunk::read_chunk(&postings_bin).unwrap();
    assert_eq!(doc_ids, vec![1, 10]);
  }
}
