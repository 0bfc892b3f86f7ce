//! A single partial-indexer worker: consumes a corpus slice (with doc-ids
//! already assigned by the driver), accumulates an in-memory
//! `term -> postings` map, and flushes sorted runs to temp files whenever
//! the memory budget is exceeded.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;

use crate::corpus::Document;
use crate::posting::Posting;
use crate::temp_run::{self, RunManifest};
use crate::errors::IxResult;

pub struct PartialIndexResult {
  pub manifests: Vec<RunManifest>,
  pub paths: Vec<PathBuf>,
}

/// Indexes `docs` (each already paired with its assigned doc-id), flushing
/// a run whenever the accumulated postings count exceeds
/// `resources_factor`, and once more at the end for whatever remains.
pub fn index_slice(
  docs: &[(u32, Document)],
  resources_factor: usize,
  temp_dir: &Path,
  run_prefix: &str,
) -> IxResult<PartialIndexResult> {
  let mut map: BTreeMap<Vec<u8>, Vec<Posting>> = BTreeMap::new();
  let mut total_postings = 0_usize;
  let mut run_idx = 0_usize;
  let mut paths = Vec::new();
  let mut manifests = Vec::new();
  let mut range_start: Option<u32> = None;
  let mut range_last = 0_u32;

  for (doc_id, doc) in docs {
    range_start.get_or_insert(*doc_id);
    range_last = *doc_id;

    let mut term_freqs: BTreeMap<&[u8], u32> = BTreeMap::new();
    for term in &doc.terms {
      *term_freqs.entry(term.as_slice()).or_insert(0) += 1;
    }
    for (term, tf) in term_freqs {
      map.entry(term.to_vec()).or_insert_with(Vec::new).push(Posting { doc_id: *doc_id, tf });
      total_postings += 1;
    }

    if total_postings >= resources_factor {
      let range = (range_start.unwrap(), range_last);
      let path = temp_dir.join(format!("{}-{}.run", run_prefix, run_idx));
      let terms: Vec<(Vec<u8>, Vec<Posting>)> = map.into_iter().collect();
      let manifest = temp_run::write_run(&path, &terms, range)?;
      debug!(
        "partial indexer {} flushed run {} with {} terms ({} bytes)",
        run_prefix, run_idx, manifest.term_count, manifest.byte_size
      );
      paths.push(path);
      manifests.push(manifest);
      run_idx += 1;
      map = BTreeMap::new();
      total_postings = 0;
      range_start = None;
    }
  }

  if !map.is_empty() {
    let range = (range_start.unwrap(), range_last);
    let path = temp_dir.join(format!("{}-{}.run", run_prefix, run_idx));
    let terms: Vec<(Vec<u8>, Vec<Posting>)> = map.into_iter().collect();
    let manifest = temp_run::write_run(&path, &terms, range)?;
    debug!(
      "partial indexer {} flushed final run {} with {} terms ({} bytes)",
      run_prefix, run_idx, manifest.term_count, manifest.byte_size
    );
    paths.push(path);
    manifests.push(manifest);
  }

  Ok(PartialIndexResult { manifests, paths })
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  fn doc(name: &str, terms: &[&str]) -> Document {
    Document {
      name: name.to_string(),
      terms: terms.iter().map(|t| t.as_bytes().to_vec()).collect(),
    }
  }

  #[test]
  fn test_single_run_when_budget_not_exceeded() {
    let docs = vec![
      (0_u32, doc("d0", &["a", "b", "a"])),
      (1_u32, doc("d1", &["b", "c"])),
    ];
    let dir = tempdir().unwrap();
    let result = index_slice(&docs, 1_000_000, dir.path(), "w0").unwrap();
    assert_eq!(result.manifests.len(), 1);
    let mut reader = temp_run::TempRunReader::open(&result.paths[0]).unwrap();
    let mut run = Vec::new();
    while let Some(term) = reader.next_term().unwrap() {
      run.push(term);
    }
    let terms: Vec<&[u8]> = run.iter().map(|(t, _)| t.as_slice()).collect();
    assert_eq!(terms, vec![b"a".as_slice(), b"b".as_slice(), b"c".as_slice()]);
    let a_postings = &run.iter().find(|(t, _)| t == b"a").unwrap().1;
    assert_eq!(a_postings, &vec![Posting { doc_id: 0, tf: 2 }]);
  }

  #[test]
  fn test_flushes_multiple_runs_when_budget_exceeded() {
    let docs = vec![
      (0_u32, doc("d0", &["a", "b"])),
      (1_u32, doc("d1", &["c", "d"])),
      (2_u32, doc("d2", &["e", "f"])),
    ];
    let dir = tempdir().unwrap();
    let result = index_slice(&docs, 2, dir.path(), "w1").unwrap();
    assert!(result.manifests.len() >= 2);
    let total_terms: usize = result.manifests.iter().map(|m| m.term_count).sum();
    assert_eq!(total_terms, 6);
  }
}
