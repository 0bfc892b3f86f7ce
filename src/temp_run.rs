//! The on-disk format for a partial indexer's sorted run: a magic header,
//! a term count, then that many `[term_len:varint][term][posting_count:varint]
//! (posting_count * [doc_id:varint][tf:varint])` records in ascending term
//! order. Lightly compressed (varints, no codec selection) — adequate for
//! merge streaming, not for the sealed index itself.
//!
//! [`TempRunReader`] reads one term record at a time so the merger never
//! holds more than one run's current record in memory.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use crate::constants::TEMP_RUN_MAGIC;
use crate::errors::{IxError, IxResult};
use crate::posting::Posting;
use crate::varint::{read_uvarint_from, write_uvarint};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunManifest {
  pub term_count: usize,
  pub byte_size: usize,
  pub doc_id_range: (u32, u32),
}

/// `terms` must already be in ascending order (callers build this from a
/// `BTreeMap`, whose iteration order guarantees it).
pub fn write_run(path: &Path, terms: &[(Vec<u8>, Vec<Posting>)], doc_id_range: (u32, u32)) -> IxResult<RunManifest> {
  let mut out = Vec::new();
  out.extend(&TEMP_RUN_MAGIC);
  write_uvarint(&mut out, terms.len() as u64);
  for (term, postings) in terms {
    write_uvarint(&mut out, term.len() as u64);
    out.extend(term);
    write_uvarint(&mut out, postings.len() as u64);
    for p in postings {
      write_uvarint(&mut out, p.doc_id as u64);
      write_uvarint(&mut out, p.tf as u64);
    }
  }
  fs::write(path, &out)?;
  Ok(RunManifest {
    term_count: terms.len(),
    byte_size: out.len(),
    doc_id_range,
  })
}

/// Streams a run's term records one at a time, validating the magic header
/// and term count up front but never materializing the whole run.
pub struct TempRunReader {
  reader: BufReader<File>,
  term_count: usize,
  terms_read: usize,
}

impl TempRunReader {
  /// Opens `path` and validates its magic header and term count. A missing
  /// magic header is an `IntegrityError` — the merger's signal that a
  /// worker crashed mid-write.
  pub fn open(path: &Path) -> IxResult<Self> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut magic = [0_u8; 4];
    reader
      .read_exact(&mut magic)
      .map_err(|_| IxError::corruption(format!("temp run {} missing or has a corrupt magic header", path.display())))?;
    if magic != TEMP_RUN_MAGIC {
      return Err(IxError::corruption(format!(
        "temp run {} missing or has a corrupt magic header",
        path.display()
      )));
    }
    let term_count = read_uvarint_from(&mut reader)? as usize;
    Ok(TempRunReader {
      reader,
      term_count,
      terms_read: 0,
    })
  }

  pub fn term_count(&self) -> usize {
    self.term_count
  }

  /// Reads the next term record, or `None` once every declared term has
  /// been consumed.
  pub fn next_term(&mut self) -> IxResult<Option<(Vec<u8>, Vec<Posting>)>> {
    if self.terms_read >= self.term_count {
      return Ok(None);
    }
    let term_len = read_uvarint_from(&mut self.reader)? as usize;
    let mut term = vec![0_u8; term_len];
    self
      .reader
      .read_exact(&mut term)
      .map_err(|_| IxError::truncated("temp_run term bytes", term_len, 0))?;
    let posting_count = read_uvarint_from(&mut self.reader)? as usize;
    let mut postings = Vec::with_capacity(posting_count);
    for _ in 0..posting_count {
      let doc_id = read_uvarint_from(&mut self.reader)? as u32;
      let tf = read_uvarint_from(&mut self.reader)? as u32;
      postings.push(Posting { doc_id, tf });
    }
    self.terms_read += 1;
    Ok(Some((term, postings)))
  }
}
