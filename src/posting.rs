//! A single `(doc_id, tf)` pair and the assembler that splits a term's
//! full posting list into chunks, writing each through [`crate::chunk`] and
//! recording a skip table entry per chunk.

use crate::chunk::{self, ChunkHeader};
use crate::codecs::CodecId;
use crate::errors::{IxError, IxResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Posting {
  pub doc_id: u32,
  pub tf: u32,
}

/// One skip-table entry: the last doc-id covered by a chunk and the
/// absolute byte offset in `postings.bin` at which that chunk begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkipEntry {
  pub last_doc: u32,
  pub postings_offset: u64,
  pub docs_codec: CodecId,
  pub freqs_codec: CodecId,
}

/// Splits `postings` into chunks of `chunk_size` (`0` meaning a single
/// chunk for the whole list), appends each chunk's encoded bytes to
/// `postings_out`, and returns the resulting skip table.
pub fn assemble_term(
  postings: &[Posting],
  chunk_size: usize,
  docs_candidates: &[CodecId],
  freqs_candidates: &[CodecId],
  postings_out: &mut Vec<u8>,
) -> IxResult<Vec<SkipEntry>> {
  if postings.is_empty() {
    return Err(IxError::precondition("cannot assemble an empty posting list"));
  }
  for w in postings.windows(2) {
    if w[1].doc_id <= w[0].doc_id {
      return Err(IxError::corruption("posting list must be strictly increasing by doc_id"));
    }
  }

  let effective_chunk_size = if chunk_size == 0 { postings.len() } else { chunk_size };

  let mut skip_table = Vec::new();
  for group in postings.chunks(effective_chunk_size) {
    let offset = postings_out.len() as u64;
    let (header, bytes): (ChunkHeader, Vec<u8>) = chunk::write_chunk(group, docs_candidates, freqs_candidates)?;
    postings_out.extend(bytes);
    skip_table.push(SkipEntry {
      last_doc: header.last_doc,
      postings_offset: offset,
      docs_codec: header.docs_codec,
      freqs_codec: header.freqs_codec,
    });
  }
  Ok(skip_table)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn postings(ids: &[u32]) -> Vec<Posting> {
    ids.iter().map(|&doc_id| Posting { doc_id, tf: 1 }).collect()
  }

  #[test]
  fn test_single_chunk_when_size_zero() {
    let p = postings(&[1, 2, 3, 100]);
    let mut out = Vec::new();
    let skip_table = assemble_term(&p, 0, &[CodecId::VariableByte], &[CodecId::VariableByte], &mut out).unwrap();
    assert_eq!(skip_table.len(), 1);
    assert_eq!(skip_table[0].last_doc, 100);
    assert_eq!(skip_table[0].postings_offset, 0);
  }

  #[test]
  fn test_multiple_chunks_have_increasing_offsets_and_last_docs() {
    let p = postings(&(1..=10).collect::<Vec<u32>>());
    let mut out = Vec::new();
    let skip_table = assemble_term(&p, 3, &[CodecId::VariableByte], &[CodecId::VariableByte], &mut out).unwrap();
    assert_eq!(skip_table.len(), 4); // 3,3,3,1
    for w in skip_table.windows(2) {
      assert!(w[1].last_doc > w[0].last_doc);
      assert!(w[1].postings_offset > w[0].postings_offset);
    }
    assert_eq!(skip_table.last().unwrap().last_doc, 10);
  }

  #[test]
  fn test_rejects_non_increasing_list() {
    let p = postings(&[1, 1]);
    let mut out = Vec::new();
    assert!(assemble_term(&p, 0, &[CodecId::VariableByte], &[CodecId::VariableByte], &mut out).is_err());
  }
}
