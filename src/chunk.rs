//! Serializes and deserializes a single chunk: `[posting_count:varint]
//! [first_doc:varint][last_doc:varint][docs_codec:u8][freqs_codec:u8]
//! [docs_bytes_len:varint][freqs_bytes_len:varint][docs_payload][freqs_payload]`.
//!
//! Codec selection (§4.1) runs independently per stream: each candidate's
//! `bit_length` is evaluated against the transformed sequence that codec
//! would actually encode (absolute doc-ids instead of gaps for Elias-Fano,
//! `+1`-shifted for the positive-only codecs), and the minimum wins, ties
//! broken by the fixed precedence order baked into `codecs::select_codec`.

use crate::codecs::{self, CodecId};
use crate::errors::{IxError, IxResult};
use crate::posting::Posting;
use crate::varint::{read_uvarint, uvarint_len, write_uvarint};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkHeader {
  pub posting_count: u32,
  pub first_doc: u32,
  pub last_doc: u32,
  pub docs_codec: CodecId,
  pub freqs_codec: CodecId,
}

pub(crate) fn doc_gaps(doc_ids: &[u32]) -> Vec<u64> {
  let mut gaps = Vec::with_capacity(doc_ids.len());
  let mut prev = 0_u64;
  for (i, &d) in doc_ids.iter().enumerate() {
    let d = d as u64;
    gaps.push(if i == 0 { d } else { d - prev });
    prev = d;
  }
  gaps
}

fn shift_up(values: &[u64]) -> Vec<u64> {
  values.iter().map(|&v| v + 1).collect()
}

fn shift_down(values: Vec<u64>) -> Vec<u64> {
  values.into_iter().map(|v| v - 1).collect()
}

/// Picks the best docs codec and returns `(codec, the exact sequence it
/// will encode)`.
fn select_docs_codec(candidates: &[CodecId], gaps: &[u64], doc_ids_abs: &[u64]) -> IxResult<(CodecId, Vec<u64>)> {
  let mut best: Option<(usize, CodecId, Vec<u64>)> = None;
  for &id in candidates {
    let base = if id.requires_monotonic_input() { doc_ids_abs } else { gaps };
    let values = if id.requires_positive_input() {
      shift_up(base)
    } else {
      base.to_vec()
    };
    let bits = codecs::bit_length(id, &values);
    let better = match &best {
      None => true,
      Some((best_bits, best_id, _)) => {
        (bits, id.precedence_rank()) < (*best_bits, (*best_id).precedence_rank())
      }
    };
    if better {
      best = Some((bits, id, values));
    }
  }
  best
    .map(|(_, id, values)| (id, values))
    .ok_or_else(|| IxError::precondition("docs codec candidate set must not be empty"))
}

fn select_freqs_codec(candidates: &[CodecId], freqs: &[u64]) -> IxResult<(CodecId, Vec<u64>)> {
  let mut best: Option<(usize, CodecId, Vec<u64>)> = None;
  for &id in candidates {
    if id.requires_monotonic_input() {
      continue;
    }
    let values = if id.requires_positive_input() {
      shift_up(freqs)
    } else {
      freqs.to_vec()
    };
    let bits = codecs::bit_length(id, &values);
    let better = match &best {
      None => true,
      Some((best_bits, best_id, _)) => (bits, id.precedence_rank()) < (*best_bits, (*best_id).precedence_rank()),
    };
    if better {
      best = Some((bits, id, values));
    }
  }
  best
    .map(|(_, id, values)| (id, values))
    .ok_or_else(|| IxError::precondition("freqs codec candidate set must not be empty"))
}

pub fn write_chunk(
  postings: &[Posting],
  docs_candidates: &[CodecId],
  freqs_candidates: &[CodecId],
) -> IxResult<(ChunkHeader, Vec<u8>)> {
  if postings.is_empty() {
    return Err(IxError::precondition("cannot write an empty chunk"));
  }
  for w in postings.windows(2) {
    if w[1].doc_id <= w[0].doc_id {
      return Err(IxError::corruption("postings within a chunk must be strictly increasing by doc_id"));
    }
  }

  let doc_ids: Vec<u64> = postings.iter().map(|p| p.doc_id as u64).collect();
  let freqs: Vec<u64> = postings.iter().map(|p| p.tf as u64).collect();
  let gaps = doc_gaps(&postings.iter().map(|p| p.doc_id).collect::<Vec<_>>());

  let (docs_codec, docs_values) = select_docs_codec(docs_candidates, &gaps, &doc_ids)?;
  let (freqs_codec, freqs_values) = select_freqs_codec(freqs_candidates, &freqs)?;

  let docs_payload = codecs::encode(docs_codec, &docs_values)?;
  let freqs_payload = codecs::encode(freqs_codec, &freqs_values)?;

  let header = ChunkHeader {
    posting_count: postings.len() as u32,
    first_doc: postings[0].doc_id,
    last_doc: postings[postings.len() - 1].doc_id,
    docs_codec,
    freqs_codec,
  };

  let mut out = Vec::with_capacity(32 + docs_payload.len() + freqs_payload.len());
  write_uvarint(&mut out, header.posting_count as u64);
  write_uvarint(&mut out, header.first_doc as u64);
  write_uvarint(&mut out, header.last_doc as u64);
  out.push(docs_codec.to_byte());
  out.push(freqs_codec.to_byte());
  write_uvarint(&mut out, docs_payload.len() as u64);
  write_uvarint(&mut out, freqs_payload.len() as u64);
  out.extend(docs_payload);
  out.extend(freqs_payload);

  Ok((header, out))
}

/// Decodes a chunk starting at `bytes[0]`. Returns the header, the parallel
/// `(doc_ids, freqs)` arrays, and the number of bytes consumed so the
/// caller can advance to the next chunk record.
pub fn read_chunk(bytes: &[u8]) -> IxResult<(ChunkHeader, Vec<u32>, Vec<u32>, usize)> {
  let mut pos = 0;
  let posting_count = read_uvarint(bytes, &mut pos)? as u32;
  let first_doc = read_uvarint(bytes, &mut pos)? as u32;
  let last_doc = read_uvarint(bytes, &mut pos)? as u32;
  let docs_codec = CodecId::from_byte(*bytes.get(pos).ok_or_else(|| IxError::truncated("read_chunk docs_codec", 1, 0))?)?;
  pos += 1;
  let freqs_codec = CodecId::from_byte(*bytes.get(pos).ok_or_else(|| IxError::truncated("read_chunk freqs_codec", 1, 0))?)?;
  pos += 1;
  let docs_len = read_uvarint(bytes, &mut pos)? as usize;
  let freqs_len = read_uvarint(bytes, &mut pos)? as usize;

  let docs_start = pos;
  let docs_end = docs_start + docs_len;
  let freqs_end = docs_end + freqs_len;
  let docs_bytes = bytes.get(docs_start..docs_end).ok_or_else(|| {
    IxError::truncated("read_chunk docs payload", docs_len, bytes.len().saturating_sub(docs_start))
  })?;
  let freqs_bytes = bytes.get(docs_end..freqs_end).ok_or_else(|| {
    IxError::truncated("read_chunk freqs payload", freqs_len, bytes.len().saturating_sub(docs_end))
  })?;

  let n = posting_count as usize;
  let docs_values = codecs::decode(docs_codec, docs_bytes, n)?;
  let freqs_values = codecs::decode(freqs_codec, freqs_bytes, n)?;

  let docs_values = if docs_codec.requires_positive_input() {
    shift_down(docs_values)
  } else {
    docs_values
  };
  let freqs_values = if freqs_codec.requires_positive_input() {
    shift_down(freqs_values)
  } else {
    freqs_values
  };

  let doc_ids: Vec<u32> = if docs_codec.requires_monotonic_input() {
    docs_values.into_iter().map(|v| v as u32).collect()
  } else {
    let mut acc = 0_u64;
    let mut res = Vec::with_capacity(n);
    for (i, v) in docs_values.into_iter().enumerate() {
      acc = if i == 0 { v } else { acc + v };
      res.push(acc as u32);
    }
    res
  };
  let freqs: Vec<u32> = freqs_values.into_iter().map(|v| v as u32).collect();

  if doc_ids.len() != n || freqs.len() != n {
    return Err(IxError::corruption("decoded chunk stream length mismatch"));
  }
  if doc_ids.first().copied() != Some(first_doc) || doc_ids.last().copied() != Some(last_doc) {
    return Err(IxError::corruption("decoded chunk boundary doc-ids do not match header"));
  }

  let header = ChunkHeader {
    posting_count,
    first_doc,
    last_doc,
    docs_codec,
    freqs_codec,
  };
  Ok((header, doc_ids, freqs, freqs_end))
}

/// Byte length a freshly-written header's fixed-size-ish fields occupy,
/// used only for capacity hints; not part of the wire contract.
pub(crate) fn header_hint_len(posting_count: u32, first_doc: u32, last_doc: u32) -> usize {
  uvarint_len(posting_count as u64) + uvarint_len(first_doc as u64) + uvarint_len(last_doc as u64) + 2
}

#[cfg(test)]
mod tests {
  use super::*;

  fn postings(pairs: &[(u32, u32)]) -> Vec<Posting> {
    pairs.iter().map(|&(doc_id, tf)| Posting { doc_id, tf }).collect()
  }

  #[test]
  fn test_roundtrip_default_variable_byte() {
    let p = postings(&[(3, 1), (7, 2), (100, 1)]);
    let (header, bytes) = write_chunk(&p, &[CodecId::VariableByte], &[CodecId::VariableByte]).unwrap();
    let (read_header, doc_ids, freqs, consumed) = read_chunk(&bytes).unwrap();
    assert_eq!(header, read_header);
    assert_eq!(doc_ids, vec![3, 7, 100]);
    assert_eq!(freqs, vec![1, 2, 1]);
    assert_eq!(consumed, bytes.len());
  }

  #[test]
  fn test_first_doc_zero_roundtrips_through_positive_only_codecs() {
    let p = postings(&[(0, 1), (1, 1), (2, 1)]);
    let (_, bytes) = write_chunk(&p, &[CodecId::Gamma], &[CodecId::Gamma]).unwrap();
    let (_, doc_ids, freqs, _) = read_chunk(&bytes).unwrap();
    assert_eq!(doc_ids, vec![0, 1, 2]);
    assert_eq!(freqs, vec![1, 1, 1]);
  }

  #[test]
  fn test_elias_fano_docs_codec_uses_absolute_ids() {
    let doc_ids: Vec<u32> = (0..64).collect();
    let p: Vec<Posting> = doc_ids.iter().map(|&d| Posting { doc_id: d, tf: 1 }).collect();
    let (header, bytes) = write_chunk(&p, &[CodecId::EliasFano], &[CodecId::VariableByte]).unwrap();
    assert_eq!(header.docs_codec, CodecId::EliasFano);
    let (_, decoded_ids, _, _) = read_chunk(&bytes).unwrap();
    assert_eq!(decoded_ids, doc_ids);
  }

  #[test]
  fn test_selection_minimizes_bit_length() {
    // Uniform small gaps: BitPacking should beat VariableByte in bits.
    let doc_ids: Vec<u32> = (0..40).map(|i| i * 2).collect();
    let p: Vec<Posting> = doc_ids.iter().map(|&d| Posting { doc_id: d, tf: 1 }).collect();
    let (header, _) = write_chunk(&p, &[CodecId::VariableByte, CodecId::BitPacking], &[CodecId::VariableByte]).unwrap();
    assert_eq!(header.docs_codec, CodecId::BitPacking);
  }

  #[test]
  fn test_rejects_non_increasing_doc_ids() {
    let p = postings(&[(3, 1), (3, 1)]);
    assert!(write_chunk(&p, &[CodecId::VariableByte], &[CodecId::VariableByte]).is_err());
  }

  #[test]
  fn test_rejects_empty_chunk() {
    assert!(write_chunk(&[], &[CodecId::VariableByte], &[CodecId::VariableByte]).is_err());
  }

  #[test]
  fn test_header_hint_len_is_positive() {
    assert!(header_hint_len(5, 1, 100) > 0);
  }
}
