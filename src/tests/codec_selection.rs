//! Scenario: documents dominated by small gaps should drive codec selection
//! toward whichever candidate is truly cheapest in bits, not merely
//! whichever sorts first.

use crate::chunk;
use crate::codecs::{self, CodecId};
use crate::posting::Posting;

#[test]
fn test_docs_codec_selection_matches_minimum_bit_length() {
  let doc_ids: Vec<u32> = (0..10_000).collect();
  let postings: Vec<Posting> = doc_ids.iter().map(|&d| Posting { doc_id: d, tf: 1 }).collect();
  let candidates = [CodecId::VariableByte, CodecId::BitPacking, CodecId::EliasFano];

  let (header, _) = chunk::write_chunk(&postings, &candidates, &[CodecId::VariableByte]).unwrap();

  let gaps = chunk::doc_gaps(&doc_ids);
  let abs: Vec<u64> = doc_ids.iter().map(|&d| d as u64).collect();

  let mut best: Option<(usize, CodecId)> = None;
  for &id in &candidates {
    let base = if id.requires_monotonic_input() { &abs } else { &gaps };
    let values: Vec<u64> = if id.requires_positive_input() {
      base.iter().map(|&v| v + 1).collect()
    } else {
      base.clone()
    };
    let bits = codecs::bit_length(id, &values);
    best = Some(match best {
      None => (bits, id),
      Some((b, bid)) if (bits, id.precedence_rank()) < (b, bid.precedence_rank()) => (bits, id),
      Some(existing) => existing,
    });
  }
  assert_eq!(header.docs_codec, best.unwrap().1);
}

#[test]
fn test_elias_fano_wins_on_fully_dense_ranges() {
  // A perfectly dense, large run of consecutive ids is the case Elias-Fano
  // is designed for: its low/high split should beat a byte-aligned codec.
  let doc_ids: Vec<u32> = (0..50_000).collect();
  let postings: Vec<Posting> = doc_ids.iter().map(|&d| Posting { doc_id: d, tf: 1 }).collect();
  let (header, _) = chunk::write_chunk(
    &postings,
    &[CodecId::VariableByte, CodecId::EliasFano],
    &[CodecId::VariableByte],
  )
  .unwrap();
  assert_eq!(header.docs_codec, CodecId::EliasFano);
}
