//! The `Simple16` codec: packs a run of small integers into a 32-bit word.
//! The top 4 bits of each word are a selector (0-15) naming one of 16 fixed
//! `(bits_per_value, values_per_word)` layouts; the remaining 28 bits hold
//! that many values at that width. Only useful for small, bounded values —
//! the selection rule naturally avoids it otherwise.

use crate::bits::bits_needed_for;
use crate::errors::{IxError, IxResult};

const PAYLOAD_BITS: u32 = 28;

/// `(bits_per_value, values_per_word)` for selectors 0..16, ordered by
/// ascending width (descending packing density).
const LAYOUTS: [(u32, u32); 16] = [
  (1, 28),
  (2, 14),
  (3, 9),
  (4, 7),
  (5, 5),
  (6, 4),
  (7, 4),
  (8, 3),
  (9, 3),
  (10, 2),
  (12, 2),
  (14, 2),
  (16, 1),
  (20, 1),
  (24, 1),
  (28, 1),
];

fn fits(v: u64, bits: u32) -> bool {
  bits >= 64 || v < (1_u64 << bits)
}

pub fn bit_length(ints: &[u64]) -> usize {
  match words_for(ints) {
    Some(words) => words * 32,
    None => usize::MAX,
  }
}

/// Number of 32-bit words `encode` would emit, or `None` if some value
/// does not fit even the widest layout (28 bits).
fn words_for(ints: &[u64]) -> Option<usize> {
  let mut words = 0;
  let mut p = 0;
  while p < ints.len() {
    let (_, take) = pick_layout(&ints[p..])?;
    p += take;
    words += 1;
  }
  Some(words)
}

/// Picks the selector index packing the most values starting at the front
/// of `remaining`, along with how many values it actually consumes.
fn pick_layout(remaining: &[u64]) -> Option<(usize, usize)> {
  for (idx, &(bits, count)) in LAYOUTS.iter().enumerate() {
    let take = (count as usize).min(remaining.len());
    if take > 0 && remaining[..take].iter().all(|&v| fits(v, bits)) {
      return Some((idx, take));
    }
  }
  None
}

pub fn encode(ints: &[u64]) -> IxResult<Vec<u8>> {
  let mut out = Vec::with_capacity(words_for(ints).unwrap_or(ints.len()) * 4);
  let mut p = 0;
  while p < ints.len() {
    let (idx, take) = pick_layout(&ints[p..])
      .ok_or_else(|| IxError::precondition("simple16 codec invoked on a value exceeding its 28-bit domain"))?;
    let (bits, _) = LAYOUTS[idx];
    let mut word: u32 = (idx as u32) << PAYLOAD_BITS;
    for (i, &v) in ints[p..p + take].iter().enumerate() {
      word |= (v as u32) << (i as u32 * bits);
    }
    out.extend_from_slice(&word.to_le_bytes());
    p += take;
  }
  Ok(out)
}

pub fn decode(bytes: &[u8], n: usize) -> IxResult<Vec<u64>> {
  let mut res = Vec::with_capacity(n);
  let mut pos = 0;
  while res.len() < n {
    let word_bytes = bytes.get(pos..pos + 4).ok_or_else(|| {
      IxError::truncated("simple16::decode", 4, bytes.len().saturating_sub(pos))
    })?;
    let word = u32::from_le_bytes([word_bytes[0], word_bytes[1], word_bytes[2], word_bytes[3]]);
    pos += 4;
    let idx = (word >> PAYLOAD_BITS) as usize;
    let (bits, count) = *LAYOUTS
      .get(idx)
      .ok_or_else(|| IxError::corruption("invalid simple16 selector"))?;
    let mask = if bits >= 32 { u32::MAX } else { (1_u32 << bits) - 1 };
    for i in 0..count {
      if res.len() == n {
        break;
      }
      res.push(((word >> (i * bits)) & mask) as u64);
    }
  }
  Ok(res)
}

/// Whether bits_needed_for the max value in the sequence means this codec
/// is even in-domain. Used by the unit tests below and available for the
/// chunk writer's candidate filtering.
pub fn in_domain(ints: &[u64]) -> bool {
  ints.iter().copied().max().map_or(true, |m| bits_needed_for(m) <= PAYLOAD_BITS)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_roundtrip_small_values() {
    let ints: Vec<u64> = (0..50).map(|i| (i * 7) % 31).collect();
    let encoded = encode(&ints).unwrap();
    assert_eq!(encoded.len() * 8, bit_length(&ints));
    assert_eq!(decode(&encoded, ints.len()).unwrap(), ints);
  }

  #[test]
  fn test_roundtrip_mixed_widths() {
    let ints = vec![1_u64, 2, 100_000, 3, 0, 1 << 20];
    let encoded = encode(&ints).unwrap();
    assert_eq!(decode(&encoded, ints.len()).unwrap(), ints);
  }

  #[test]
  fn test_out_of_domain_bit_length_is_max() {
    let ints = vec![1_u64 << 30];
    assert!(!in_domain(&ints));
    assert_eq!(bit_length(&ints), usize::MAX);
  }

  #[test]
  fn test_out_of_domain_encode_is_an_error_not_a_panic() {
    let ints = vec![1_u64 << 30];
    assert!(encode(&ints).is_err());
  }

  #[test]
  fn test_empty() {
    assert_eq!(decode(&encode(&[]).unwrap(), 0).unwrap(), Vec::<u64>::new());
  }
}
