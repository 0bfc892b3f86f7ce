//! The `Gamma` (Elias gamma) codec: value `v` (`v >= 1`) as the unary-coded
//! bit-length of `v` followed by `v`'s binary tail with the leading one
//! stripped. Like `Unary`, callers must pre-shift by `+1` so inputs are
//! strictly positive.

use crate::bit_reader::BitReader;
use crate::bit_writer::BitWriter;
use crate::bits::bits_needed_for;
use crate::errors::IxResult;

/// Number of low bits following the unary prefix, i.e. `floor(log2(v))`.
fn tail_bits(v: u64) -> u32 {
  bits_needed_for(v) - 1
}

pub fn bit_length(ints: &[u64]) -> usize {
  ints
    .iter()
    .map(|&v| {
      debug_assert!(v >= 1, "gamma codec requires strictly positive input");
      2 * tail_bits(v) as usize + 1
    })
    .sum()
}

pub fn encode(ints: &[u64]) -> Vec<u8> {
  let mut writer = BitWriter::with_capacity(bit_length(ints) / 8 + 1);
  for &v in ints {
    let k = tail_bits(v);
    for _ in 0..k {
      writer.write_one(false);
    }
    writer.write_one(true);
    writer.write_bits(v, k);
  }
  writer.into_bytes()
}

pub fn decode(bytes: &[u8], n: usize) -> IxResult<Vec<u64>> {
  let mut reader = BitReader::new(bytes);
  let mut res = Vec::with_capacity(n);
  for _ in 0..n {
    let mut k = 0_u32;
    while !reader.read_one()? {
      k += 1;
    }
    let tail = reader.read_bits(k)?;
    res.push((1_u64 << k) | tail);
  }
  Ok(res)
}
