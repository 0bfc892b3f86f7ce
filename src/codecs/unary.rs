//! The `Unary` codec: value `v` (`v >= 1`) as `v - 1` zero bits followed by
//! a one bit. Only ever selected for small values; the chunk writer must
//! shift the stream by `+1` before calling [`encode`] since inputs here are
//! assumed strictly positive already (see `CodecId::requires_positive_input`).

use crate::bit_reader::BitReader;
use crate::bit_writer::BitWriter;
use crate::errors::IxResult;

pub fn bit_length(ints: &[u64]) -> usize {
  ints.iter().map(|&v| v as usize).sum()
}

pub fn encode(ints: &[u64]) -> Vec<u8> {
  let mut writer = BitWriter::with_capacity(bit_length(ints) / 8 + 1);
  for &v in ints {
    debug_assert!(v >= 1, "unary codec requires strictly positive input");
    for _ in 0..v - 1 {
      writer.write_one(false);
    }
    writer.write_one(true);
  }
  writer.into_bytes()
}

pub fn decode(bytes: &[u8], n: usize) -> IxResult<Vec<u64>> {
  let mut reader = BitReader::new(bytes);
  let mut res = Vec::with_capacity(n);
  for _ in 0..n {
    let mut zeros: u64 = 0;
    while !reader.read_one()? {
      zeros += 1;
    }
    res.push(zeros + 1);
  }
  Ok(res)
}
