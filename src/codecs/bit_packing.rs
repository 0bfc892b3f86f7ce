//! The `BitPacking` codec: a single fixed width `w = bits_needed_for(max)`
//! packs every value into `w` bits, no per-value overhead. `w` is stored as
//! a one-byte header inside the codec's own payload so it is self-decodable
//! given only the element count.

use crate::bit_reader::BitReader;
use crate::bit_writer::BitWriter;
use crate::bits::bits_needed_for;
use crate::errors::IxResult;

fn width_of(ints: &[u64]) -> u32 {
  bits_needed_for(ints.iter().copied().max().unwrap_or(0))
}

pub fn bit_length(ints: &[u64]) -> usize {
  8 + ints.len() * width_of(ints) as usize
}

pub fn encode(ints: &[u64]) -> Vec<u8> {
  let width = width_of(ints);
  let mut writer = BitWriter::with_capacity(bit_length(ints) / 8 + 1);
  writer.write_bits(width as u64, 8);
  for &v in ints {
    writer.write_bits(v, width);
  }
  writer.into_bytes()
}

pub fn decode(bytes: &[u8], n: usize) -> IxResult<Vec<u64>> {
  let mut reader = BitReader::new(bytes);
  let width = reader.read_bits(8)? as u32;
  let mut res = Vec::with_capacity(n);
  for _ in 0..n {
    res.push(reader.read_bits(width)?);
  }
  Ok(res)
}
