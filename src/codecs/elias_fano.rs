//! The `EliasFano` codec: splits each value into high and low bits, storing
//! low bits densely packed and high bits as a monotonic unary "bucket"
//! stream. Requires a non-decreasing, strictly positive input sequence —
//! the chunk writer only ever applies it to the absolute doc-id sequence
//! within a chunk (never to freqs), after the usual `+1` shift.
//!
//! Payload layout: `[low_bits_width: u8]`, then the `n` low parts packed at
//! that width, then the unary-coded high parts, byte-aligned between the
//! two sections.

use crate::bit_reader::BitReader;
use crate::bit_writer::BitWriter;
use crate::errors::{IxError, IxResult};

fn low_bits_width(ints: &[u64], n: usize) -> u32 {
  if n == 0 {
    return 0;
  }
  let max = *ints.last().unwrap();
  let avg = max as f64 / n as f64;
  if avg < 1.0 {
    0
  } else {
    avg.log2().floor() as u32
  }
}

pub fn bit_length(ints: &[u64]) -> usize {
  if ints.is_empty() {
    return 8;
  }
  let l = low_bits_width(ints, ints.len());
  let max_high = ints.last().unwrap() >> l;
  8 + ints.len() * l as usize + max_high as usize + ints.len()
}

pub fn encode(ints: &[u64]) -> Vec<u8> {
  let l = low_bits_width(ints, ints.len());

  let mut low_writer = BitWriter::with_capacity(ints.len() * l as usize / 8 + 1);
  for &v in ints {
    low_writer.write_bits(v & low_mask(l), l);
  }

  let mut high_writer = BitWriter::with_capacity(ints.len() / 4 + 1);
  let mut prev_high = 0_u64;
  for &v in ints {
    let high = v >> l;
    debug_assert!(high >= prev_high, "elias-fano codec requires non-decreasing input");
    for _ in 0..high - prev_high {
      high_writer.write_one(false);
    }
    high_writer.write_one(true);
    prev_high = high;
  }

  let mut out = Vec::new();
  out.push(l as u8);
  out.extend(low_writer.into_bytes());
  out.extend(high_writer.into_bytes());
  out
}

fn low_mask(l: u32) -> u64 {
  if l >= 64 {
    u64::MAX
  } else {
    (1_u64 << l) - 1
  }
}

pub fn decode(bytes: &[u8], n: usize) -> IxResult<Vec<u64>> {
  let l = *bytes.first().ok_or_else(|| IxError::truncated("elias_fano::decode", 1, 0))? as u32;
  if n == 0 {
    return Ok(Vec::new());
  }

  let low_bytes = (n * l as usize + 7) / 8;
  let low_start = 1;
  let low_end = low_start + low_bytes;
  let low_slice = bytes.get(low_start..low_end).ok_or_else(|| {
    IxError::truncated("elias_fano::decode low", low_bytes, bytes.len().saturating_sub(low_start))
  })?;
  let mut low_reader = BitReader::new(low_slice);
  let mut lows = Vec::with_capacity(n);
  for _ in 0..n {
    lows.push(low_reader.read_bits(l)?);
  }

  let high_slice = &bytes[low_end..];
  let mut high_reader = BitReader::new(high_slice);
  let mut res = Vec::with_capacity(n);
  let mut high = 0_u64;
  for i in 0..n {
    let mut zeros = 0_u64;
    while !high_reader.read_one()? {
      zeros += 1;
    }
    high += zeros;
    res.push((high << l) | lows[i]);
  }
  Ok(res)
}
