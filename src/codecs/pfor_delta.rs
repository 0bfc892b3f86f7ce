//! The `PForDelta` codec: a base bit-width `b` covering at least
//! [`crate::constants::PFOR_COVERAGE_PERCENT`] of values, with the rest
//! stored out of band as `(position, value)` exceptions.
//!
//! Payload layout: `[b: u8][exception_count: varint]`, then the `n` values
//! bit-packed at width `b` (exception slots hold a zero placeholder),
//! byte-aligned, then `exception_count` `(position: varint, value: varint)`
//! pairs.

use crate::bit_reader::BitReader;
use crate::bit_writer::BitWriter;
use crate::bits::bits_needed_for;
use crate::constants::PFOR_COVERAGE_PERCENT;
use crate::errors::IxResult;
use crate::varint::{read_uvarint, uvarint_len, write_uvarint};

/// Smallest `b` such that at least `PFOR_COVERAGE_PERCENT`% of `ints` fit in
/// `b` bits. `b == 64` always satisfies this trivially.
fn choose_base_width(ints: &[u64]) -> u32 {
  if ints.is_empty() {
    return 0;
  }
  let needed = (ints.len() * PFOR_COVERAGE_PERCENT + 99) / 100;
  for b in 0..=64 {
    let covered = ints.iter().filter(|&&v| bits_needed_for(v) <= b).count();
    if covered >= needed {
      return b;
    }
  }
  64
}

fn exceptions_for(ints: &[u64], b: u32) -> Vec<(usize, u64)> {
  ints
    .iter()
    .enumerate()
    .filter(|&(_, &v)| bits_needed_for(v) > b)
    .map(|(i, &v)| (i, v))
    .collect()
}

pub fn bit_length(ints: &[u64]) -> usize {
  let b = choose_base_width(ints);
  let exceptions = exceptions_for(ints, b);
  let exceptions_bits: usize = exceptions
    .iter()
    .map(|&(pos, v)| (uvarint_len(pos as u64) + uvarint_len(v)) * 8)
    .sum();
  8 + uvarint_len(exceptions.len() as u64) * 8 + ints.len() * b as usize + exceptions_bits
}

pub fn encode(ints: &[u64]) -> Vec<u8> {
  let b = choose_base_width(ints);
  let exceptions = exceptions_for(ints, b);

  let mut header = Vec::new();
  write_uvarint(&mut header, b as u64);
  write_uvarint(&mut header, exceptions.len() as u64);

  let mut body = BitWriter::with_capacity(ints.len() * b as usize / 8 + 1);
  for &v in ints {
    let inline = if bits_needed_for(v) <= b { v } else { 0 };
    body.write_bits(inline, b);
  }

  let mut tail = Vec::new();
  for &(pos, v) in &exceptions {
    write_uvarint(&mut tail, pos as u64);
    write_uvarint(&mut tail, v);
  }

  let mut out = header;
  out.extend(body.into_bytes());
  out.extend(tail);
  out
}

pub fn decode(bytes: &[u8], n: usize) -> IxResult<Vec<u64>> {
  let mut pos = 0;
  let b = read_uvarint(bytes, &mut pos)? as u32;
  let exception_count = read_uvarint(bytes, &mut pos)? as usize;

  let body_bits = n * b as usize;
  let body_bytes = (body_bits + 7) / 8;
  let body_start = pos;
  let body_end = body_start + body_bytes;
  let body = bytes.get(body_start..body_end).ok_or_else(|| {
    crate::errors::IxError::truncated(
      "pfor_delta::decode body",
      body_bytes,
      bytes.len().saturating_sub(body_start),
    )
  })?;

  let mut reader = BitReader::new(body);
  let mut res = Vec::with_capacity(n);
  for _ in 0..n {
    res.push(reader.read_bits(b)?);
  }

  let mut tail_pos = body_end;
  for _ in 0..exception_count {
    let ex_pos = read_uvarint(bytes, &mut tail_pos)? as usize;
    let ex_val = read_uvarint(bytes, &mut tail_pos)?;
    if ex_pos >= res.len() {
      return Err(crate::errors::IxError::corruption(
        "pfor_delta exception position out of range",
      ));
    }
    res[ex_pos] = ex_val;
  }
  Ok(res)
}
