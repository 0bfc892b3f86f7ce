//! The `VariableByte` codec: each integer as a standalone LEB128-style
//! varint. Byte-aligned throughout, so it never touches a `BitWriter`.

use crate::errors::IxResult;
use crate::varint::{read_uvarint, uvarint_len, write_uvarint};

pub fn bit_length(ints: &[u64]) -> usize {
  ints.iter().map(|&x| uvarint_len(x) * 8).sum()
}

pub fn encode(ints: &[u64]) -> Vec<u8> {
  let mut buf = Vec::with_capacity(ints.len() * 2);
  for &x in ints {
    write_uvarint(&mut buf, x);
  }
  buf
}

pub fn decode(bytes: &[u8], n: usize) -> IxResult<Vec<u64>> {
  let mut pos = 0;
  let mut res = Vec::with_capacity(n);
  for _ in 0..n {
    res.push(read_uvarint(bytes, &mut pos)?);
  }
  Ok(res)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_roundtrip() {
    let ints = vec![0_u64, 1, 127, 128, 1_000_000, u64::MAX];
    let encoded = encode(&ints);
    assert_eq!(encoded.len() * 8, bit_length(&ints));
    assert_eq!(decode(&encoded, ints.len()).unwrap(), ints);
  }

  #[test]
  fn test_empty() {
    assert_eq!(bit_length(&[]), 0);
    assert_eq!(decode(&encode(&[]), 0).unwrap(), Vec::<u64>::new());
  }
}
