//! The seven integer codecs and the selection rule that picks among them.
//!
//! Per-codec encode/decode/bit_length live in their own small modules.
//! Dispatch across codecs is a tagged variant (`CodecId` + a `match`), not a
//! trait object, so the `bit_length` pre-check that runs once per chunk per
//! stream stays monomorphic on the hot path.

mod bit_packing;
mod elias_fano;
mod gamma;
mod pfor_delta;
mod simple16;
mod unary;
mod variable_byte;

use crate::errors::{IxError, IxResult};

/// Stable, on-disk codec identifier. Numeric values are part of the file
/// format and must never be renumbered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CodecId {
  VariableByte = 0,
  Unary = 1,
  Gamma = 2,
  BitPacking = 3,
  Simple16 = 4,
  PForDelta = 5,
  EliasFano = 6,
}

pub const INVALID_CODEC_BYTE: u8 = 255;

/// Fixed tie-break precedence, most to least preferred. Preserved literally
/// for bit-exact reproducibility across rewrites, even though nothing about
/// the ordering is obviously "optimal".
const PRECEDENCE: [CodecId; 7] = [
  CodecId::PForDelta,
  CodecId::Simple16,
  CodecId::VariableByte,
  CodecId::BitPacking,
  CodecId::Gamma,
  CodecId::Unary,
  CodecId::EliasFano,
];

impl CodecId {
  pub fn to_byte(self) -> u8 {
    self as u8
  }

  pub fn from_byte(byte: u8) -> IxResult<Self> {
    match byte {
      0 => Ok(CodecId::VariableByte),
      1 => Ok(CodecId::Unary),
      2 => Ok(CodecId::Gamma),
      3 => Ok(CodecId::BitPacking),
      4 => Ok(CodecId::Simple16),
      5 => Ok(CodecId::PForDelta),
      6 => Ok(CodecId::EliasFano),
      other => Err(IxError::precondition(format!(
        "unknown codec id {} (255 is reserved invalid)",
        other
      ))),
    }
  }

  pub(crate) fn precedence_rank(self) -> usize {
    PRECEDENCE.iter().position(|&c| c == self).unwrap()
  }

  /// Whether this codec requires its input to be strictly positive
  /// (`>= 1`). The chunk writer shifts by `+1` before encoding with these
  /// codecs and the reader shifts by `-1` after decoding.
  pub fn requires_positive_input(self) -> bool {
    matches!(self, CodecId::Unary | CodecId::Gamma | CodecId::EliasFano)
  }

  /// Whether this codec requires a non-decreasing input sequence. Only
  /// meaningful for the docs stream (gaps are arbitrary, but absolute
  /// doc-ids are monotonic); never true for the freqs stream in practice.
  pub fn requires_monotonic_input(self) -> bool {
    matches!(self, CodecId::EliasFano)
  }
}

/// Exact number of bits `encode(ints)` would produce, without producing it.
/// Does not include byte-alignment padding of the final byte.
pub fn bit_length(id: CodecId, ints: &[u64]) -> usize {
  match id {
    CodecId::VariableByte => variable_byte::bit_length(ints),
    CodecId::Unary => unary::bit_length(ints),
    CodecId::Gamma => gamma::bit_length(ints),
    CodecId::BitPacking => bit_packing::bit_length(ints),
    CodecId::Simple16 => simple16::bit_length(ints),
    CodecId::PForDelta => pfor_delta::bit_length(ints),
    CodecId::EliasFano => elias_fano::bit_length(ints),
  }
}

/// Encodes `ints` with `id`. Only `Simple16` can fail here, when a value
/// exceeds its 28-bit domain — reachable if a caller configures it as the
/// sole candidate for a stream that turns out to hold a larger value.
pub fn encode(id: CodecId, ints: &[u64]) -> IxResult<Vec<u8>> {
  match id {
    CodecId::VariableByte => Ok(variable_byte::encode(ints)),
    CodecId::Unary => Ok(unary::encode(ints)),
    CodecId::Gamma => Ok(gamma::encode(ints)),
    CodecId::BitPacking => Ok(bit_packing::encode(ints)),
    CodecId::Simple16 => simple16::encode(ints),
    CodecId::PForDelta => Ok(pfor_delta::encode(ints)),
    CodecId::EliasFano => Ok(elias_fano::encode(ints)),
  }
}

pub fn decode(id: CodecId, bytes: &[u8], n: usize) -> IxResult<Vec<u64>> {
  match id {
    CodecId::VariableByte => variable_byte::decode(bytes, n),
    CodecId::Unary => unary::decode(bytes, n),
    CodecId::Gamma => gamma::decode(bytes, n),
    CodecId::BitPacking => bit_packing::decode(bytes, n),
    CodecId::Simple16 => simple16::decode(bytes, n),
    CodecId::PForDelta => pfor_delta::decode(bytes, n),
    CodecId::EliasFano => elias_fano::decode(bytes, n),
  }
}

/// Picks the candidate minimizing `bit_length`, breaking ties by the fixed
/// precedence order. `ints` must already be in the domain the caller
/// intends to hand to `encode` (e.g. already `+1`-shifted if any candidate
/// requires positive input).
pub fn select_codec(candidates: &[CodecId], ints: &[u64]) -> IxResult<CodecId> {
  candidates
    .iter()
    .copied()
    .map(|id| (bit_length(id, ints), id))
    .min_by_key(|&(bits, id)| (bits, id.precedence_rank()))
    .map(|(_, id)| id)
    .ok_or_else(|| IxError::precondition("codec candidate set must not be empty"))
}
