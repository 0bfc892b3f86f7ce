use crate::bits::byte_to_bits;
use crate::errors::IxError;

const LEFT_MASKS: [u8; 8] = [0xff, 0x7f, 0x3f, 0x1f, 0x0f, 0x07, 0x03, 0x01];
const RIGHT_MASKS: [u8; 8] = [0x00, 0x80, 0xc0, 0xe0, 0xf0, 0xf8, 0xfc, 0xfe];

/// Reads bit-level data out of a byte slice, the counterpart of
/// [`crate::bit_writer::BitWriter`]. Every read checks that enough bits
/// remain and turns a short read into an `IntegrityError` rather than
/// panicking, since corrupted/truncated chunk payloads must be surfaced
/// to the caller, not crash the process.
pub struct BitReader<'a> {
  bytes: &'a [u8],
  current_bits: [bool; 8],
  i: usize,
  j: usize,
}

impl<'a> BitReader<'a> {
  pub fn new(bytes: &'a [u8]) -> Self {
    let current_bits = if bytes.is_empty() {
      [false; 8]
    } else {
      byte_to_bits(bytes[0])
    };
    BitReader {
      bytes,
      current_bits,
      i: 0,
      j: 0,
    }
  }

  pub fn total_bits(&self) -> usize {
    self.bytes.len() * 8
  }

  pub fn bit_idx(&self) -> usize {
    self.i * 8 + self.j
  }

  fn remaining_bits(&self) -> usize {
    self.total_bits().saturating_sub(self.bit_idx())
  }

  #[inline(always)]
  fn refresh_if_needed(&mut self) {
    if self.j == 8 {
      self.i += 1;
      if self.i < self.bytes.len() {
        self.current_bits = byte_to_bits(self.bytes[self.i]);
      }
      self.j = 0;
    }
  }

  /// Reads the lowest `n` bits of the stream into a `u64`, most-significant
  /// bit first, mirroring [`crate::bit_writer::BitWriter::write_bits`].
  pub fn read_bits(&mut self, n: u32) -> Result<u64, IxError> {
    if n == 0 {
      return Ok(0);
    }
    if self.remaining_bits() < n as usize {
      return Err(IxError::truncated(
        "BitReader::read_bits",
        n as usize,
        self.remaining_bits(),
      ));
    }

    self.refresh_if_needed();
    let n = n as usize;
    let n_plus_j = n + self.j;
    if n_plus_j < 8 {
      let shift = 8 - n_plus_j;
      let res = ((self.bytes[self.i] & LEFT_MASKS[self.j] & RIGHT_MASKS[n_plus_j]) >> shift) as u64;
      self.j = n_plus_j;
      Ok(res)
    } else {
      let mut res: u64 = 0;
      let mut remaining = n;
      remaining -= 8 - self.j;
      res |= ((self.bytes[self.i] & LEFT_MASKS[self.j]) as u64) << remaining;
      while remaining >= 8 {
        self.i += 1;
        remaining -= 8;
        res |= (self.bytes[self.i] as u64) << remaining;
      }
      if remaining > 0 {
        self.i += 1;
        let shift = 8 - remaining;
        res |= ((self.bytes[self.i] & RIGHT_MASKS[remaining]) >> shift) as u64;
        self.j = remaining;
      } else {
        self.j = 8;
      }
      if self.i < self.bytes.len() {
        self.current_bits = byte_to_bits(self.bytes[self.i]);
      }
      Ok(res)
    }
  }

  pub fn read_one(&mut self) -> Result<bool, IxError> {
    if self.remaining_bits() < 1 {
      return Err(IxError::truncated("BitReader::read_one", 1, 0));
    }
    self.refresh_if_needed();
    let res = self.current_bits[self.j];
    self.j += 1;
    Ok(res)
  }

  pub fn is_aligned(&self) -> bool {
    self.j == 0 || self.j == 8
  }

  /// Advances the read position to the start of the next byte.
  pub fn finish_byte(&mut self) {
    if self.j != 0 {
      self.i += 1;
      self.j = 0;
      if self.i < self.bytes.len() {
        self.current_bits = byte_to_bits(self.bytes[self.i]);
      }
    }
  }

  /// Reads `n` raw bytes. Requires the reader to currently be byte-aligned.
  pub fn read_aligned_bytes(&mut self, n: usize) -> Result<&'a [u8], IxError> {
    if !self.is_aligned() {
      return Err(IxError::precondition(
        "cannot read_aligned_bytes on a misaligned bit reader",
      ));
    }
    if self.bytes.len() - self.i < n {
      return Err(IxError::truncated(
        "BitReader::read_aligned_bytes",
        n,
        self.bytes.len() - self.i,
      ));
    }
    let res = &self.bytes[self.i..self.i + n];
    self.i += n;
    self.j = 0;
    if self.i < self.bytes.len() {
      self.current_bits = byte_to_bits(self.bytes[self.i]);
    }
    Ok(res)
  }
}
