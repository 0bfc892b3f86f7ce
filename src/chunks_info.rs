//! `chunksinfo.bin`: concatenated per-term metadata blocks, each
//! `[chunk_count:varint] (for each chunk: [last_doc:varint]
//! [postings_offset:varint][docs_codec:u8][freqs_codec:u8])`.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::codecs::CodecId;
use crate::errors::IxResult;
use crate::posting::SkipEntry;
use crate::varint::{read_uvarint, write_uvarint};

pub fn write_term_block(out: &mut Vec<u8>, skip_table: &[SkipEntry]) {
  write_uvarint(out, skip_table.len() as u64);
  for entry in skip_table {
    write_uvarint(out, entry.last_doc as u64);
    write_uvarint(out, entry.postings_offset);
    out.push(entry.docs_codec.to_byte());
    out.push(entry.freqs_codec.to_byte());
  }
}

/// Access to `chunksinfo.bin`, either fully resident or fetched per-term
/// from disk, matching [`crate::config::LoaderConfig::chunks_info_in_memory`].
pub enum ChunksInfoSource {
  InMemory(Vec<u8>),
  OnDisk(PathBuf),
}

impl ChunksInfoSource {
  /// Reads the term block recorded at `offset` (a `vocabulary.txt` value).
  pub fn read_block(&self, offset: u64) -> IxResult<Vec<SkipEntry>> {
    match self {
      ChunksInfoSource::InMemory(bytes) => {
        let mut pos = offset as usize;
        read_term_block(bytes, &mut pos)
      }
      ChunksInfoSource::OnDisk(path) => {
        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(offset))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        let mut pos = 0;
        read_term_block(&buf, &mut pos)
      }
    }
  }
}

/// Reads one term block starting at `bytes[*pos]`, advancing `*pos` past it.
pub fn read_term_block(bytes: &[u8], pos: &mut usize) -> IxResult<Vec<SkipEntry>> {
  let chunk_count = read_uvarint(bytes, pos)? as usize;
  let mut entries = Vec::with_capacity(chunk_count);
  for _ in 0..chunk_count {
    let last_doc = read_uvarint(bytes, pos)? as u32;
    let postings_offset = read_uvarint(bytes, pos)?;
    let docs_codec = CodecId::from_byte(
      *bytes
        .get(*pos)
        .ok_or_else(|| crate::errors::IxError::truncated("chunks_info docs_codec", 1, 0))?,
    )?;
    *pos += 1;
    let freqs_codec = CodecId::from_byte(
      *bytes
        .get(*pos)
        .ok_or_else(|| crate::errors::IxError::truncated("chunks_info freqs_codec", 1, 0))?,
    )?;
    *pos += 1;
    entries.push(SkipEntry {
      last_doc,
      postings_offset,
      docs_codec,
      freqs_codec,
    });
  }
  Ok(entries)
}
