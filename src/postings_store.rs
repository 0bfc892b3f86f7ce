//! Access to `postings.bin` chunk payloads, either fully resident or read
//! on demand from disk. The sealed file is immutable, so both modes are
//! safe to share across evaluators.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::chunk::{self, ChunkHeader};
use crate::errors::IxResult;

pub enum PostingsStore {
  InMemory(Vec<u8>),
  OnDisk(PathBuf),
}

impl PostingsStore {
  pub fn open(path: &Path) -> Self {
    PostingsStore::OnDisk(path.to_path_buf())
  }

  pub fn in_memory(bytes: Vec<u8>) -> Self {
    PostingsStore::InMemory(bytes)
  }

  /// Decodes the chunk record starting at `offset`. `end_offset`, when
  /// given, is the exclusive byte offset the next chunk record starts at
  /// (taken from the next skip-table entry); without it the read runs to
  /// the end of the store, which is only correct for a term's last chunk.
  pub fn read_chunk_at(&self, offset: u64, end_offset: Option<u64>) -> IxResult<(ChunkHeader, Vec<u32>, Vec<u32>)> {
    match self {
      PostingsStore::InMemory(bytes) => {
        let end = end_offset.map(|e| e as usize).unwrap_or(bytes.len());
        let (header, doc_ids, freqs, _) = chunk::read_chunk(&bytes[offset as usize..end])?;
        Ok((header, doc_ids, freqs))
      }
      PostingsStore::OnDisk(path) => {
        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(offset))?;
        let buf = match end_offset {
          Some(end) => {
            let mut buf = vec![0_u8; (end - offset) as usize];
            file.read_exact(&mut buf)?;
            buf
          }
          None => {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)?;
            buf
          }
        };
        let (header, doc_ids, freqs, _) = chunk::read_chunk(&buf)?;
        Ok((header, doc_ids, freqs))
      }
    }
  }
}
