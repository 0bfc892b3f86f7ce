//! `vocabulary.txt`: one line per term, `term\tchunksinfo_offset`, in
//! ascending term order. Terms are arbitrary byte strings, so the three
//! bytes that would otherwise break the line-oriented format (`%`, tab,
//! newline) are percent-escaped; anything else is written through as-is
//! (lossily, via UTF-8) to keep common text corpora readable on disk.

use std::fs;
use std::path::Path;

use crate::errors::{IxError, IxResult};

pub fn escape_term(term: &[u8]) -> String {
  let mut out = String::with_capacity(term.len());
  for &b in term {
    match b {
      b'%' => out.push_str("%25"),
      b'\t' => out.push_str("%09"),
      b'\n' => out.push_str("%0A"),
      0x00..=0x7f => out.push(b as char),
      _ => out.push_str(&format!("%{:02X}", b)),
    }
  }
  out
}

pub fn unescape_term(s: &str) -> Vec<u8> {
  let bytes = s.as_bytes();
  let mut out = Vec::with_capacity(bytes.len());
  let mut i = 0;
  while i < bytes.len() {
    if bytes[i] == b'%' && i + 2 < bytes.len() {
      let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
      if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
        out.push(value);
        i += 3;
        continue;
      }
    }
    out.push(bytes[i]);
    i += 1;
  }
  out
}

pub fn write_vocabulary(path: &Path, entries: &[(Vec<u8>, u64)]) -> IxResult<()> {
  let mut contents = String::new();
  for (term, offset) in entries {
    contents.push_str(&escape_term(term));
    contents.push('\t');
    contents.push_str(&offset.to_string());
    contents.push('\n');
  }
  fs::write(path, contents)?;
  Ok(())
}

pub fn load_vocabulary(path: &Path) -> IxResult<Vec<(Vec<u8>, u64)>> {
  let contents = fs::read_to_string(path)?;
  let mut entries = Vec::new();
  for line in contents.lines() {
    let (term_part, offset_part) = line
      .rsplit_once('\t')
      .ok_or_else(|| IxError::corruption("malformed vocabulary line: missing tab separator"))?;
    let offset: u64 = offset_part
      .parse()
      .map_err(|_| IxError::corruption("malformed vocabulary line: non-numeric offset"))?;
    entries.push((unescape_term(term_part), offset));
  }
  Ok(entries)
}

/// Binary search for `term` in an ascending-sorted vocabulary.
pub fn find_term(vocab: &[(Vec<u8>, u64)], term: &[u8]) -> Option<u64> {
  vocab
    .binary_search_by(|(t, _)| t.as_slice().cmp(term))
    .ok()
    .map(|i| vocab[i].1)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn test_escape_roundtrip() {
    let term = b"hello\tworld%100%\n".to_vec();
    let escaped = escape_term(&term);
    assert_eq!(unescape_term(&escaped), term);
  }

  #[test]
  fn test_escape_roundtrip_non_ascii_bytes() {
    // "café" in UTF-8 ends in the 2-byte sequence 0xC3 0xA9.
    let term = "caf\u{e9}".as_bytes().to_vec();
    let escaped = escape_term(&term);
    assert!(escaped.is_ascii());
    assert_eq!(unescape_term(&escaped), term);
  }

  #[test]
  fn test_write_then_load_preserves_non_ascii_terms() {
    let entries = vec![("caf\u{e9}".as_bytes().to_vec(), 7_u64)];
    let dir = tempdir().unwrap();
    let path = dir.path().join("vocabulary.txt");
    write_vocabulary(&path, &entries).unwrap();
    let loaded = load_vocabulary(&path).unwrap();
    assert_eq!(loaded, entries);
    assert_eq!(find_term(&loaded, "caf\u{e9}".as_bytes()), Some(7));
  }

  #[test]
  fn test_write_then_load_and_find() {
    let entries = vec![
      (b"apple".to_vec(), 0_u64),
      (b"banana".to_vec(), 42),
      (b"cherry".to_vec(), 100),
    ];
    let dir = tempdir().unwrap();
    let path = dir.path().join("vocabulary.txt");
    write_vocabulary(&path, &entries).unwrap();
    let loaded = load_vocabulary(&path).unwrap();
    assert_eq!(loaded, entries);
    assert_eq!(find_term(&loaded, b"banana"), Some(42));
    assert_eq!(find_term(&loaded, b"missing"), None);
  }
}
