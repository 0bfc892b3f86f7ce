//! Optional per-chunk codec-choice reporting, gated on candidate-set size:
//! a stream only gets a statistics file when there was actually a choice
//! to make (more than one candidate configured).

use std::fs;
use std::path::Path;

use crate::codecs::CodecId;
use crate::errors::IxResult;

pub struct StatsCollector {
  docs_enabled: bool,
  freqs_enabled: bool,
  docs_lines: Vec<String>,
  freqs_lines: Vec<String>,
}

fn format_values(values: &[u64]) -> String {
  values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",")
}

impl StatsCollector {
  pub fn new(docs_candidates_len: usize, freqs_candidates_len: usize) -> Self {
    StatsCollector {
      docs_enabled: docs_candidates_len > 1,
      freqs_enabled: freqs_candidates_len > 1,
      docs_lines: Vec::new(),
      freqs_lines: Vec::new(),
    }
  }

  pub fn record_docs(&mut self, term: &[u8], codec: CodecId, raw_values: &[u64]) {
    if !self.docs_enabled {
      return;
    }
    self.docs_lines.push(format!(
      "{}\t{}\t{}",
      String::from_utf8_lossy(term),
      codec.to_byte(),
      format_values(raw_values)
    ));
  }

  pub fn record_freqs(&mut self, term: &[u8], codec: CodecId, raw_values: &[u64]) {
    if !self.freqs_enabled {
      return;
    }
    self.freqs_lines.push(format!(
      "{}\t{}\t{}",
      String::from_utf8_lossy(term),
      codec.to_byte(),
      format_values(raw_values)
    ));
  }

  pub fn flush(&self, out_dir: &Path) -> IxResult<()> {
    if self.docs_enabled {
      fs::write(out_dir.join("encoder_docs_statistics.txt"), self.docs_lines.join("\n"))?;
    }
    if self.freqs_enabled {
      fs::write(out_dir.join("encoder_freqs_statistics.txt"), self.freqs_lines.join("\n"))?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn test_disabled_when_only_one_candidate() {
    let mut stats = StatsCollector::new(1, 1);
    stats.record_docs(b"term", CodecId::VariableByte, &[1, 2, 3]);
    stats.record_freqs(b"term", CodecId::VariableByte, &[1]);
    let dir = tempdir().unwrap();
    stats.flush(dir.path()).unwrap();
    assert!(!dir.path().join("encoder_docs_statistics.txt").exists());
    assert!(!dir.path().join("encoder_freqs_statistics.txt").exists());
  }

  #[test]
  fn test_enabled_writes_a_line_per_record() {
    let mut stats = StatsCollector::new(3, 1);
    stats.record_docs(b"alpha", CodecId::BitPacking, &[1, 1, 1]);
    stats.record_docs(b"beta", CodecId::Gamma, &[4, 2]);
    let dir = tempdir().unwrap();
    stats.flush(dir.path()).unwrap();
    let contents = fs::read_to_string(dir.path().join("encoder_docs_statistics.txt")).unwrap();
    assert_eq!(contents.lines().count(), 2);
    assert!(contents.contains("alpha"));
    assert!(!dir.path().join("encoder_freqs_statistics.txt").exists());
  }
}
