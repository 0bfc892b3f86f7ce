//! A posting-list cursor: `Unopened -> Positioned(doc_id) -> Exhausted`.
//! Advances via galloping (exponential probe then binary search) over the
//! per-term skip table, decoding at most the chunks the search actually
//! lands on.

use crate::posting::SkipEntry;
use crate::postings_store::PostingsStore;
use crate::errors::IxResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorState {
  Unopened,
  Positioned(u32),
  Exhausted,
}

pub struct PostingListCursor<'a> {
  skip_table: &'a [SkipEntry],
  postings: &'a PostingsStore,
  state: CursorState,
  chunk_idx: usize,
  chunk_doc_ids: Vec<u32>,
  chunk_pos: usize,
  chunks_decoded: usize,
}

/// Finds the first skip-table index at or after `start` whose `last_doc`
/// is `>= target`, via exponential probing followed by a binary search over
/// the narrowed range.
fn gallop_chunk_idx(skip_table: &[SkipEntry], start: usize, target: u32) -> Option<usize> {
  if start >= skip_table.len() {
    return None;
  }
  let mut bound = 1_usize;
  let mut probe = start;
  while probe < skip_table.len() && skip_table[probe].last_doc < target {
    probe = probe.saturating_add(bound);
    bound = bound.saturating_mul(2);
  }
  let mut lo = probe.saturating_sub(bound.max(1) - 1).max(start);
  let mut hi = probe.min(skip_table.len());
  while lo < hi {
    let mid = lo + (hi - lo) / 2;
    if skip_table[mid].last_doc >= target {
      hi = mid;
    } else {
      lo = mid + 1;
    }
  }
  if lo < skip_table.len() {
    Some(lo)
  } else {
    None
  }
}

impl<'a> PostingListCursor<'a> {
  pub fn new(skip_table: &'a [SkipEntry], postings: &'a PostingsStore) -> Self {
    PostingListCursor {
      skip_table,
      postings,
      state: CursorState::Unopened,
      chunk_idx: 0,
      chunk_doc_ids: Vec::new(),
      chunk_pos: 0,
      chunks_decoded: 0,
    }
  }

  /// Proxy for list length used to order cursors before intersection:
  /// cheap (no decode) and monotonic in the true posting count for a fixed
  /// chunk size.
  pub fn chunk_count(&self) -> usize {
    self.skip_table.len()
  }

  pub fn chunks_decoded(&self) -> usize {
    self.chunks_decoded
  }

  pub fn state(&self) -> CursorState {
    self.state
  }

  pub fn current(&self) -> Option<u32> {
    match self.state {
      CursorState::Positioned(d) => Some(d),
      _ => None,
    }
  }

  fn load_chunk(&mut self, idx: usize) -> IxResult<()> {
    let entry = self.skip_table[idx];
    let end_offset = self.skip_table.get(idx + 1).map(|next| next.postings_offset);
    let (_, doc_ids, _freqs) = self.postings.read_chunk_at(entry.postings_offset, end_offset)?;
    self.chunk_doc_ids = doc_ids;
    self.chunk_idx = idx;
    self.chunk_pos = 0;
    self.chunks_decoded += 1;
    Ok(())
  }

  /// Advances to the smallest doc-id `>= target`, updating state. Returns
  /// the doc-id landed on, or `None` (and transitions to `Exhausted`) if no
  /// such doc-id exists.
  pub fn advance_to(&mut self, target: u32) -> IxResult<Option<u32>> {
    if self.state == CursorState::Exhausted {
      return Ok(None);
    }
    let search_start = if self.chunk_doc_ids.is_empty() { 0 } else { self.chunk_idx };
    let chunk_idx = match gallop_chunk_idx(self.skip_table, search_start, target) {
      Some(i) => i,
      None => {
        self.state = CursorState::Exhausted;
        return Ok(None);
      }
    };
    if self.chunk_doc_ids.is_empty() || chunk_idx != self.chunk_idx {
      self.load_chunk(chunk_idx)?;
    }
    while let Some(&d) = self.chunk_doc_ids.get(self.chunk_pos) {
      if d >= target {
        self.state = CursorState::Positioned(d);
        return Ok(Some(d));
      }
      self.chunk_pos += 1;
    }
    // Exhausted the decoded chunk without finding target; try the next one.
    if self.chunk_idx + 1 < self.skip_table.len() {
      self.load_chunk(self.chunk_idx + 1)?;
      return self.advance_to(target);
    }
    self.state = CursorState::Exhausted;
    Ok(None)
  }

  /// Advances by exactly one posting past the current position.
  pub fn next(&mut self) -> IxResult<Option<u32>> {
    match self.current() {
      Some(d) => self.advance_to(d + 1),
      None => self.advance_to(0),
    }
  }
}
