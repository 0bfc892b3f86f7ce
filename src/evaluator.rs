//! Boolean AND over a set of posting-list cursors via galloping
//! intersection: cursors are ordered shortest-first, each is advanced to
//! the current candidate doc-id in turn, and whenever one lands past the
//! candidate, the candidate is raised and every cursor restarts from it.

use crate::cursor::PostingListCursor;
use crate::errors::IxResult;

/// Terms not present in the vocabulary resolve to an empty cursor set
/// upstream (§7: `NotFound` is recovered, never surfaced here), so an
/// empty `cursors` list is a valid call and yields an empty result.
pub fn intersect(mut cursors: Vec<PostingListCursor<'_>>) -> IxResult<Vec<u32>> {
  if cursors.is_empty() {
    return Ok(Vec::new());
  }
  cursors.sort_by_key(|c| c.chunk_count());

  let mut result = Vec::new();
  let mut candidate = match cursors[0].advance_to(0)? {
    Some(d) => d,
    None => return Ok(result),
  };

  loop {
    let mut all_match = true;
    for cursor in cursors.iter_mut() {
      match cursor.advance_to(candidate)? {
        Some(d) if d == candidate => {}
        Some(d) => {
          candidate = d;
          all_match = false;
          break;
        }
        None => return Ok(result),
      }
    }
    if all_match {
      result.push(candidate);
      match cursors[0].next()? {
        Some(d) => candidate = d,
        None => return Ok(result),
      }
    }
  }
}
