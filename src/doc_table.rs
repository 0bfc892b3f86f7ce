//! The doc-id allocator and the `collection.txt` it produces. Assigns
//! monotonically increasing doc-ids in order of first appearance and
//! records the bijection to external names. Modeled as an explicit handle
//! (per design note §9) rather than a process-wide global.

use std::fs;
use std::path::Path;

use crate::errors::IxResult;

#[derive(Clone, Debug, Default)]
pub struct DocTable {
  names: Vec<String>,
}

impl DocTable {
  pub fn new() -> Self {
    DocTable { names: Vec::new() }
  }

  /// Assigns the next doc-id to `name` and returns it.
  pub fn allocate(&mut self, name: String) -> u32 {
    let id = self.names.len() as u32;
    self.names.push(name);
    id
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  pub fn name(&self, doc_id: u32) -> Option<&str> {
    self.names.get(doc_id as usize).map(|s| s.as_str())
  }

  /// Writes `collection.txt`: line `i` is the external name of doc-id `i`.
  pub fn write(&self, path: &Path) -> IxResult<()> {
    let contents = self.names.join("\n");
    fs::write(path, contents)?;
    Ok(())
  }

  pub fn load(path: &Path) -> IxResult<Self> {
    let contents = fs::read_to_string(path)?;
    let names = if contents.is_empty() {
      Vec::new()
    } else {
      contents.lines().map(|s| s.to_string()).collect()
    };
    Ok(DocTable { names })
  }
}
