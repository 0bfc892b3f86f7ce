//! The boundary between the core and everything that turns raw files into
//! tokenized documents. Parsing corpus formats (plain text vs. TREC) and
//! tokenizing (lowercasing, stop-word filtering, splitting on non-alphanumeric
//! runs) is explicitly external; the core only ever consumes a
//! [`CorpusSource`].

/// A single tokenized document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
  pub name: String,
  pub terms: Vec<Vec<u8>>,
}

/// Anything that can be turned into a stream of already-tokenized
/// documents. Implementations may stream from disk; the core drains the
/// iterator once, in order, assigning doc-ids as it goes.
pub trait CorpusSource {
  fn documents(self) -> Box<dyn Iterator<Item = Document>>;
}

/// An in-memory corpus, useful for tests and small embedded uses.
#[derive(Clone, Debug, Default)]
pub struct VecCorpus(pub Vec<Document>);

impl VecCorpus {
  pub fn new(documents: Vec<Document>) -> Self {
    VecCorpus(documents)
  }
}

impl CorpusSource for VecCorpus {
  fn documents(self) -> Box<dyn Iterator<Item = Document>> {
    Box::new(self.0.into_iter())
  }
}
