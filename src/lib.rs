//! A multi-codec compressed inverted index for conjunctive boolean
//! retrieval over a static document collection. See the crate's `README.md`
//! for the on-disk layout of a sealed index.

pub use codecs::CodecId;
pub use config::{IndexerConfig, LoaderConfig};
pub use corpus::{CorpusSource, Document, VecCorpus};
pub use errors::{IxError, IxErrorKind, IxResult};
pub use index::{create_index, IndexHandle, LoadedIndex, Status};

pub mod errors;

mod bit_reader;
mod bit_writer;
mod bits;
mod chunk;
mod chunks_info;
mod codecs;
mod config;
mod constants;
mod corpus;
mod cursor;
mod doc_table;
mod evaluator;
mod index;
mod merger;
mod partial_index;
mod posting;
mod postings_store;
mod stats;
mod temp_run;
mod varint;
mod vocabulary;

#[cfg(test)]
mod tests;
