use std::env;
use std::time::Instant;

use ix_compress::{create_index, CorpusSource, Document, IndexerConfig, LoaderConfig, VecCorpus};

fn tokenize(text: &str) -> Vec<Vec<u8>> {
  text
    .split_whitespace()
    .map(|w| w.to_lowercase().into_bytes())
    .collect()
}

fn main() {
  let args: Vec<String> = env::args().collect();
  let query_terms: Vec<Vec<u8>> = if args.len() >= 2 {
    args[1].split_whitespace().map(|w| w.as_bytes().to_vec()).collect()
  } else {
    vec![b"fox".to_vec(), b"dog".to_vec()]
  };

  let documents: Vec<Document> = vec![
    ("doc0", "the quick brown fox jumps over the lazy dog"),
    ("doc1", "the dog sleeps all day"),
    ("doc2", "a quick fox and a quick dog"),
    ("doc3", "no animals mentioned here at all"),
  ]
  .into_iter()
  .map(|(name, text)| Document {
    name: name.to_string(),
    terms: tokenize(text),
  })
  .collect();

  let out_dir = env::temp_dir().join("ix_compress_demo");
  let config = IndexerConfig::default().with_overwrite(true);

  let build_start = Instant::now();
  let (handle, status) = create_index(&out_dir, VecCorpus::new(documents), &config).expect("index build failed");
  println!("build status: {:?} in {:?}", status, Instant::now() - build_start);

  let loaded = handle.load(LoaderConfig::default()).expect("load failed");
  let query_start = Instant::now();
  let matches = loaded.browse(&query_terms).expect("browse failed");
  println!("query took {:?}", Instant::now() - query_start);

  print!("documents matching");
  for term in &query_terms {
    print!(" {:?}", String::from_utf8_lossy(term));
  }
  println!(":");
  for doc_id in matches {
    println!("  {}", loaded.doc_name(doc_id).unwrap_or("<unknown>"));
  }
}
