use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::io;

/// The different kinds of errors for `ix_compress`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IxErrorKind {
  /// Missing inputs or bad configuration (e.g. an empty codec candidate
  /// set, an unknown codec id). Surfaced to the caller; no side effects.
  PreconditionFailure,
  /// A sealed index already exists and `overwrite` was not requested.
  AlreadyExists,
  /// Decode found a stream-length mismatch, a temp run was truncated, or
  /// doc-ids were not strictly increasing. Fatal.
  IntegrityError,
  /// A query term was absent from the vocabulary. Recovered locally by the
  /// evaluator; never meant to escape `browse`.
  NotFound,
  /// The underlying storage failed.
  IoError,
}

/// The error type used in results for all `ix_compress` functionality.
#[derive(Debug)]
pub struct IxError {
  pub kind: IxErrorKind,
  pub message: String,
  source: Option<io::Error>,
}

impl IxError {
  pub(crate) fn new<S: AsRef<str>>(kind: IxErrorKind, message: S) -> Self {
    IxError {
      kind,
      message: message.as_ref().to_string(),
      source: None,
    }
  }

  pub(crate) fn precondition<S: AsRef<str>>(message: S) -> Self {
    Self::new(IxErrorKind::PreconditionFailure, message)
  }

  pub(crate) fn already_exists<S: AsRef<str>>(message: S) -> Self {
    Self::new(IxErrorKind::AlreadyExists, message)
  }

  pub(crate) fn corruption<S: AsRef<str>>(message: S) -> Self {
    Self::new(IxErrorKind::IntegrityError, message)
  }

  pub(crate) fn not_found<S: AsRef<str>>(message: S) -> Self {
    Self::new(IxErrorKind::NotFound, message)
  }

  pub(crate) fn truncated(name: &str, needed: usize, available: usize) -> Self {
    Self::corruption(format!(
      "{}: needed {} bytes but only {} were available",
      name, needed, available,
    ))
  }
}

impl Display for IxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "ix_compress {:?} error: {}", self.kind, &self.message)
  }
}

impl Error for IxError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    self.source.as_ref().map(|e| e as &(dyn Error + 'static))
  }
}

impl From<io::Error> for IxError {
  fn from(e: io::Error) -> Self {
    IxError {
      kind: IxErrorKind::IoError,
      message: e.to_string(),
      source: Some(e),
    }
  }
}

pub type IxResult<T> = Result<T, IxError>;
