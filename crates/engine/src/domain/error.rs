// crates/engine/src/domain/error.rs
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("unsupported country: {0}")]
  UnsupportedCountry(String),

  #[error("fetch failed: {0}")]
  FetchFailed(String),

  #[error("malformed response: {0}")]
  MalformedResponse(String),

  #[error("trust anchor missing: {}", .0.display())]
  TrustAnchorMissing(PathBuf),

  #[error("invalid trust anchor {}: {reason}", path.display())]
  InvalidTrustAnchor { path: PathBuf, reason: String },

  #[error("unsupported key type: {0}")]
  UnsupportedKeyType(String),

  #[error("unsupported curve: {0}")]
  UnsupportedCurve(String),

  #[error("invalid signature envelope: {0}")]
  InvalidEnvelopeType(String),

  #[error("trust list signature invalid: {0}")]
  SignatureInvalid(String),

  #[error("malformed trust list: {0}")]
  MalformedTrustList(String),

  #[error("malformed certificate in entry {index}: {reason}")]
  MalformedCertificate { index: usize, reason: String },

  #[error("entry {index} does not carry a DER certificate")]
  UnsupportedCertificateEncoding { index: usize },

  #[error("failed to write {}: {reason}", path.display())]
  StoreWriteFailed { path: PathBuf, reason: String },

  #[error("crypto: {0}")]
  Crypto(String),

  #[error("configuration: {0}")]
  Config(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error("feature not enabled: {0}")]
  Feature(&'static str),
}

impl EngineError {
  /// Pipeline stage the error aborted, for operator-facing messages.
  pub fn stage(&self) -> &'static str {
    match self {
      EngineError::UnsupportedCountry(_)
      | EngineError::Config(_)
      | EngineError::Feature(_) => "config",
      EngineError::FetchFailed(_) | EngineError::MalformedResponse(_) => "fetch",
      EngineError::TrustAnchorMissing(_)
      | EngineError::InvalidTrustAnchor { .. }
      | EngineError::UnsupportedKeyType(_)
      | EngineError::UnsupportedCurve(_)
      | EngineError::InvalidEnvelopeType(_)
      | EngineError::SignatureInvalid(_)
      | EngineError::Crypto(_) => "verify",
      EngineError::MalformedTrustList(_)
      | EngineError::MalformedCertificate { .. }
      | EngineError::UnsupportedCertificateEncoding { .. } => "decode",
      EngineError::StoreWriteFailed { .. } | EngineError::Io(_) => "store",
    }
  }
}

impl From<openssl::error::ErrorStack> for EngineError {
  fn from(e: openssl::error::ErrorStack) -> Self {
    EngineError::Crypto(e.to_string())
  }
}

pub type EngineResult<T> = Result<T, EngineError>;
