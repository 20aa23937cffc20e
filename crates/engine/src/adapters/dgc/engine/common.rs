// adapters/dgc/engine/common.rs

use std::path::Path;

use openssl::x509::X509;
use tokio::runtime::RuntimeFlavor;

use crate::domain::error::{EngineError, EngineResult};

/// Load the pinned root certificate (PEM) for a country.
pub fn load_trust_anchor(path: &Path) -> EngineResult<X509> {
  let pem = match std::fs::read(path) {
    Ok(pem) => pem,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
      return Err(EngineError::TrustAnchorMissing(path.to_path_buf()));
    }
    Err(e) => return Err(EngineError::Io(e)),
  };
  X509::from_pem(&pem).map_err(|e| EngineError::InvalidTrustAnchor {
    path: path.to_path_buf(),
    reason: e.to_string(),
  })
}

pub fn run_on_current_thread<F, T>(fut: F) -> EngineResult<T>
where
  F: std::future::Future<Output = EngineResult<T>> + Send,
  T: Send,
{
  match tokio::runtime::Handle::try_current() {
    // Multi-thread runtime: block this worker instead of nesting.
    Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
      tokio::task::block_in_place(|| handle.block_on(fut))
    }
    // Current-thread runtime cannot block in place; drive the future on a helper thread.
    Ok(_) => std::thread::scope(|scope| {
      scope
        .spawn(move || block_on_fresh_runtime(fut))
        .join()
        .unwrap_or_else(|_| Err(EngineError::Config("runtime helper thread panicked".into())))
    }),
    Err(_) => block_on_fresh_runtime(fut),
  }
}

fn block_on_fresh_runtime<F, T>(fut: F) -> EngineResult<T>
where
  F: std::future::Future<Output = EngineResult<T>>,
{
  let rt = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .map_err(|e| EngineError::Config(format!("Failed to create tokio runtime: {}", e)))?;
  rt.block_on(fut)
}
