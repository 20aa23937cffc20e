use crate::domain::error::{EngineError, EngineResult};
use crate::domain::fetcher::TrustListFetcher;
use crate::domain::types::LimitsConfig;

#[cfg(feature = "http")]
use super::engine::run_on_current_thread;

/// Plain GET transport. No authentication, no retries.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

impl TrustListFetcher for HttpFetcher {
  fn fetch(&self, url: &str, limits: &LimitsConfig) -> EngineResult<Vec<u8>> {
    #[cfg(not(feature = "http"))]
    {
      let _ = (url, limits);
      return Err(EngineError::Feature("http"));
    }
    #[cfg(feature = "http")]
    {
      run_on_current_thread(get_bytes(url, limits))
    }
  }
}

#[cfg(feature = "http")]
async fn get_bytes(url: &str, limits: &LimitsConfig) -> EngineResult<Vec<u8>> {
  let client = reqwest::Client::builder()
    .timeout(std::time::Duration::from_secs(limits.http_timeout_secs))
    .build()
    .map_err(|e| EngineError::FetchFailed(format!("failed to build HTTP client: {e}")))?;

  let resp = client
    .get(url)
    .header(reqwest::header::ACCEPT, "application/json")
    .send()
    .await
    .map_err(|e| EngineError::FetchFailed(format!("GET {url}: {e}")))?;

  let status = resp.status();
  if !status.is_success() {
    return Err(EngineError::FetchFailed(format!("GET {url} returned {status}")));
  }

  if let Some(len) = resp.content_length() {
    if len > limits.max_response_size as u64 {
      return Err(too_large(url, len as usize, limits));
    }
  }

  let body = resp
    .bytes()
    .await
    .map_err(|e| EngineError::FetchFailed(format!("reading body of {url}: {e}")))?;
  if body.len() > limits.max_response_size {
    return Err(too_large(url, body.len(), limits));
  }
  Ok(body.to_vec())
}

#[cfg(feature = "http")]
fn too_large(url: &str, len: usize, limits: &LimitsConfig) -> EngineError {
  EngineError::FetchFailed(format!(
    "response from {url} is {len} bytes (max: {})",
    limits.max_response_size
  ))
}
