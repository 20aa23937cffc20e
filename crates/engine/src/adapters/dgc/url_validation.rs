use url::Url;

use crate::domain::error::{EngineError, EngineResult};

/// Validate an endpoint override before any request is made.
/// HTTPS is always accepted; plain HTTP only when explicitly allowed.
pub fn validate_endpoint_url(url_str: &str, allow_http: bool) -> EngineResult<Url> {
  let url = Url::parse(url_str)
    .map_err(|e| EngineError::Config(format!("invalid endpoint URL {url_str:?}: {e}")))?;
  match url.scheme() {
    "https" => {}
    "http" => {
      if !allow_http {
        return Err(EngineError::Config("HTTP endpoints are not allowed".into()));
      }
    }
    other => return Err(EngineError::Config(format!("unsupported URL scheme {other:?}"))),
  }
  if url.host_str().map_or(true, str::is_empty) {
    return Err(EngineError::Config("endpoint URL missing host".into()));
  }
  if !url.username().is_empty() || url.password().is_some() {
    return Err(EngineError::Config("endpoint URL must not embed credentials".into()));
  }
  Ok(url)
}
