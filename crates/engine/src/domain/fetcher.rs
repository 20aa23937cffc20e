// crates/engine/src/domain/fetcher.rs

use super::error::EngineResult;
use super::types::LimitsConfig;

/// Transport that retrieves the raw response body of a trust list endpoint.
/// HTTP today; tests plug in canned responses.
pub trait TrustListFetcher {
    /// Fetch `url`, failing with `EngineError::FetchFailed` on any transport
    /// error, non-success status or oversized body.
    fn fetch(&self, url: &str, limits: &LimitsConfig) -> EngineResult<Vec<u8>>;
}
