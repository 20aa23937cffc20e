// adapters/dgc/engine/mod.rs

use crate::domain::error::EngineResult;
use crate::domain::fetcher::TrustListFetcher;
use crate::domain::report::FetchReport;
use crate::domain::reporter::{Reporter, TracingReporter};
use crate::domain::types::FetchConfig;

mod common;
mod fetch;

pub use common::{load_trust_anchor, run_on_current_thread};
pub use fetch::fetch_certificates_with;

use super::http::HttpFetcher;

/// Entry point for the DGC trust list flow.
pub struct Dgc;

impl Dgc {
  /// Fetch over HTTP and report through `tracing`.
  pub fn fetch(cfg: &FetchConfig) -> EngineResult<FetchReport> {
    let reporter = TracingReporter::new(cfg.country);
    fetch::fetch_certificates_with(cfg, &HttpFetcher, &reporter)
  }

  /// Same cycle with caller-supplied transport and reporter.
  pub fn fetch_with(
    cfg: &FetchConfig,
    fetcher: &dyn TrustListFetcher,
    reporter: &dyn Reporter,
  ) -> EngineResult<FetchReport> {
    fetch::fetch_certificates_with(cfg, fetcher, reporter)
  }
}
