// crates/engine/src/lib.rs

//! Public facade for the DCC trust list fetcher.
//! Downloads a country's signed trust list, verifies it against the pinned
//! root certificate and stores every signing certificate as PEM.

pub mod adapters;
pub mod crypto;
pub mod domain;

use domain::error::EngineResult;
use domain::fetcher::TrustListFetcher;
use domain::report::FetchReport;
use domain::reporter::Reporter;

/// Run one fetch-verify-store cycle over HTTP, logging through `tracing`.
pub fn fetch_certificates(cfg: &FetchConfig) -> EngineResult<FetchReport> {
    adapters::dgc::Dgc::fetch(cfg)
}

/// Run one cycle with a caller-supplied transport and reporter.
pub fn fetch_certificates_with(
    cfg: &FetchConfig,
    fetcher: &dyn TrustListFetcher,
    reporter: &dyn Reporter,
) -> EngineResult<FetchReport> {
    adapters::dgc::Dgc::fetch_with(cfg, fetcher, reporter)
}

// Re-exports for convenience
pub use adapters::dgc::{decode_trust_list, parse_masterdata, store_certificates, HttpFetcher};
pub use crypto::cose_key::{verification_key_from_certificate, VerificationKey};
pub use crypto::verifier::verify_trust_list_signature;
pub use domain::error::EngineError;
pub use domain::report::{StoreFailure, StoreSummary};
pub use domain::reporter::{MemoryReporter, TracingReporter};
pub use domain::trust_list::{TrustList, TrustedCertificate};
pub use domain::types::{Country, EcCurve, FetchConfig, KeyId, LimitsConfig};
