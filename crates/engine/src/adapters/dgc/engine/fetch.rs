// adapters/dgc/engine/fetch.rs

use super::super::decoder::decode_trust_list;
use super::super::masterdata::parse_masterdata;
use super::super::store::store_certificates;
use super::super::url_validation::validate_endpoint_url;
use super::common::load_trust_anchor;
use crate::crypto::verifier::verify_trust_list_signature;
use crate::domain::error::EngineResult;
use crate::domain::fetcher::TrustListFetcher;
use crate::domain::report::FetchReport;
use crate::domain::reporter::Reporter;
use crate::domain::types::{FetchConfig, ResponseFormat};

/// One fetch-verify-decode-store cycle.
///
/// Nothing is decoded or written unless the signature over the received
/// content verifies against the country's pinned root.
pub fn fetch_certificates_with(
  cfg: &FetchConfig,
  fetcher: &dyn TrustListFetcher,
  reporter: &dyn Reporter,
) -> EngineResult<FetchReport> {
  let profile = cfg.country.profile();

  if let Some(url) = &cfg.endpoint_override {
    validate_endpoint_url(url, cfg.allow_insecure_http.unwrap_or(false))?;
  }
  let endpoint = cfg.endpoint().to_string();

  reporter.debug(&format!("fetching trust list for {} from {endpoint}", cfg.country));
  let body = fetcher.fetch(&endpoint, &cfg.limits)?;

  let signed = match profile.format {
    ResponseFormat::GreenCheckMasterData => parse_masterdata(&body)?,
  };
  reporter.info(&format!(
    "server time {}, trust list published {}",
    signed.epoch, signed.list_timestamp
  ));

  let anchor = load_trust_anchor(&cfg.trust_anchor_path())?;
  verify_trust_list_signature(&signed.signature, &signed.content, &anchor)?;
  reporter.info(&format!("signature of {endpoint} verified ok"));

  if let Some(path) = &cfg.dump_content {
    std::fs::write(path, &signed.content)?;
    reporter.debug(&format!("wrote trust list content to {}", path.display()));
  }

  let trust_list = decode_trust_list(&signed.content, reporter)?;
  let store = store_certificates(&trust_list, &cfg.destination, reporter)?;

  Ok(FetchReport {
    country: cfg.country,
    endpoint,
    epoch: signed.epoch,
    list_timestamp: signed.list_timestamp,
    key_ids: trust_list.key_ids().cloned().collect(),
    duplicates: trust_list.duplicates().to_vec(),
    store,
    trust_list,
  })
}
