use std::path::PathBuf;

use super::core::Country;
use crate::domain::error::EngineResult;

/// Centralized defaults for a fetch cycle.
/// All opinionated defaults should be defined here for consistency.
pub struct FetchDefaults;

impl FetchDefaults {
    pub const COUNTRY: Country = Country::Austria;
    pub const CERTS_DIR: &'static str = "certs";
    pub const ANCHORS_DIR: &'static str = "certs";

    // Security defaults
    pub const ALLOW_INSECURE_HTTP: Option<bool> = None; // HTTPS only
    pub const HAS_ENDPOINT_OVERRIDE: Option<String> = None; // Use the country profile

    // Debugging
    pub const HAS_DUMP_CONTENT: Option<PathBuf> = None;
}

/// Per-cycle limits for the network call.
#[derive(Debug, Clone, Copy)]
pub struct LimitsConfig {
    /// Bound on the whole HTTP exchange.
    pub http_timeout_secs: u64,
    /// Largest response body accepted from the endpoint.
    pub max_response_size: usize,
}

impl LimitsConfig {
    pub fn defaults() -> Self {
        Self {
            http_timeout_secs: 5,
            max_response_size: 16 * 1024 * 1024, // 16 MB
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Configuration for one fetch-verify-store cycle.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub country: Country,
    /// Directory receiving `<key-id>.pem` files.
    pub destination: PathBuf,
    /// Directory holding the bundled trust anchors (`roots/<Country>-prod.pem`).
    pub anchors_dir: PathBuf,
    /// Replace the profile endpoint, e.g. with a mirror.
    pub endpoint_override: Option<String>,
    /// Opt-in: allow plain HTTP for `endpoint_override`.
    pub allow_insecure_http: Option<bool>,
    pub limits: LimitsConfig,
    /// Write the verified raw CBOR trust list here.
    pub dump_content: Option<PathBuf>,
}

impl FetchConfig {
    /// Secure opinionated defaults; caller supplies country and destination.
    pub fn secure_default(country: Country, destination: impl Into<PathBuf>) -> Self {
        Self {
            country,
            destination: destination.into(),
            anchors_dir: PathBuf::from(FetchDefaults::ANCHORS_DIR),
            endpoint_override: FetchDefaults::HAS_ENDPOINT_OVERRIDE,
            allow_insecure_http: FetchDefaults::ALLOW_INSECURE_HTTP,
            limits: LimitsConfig::defaults(),
            dump_content: FetchDefaults::HAS_DUMP_CONTENT,
        }
    }

    /// Like `secure_default`, resolving the country from its name.
    pub fn for_country(country: &str, destination: impl Into<PathBuf>) -> EngineResult<Self> {
        Ok(Self::secure_default(country.parse()?, destination))
    }

    /// Endpoint the cycle will contact.
    pub fn endpoint(&self) -> &str {
        self.endpoint_override
            .as_deref()
            .unwrap_or(self.country.profile().endpoint)
    }

    /// Location of the pinned root certificate for the configured country.
    pub fn trust_anchor_path(&self) -> PathBuf {
        self.anchors_dir.join(self.country.profile().trust_anchor)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::secure_default(FetchDefaults::COUNTRY, FetchDefaults::CERTS_DIR)
    }
}
