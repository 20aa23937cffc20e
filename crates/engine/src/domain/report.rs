// crates/engine/src/domain/report.rs
use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use super::trust_list::TrustList;
use super::types::{Country, KeyId};

/// A certificate that could not be persisted. Does not abort the batch.
#[derive(Debug, Serialize, Clone)]
pub struct StoreFailure {
    pub key_id: KeyId,
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of writing one trust list to the certificate store.
#[derive(Debug, Serialize, Clone, Default)]
pub struct StoreSummary {
    /// Distinct key identifiers found in the list.
    pub discovered: usize,
    /// Files written, in list order.
    pub written: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<StoreFailure>,
}

impl StoreSummary {
    pub fn written_count(&self) -> usize {
        self.written.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.written.len() == self.discovered
    }
}

/// Result of a complete fetch-verify-store cycle.
#[derive(Debug, Serialize, Clone)]
pub struct FetchReport {
    pub country: Country,
    pub endpoint: String,
    /// Server clock at response time (`epochUTC`).
    pub epoch: DateTime<Utc>,
    /// Publication time of the trust list (`trustList.timeStamp`).
    pub list_timestamp: NaiveDateTime,
    pub key_ids: Vec<KeyId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub duplicates: Vec<KeyId>,
    pub store: StoreSummary,

    #[serde(skip)]
    pub(crate) trust_list: TrustList,
}

impl FetchReport {
    /// The verified certificates, for auditing.
    pub fn trust_list(&self) -> &TrustList {
        &self.trust_list
    }
}
