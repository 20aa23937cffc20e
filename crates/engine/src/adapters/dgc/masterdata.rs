use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::domain::error::{EngineError, EngineResult};

/// `trustList.timeStamp`, e.g. `2021-10-14T07:00:01.123456`.
pub const LIST_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MasterData {
  #[serde(rename = "epochUTC")]
  epoch_utc: Option<i64>,
  trust_list: Option<RawTrustList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrustList {
  time_stamp: Option<String>,
  trust_list_signature: Option<String>,
  trust_list_content: Option<String>,
}

/// The signed trust list split out of a master data response. Not yet verified.
#[derive(Debug, Clone)]
pub struct SignedTrustList {
  pub epoch: DateTime<Utc>,
  pub list_timestamp: NaiveDateTime,
  /// COSE_Sign1 envelope bytes.
  pub signature: Vec<u8>,
  /// CBOR trust list bytes, exactly as transmitted.
  pub content: Vec<u8>,
}

/// Parse the JSON master data document served by the green check endpoint.
/// Fields other than the trust list are ignored.
pub fn parse_masterdata(body: &[u8]) -> EngineResult<SignedTrustList> {
  let doc: MasterData = serde_json::from_slice(body)
    .map_err(|e| EngineError::MalformedResponse(format!("invalid JSON: {e}")))?;

  let epoch_ms = doc.epoch_utc.ok_or_else(|| missing("epochUTC"))?;
  let epoch = DateTime::<Utc>::from_timestamp_millis(epoch_ms)
    .ok_or_else(|| EngineError::MalformedResponse(format!("epochUTC out of range: {epoch_ms}")))?;

  let list = doc.trust_list.ok_or_else(|| missing("trustList"))?;

  let ts = list.time_stamp.ok_or_else(|| missing("trustList.timeStamp"))?;
  let list_timestamp = NaiveDateTime::parse_from_str(&ts, LIST_TIMESTAMP_FORMAT).map_err(|e| {
    EngineError::MalformedResponse(format!("trustList.timeStamp {ts:?}: {e}"))
  })?;

  let signature = decode_field(
    "trustList.trustListSignature",
    list.trust_list_signature,
  )?;
  let content = decode_field("trustList.trustListContent", list.trust_list_content)?;

  Ok(SignedTrustList {
    epoch,
    list_timestamp,
    signature,
    content,
  })
}

fn decode_field(name: &str, value: Option<String>) -> EngineResult<Vec<u8>> {
  let text = value.ok_or_else(|| missing(name))?;
  STANDARD
    .decode(text.trim())
    .map_err(|e| EngineError::MalformedResponse(format!("{name} is not base64: {e}")))
}

fn missing(name: &str) -> EngineError {
  EngineError::MalformedResponse(format!("missing field {name}"))
}
