use ciborium::Value;
use openssl::x509::X509;

use super::constants::{ENTRY_CERTIFICATE_KEY, ENTRY_KEY_ID_KEY, TRUST_LIST_CERTIFICATES_KEY};
use crate::domain::error::{EngineError, EngineResult};
use crate::domain::reporter::Reporter;
use crate::domain::trust_list::TrustList;
use crate::domain::types::KeyId;

/// Decode already-authenticated CBOR trust list content into a key id -> certificate map.
///
/// Entries are processed in document order. The first bad entry aborts the whole
/// decode; a repeated key id replaces the earlier certificate and is reported as a warning.
pub fn decode_trust_list(content: &[u8], reporter: &dyn Reporter) -> EngineResult<TrustList> {
  let doc: Value = ciborium::from_reader(content)
    .map_err(|e| EngineError::MalformedTrustList(format!("not CBOR: {e}")))?;
  let top = doc
    .as_map()
    .ok_or_else(|| EngineError::MalformedTrustList("top level is not a map".into()))?;

  let entries = match map_get(top, TRUST_LIST_CERTIFICATES_KEY) {
    Some(Value::Array(entries)) => entries,
    Some(_) => {
      return Err(EngineError::MalformedTrustList(
        "certificate list field \"c\" is not an array".into(),
      ))
    }
    None => {
      return Err(EngineError::MalformedTrustList(
        "missing certificate list field \"c\"".into(),
      ))
    }
  };

  let mut list = TrustList::new();
  for (index, entry) in entries.iter().enumerate() {
    let fields = entry.as_map().ok_or_else(|| {
      EngineError::MalformedTrustList(format!("entry {index} is not a map"))
    })?;

    let key_id = match map_get(fields, ENTRY_KEY_ID_KEY) {
      Some(Value::Bytes(b)) if !b.is_empty() => KeyId::from(b.as_slice()),
      Some(_) => {
        return Err(EngineError::MalformedTrustList(format!(
          "entry {index} key identifier is not a non-empty byte string"
        )))
      }
      None => {
        return Err(EngineError::MalformedTrustList(format!(
          "entry {index} has no key identifier"
        )))
      }
    };

    let der = match map_get(fields, ENTRY_CERTIFICATE_KEY) {
      Some(Value::Bytes(b)) => b,
      Some(_) => {
        return Err(EngineError::MalformedCertificate {
          index,
          reason: "certificate field is not a byte string".into(),
        })
      }
      None => return Err(EngineError::UnsupportedCertificateEncoding { index }),
    };

    let certificate = X509::from_der(der).map_err(|e| EngineError::MalformedCertificate {
      index,
      reason: e.to_string(),
    })?;
    // d2i stops after the first structure; the stored PEM must be exactly the signed bytes.
    if certificate.to_der()? != der.as_slice() {
      return Err(EngineError::MalformedCertificate {
        index,
        reason: "trailing data after DER certificate".into(),
      });
    }

    if list.insert(key_id.clone(), certificate).is_some() {
      reporter.warn(&format!("duplicate certificate with key ID {key_id}"));
    }
  }

  reporter.debug(&format!(
    "decoded {} entries into {} certificates",
    entries.len(),
    list.len()
  ));
  Ok(list)
}

/// Look up a text key in a CBOR map's entries.
fn map_get<'a>(entries: &'a [(Value, Value)], key: &str) -> Option<&'a Value> {
  entries
    .iter()
    .find_map(|(k, v)| if k.as_text() == Some(key) { Some(v) } else { None })
}
