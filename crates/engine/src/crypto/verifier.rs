//! COSE_Sign1 verification of a detached trust list payload.

use coset::cbor::value::Value;
use coset::{AsCborValue, CoseSign1};
use openssl::bn::BigNum;
use openssl::ecdsa::EcdsaSig;
use openssl::pkey::{PKeyRef, Public};
use openssl::sign::Verifier;
use openssl::x509::X509Ref;

use super::cose_key::{verification_key_from_certificate, VerificationKey};
use crate::domain::error::{EngineError, EngineResult};
use crate::domain::types::EcCurve;

const TAG_COSE_ENCRYPT0: u64 = 16;
const TAG_COSE_MAC0: u64 = 17;
const TAG_COSE_SIGN1: u64 = 18;
const TAG_COSE_ENCRYPT: u64 = 96;
const TAG_COSE_MAC: u64 = 97;
const TAG_COSE_SIGN: u64 = 98;

/// Decode raw envelope bytes, accepting only a single-signer structure.
pub fn decode_envelope(bytes: &[u8]) -> EngineResult<CoseSign1> {
    let value: Value = coset::cbor::de::from_reader(bytes)
        .map_err(|e| EngineError::InvalidEnvelopeType(format!("not CBOR: {e}")))?;

    let inner = match value {
        Value::Tag(TAG_COSE_SIGN1, inner) => *inner,
        Value::Tag(tag, _) => {
            return Err(EngineError::InvalidEnvelopeType(format!(
                "expected COSE_Sign1, found {}",
                describe_tag(tag)
            )))
        }
        _ => {
            return Err(EngineError::InvalidEnvelopeType(
                "untagged CBOR, expected COSE_Sign1 (tag 18)".into(),
            ))
        }
    };

    CoseSign1::from_cbor_value(inner)
        .map_err(|e| EngineError::InvalidEnvelopeType(format!("not a COSE_Sign1 structure: {e}")))
}

fn describe_tag(tag: u64) -> String {
    match tag {
        TAG_COSE_SIGN => "COSE_Sign (multi-signer)".into(),
        TAG_COSE_MAC0 | TAG_COSE_MAC => "COSE_Mac".into(),
        TAG_COSE_ENCRYPT0 | TAG_COSE_ENCRYPT => "COSE_Encrypt".into(),
        other => format!("CBOR tag {other}"),
    }
}

/// Check `envelope` over the externally supplied `payload` with `key`.
/// The payload is used exactly as given; any embedded payload is ignored.
pub fn verify_detached(
    envelope: &CoseSign1,
    key: &VerificationKey,
    payload: &[u8],
) -> EngineResult<()> {
    if !key.permits_verify() {
        return Err(EngineError::Config("verification key does not permit verify".into()));
    }

    // Only the signed (protected) header may name the algorithm.
    match &envelope.protected.header.alg {
        Some(alg) if *alg == coset::Algorithm::Assigned(key.algorithm) => {}
        Some(alg) => {
            return Err(EngineError::SignatureInvalid(format!(
                "envelope algorithm {alg:?} does not match key algorithm {:?}",
                key.algorithm
            )))
        }
        None => {
            return Err(EngineError::SignatureInvalid(
                "envelope has no protected algorithm".into(),
            ))
        }
    }

    let stripped;
    let envelope = if envelope.payload.is_some() {
        stripped = CoseSign1 {
            payload: None,
            ..envelope.clone()
        };
        &stripped
    } else {
        envelope
    };

    let pkey = key.to_pkey()?;
    envelope.verify_detached_signature(payload, &[], |sig, tbs_data| {
        verify_raw_ecdsa(&pkey, key.curve, sig, tbs_data)
    })
}

/// COSE carries ECDSA signatures as fixed-width `r || s`; OpenSSL wants DER.
fn verify_raw_ecdsa(
    pkey: &PKeyRef<Public>,
    curve: EcCurve,
    sig: &[u8],
    data: &[u8],
) -> EngineResult<()> {
    let n = curve.coordinate_size();
    if sig.len() != 2 * n {
        return Err(EngineError::SignatureInvalid(format!(
            "signature is {} bytes, expected {}",
            sig.len(),
            2 * n
        )));
    }
    let r = BigNum::from_slice(&sig[..n])?;
    let s = BigNum::from_slice(&sig[n..])?;
    let der = EcdsaSig::from_private_components(r, s)?.to_der()?;

    let mut verifier = Verifier::new(curve.digest(), pkey)?;
    verifier.update(data)?;
    if verifier.verify(&der).unwrap_or(false) {
        Ok(())
    } else {
        Err(EngineError::SignatureInvalid(
            "signature does not match trust list content".into(),
        ))
    }
}

/// Full check of a fetched trust list: decode the envelope, derive the key
/// from the pinned root and verify the content against it.
pub fn verify_trust_list_signature(
    signature: &[u8],
    content: &[u8],
    anchor: &X509Ref,
) -> EngineResult<()> {
    let envelope = decode_envelope(signature)?;
    let key = verification_key_from_certificate(anchor)?;
    verify_detached(&envelope, &key, content)
}
