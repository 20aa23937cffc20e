//! Key adapter: X.509 public key -> COSE verification key.
//! Only EC2 keys on allow-listed curves are accepted.

use coset::{iana, CoseKey, CoseKeyBuilder};
use openssl::bn::{BigNum, BigNumContext};
use openssl::ec::{EcGroup, EcKey};
use openssl::pkey::{Id, PKey, PKeyRef, Public};
use openssl::x509::X509Ref;

use crate::domain::error::{EngineError, EngineResult};
use crate::domain::types::EcCurve;

/// Elliptic-curve public key in the shape the COSE layer verifies with.
/// Derived per verification call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationKey {
    pub curve: EcCurve,
    pub algorithm: iana::Algorithm,
    /// Big-endian, exactly `curve.coordinate_size()` bytes.
    pub x: Vec<u8>,
    /// Big-endian, exactly `curve.coordinate_size()` bytes.
    pub y: Vec<u8>,
    pub key_ops: Vec<iana::KeyOperation>,
}

impl VerificationKey {
    pub fn permits_verify(&self) -> bool {
        self.key_ops.contains(&iana::KeyOperation::Verify)
    }

    /// Rebuild an OpenSSL public key from the stored coordinates.
    pub fn to_pkey(&self) -> EngineResult<PKey<Public>> {
        let group = EcGroup::from_curve_name(self.curve.nid())?;
        let x = BigNum::from_slice(&self.x)?;
        let y = BigNum::from_slice(&self.y)?;
        let ec = EcKey::from_public_key_affine_coordinates(&group, &x, &y)?;
        ec.check_key()?;
        Ok(PKey::from_ec_key(ec)?)
    }

    /// COSE_Key (EC2) representation of this key.
    pub fn to_cose_key(&self) -> CoseKey {
        let mut builder =
            CoseKeyBuilder::new_ec2_pub_key(self.curve.cose_curve(), self.x.clone(), self.y.clone())
                .algorithm(self.algorithm);
        for op in &self.key_ops {
            builder = builder.add_key_op(*op);
        }
        builder.build()
    }
}

/// Derive the verification key from a certificate's subject public key.
pub fn verification_key_from_certificate(cert: &X509Ref) -> EngineResult<VerificationKey> {
    let public_key = cert.public_key()?;
    verification_key_from_public_key(&public_key)
}

pub fn verification_key_from_public_key(public_key: &PKeyRef<Public>) -> EngineResult<VerificationKey> {
    if public_key.id() != Id::EC {
        return Err(EngineError::UnsupportedKeyType(describe_key_type(public_key.id())));
    }
    let ec = public_key.ec_key()?;
    let group = ec.group();

    let curve_name = match group.curve_name() {
        Some(nid) => nid.short_name()?.to_string(),
        None => return Err(EngineError::UnsupportedCurve("unnamed curve parameters".into())),
    };
    let curve = EcCurve::from_name(&curve_name)
        .ok_or_else(|| EngineError::UnsupportedCurve(curve_name.clone()))?;

    let mut ctx = BigNumContext::new()?;
    let mut x = BigNum::new()?;
    let mut y = BigNum::new()?;
    ec.public_key()
        .affine_coordinates_gfp(group, &mut x, &mut y, &mut ctx)?;

    let size = curve.coordinate_size() as i32;
    Ok(VerificationKey {
        curve,
        algorithm: curve.algorithm(),
        x: x.to_vec_padded(size)?,
        y: y.to_vec_padded(size)?,
        key_ops: vec![iana::KeyOperation::Verify],
    })
}

fn describe_key_type(id: Id) -> String {
    match id {
        Id::RSA => "RSA".into(),
        Id::DSA => "DSA".into(),
        other => format!("key type id {}", other.as_raw()),
    }
}
