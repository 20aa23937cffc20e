use std::fmt;
use std::str::FromStr;

use coset::iana;
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use serde::{Serialize, Serializer};

use crate::domain::error::EngineError;

/// Countries with a known trust list profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Country {
    Austria,
}

impl Country {
    pub const ALL: &'static [Country] = &[Country::Austria];

    pub fn name(self) -> &'static str {
        match self {
            Country::Austria => "Austria",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Country {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Country::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::UnsupportedCountry(s.to_string()))
    }
}

/// Elliptic curves accepted for trust list signing keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EcCurve {
    P256,
    P384,
}

/// Allow-list from curve name to supported curve. Names are compared
/// case-insensitively; anything not listed here is rejected even when
/// OpenSSL knows the curve.
const CURVE_TABLE: &[(&str, EcCurve)] = &[
    ("prime256v1", EcCurve::P256),
    ("secp256r1", EcCurve::P256),
    ("P-256", EcCurve::P256),
    ("secp384r1", EcCurve::P384),
    ("P-384", EcCurve::P384),
];

impl EcCurve {
    pub fn from_name(name: &str) -> Option<Self> {
        CURVE_TABLE
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, curve)| *curve)
    }

    pub fn nid(self) -> Nid {
        match self {
            EcCurve::P256 => Nid::X9_62_PRIME256V1,
            EcCurve::P384 => Nid::SECP384R1,
        }
    }

    /// Size in bytes of one affine coordinate.
    pub fn coordinate_size(self) -> usize {
        match self {
            EcCurve::P256 => 32,
            EcCurve::P384 => 48,
        }
    }

    /// COSE signature algorithm bound to the curve.
    pub fn algorithm(self) -> iana::Algorithm {
        match self {
            EcCurve::P256 => iana::Algorithm::ES256,
            EcCurve::P384 => iana::Algorithm::ES384,
        }
    }

    pub fn digest(self) -> MessageDigest {
        match self {
            EcCurve::P256 => MessageDigest::sha256(),
            EcCurve::P384 => MessageDigest::sha384(),
        }
    }

    pub fn cose_curve(self) -> iana::EllipticCurve {
        match self {
            EcCurve::P256 => iana::EllipticCurve::P_256,
            EcCurve::P384 => iana::EllipticCurve::P_384,
        }
    }
}

/// Key identifier of a trust list entry. Not guaranteed unique within a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(Vec<u8>);

impl KeyId {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex form, also used as the stored file stem.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<Vec<u8>> for KeyId {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl From<&[u8]> for KeyId {
    fn from(v: &[u8]) -> Self {
        Self(v.to_vec())
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for KeyId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
