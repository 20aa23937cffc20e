//! Cryptographic building blocks: key adaptation and COSE signature checks.

pub mod cose_key;
pub mod verifier;
