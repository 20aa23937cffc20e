// crates/engine/src/domain/trust_list.rs

use std::collections::HashMap;

use openssl::x509::X509;

use super::types::KeyId;

/// A certificate taken from a verified trust list.
#[derive(Clone)]
pub struct TrustedCertificate {
    pub key_id: KeyId,
    pub certificate: X509,
}

impl std::fmt::Debug for TrustedCertificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustedCertificate")
            .field("key_id", &self.key_id.to_hex())
            .finish_non_exhaustive()
    }
}

/// Key identifier -> certificate mapping produced by one fetch cycle.
///
/// Iteration follows the order identifiers were first seen. Inserting an
/// identifier again replaces the certificate in place (last wins) and the
/// identifier is remembered in `duplicates()`.
#[derive(Debug, Clone, Default)]
pub struct TrustList {
    entries: Vec<TrustedCertificate>,
    index: HashMap<KeyId, usize>,
    duplicates: Vec<KeyId>,
}

impl TrustList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a certificate, returning the one it replaced, if any.
    pub fn insert(&mut self, key_id: KeyId, certificate: X509) -> Option<X509> {
        match self.index.get(&key_id) {
            Some(&pos) => {
                self.duplicates.push(key_id);
                Some(std::mem::replace(&mut self.entries[pos].certificate, certificate))
            }
            None => {
                self.index.insert(key_id.clone(), self.entries.len());
                self.entries.push(TrustedCertificate { key_id, certificate });
                None
            }
        }
    }

    pub fn get(&self, key_id: &KeyId) -> Option<&X509> {
        self.index.get(key_id).map(|&pos| &self.entries[pos].certificate)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrustedCertificate> {
        self.entries.iter()
    }

    pub fn key_ids(&self) -> impl Iterator<Item = &KeyId> {
        self.entries.iter().map(|e| &e.key_id)
    }

    /// Identifiers that appeared more than once, one record per repeat.
    pub fn duplicates(&self) -> &[KeyId] {
        &self.duplicates
    }
}
