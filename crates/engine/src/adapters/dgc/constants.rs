// Trust list wire keys
pub const TRUST_LIST_CERTIFICATES_KEY: &str = "c";
pub const ENTRY_KEY_ID_KEY: &str = "i";
pub const ENTRY_CERTIFICATE_KEY: &str = "c";

// Certificate store
pub const CERT_FILE_EXTENSION: &str = "pem";
#[cfg(unix)]
pub const CERT_FILE_MODE: u32 = 0o644; // public certificates: world-readable, owner-writable
