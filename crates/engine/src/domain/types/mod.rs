// Re-export all types so callers can keep using `domain::types::*`
// while the code stays organized internally.

pub use core::*;
pub use profile::*;
pub use config::*;

// Module declarations
mod core;
mod profile;
mod config;
