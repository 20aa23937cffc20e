use std::io::Write;
use std::path::{Path, PathBuf};

use super::constants::CERT_FILE_EXTENSION;
use crate::domain::error::{EngineError, EngineResult};
use crate::domain::report::{StoreFailure, StoreSummary};
use crate::domain::reporter::Reporter;
use crate::domain::trust_list::{TrustList, TrustedCertificate};
use crate::domain::types::KeyId;

/// Path of the stored PEM for `key_id` inside `destination`.
pub fn certificate_path(destination: &Path, key_id: &KeyId) -> PathBuf {
  destination.join(format!("{}.{}", key_id.to_hex(), CERT_FILE_EXTENSION))
}

/// Write one PEM file per certificate into `destination`.
///
/// Each file is written to a temporary sibling and renamed into place, so a
/// file is either the old or the new content. The batch itself is best
/// effort: a failed file is recorded in the summary and the rest still run.
pub fn store_certificates(
  list: &TrustList,
  destination: &Path,
  reporter: &dyn Reporter,
) -> EngineResult<StoreSummary> {
  std::fs::create_dir_all(destination)?;

  let mut summary = StoreSummary {
    discovered: list.len(),
    ..Default::default()
  };

  for entry in list.iter() {
    let path = certificate_path(destination, &entry.key_id);
    reporter.info(&format!("writing certificate with key ID {}", entry.key_id));
    match write_pem(entry, &path) {
      Ok(()) => summary.written.push(path),
      Err(e) => {
        reporter.warn(&e.to_string());
        summary.failures.push(StoreFailure {
          key_id: entry.key_id.clone(),
          path,
          reason: e.to_string(),
        });
      }
    }
  }

  reporter.info(&format!(
    "done saving certificates: wrote {} of {}",
    summary.written_count(),
    summary.discovered
  ));
  Ok(summary)
}

fn write_pem(entry: &TrustedCertificate, path: &Path) -> EngineResult<()> {
  let failed = |reason: String| EngineError::StoreWriteFailed {
    path: path.to_path_buf(),
    reason,
  };

  let pem = entry
    .certificate
    .to_pem()
    .map_err(|e| failed(format!("PEM encoding: {e}")))?;
  let dir = path
    .parent()
    .ok_or_else(|| failed("path has no parent directory".into()))?;

  let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| failed(e.to_string()))?;
  tmp.write_all(&pem).map_err(|e| failed(e.to_string()))?;
  tmp.as_file().sync_all().map_err(|e| failed(e.to_string()))?;
  set_public_permissions(tmp.path()).map_err(|e| failed(e.to_string()))?;
  tmp.persist(path).map_err(|e| failed(e.error.to_string()))?;
  Ok(())
}

#[cfg(unix)]
fn set_public_permissions(path: &Path) -> std::io::Result<()> {
  use std::os::unix::fs::PermissionsExt;
  std::fs::set_permissions(path, std::fs::Permissions::from_mode(super::constants::CERT_FILE_MODE))
}

#[cfg(not(unix))]
fn set_public_permissions(_path: &Path) -> std::io::Result<()> {
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn path_is_lowercase_hex_with_pem_extension() {
    let p = certificate_path(Path::new("/tmp/certs"), &KeyId::new(vec![0xAB, 0x01, 0xFF]));
    assert_eq!(p, PathBuf::from("/tmp/certs/ab01ff.pem"));
  }
}
