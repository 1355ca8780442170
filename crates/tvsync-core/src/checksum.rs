//! Content digests for change detection on feed files.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Digest of the feed stored at `path`, or `None` if there is no such file.
pub fn stored_digest(path: &Path) -> io::Result<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(sha256_hex(&bytes))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Whether writing `data` to `path` would change it. An unreadable file counts as changed.
pub fn differs_from_file(path: &Path, data: &[u8]) -> bool {
    match stored_digest(path) {
        Ok(Some(existing)) => existing != sha256_hex(data),
        Ok(None) => true,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "cannot read previous copy");
            true
        }
    }
}
