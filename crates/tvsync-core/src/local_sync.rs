//! Copy locally produced feeds into the work directory.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocalSyncError {
    #[error("local feed {} not found", .0.display())]
    Missing(PathBuf),
    #[error("copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Copies each of `names` from `source_dir` into `dest_dir`, overwriting.
/// Stops at the first missing or uncopyable file.
pub fn copy_local_files(
    source_dir: &Path,
    names: &[String],
    dest_dir: &Path,
) -> Result<Vec<PathBuf>, LocalSyncError> {
    let mut copied = Vec::with_capacity(names.len());
    for name in names {
        let from = source_dir.join(name);
        let to = dest_dir.join(name);
        if !from.is_file() {
            return Err(LocalSyncError::Missing(from));
        }
        let bytes = fs::copy(&from, &to).map_err(|source| LocalSyncError::Copy {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;
        tracing::debug!(from = %from.display(), to = %to.display(), bytes, "copied local feed");
        copied.push(to);
    }
    tracing::info!(count = copied.len(), source = %source_dir.display(), "local feeds synced");
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_and_overwrites() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fs::write(src.path().join("iptv4.txt"), "new v4").unwrap();
        fs::write(src.path().join("iptv6.txt"), "new v6").unwrap();
        fs::write(dst.path().join("iptv4.txt"), "old").unwrap();

        let names = vec!["iptv4.txt".to_string(), "iptv6.txt".to_string()];
        let copied = copy_local_files(src.path(), &names, dst.path()).unwrap();

        assert_eq!(copied.len(), 2);
        assert_eq!(fs::read_to_string(dst.path().join("iptv4.txt")).unwrap(), "new v4");
        assert_eq!(fs::read_to_string(dst.path().join("iptv6.txt")).unwrap(), "new v6");
    }

    #[test]
    fn missing_source_is_an_error() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let names = vec!["iptv4.m3u".to_string()];
        let err = copy_local_files(src.path(), &names, dst.path()).unwrap_err();
        assert!(matches!(err, LocalSyncError::Missing(ref p) if p.ends_with("iptv4.m3u")));
        assert!(!dst.path().join("iptv4.m3u").exists());
    }
}
