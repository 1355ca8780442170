//! Ordered concatenation of feed files into one combined channel list.
//!
//! Every source uses the same `,#genre#` category marker; on merge it is
//! rewritten to the entry's token so the origin of each section stays
//! visible in the combined file.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Literal category marker rewritten per source.
pub const GENRE_MARKER: &str = ",#genre#";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeEntry {
    /// Source file, relative to the work directory.
    pub filename: String,
    /// Replacement for every `,#genre#` in this source.
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub output: PathBuf,
    pub included: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rewrites the genre marker of one source.
pub fn rewrite_markers(content: &str, token: &str) -> String {
    content.replace(GENRE_MARKER, token)
}

/// Merges `entries` (in order) from `dir` into `output`.
///
/// Missing sources are skipped with a warning. Each included source is
/// written with its markers rewritten, followed by a newline. Invalid UTF-8
/// is replaced with U+FFFD rather than failing the merge.
pub fn merge_files(
    dir: &Path,
    entries: &[MergeEntry],
    output: &Path,
) -> Result<MergeReport, MergeError> {
    let mut merged = String::new();
    let mut included = Vec::new();
    let mut skipped = Vec::new();

    for entry in entries {
        let path = dir.join(&entry.filename);
        if !path.is_file() {
            tracing::warn!(path = %path.display(), "merge source missing, skipped");
            skipped.push(entry.filename.clone());
            continue;
        }
        let bytes = fs::read(&path).map_err(|source| MergeError::Read {
            path: path.clone(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = content {
            tracing::warn!(path = %path.display(), "invalid UTF-8 in merge source, bytes replaced");
        }
        merged.push_str(&rewrite_markers(&content, &entry.token));
        merged.push('\n');
        included.push(entry.filename.clone());
    }

    fs::write(output, &merged).map_err(|source| MergeError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    tracing::info!(
        output = %output.display(),
        included = included.len(),
        skipped = skipped.len(),
        "merged feeds"
    );

    Ok(MergeReport {
        output: output.to_path_buf(),
        included,
        skipped,
    })
}
