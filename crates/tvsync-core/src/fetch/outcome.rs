use std::path::{Path, PathBuf};

/// What happened to one download task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Fresh content was written to `path`.
    Fetched {
        path: PathBuf,
        bytes: u64,
        /// False when the new body is identical to the previous copy.
        changed: bool,
    },
    /// Download failed; the existing copy at `path` is kept.
    UsedCachedFallback { path: PathBuf, reason: String },
    /// Download failed and there is no local copy. Stops the run.
    Fatal { reason: String },
}

impl FetchOutcome {
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchOutcome::Fatal { .. })
    }

    /// Local file backing this outcome, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            FetchOutcome::Fetched { path, .. } | FetchOutcome::UsedCachedFallback { path, .. } => {
                Some(path)
            }
            FetchOutcome::Fatal { .. } => None,
        }
    }
}
