//! Feed downloads with bounded retry and cached-copy fallback.
//!
//! Each task is one GET (see [`http::get`]) wrapped in the retry policy. A
//! successful body is written to `<name>.part` and renamed into place. When
//! every attempt fails, an existing file of the same name is kept instead;
//! only a failure with nothing on disk is fatal.

pub mod http;
mod outcome;

pub use outcome::FetchOutcome;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::checksum;
use crate::config::RetryConfig;
use crate::retry::{run_with_retry, FetchError, RetryPolicy};
use crate::url_model;

/// One remote feed: where to get it and the file name to store it under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadTask {
    pub url: String,
    /// Destination name inside the work directory; derived from the URL when omitted.
    #[serde(default)]
    pub filename: Option<String>,
}

impl DownloadTask {
    pub fn new(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            filename: Some(filename.into()),
        }
    }

    pub fn destination_name(&self) -> String {
        match self.filename.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => url_model::derive_filename(&self.url),
        }
    }
}

/// Temp path used before the atomic rename (`hd.txt` → `hd.txt.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(".part");
    PathBuf::from(o)
}

#[derive(Debug, Clone, Copy)]
pub struct Fetcher {
    pub policy: RetryPolicy,
    pub timeout: Duration,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl Fetcher {
    pub fn from_config(cfg: &RetryConfig) -> Self {
        Self {
            policy: RetryPolicy::from(cfg),
            timeout: Duration::from_secs(cfg.timeout_secs.max(1)),
        }
    }

    /// GET `url` under the retry policy; the last error is returned on exhaustion.
    pub fn fetch_with_retry(&self, url: &str, label: &str) -> Result<Vec<u8>, FetchError> {
        run_with_retry(&self.policy, label, |attempt| {
            tracing::debug!(url = %url, attempt, "GET");
            http::get(url, self.timeout)
        })
    }

    /// Download `task` into `dest_dir`, falling back to the existing copy on failure.
    pub fn fetch_task(&self, task: &DownloadTask, dest_dir: &Path) -> FetchOutcome {
        let name = task.destination_name();
        let path = dest_dir.join(&name);

        let failure = match self.fetch_with_retry(&task.url, &name) {
            Ok(body) => match store(&path, &body) {
                Ok(changed) => {
                    tracing::info!(
                        file = %name,
                        path = %path.display(),
                        bytes = body.len(),
                        changed,
                        "downloaded feed"
                    );
                    return FetchOutcome::Fetched {
                        path,
                        bytes: body.len() as u64,
                        changed,
                    };
                }
                Err(e) => format!("write {}: {}", path.display(), e),
            },
            Err(e) => format!("GET {}: {}", task.url, e),
        };

        tracing::warn!(file = %name, reason = %failure, "download failed");
        if path.is_file() {
            tracing::info!(file = %name, "using existing local copy");
            FetchOutcome::UsedCachedFallback {
                path,
                reason: failure,
            }
        } else {
            tracing::error!(file = %name, "no local copy to fall back to");
            FetchOutcome::Fatal { reason: failure }
        }
    }
}

/// Write `body` to `path` atomically. Returns whether the content changed.
fn store(path: &Path, body: &[u8]) -> std::io::Result<bool> {
    let changed = checksum::differs_from_file(path, body);
    let tmp = temp_path(path);
    fs::write(&tmp, body)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(changed)
}
