//! README timestamp markers.
//!
//! A marker is a span `BEGIN label ... END` inside otherwise untouched text,
//! for example
//!
//! ```text
//! <!-- UPDATE_TIME_IPTV4 -->本次更新时间: 2024-01-01 00:00:00<!-- END_UPDATE_TIME_IPTV4 -->
//! ```
//!
//! Each marker is matched non-greedily on a single line and rewritten with the
//! run timestamp. Markers are independent: a missing one is left alone.

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadmeMarker {
    /// Name used in logs and reports.
    pub name: String,
    pub begin: String,
    pub end: String,
    /// Text between `begin` and the timestamp; kept on rewrite.
    #[serde(default)]
    pub label: String,
}

impl ReadmeMarker {
    /// Marker using the `<!-- UPDATE_TIME_<TAG> -->` / `<!-- END_UPDATE_TIME_<TAG> -->` sentinels.
    pub fn tagged(tag: &str, label: &str) -> Self {
        Self {
            name: tag.to_string(),
            begin: format!("<!-- UPDATE_TIME_{} -->", tag),
            end: format!("<!-- END_UPDATE_TIME_{} -->", tag),
            label: label.to_string(),
        }
    }

    fn pattern(&self) -> Result<Regex, regex::Error> {
        Regex::new(&format!(
            "{}{}.*?{}",
            regex::escape(&self.begin),
            regex::escape(&self.label),
            regex::escape(&self.end)
        ))
    }

    fn replacement(&self, timestamp: &str) -> String {
        format!("{}{} {}{}", self.begin, self.label, timestamp, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerUpdate {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeUpdate {
    pub path: PathBuf,
    pub markers: Vec<MarkerUpdate>,
    /// True when at least one marker matched and the file was rewritten.
    pub written: bool,
}

#[derive(Debug, Error)]
pub enum ReadmeError {
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
    #[error("marker {name}: {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// Rewrites every marker in `content` with `timestamp`.
/// Returns the new text and the per-marker match counts.
pub fn apply_markers(
    content: &str,
    markers: &[ReadmeMarker],
    timestamp: &str,
) -> Result<(String, Vec<MarkerUpdate>), ReadmeError> {
    let mut text = content.to_string();
    let mut updates = Vec::with_capacity(markers.len());
    for marker in markers {
        let re = marker.pattern().map_err(|source| ReadmeError::Pattern {
            name: marker.name.clone(),
            source,
        })?;
        let count = re.find_iter(&text).count();
        if count > 0 {
            let replacement = marker.replacement(timestamp);
            text = re.replace_all(&text, NoExpand(&replacement)).into_owned();
        }
        updates.push(MarkerUpdate {
            name: marker.name.clone(),
            count,
        });
    }
    Ok((text, updates))
}

/// Updates the markers in the README at `path`; writes only when something matched.
pub fn update_readme(
    path: &Path,
    markers: &[ReadmeMarker],
    timestamp: &str,
) -> Result<ReadmeUpdate, ReadmeError> {
    let content = fs::read_to_string(path).map_err(|source| ReadmeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), chars = content.chars().count(), "read README");

    let (updated, counts) = apply_markers(&content, markers, timestamp)?;
    for m in &counts {
        if m.count > 0 {
            tracing::info!(marker = %m.name, count = m.count, "README marker updated");
        } else {
            tracing::warn!(marker = %m.name, "README marker not found");
        }
    }

    let written = counts.iter().any(|m| m.count > 0);
    if written {
        fs::write(path, &updated).map_err(|source| ReadmeError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), chars = updated.chars().count(), "README written");
    } else {
        tracing::info!(path = %path.display(), "no markers found, README unchanged");
    }

    Ok(ReadmeUpdate {
        path: path.to_path_buf(),
        markers: counts,
        written,
    })
}
