use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::fetch::DownloadTask;
use crate::merge::MergeEntry;
use crate::readme::ReadmeMarker;

/// Retry policy parameters for feed downloads (`[retry]` in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt; total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// Backoff factor in seconds; the wait after attempt `n` (0-based) is `factor * 2^n`.
    pub backoff_factor_secs: f64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor_secs: 1.0,
            timeout_secs: 30,
        }
    }
}

/// Ordered merge of feed files into one combined list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Output file name, relative to the work directory.
    pub output: String,
    pub entries: Vec<MergeEntry>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        let entry = |filename: &str, token: &str| MergeEntry {
            filename: filename.to_string(),
            token: token.to_string(),
        };
        Self {
            output: "hd.txt".to_string(),
            entries: vec![
                entry("jxyd.txt", "jyd,#genre#"),
                entry("jxdx_hd.txt", "jdx,#genre#"),
                entry("iptv6.txt", "ip6,#genre#"),
                entry("iptv4.txt", "ip4,#genre#"),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadmeConfig {
    /// README path, relative to the repository root.
    pub path: PathBuf,
    pub markers: Vec<ReadmeMarker>,
}

impl Default for ReadmeConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("README.md"),
            markers: vec![
                ReadmeMarker::tagged("IPTV6", "本次更新时间:"),
                ReadmeMarker::tagged("IPTV4", "本次更新时间:"),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    pub remote: String,
    pub branch: String,
    pub user_name: String,
    pub user_email: String,
    /// Commit message; `{time}` is replaced with the run timestamp.
    pub commit_message: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            branch: "master".to_string(),
            user_name: "vbskycn".to_string(),
            user_email: "zhoujie218@gmail.com".to_string(),
            commit_message: "debian100 {time} - 同步IPTV4仓库文件和处理新文件".to_string(),
        }
    }
}

impl GitConfig {
    pub fn commit_message_at(&self, timestamp: &str) -> String {
        self.commit_message.replace("{time}", timestamp)
    }
}

/// External index script run after the README update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Script file name relative to the work directory. `None` disables the step.
    pub script: Option<String>,
    pub interpreter: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            script: Some("update_index.py".to_string()),
            interpreter: "python3".to_string(),
        }
    }
}

/// Run configuration loaded from `~/.config/tvsync/config.toml`.
///
/// Every stage receives this struct by reference; nothing reads global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Directory holding the feed files. Relative paths resolve against the
    /// directory the CLI was started from.
    pub work_dir: PathBuf,
    /// Repository root; defaults to the parent of `work_dir`.
    pub repo_root: Option<PathBuf>,
    /// Directory the locally produced feeds are copied from.
    pub local_source_dir: PathBuf,
    pub local_files: Vec<String>,
    /// strftime format for timestamps in the README and commit message.
    pub time_format: String,
    pub downloads: Vec<DownloadTask>,
    pub merge: MergeConfig,
    pub readme: ReadmeConfig,
    pub git: GitConfig,
    pub index: IndexConfig,
    pub retry: RetryConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        const BASE: &str = "https://mycode.zbds.top/me";
        let downloads = ["jxdx_hd.txt", "jxdx_hd.m3u", "jxyd.txt", "jxyd.m3u"]
            .iter()
            .map(|name| DownloadTask {
                url: format!("{}/{}", BASE, name),
                filename: Some(name.to_string()),
            })
            .collect();
        Self {
            work_dir: PathBuf::from("."),
            repo_root: None,
            local_source_dir: PathBuf::from("/docker/iptv4"),
            local_files: ["iptv4.txt", "iptv4.m3u", "iptv6.txt", "iptv6.m3u"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            time_format: "%Y-%m-%d %H:%M:%S".to_string(),
            downloads,
            merge: MergeConfig::default(),
            readme: ReadmeConfig::default(),
            git: GitConfig::default(),
            index: IndexConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Repository root: explicit setting, else the parent of the work directory.
    pub fn repo_root(&self) -> PathBuf {
        match &self.repo_root {
            Some(root) => root.clone(),
            None => self
                .work_dir
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.work_dir.clone()),
        }
    }

    pub fn readme_path(&self) -> PathBuf {
        self.repo_root().join(&self.readme.path)
    }

    pub fn merge_output_path(&self) -> PathBuf {
        self.work_dir.join(&self.merge.output)
    }

    /// Serialized form, as written by [`load_or_init`].
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Makes `work_dir`, `repo_root` and `local_source_dir` absolute against `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        self.work_dir = absolutize(base, &self.work_dir);
        self.repo_root = self.repo_root.map(|p| absolutize(base, &p));
        self.local_source_dir = absolutize(base, &self.local_source_dir);
        self
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tvsync")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SyncConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SyncConfig::default();
        let toml = default_cfg.to_toml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path. The file must exist.
pub fn load_from(path: &Path) -> Result<SyncConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: SyncConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}
