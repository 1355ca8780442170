//! `tvsync config` – print the effective configuration.

use anyhow::Result;
use std::path::Path;
use tvsync_core::config::{self, SyncConfig};

pub fn run_show_config(cfg: &SyncConfig, explicit: Option<&Path>) -> Result<()> {
    let source = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# {}", source.display());
    print!("{}", cfg.to_toml()?);
    Ok(())
}
