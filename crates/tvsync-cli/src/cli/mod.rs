//! CLI for the tvsync channel-list sync tool.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tvsync_core::config::{self, SyncConfig};

use commands::{run_fetch, run_merge, run_readme, run_show_config, run_sync};

/// Top-level CLI for tvsync.
#[derive(Debug, Parser)]
#[command(name = "tvsync")]
#[command(about = "tvsync: keep an IPTV channel-list repository in sync", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/tvsync/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run the full sync: reset repo, fetch feeds, copy local files, merge, stamp README, commit and push.
    Run {
        /// Do not fetch/reset/clean/pull the repository first.
        #[arg(long)]
        skip_repo_sync: bool,
        /// Stop before committing and pushing.
        #[arg(long)]
        no_commit: bool,
    },

    /// Download the remote feeds only (retry and cached fallback apply).
    Fetch,

    /// Merge the feed files into the combined list only.
    Merge,

    /// Stamp the README update-time markers with the current time.
    Readme,

    /// Print the effective configuration.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                skip_repo_sync,
                no_commit,
            } => run_sync(&cfg, skip_repo_sync, no_commit)?,
            CliCommand::Fetch => run_fetch(&cfg)?,
            CliCommand::Merge => run_merge(&cfg)?,
            CliCommand::Readme => run_readme(&cfg)?,
            CliCommand::Config => run_show_config(&cfg, cli.config.as_deref())?,
        }

        Ok(())
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<SyncConfig> {
    let cfg = match path {
        Some(p) => config::load_from(p)?,
        None => config::load_or_init()?,
    };
    Ok(cfg.resolve_paths(&std::env::current_dir()?))
}

#[cfg(test)]
mod tests;
