//! `tvsync run` – the full sync.

use anyhow::Result;
use tvsync_core::config::SyncConfig;
use tvsync_core::git::CommitOutcome;
use tvsync_core::index::IndexOutcome;
use tvsync_core::pipeline::{Pipeline, RunOptions};
use tvsync_core::process::SystemRunner;

use super::fetch::print_feeds;

pub fn run_sync(cfg: &SyncConfig, skip_repo_sync: bool, no_commit: bool) -> Result<()> {
    let options = RunOptions {
        skip_repo_sync,
        skip_commit: no_commit,
    };
    let report = Pipeline::new(cfg, &SystemRunner).run(options)?;

    println!("Sync at {}", report.timestamp);
    print_feeds(&report.feeds);
    println!("Copied {} local file(s)", report.local_files.len());
    println!(
        "Merged {} file(s) into {}",
        report.merge.included.len(),
        report.merge.output.display()
    );
    if report.readme.written {
        println!("README updated: {}", report.readme.path.display());
    } else {
        println!("README unchanged (no markers found)");
    }
    match &report.index {
        IndexOutcome::Disabled => {}
        IndexOutcome::Missing(path) => println!("Index script not found: {}", path.display()),
        IndexOutcome::Ran { script, .. } => println!("Index script ran: {}", script.display()),
    }
    match &report.commit {
        None => println!("Commit skipped"),
        Some(CommitOutcome::NothingToCommit) => println!("Nothing to commit"),
        Some(CommitOutcome::Pushed { message }) => println!("Pushed: {}", message),
    }
    Ok(())
}
