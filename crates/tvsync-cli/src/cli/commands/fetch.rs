//! `tvsync fetch` – download the remote feeds only.

use anyhow::Result;
use tvsync_core::config::SyncConfig;
use tvsync_core::fetch::FetchOutcome;
use tvsync_core::pipeline::{FeedReport, Pipeline};
use tvsync_core::process::SystemRunner;

pub fn run_fetch(cfg: &SyncConfig) -> Result<()> {
    let feeds = Pipeline::new(cfg, &SystemRunner).fetch_feeds()?;
    print_feeds(&feeds);
    Ok(())
}

pub(super) fn print_feeds(feeds: &[FeedReport]) {
    for feed in feeds {
        let status = match &feed.outcome {
            FetchOutcome::Fetched { changed: true, bytes, .. } => format!("updated ({} bytes)", bytes),
            FetchOutcome::Fetched { changed: false, .. } => "unchanged".to_string(),
            FetchOutcome::UsedCachedFallback { reason, .. } => format!("kept local copy ({})", reason),
            FetchOutcome::Fatal { reason } => format!("failed ({})", reason),
        };
        println!("{:<16} {}", feed.file, status);
    }
}
