//! `tvsync merge` – rebuild the combined list from the files on disk.

use anyhow::Result;
use tvsync_core::config::SyncConfig;
use tvsync_core::pipeline::Pipeline;
use tvsync_core::process::SystemRunner;

pub fn run_merge(cfg: &SyncConfig) -> Result<()> {
    let report = Pipeline::new(cfg, &SystemRunner).merge()?;
    println!(
        "Merged {} into {}",
        report.included.join(", "),
        report.output.display()
    );
    if !report.skipped.is_empty() {
        println!("Skipped (missing): {}", report.skipped.join(", "));
    }
    Ok(())
}
