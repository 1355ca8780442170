//! `tvsync readme` – stamp the README markers with the current time.

use anyhow::Result;
use tvsync_core::config::SyncConfig;
use tvsync_core::pipeline::Pipeline;
use tvsync_core::process::SystemRunner;

pub fn run_readme(cfg: &SyncConfig) -> Result<()> {
    let pipeline = Pipeline::new(cfg, &SystemRunner);
    let timestamp = pipeline.timestamp()?;
    let update = pipeline.update_readme(&timestamp)?;
    for m in &update.markers {
        println!("{:<16} {}", m.name, if m.count > 0 { "updated" } else { "not found" });
    }
    if !update.written {
        println!("{} unchanged", update.path.display());
    }
    Ok(())
}
