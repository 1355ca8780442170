//! Optional external index script, run after the README update.

use std::path::{Path, PathBuf};

use crate::config::IndexConfig;
use crate::process::{CommandError, CommandRunner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    /// No script configured.
    Disabled,
    /// Script configured but not present; the run continues.
    Missing(PathBuf),
    Ran { script: PathBuf, stdout: String },
}

/// Runs `<interpreter> <work_dir>/<script>` in `work_dir` if the script exists.
/// A non-zero exit is returned as an error.
pub fn run_index_script<R: CommandRunner + ?Sized>(
    runner: &R,
    cfg: &IndexConfig,
    work_dir: &Path,
) -> Result<IndexOutcome, CommandError> {
    let Some(script) = cfg.script.as_deref() else {
        return Ok(IndexOutcome::Disabled);
    };
    let path = work_dir.join(script);
    if !path.is_file() {
        tracing::warn!(script = %path.display(), "index script not found, skipped");
        return Ok(IndexOutcome::Missing(path));
    }

    let script_arg = path.to_string_lossy();
    let out = runner.run(&cfg.interpreter, &[&*script_arg], work_dir)?;
    tracing::info!(script = %path.display(), "index script finished");
    Ok(IndexOutcome::Ran {
        script: path,
        stdout: out.stdout,
    })
}
