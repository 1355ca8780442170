//! External command execution.
//!
//! Git and the index script run through [`CommandRunner`] so stages can be
//! exercised against a recording fake instead of real processes.

use std::path::Path;
use std::process::Command;
use thiserror::Error;

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {}: {}", exit_label(.exit_code), .stderr.trim())]
    Failed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "signal".to_string(),
    }
}

/// Display form of a command line, used in logs and errors.
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

pub trait CommandRunner {
    /// Run `program args...` in `cwd` and capture its output. Only failure to
    /// launch is an error here; the exit status is left to the caller.
    fn output(&self, program: &str, args: &[&str], cwd: &Path)
        -> Result<CommandOutput, CommandError>;

    /// Like [`output`](Self::output) but a non-zero exit becomes
    /// [`CommandError::Failed`] carrying the captured stderr.
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput, CommandError> {
        let out = self.output(program, args, cwd)?;
        if out.success() {
            Ok(out)
        } else {
            Err(CommandError::Failed {
                command: command_line(program, args),
                exit_code: out.exit_code,
                stderr: out.stderr,
            })
        }
    }
}

/// Runs real processes with `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn output(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
    ) -> Result<CommandOutput, CommandError> {
        let line = command_line(program, args);
        tracing::debug!(command = %line, cwd = %cwd.display(), "running command");
        let out = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|source| CommandError::Spawn {
                command: line.clone(),
                source,
            })?;
        let output = CommandOutput {
            exit_code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        };
        if !output.success() {
            tracing::warn!(command = %line, exit_code = ?output.exit_code, stderr = %output.stderr.trim(), "command failed");
        }
        Ok(output)
    }
}


#[cfg(test)]
mod tests {
    use super::fake::*;
    use super::*;

    #[test]
    fn run_maps_nonzero_exit_to_failed() {
        let runner = RecordingRunner::with(|_, _| failed_output(128, "fatal: not a git repository\n"));
        let err = runner.run("git", &["status"], Path::new(".")).unwrap_err();
        match &err {
            CommandError::Failed {
                command,
                exit_code,
                stderr,
            } => {
                assert_eq!(command, "git status");
                assert_eq!(*exit_code, Some(128));
                assert!(stderr.contains("not a git repository"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "`git status` exited with status 128: fatal: not a git repository"
        );
    }

    #[test]
    fn system_runner_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let out = SystemRunner
            .run("sh", &["-c", "echo hello; echo oops >&2"], dir.path())
            .unwrap();
        assert_eq!(out.exit_code, Some(0));
        assert_eq!(out.stdout, "hello");
        assert_eq!(out.stderr.trim(), "oops");
    }

    #[test]
    fn system_runner_reports_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let err = SystemRunner
            .run("sh", &["-c", "echo broken >&2; exit 3"], dir.path())
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Failed {
                exit_code: Some(3),
                ..
            }
        ));
    }

    #[test]
    fn system_runner_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SystemRunner
            .output("tvsync-definitely-not-a-binary", &[], dir.path())
            .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }
}
