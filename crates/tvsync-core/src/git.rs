//! Git operations on the enclosing repository, via the `git` binary.

use std::path::Path;

use crate::process::{CommandError, CommandRunner};

/// Result of the commit step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Working tree was clean; nothing was staged, committed or pushed.
    NothingToCommit,
    /// Changes were committed and pushed.
    Pushed { message: String },
}

/// Git commands bound to one repository root.
pub struct Git<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    repo_root: &'a Path,
}

impl<'a, R: CommandRunner + ?Sized> Git<'a, R> {
    pub fn new(runner: &'a R, repo_root: &'a Path) -> Self {
        Self { runner, repo_root }
    }

    fn git(&self, args: &[&str]) -> Result<String, CommandError> {
        Ok(self.runner.run("git", args, self.repo_root)?.stdout)
    }

    pub fn set_identity(&self, name: &str, email: &str) -> Result<(), CommandError> {
        self.git(&["config", "user.name", name])?;
        self.git(&["config", "user.email", email])?;
        Ok(())
    }

    /// Discard local changes and bring the checkout to `<remote>/<branch>`.
    pub fn sync_to_remote(&self, remote: &str, branch: &str) -> Result<(), CommandError> {
        let upstream = format!("{}/{}", remote, branch);
        self.git(&["fetch", remote])?;
        self.git(&["reset", "--hard", &upstream])?;
        self.git(&["clean", "-fd"])?;
        self.git(&["pull"])?;
        tracing::info!(repo = %self.repo_root.display(), upstream = %upstream, "repository reset to remote head");
        Ok(())
    }

    /// Porcelain status; empty when there is nothing to commit.
    pub fn status(&self) -> Result<String, CommandError> {
        self.git(&["status", "--porcelain"])
    }

    /// Stage, commit and push everything, unless the tree is clean.
    pub fn commit_and_push(&self, message: &str) -> Result<CommitOutcome, CommandError> {
        let status = self.status()?;
        if status.trim().is_empty() {
            tracing::info!("nothing to commit");
            return Ok(CommitOutcome::NothingToCommit);
        }
        tracing::debug!(status = %status, "pending changes");

        self.git(&["add", "."])?;
        let out = self.git(&["commit", "-m", message])?;
        tracing::debug!(output = %out, "git commit");
        let out = self.git(&["push"])?;
        tracing::debug!(output = %out, "git push");

        tracing::info!(message = %message, "changes committed and pushed");
        Ok(CommitOutcome::Pushed {
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fake::{failed_output, ok_output, RecordingRunner};

    #[test]
    fn clean_tree_skips_add_commit_push() {
        let runner = RecordingRunner::ok();
        let git = Git::new(&runner, Path::new("/repo"));
        let outcome = git.commit_and_push("msg").unwrap();
        assert_eq!(outcome, CommitOutcome::NothingToCommit);
        assert_eq!(runner.calls(), ["git status --porcelain"]);
    }

    #[test]
    fn dirty_tree_adds_commits_and_pushes() {
        let runner = RecordingRunner::with(|_, args| {
            if args.first() == Some(&"status") {
                ok_output(" M tv/hd.txt")
            } else {
                ok_output("")
            }
        });
        let git = Git::new(&runner, Path::new("/repo"));
        let outcome = git.commit_and_push("debian100 2024-01-01 00:00:00").unwrap();
        assert_eq!(
            outcome,
            CommitOutcome::Pushed {
                message: "debian100 2024-01-01 00:00:00".to_string()
            }
        );
        assert_eq!(
            runner.calls(),
            [
                "git status --porcelain",
                "git add .",
                "git commit -m debian100 2024-01-01 00:00:00",
                "git push",
            ]
        );
    }

    #[test]
    fn push_failure_is_reported() {
        let runner = RecordingRunner::with(|_, args| match args.first() {
            Some(&"status") => ok_output("?? new.txt"),
            Some(&"push") => failed_output(1, "rejected"),
            _ => ok_output(""),
        });
        let git = Git::new(&runner, Path::new("/repo"));
        let err = git.commit_and_push("m").unwrap_err();
        assert!(matches!(err, CommandError::Failed { ref stderr, .. } if stderr == "rejected"));
    }

    #[test]
    fn sync_to_remote_runs_in_order() {
        let runner = RecordingRunner::ok();
        let git = Git::new(&runner, Path::new("/repo"));
        git.set_identity("bot", "bot@example.com").unwrap();
        git.sync_to_remote("origin", "master").unwrap();
        assert_eq!(
            runner.calls(),
            [
                "git config user.name bot",
                "git config user.email bot@example.com",
                "git fetch origin",
                "git reset --hard origin/master",
                "git clean -fd",
                "git pull",
            ]
        );
    }

    #[test]
    fn sync_stops_at_first_failure() {
        let runner = RecordingRunner::with(|_, args| {
            if args.first() == Some(&"fetch") {
                failed_output(128, "could not read from remote")
            } else {
                ok_output("")
            }
        });
        let git = Git::new(&runner, Path::new("/repo"));
        assert!(git.sync_to_remote("origin", "master").is_err());
        assert_eq!(runner.calls(), ["git fetch origin"]);
    }
}
