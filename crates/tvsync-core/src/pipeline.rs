//! The sync run: repository reset, feed downloads, local copy, merge, README
//! timestamps, index script, commit and push.
//!
//! Stages run strictly in order and the first unrecoverable failure stops the
//! run. Nothing is rolled back; files already written stay as they are.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::clock::{self, TimestampError};
use crate::config::SyncConfig;
use crate::fetch::{FetchOutcome, Fetcher};
use crate::git::{CommitOutcome, Git};
use crate::index::{self, IndexOutcome};
use crate::local_sync::{self, LocalSyncError};
use crate::merge::{self, MergeError, MergeReport};
use crate::process::{CommandError, CommandRunner};
use crate::readme::{self, ReadmeError, ReadmeUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RepoSync,
    Fetch,
    LocalCopy,
    Merge,
    UpdateReadme,
    IndexUpdate,
    CommitPush,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::RepoSync => "repository sync",
            Stage::Fetch => "fetch",
            Stage::LocalCopy => "local copy",
            Stage::Merge => "merge",
            Stage::UpdateReadme => "README update",
            Stage::IndexUpdate => "index update",
            Stage::CommitPush => "commit/push",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("{file}: download failed and no local copy exists ({reason})")]
    Feed { file: String, reason: String },
    #[error(transparent)]
    LocalSync(#[from] LocalSyncError),
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error(transparent)]
    Readme(#[from] ReadmeError),
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}

#[derive(Debug, Error)]
#[error("{stage} failed")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

impl PipelineError {
    fn at(stage: Stage) -> impl FnOnce(StageError) -> PipelineError {
        move |source| PipelineError { stage, source }
    }
}

/// Switches for a whole run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Skip the git identity/fetch/reset/clean/pull stage.
    pub skip_repo_sync: bool,
    /// Stop after the index update; nothing is committed or pushed.
    pub skip_commit: bool,
}

#[derive(Debug, Clone)]
pub struct FeedReport {
    pub file: String,
    pub outcome: FetchOutcome,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub timestamp: String,
    pub feeds: Vec<FeedReport>,
    pub local_files: Vec<PathBuf>,
    pub merge: MergeReport,
    pub readme: ReadmeUpdate,
    pub index: IndexOutcome,
    /// `None` when the commit stage was skipped.
    pub commit: Option<CommitOutcome>,
}

/// One configured sync run. Each stage is public so the CLI can run it alone.
pub struct Pipeline<'a, R: CommandRunner + ?Sized> {
    config: &'a SyncConfig,
    runner: &'a R,
    fetcher: Fetcher,
}

impl<'a, R: CommandRunner + ?Sized> Pipeline<'a, R> {
    pub fn new(config: &'a SyncConfig, runner: &'a R) -> Self {
        Self {
            config,
            runner,
            fetcher: Fetcher::from_config(&config.retry),
        }
    }

    /// Replace the fetcher (retry policy, timeout).
    pub fn with_fetcher(mut self, fetcher: Fetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn timestamp(&self) -> Result<String, PipelineError> {
        clock::now(&self.config.time_format)
            .map_err(StageError::from)
            .map_err(PipelineError::at(Stage::UpdateReadme))
    }

    pub fn sync_repository(&self) -> Result<(), PipelineError> {
        let root = self.config.repo_root();
        let git = Git::new(self.runner, &root);
        let cfg = &self.config.git;
        git.set_identity(&cfg.user_name, &cfg.user_email)
            .and_then(|()| git.sync_to_remote(&cfg.remote, &cfg.branch))
            .map_err(StageError::from)
            .map_err(PipelineError::at(Stage::RepoSync))
    }

    /// Downloads every feed in order. Stops at the first feed that failed
    /// with no local copy; earlier feeds keep their fresh content.
    pub fn fetch_feeds(&self) -> Result<Vec<FeedReport>, PipelineError> {
        let mut reports = Vec::with_capacity(self.config.downloads.len());
        for task in &self.config.downloads {
            let file = task.destination_name();
            let outcome = self.fetcher.fetch_task(task, &self.config.work_dir);
            if let FetchOutcome::Fatal { reason } = outcome {
                return Err(PipelineError {
                    stage: Stage::Fetch,
                    source: StageError::Feed { file, reason },
                });
            }
            reports.push(FeedReport { file, outcome });
        }
        Ok(reports)
    }

    pub fn copy_local_files(&self) -> Result<Vec<PathBuf>, PipelineError> {
        local_sync::copy_local_files(
            &self.config.local_source_dir,
            &self.config.local_files,
            &self.config.work_dir,
        )
        .map_err(StageError::from)
        .map_err(PipelineError::at(Stage::LocalCopy))
    }

    pub fn merge(&self) -> Result<MergeReport, PipelineError> {
        merge::merge_files(
            &self.config.work_dir,
            &self.config.merge.entries,
            &self.config.merge_output_path(),
        )
        .map_err(StageError::from)
        .map_err(PipelineError::at(Stage::Merge))
    }

    pub fn update_readme(&self, timestamp: &str) -> Result<ReadmeUpdate, PipelineError> {
        readme::update_readme(
            &self.config.readme_path(),
            &self.config.readme.markers,
            timestamp,
        )
        .map_err(StageError::from)
        .map_err(PipelineError::at(Stage::UpdateReadme))
    }

    pub fn run_index_update(&self) -> Result<IndexOutcome, PipelineError> {
        index::run_index_script(self.runner, &self.config.index, &self.config.work_dir)
            .map_err(StageError::from)
            .map_err(PipelineError::at(Stage::IndexUpdate))
    }

    pub fn commit_and_push(&self, timestamp: &str) -> Result<CommitOutcome, PipelineError> {
        let root = self.config.repo_root();
        let message = self.config.git.commit_message_at(timestamp);
        Git::new(self.runner, &root)
            .commit_and_push(&message)
            .map_err(StageError::from)
            .map_err(PipelineError::at(Stage::CommitPush))
    }

    /// Runs every stage in order.
    pub fn run(&self, options: RunOptions) -> Result<RunReport, PipelineError> {
        let timestamp = self.timestamp()?;
        tracing::info!(
            work_dir = %self.config.work_dir.display(),
            repo_root = %self.config.repo_root().display(),
            time = %timestamp,
            "sync run starting"
        );

        if options.skip_repo_sync {
            tracing::info!("repository sync skipped");
        } else {
            log_stage(Stage::RepoSync);
            self.sync_repository()?;
        }

        log_stage(Stage::Fetch);
        let feeds = self.fetch_feeds()?;

        log_stage(Stage::LocalCopy);
        let local_files = self.copy_local_files()?;

        log_stage(Stage::Merge);
        let merge = self.merge()?;

        log_stage(Stage::UpdateReadme);
        let readme = self.update_readme(&timestamp)?;

        log_stage(Stage::IndexUpdate);
        let index = self.run_index_update()?;

        let commit = if options.skip_commit {
            tracing::info!("commit skipped");
            None
        } else {
            log_stage(Stage::CommitPush);
            Some(self.commit_and_push(&timestamp)?)
        };

        tracing::info!("sync run finished");
        Ok(RunReport {
            timestamp,
            feeds,
            local_files,
            merge,
            readme,
            index,
            commit,
        })
    }
}

fn log_stage(stage: Stage) {
    tracing::info!(stage = %stage, "stage starting");
}
