//! CLI command handlers, one file per command.

mod fetch;
mod merge;
mod readme;
mod run;
mod show_config;

pub use fetch::run_fetch;
pub use merge::run_merge;
pub use readme::run_readme;
pub use run::run_sync;
pub use show_config::run_show_config;
