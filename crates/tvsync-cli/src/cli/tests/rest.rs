//! Tests for fetch, merge, readme, config and the global --config option.

use super::{parse, parse_full};
use crate::cli::CliCommand;
use std::path::Path;

#[test]
fn cli_parse_fetch() {
    assert!(matches!(parse(&["tvsync", "fetch"]), CliCommand::Fetch));
}

#[test]
fn cli_parse_merge() {
    assert!(matches!(parse(&["tvsync", "merge"]), CliCommand::Merge));
}

#[test]
fn cli_parse_readme() {
    assert!(matches!(parse(&["tvsync", "readme"]), CliCommand::Readme));
}

#[test]
fn cli_parse_config() {
    let cli = parse_full(&["tvsync", "config"]);
    assert!(matches!(cli.command, CliCommand::Config));
    assert!(cli.config.is_none());
}

#[test]
fn cli_parse_global_config_before_subcommand() {
    let cli = parse_full(&["tvsync", "--config", "/etc/tvsync.toml", "fetch"]);
    assert_eq!(cli.config.as_deref(), Some(Path::new("/etc/tvsync.toml")));
    assert!(matches!(cli.command, CliCommand::Fetch));
}

#[test]
fn cli_parse_global_config_after_subcommand() {
    let cli = parse_full(&["tvsync", "run", "--no-commit", "--config", "cfg.toml"]);
    assert_eq!(cli.config.as_deref(), Some(Path::new("cfg.toml")));
    assert!(matches!(cli.command, CliCommand::Run { no_commit: true, .. }));
}

#[test]
fn cli_requires_subcommand() {
    use clap::Parser;
    assert!(crate::cli::Cli::try_parse_from(["tvsync"]).is_err());
}
