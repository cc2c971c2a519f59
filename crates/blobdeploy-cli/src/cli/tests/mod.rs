//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::{CommandFactory, FromArgMatches};

/// The CLI definition with every `INPUT_*` fallback removed, so parsing only
/// sees `args` even when the tests run inside a GitHub Actions job.
pub(super) fn command_without_env() -> clap::Command {
    let strip = |cmd: clap::Command| cmd.mut_args(|arg| arg.env(None::<&str>));
    Cli::command()
        .mut_subcommand("deploy", strip)
        .mut_subcommand("plan", strip)
}

pub(super) fn parse(args: &[&str]) -> CliCommand {
    let matches = command_without_env().try_get_matches_from(args).unwrap();
    Cli::from_arg_matches(&matches).unwrap().command
}
