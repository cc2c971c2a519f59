//! Narrow interface over the external copy utility (azcopy).
//!
//! The orchestrator only ever needs three operations and their exit codes.
//! `AzCopy` runs the real binary; `RecordingTool` records what would run and
//! backs both `plan` and the tests.

mod azcopy;
mod recording;

use async_trait::async_trait;

use crate::error::DeployError;

pub use azcopy::{default_program, AzCopy};
pub use recording::RecordingTool;

/// Flags for a `copy` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyOptions {
    pub recursive: bool,
    pub include_pattern: Option<String>,
    pub cache_control: Option<String>,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
}

/// Flags for a `sync` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOptions {
    pub delete_destination: bool,
    pub exclude_pattern: Option<String>,
}

/// An external copy tool. Each call returns the process exit code; `Err` means
/// the process could not be run at all.
#[async_trait]
pub trait CopyTool: Send + Sync {
    fn program(&self) -> &str;

    async fn copy(&self, src: &str, dst: &str, options: &CopyOptions) -> Result<i32, DeployError>;

    async fn remove(&self, dst: &str, recursive: bool) -> Result<i32, DeployError>;

    async fn sync(&self, src: &str, dst: &str, options: &SyncOptions) -> Result<i32, DeployError>;
}

pub(crate) fn copy_args(src: &str, dst: &str, options: &CopyOptions) -> Vec<String> {
    let mut args = vec!["copy".to_string(), src.to_string(), dst.to_string()];
    if options.recursive {
        args.push("--recursive".to_string());
    }
    if let Some(pattern) = &options.include_pattern {
        args.push("--include-pattern".to_string());
        args.push(pattern.clone());
    }
    if let Some(cache_control) = &options.cache_control {
        args.push("--cache-control".to_string());
        args.push(cache_control.clone());
    }
    if let Some(content_type) = &options.content_type {
        args.push(format!("--content-type={content_type}"));
    }
    if let Some(encoding) = &options.content_encoding {
        args.push(format!("--content-encoding={encoding}"));
    }
    args
}

pub(crate) fn remove_args(dst: &str, recursive: bool) -> Vec<String> {
    let mut args = vec!["rm".to_string(), dst.to_string()];
    if recursive {
        args.push("--recursive".to_string());
    }
    args
}

pub(crate) fn sync_args(src: &str, dst: &str, options: &SyncOptions) -> Vec<String> {
    let mut args = vec!["sync".to_string(), src.to_string(), dst.to_string()];
    if options.delete_destination {
        args.push("--delete-destination=true".to_string());
    }
    if let Some(pattern) = &options.exclude_pattern {
        args.push("--exclude-pattern".to_string());
        args.push(pattern.clone());
    }
    args
}

/// One printable line for a command, quoting arguments that contain spaces.
pub fn render_command_line(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        if arg.contains(' ') {
            line.push('"');
            line.push_str(arg);
            line.push('"');
        } else {
            line.push_str(arg);
        }
    }
    line
}
