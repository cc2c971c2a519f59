//! A copy tool that spawns nothing and remembers every call.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{copy_args, remove_args, sync_args};
use super::{CopyOptions, CopyTool, SyncOptions};
use crate::error::DeployError;

/// Records rendered argument lists. Exit codes default to 0 and can be set per
/// subcommand (`copy`, `rm`, `sync`) or per copy source.
#[derive(Debug, Default)]
pub struct RecordingTool {
    calls: Mutex<Vec<Vec<String>>>,
    exit_codes: HashMap<&'static str, i32>,
    failing_sources: HashSet<String>,
    unspawnable_sources: HashSet<String>,
}

impl RecordingTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exit_code(mut self, subcommand: &'static str, code: i32) -> Self {
        self.exit_codes.insert(subcommand, code);
        self
    }

    /// Make every `copy` whose source is `src` exit with 1.
    pub fn fail_copy_of(mut self, src: impl Into<String>) -> Self {
        self.failing_sources.insert(src.into());
        self
    }

    /// Make every `copy` whose source is `src` fail as if the binary could not
    /// be started. The call is still recorded.
    pub fn fail_spawn_of(mut self, src: impl Into<String>) -> Self {
        self.unspawnable_sources.insert(src.into());
        self
    }

    /// All invocations so far, in the order they were issued.
    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Vec<String>>> {
        // A panic while holding the lock only happens in a failing test.
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, subcommand: &'static str, args: Vec<String>) -> i32 {
        let code = self.exit_codes.get(subcommand).copied().unwrap_or(0);
        self.lock().push(args);
        code
    }
}

#[async_trait]
impl CopyTool for RecordingTool {
    fn program(&self) -> &str {
        "azcopy"
    }

    async fn copy(&self, src: &str, dst: &str, options: &CopyOptions) -> Result<i32, DeployError> {
        let code = self.record("copy", copy_args(src, dst, options));
        if self.unspawnable_sources.contains(src) {
            return Err(DeployError::Tool {
                program: self.program().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
            });
        }
        if self.failing_sources.contains(src) {
            return Ok(1);
        }
        Ok(code)
    }

    async fn remove(&self, dst: &str, recursive: bool) -> Result<i32, DeployError> {
        Ok(self.record("rm", remove_args(dst, recursive)))
    }

    async fn sync(&self, src: &str, dst: &str, options: &SyncOptions) -> Result<i32, DeployError> {
        Ok(self.record("sync", sync_args(src, dst, options)))
    }
}
