//! Deployment orchestration: validate, upload immutable assets, wipe the
//! container, upload every file with inferred headers, then optionally sync
//! with delete to drop obsolete blobs.
//!
//! The wipe-then-upload sequence is not atomic: if the run dies between the
//! `rm` and the end of the upload pass the container is left partially
//! populated. Two runs against the same container must not overlap.

mod upload;

use std::sync::Arc;

use crate::config::DeployConfig;
use crate::copy_tool::{CopyOptions, CopyTool, SyncOptions};
use crate::error::DeployError;
use crate::index_rewrite::rewrite_index;
use crate::inputs::DeployInputs;
use crate::workflow::Workflow;

pub use upload::{plan_uploads, run_uploads, UploadJob, UploadOutcome};

const DEPLOY_GROUP: &str = "Deploy new and updated files";
const CLEANUP_GROUP: &str = "Clean up obsolete files";

/// Counts from a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployReport {
    pub files_uploaded: usize,
    /// Copy-tool processes started, across all phases.
    pub invocations: usize,
    pub cleaned_up: bool,
}

pub struct Deployer {
    tool: Arc<dyn CopyTool>,
    config: DeployConfig,
    console: Workflow,
}

impl Deployer {
    pub fn new(tool: Arc<dyn CopyTool>, config: DeployConfig, console: Workflow) -> Self {
        Self {
            tool,
            config,
            console,
        }
    }

    pub fn console_mut(&mut self) -> &mut Workflow {
        &mut self.console
    }

    /// Runs the deployment and reports a failure on the CI console.
    pub async fn run(&mut self, inputs: &DeployInputs) -> Result<DeployReport, DeployError> {
        match self.deploy(inputs).await {
            Ok(report) => Ok(report),
            Err(err) => {
                self.console.set_failed(&err.to_string());
                Err(err)
            }
        }
    }

    async fn deploy(&mut self, inputs: &DeployInputs) -> Result<DeployReport, DeployError> {
        let dest = inputs.validate()?;
        self.console.set_redactor(dest.redactor());

        let source = upload::source_str(&inputs.source_path);
        let dest_url = dest.url();
        tracing::info!(source = %source, destination = %dest, "starting deployment");
        let mut report = DeployReport::default();

        self.console.start_group(DEPLOY_GROUP);

        if let Some(pattern) = inputs.immutable_pattern() {
            let options = CopyOptions {
                recursive: true,
                include_pattern: Some(pattern.to_string()),
                cache_control: Some(self.config.cache_control.clone()),
                ..Default::default()
            };
            let code = self
                .tool
                .copy(&format!("{source}/*"), &dest_url, &options)
                .await?;
            report.invocations += 1;
            if code != 0 {
                return Err(DeployError::ImmutableCopyFailed { code });
            }
        }

        if self.config.rewrite_index {
            rewrite_index(&self.config.index_file).await?;
        }

        let code = self.tool.remove(&dest_url, true).await?;
        report.invocations += 1;
        if code != 0 {
            // Not fatal; the upload pass still runs.
            tracing::warn!(code, "removing existing blobs failed");
            self.console
                .info(&format!("Removing existing files exited with code {code}; continuing."));
        }

        let jobs = plan_uploads(&inputs.source_path, &dest).await?;
        tracing::debug!(files = jobs.len(), "planned uploads");
        let outcome = run_uploads(
            Arc::clone(&self.tool),
            jobs,
            self.config.upload_concurrency,
            &mut self.console,
        )
        .await;
        report.invocations += outcome.invocations;
        if !outcome.failed.is_empty() {
            return Err(DeployError::DeploymentFailed {
                failed: outcome.failed,
            });
        }
        report.files_uploaded = outcome.files;
        self.console.end_group();

        if inputs.cleanup {
            self.console.start_group(CLEANUP_GROUP);
            let exclude_pattern = match inputs.immutable_pattern() {
                Some(p) if !inputs.cleanup_immutable_effective() => Some(p.to_string()),
                _ => None,
            };
            let options = SyncOptions {
                delete_destination: true,
                exclude_pattern,
            };
            let code = self.tool.sync(&source, &dest_url, &options).await?;
            report.invocations += 1;
            if code != 0 {
                return Err(DeployError::CleanupFailed { code });
            }
            report.cleaned_up = true;
            self.console.end_group();
        }

        self.console.success_banner();
        tracing::info!(
            files = report.files_uploaded,
            invocations = report.invocations,
            "deployment finished"
        );
        Ok(report)
    }
}
