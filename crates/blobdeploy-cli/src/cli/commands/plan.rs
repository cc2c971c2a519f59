//! `blobdeploy plan` – list the azcopy commands a deploy would run.
//!
//! Runs the real orchestrator against a recording tool, so validation and
//! file enumeration behave exactly as in `deploy`. Nothing is uploaded and
//! the index page is left alone.

use anyhow::Result;
use blobdeploy_core::config::DeployConfig;
use blobdeploy_core::copy_tool::{default_program, render_command_line, RecordingTool};
use blobdeploy_core::deploy::Deployer;
use blobdeploy_core::sas;
use blobdeploy_core::workflow::Workflow;
use std::sync::Arc;

use crate::cli::DeployArgs;

pub async fn run_plan(cfg: &DeployConfig, args: &DeployArgs) -> Result<()> {
    let inputs = args.to_inputs()?;
    let redactor = sas::redactor_for(&inputs.sas_url);

    let plan_cfg = DeployConfig {
        rewrite_index: false,
        upload_concurrency: 1,
        ..cfg.clone()
    };
    let tool = Arc::new(RecordingTool::new());
    let mut deployer = Deployer::new(
        tool.clone(),
        plan_cfg,
        Workflow::with_writer(Box::new(std::io::sink())),
    );
    deployer.run(&inputs).await?;

    let program = cfg.azcopy_command.as_deref().unwrap_or(default_program());
    let rewrite_note = cfg.rewrite_index.then(|| {
        format!(
            "# {} would be rewritten to reference .gz assets",
            cfg.index_file.display()
        )
    });
    for line in plan_lines(program, &tool.invocations(), rewrite_note) {
        println!("{}", redactor.redact(&line));
    }
    Ok(())
}

/// Command lines in run order. The index rewrite happens right before the
/// `rm` pass, so `rewrite_note` is placed there.
fn plan_lines(program: &str, calls: &[Vec<String>], rewrite_note: Option<String>) -> Vec<String> {
    let mut note = rewrite_note;
    let mut lines = Vec::with_capacity(calls.len() + 1);
    for call in calls {
        if call.first().map(String::as_str) == Some("rm") {
            lines.extend(note.take());
        }
        lines.push(render_command_line(program, call));
    }
    lines
}
