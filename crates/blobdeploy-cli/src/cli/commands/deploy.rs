//! `blobdeploy deploy` – run the deployment against azcopy.

use anyhow::Result;
use blobdeploy_core::config::DeployConfig;
use blobdeploy_core::copy_tool::AzCopy;
use blobdeploy_core::deploy::Deployer;
use blobdeploy_core::sas;
use blobdeploy_core::workflow::Workflow;
use std::sync::Arc;

use crate::cli::DeployArgs;

pub async fn run_deploy(cfg: &DeployConfig, args: &DeployArgs) -> Result<()> {
    let inputs = match args.to_inputs() {
        Ok(inputs) => inputs,
        Err(err) => {
            Workflow::stdout().set_failed(&err.to_string());
            return Err(err.into());
        }
    };

    let tool = AzCopy::new(cfg.azcopy_command.clone(), sas::redactor_for(&inputs.sas_url));
    let mut deployer = Deployer::new(Arc::new(tool), cfg.clone(), Workflow::stdout());
    let report = deployer.run(&inputs).await?;
    tracing::info!(
        files = report.files_uploaded,
        invocations = report.invocations,
        cleaned_up = report.cleaned_up,
        "deploy command finished"
    );
    Ok(())
}
