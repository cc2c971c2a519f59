//! CLI for blobdeploy.

mod commands;

use anyhow::Result;
use blobdeploy_core::config::{self, DeployConfig};
use blobdeploy_core::error::DeployError;
use blobdeploy_core::inputs::{parse_bool, DeployInputs};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use commands::{run_completions, run_deploy, run_man, run_plan};

/// Top-level CLI for blobdeploy.
#[derive(Debug, Parser)]
#[command(name = "blobdeploy")]
#[command(about = "Publish a built static website to Azure blob storage with azcopy", long_about = None)]
pub struct Cli {
    /// Read tool configuration from this file instead of ~/.config/blobdeploy/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Upload the site, replacing the container contents.
    Deploy(DeployArgs),

    /// Print the azcopy commands a deploy would run, without running them.
    Plan(DeployArgs),

    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page.
    Man,
}

/// Run inputs. Each falls back to the variable GitHub Actions sets for the
/// action input of the same name. Booleans are strings ("true"/"false") so
/// they can come straight from the environment.
#[derive(Debug, Clone, Args)]
pub struct DeployArgs {
    /// Directory containing the already-built site.
    #[arg(long, env = "INPUT_SOURCE-PATH", value_name = "DIR")]
    pub source_path: PathBuf,

    /// Shared access signature URL, including its query string.
    #[arg(long, env = "INPUT_SAS-URL", hide_env_values = true, value_name = "URL")]
    pub sas_url: String,

    /// Container name appended to the SAS host.
    #[arg(long, env = "INPUT_CONTAINER", default_value = "")]
    pub container: String,

    /// Delete blobs that are no longer present in the source.
    #[arg(
        long,
        env = "INPUT_CLEANUP",
        default_value = "false",
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub cleanup: String,

    /// Fail unless the source directory contains index.html.
    #[arg(
        long,
        env = "INPUT_REQUIRE-INDEX",
        default_value = "false",
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub require_index: String,

    /// Long-cache assets, e.g. "*.js;*.css" (no spaces).
    #[arg(long, env = "INPUT_IMMUTABLE", value_name = "PATTERN")]
    pub immutable: Option<String>,

    /// Let cleanup delete files matching --immutable too.
    #[arg(
        long,
        env = "INPUT_CLEANUP-IMMUTABLE",
        default_value = "false",
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub cleanup_immutable: String,
}

impl DeployArgs {
    pub fn to_inputs(&self) -> Result<DeployInputs, DeployError> {
        Ok(DeployInputs {
            source_path: self.source_path.clone(),
            sas_url: self.sas_url.clone(),
            container: self.container.clone(),
            cleanup: parse_bool("cleanup", &self.cleanup)?,
            require_index: parse_bool("require-index", &self.require_index)?,
            immutable: self.immutable.clone().filter(|p| !p.is_empty()),
            cleanup_immutable: parse_bool("cleanup-immutable", &self.cleanup_immutable)?,
        })
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<DeployConfig> {
    let cfg = match path {
        Some(p) => config::load_from(p)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Deploy(args) => {
                let cfg = load_config(cli.config.as_ref())?;
                run_deploy(&cfg, &args).await?;
            }
            CliCommand::Plan(args) => {
                let cfg = load_config(cli.config.as_ref())?;
                run_plan(&cfg, &args).await?;
            }
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
