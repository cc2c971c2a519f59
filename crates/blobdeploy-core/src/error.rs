//! Error type for a deployment run. Every variant is terminal for the run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeployError {
    /// A boolean input was neither empty, "true" nor "false".
    #[error("input {name}: \"{value}\" couldn't be converted to a Boolean")]
    InvalidBoolean { name: String, value: String },

    #[error(
        "The source path \"{}\" doesn't contain an index.html file. It should be set to the \
         directory containing already-built static website files.",
        .source_path.display()
    )]
    MissingIndexFile { source_path: PathBuf },

    #[error("The list of immutable extensions should be in this format with no spaces: \"*.js;*.css\"")]
    InvalidPatternFormat { pattern: String },

    /// `masked_url` has its query string replaced before it is stored here.
    #[error(
        "The SAS URL supplied ({masked_url}) doesn't look valid. It should be a full URL with a \
         query string. Generate one in the \"Shared access signature\" section of the Azure Portal."
    )]
    InvalidSasUrl { masked_url: String },

    #[error("Deployment failed for immutable files (exit code {code}). See log for more details.")]
    ImmutableCopyFailed { code: i32 },

    #[error("Deployment failed for {} file(s): {}. See log for more details.", .failed.len(), .failed.join(", "))]
    DeploymentFailed { failed: Vec<String> },

    #[error("Cleanup failed (exit code {code}). See log for more details.")]
    CleanupFailed { code: i32 },

    /// The copy tool could not be started at all.
    #[error("could not run {program}: {source}")]
    Tool {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl DeployError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        DeployError::Io {
            context: context.into(),
            source,
        }
    }
}
