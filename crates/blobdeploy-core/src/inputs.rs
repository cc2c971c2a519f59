//! Run inputs and their validation.

use std::path::PathBuf;

use crate::error::DeployError;
use crate::sas::Destination;

/// Named inputs of one deployment run.
#[derive(Debug, Clone, Default)]
pub struct DeployInputs {
    /// Directory holding the already-built site.
    pub source_path: PathBuf,
    /// Full SAS URL including its query string.
    pub sas_url: String,
    /// Container name appended to the SAS host.
    pub container: String,
    /// Delete destination files that are no longer in the source.
    pub cleanup: bool,
    /// Refuse to deploy unless `<source_path>/index.html` exists.
    pub require_index: bool,
    /// Pattern like `*.js;*.css` for long-cache-lifetime assets.
    pub immutable: Option<String>,
    /// Let cleanup delete files matching `immutable` as well.
    pub cleanup_immutable: bool,
}

impl DeployInputs {
    /// Checks the inputs and derives the destination. Touches only the local filesystem.
    pub fn validate(&self) -> Result<Destination, DeployError> {
        if self.require_index && !self.source_path.join("index.html").exists() {
            return Err(DeployError::MissingIndexFile {
                source_path: self.source_path.clone(),
            });
        }

        if let Some(pattern) = self.immutable_pattern() {
            if !pattern.starts_with('*') || pattern.contains(' ') {
                return Err(DeployError::InvalidPatternFormat {
                    pattern: pattern.to_string(),
                });
            }
        }

        Destination::derive(&self.sas_url, &self.container)
    }

    /// Cleanup may remove immutable files only when cleanup runs and a pattern is set.
    pub fn cleanup_immutable_effective(&self) -> bool {
        self.cleanup_immutable && self.cleanup && self.immutable_pattern().is_some()
    }

    /// The immutable pattern, treating an empty string as unset.
    pub fn immutable_pattern(&self) -> Option<&str> {
        self.immutable.as_deref().filter(|p| !p.is_empty())
    }
}

/// Parses a boolean input the way CI runners hand them over: as strings.
///
/// Empty and `false` (any case) are false, `true` (any case) is true; anything
/// else is rejected.
pub fn parse_bool(name: &str, value: &str) -> Result<bool, DeployError> {
    let lower = value.trim().to_ascii_lowercase();
    match lower.as_str() {
        "true" => Ok(true),
        "" | "false" => Ok(false),
        _ => Err(DeployError::InvalidBoolean {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}
