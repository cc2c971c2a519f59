use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Cache-Control applied to files matching the immutable pattern.
pub const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Tool configuration loaded from `~/.config/blobdeploy/config.toml`.
///
/// Per-run inputs (source path, SAS URL, flags) are not here; they come from
/// the command line or the CI environment.
/// Keys missing from the file take their default values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// azcopy binary to run; None = `azcopy` on Windows, `azcopy10` elsewhere.
    pub azcopy_command: Option<String>,
    /// Index page rewritten to reference `.gz` assets before upload.
    pub index_file: PathBuf,
    /// Set to false to upload the index page untouched.
    pub rewrite_index: bool,
    /// Cache-Control for immutable assets.
    pub cache_control: String,
    /// Maximum azcopy processes running at once during the per-file upload pass.
    pub upload_concurrency: usize,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            azcopy_command: None,
            index_file: PathBuf::from("dist/index.html"),
            rewrite_index: true,
            cache_control: IMMUTABLE_CACHE_CONTROL.to_string(),
            upload_concurrency: 16,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("blobdeploy")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DeployConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DeployConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit file; it must exist.
pub fn load_from(path: &Path) -> Result<DeployConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: DeployConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
