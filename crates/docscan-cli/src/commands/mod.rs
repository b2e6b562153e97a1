//! Subcommands.

pub mod config;
pub mod extract;
pub mod serve;

use std::path::{Path, PathBuf};

use docscan_core::DocscanConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docscan")
        .join("config.json")
}

/// Load the configuration from `--config`, the default path, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DocscanConfig> {
    let config = DocscanConfig::load(config_path.map(Path::new), &default_config_path())?;
    Ok(config)
}
