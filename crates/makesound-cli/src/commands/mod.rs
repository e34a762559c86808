//! CLI command implementations.

pub mod config;
pub mod note;
pub mod render;

use std::path::Path;

use makesound_config::EngineConfig;

/// Load and check the engine configuration, or use the defaults.
pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let config = match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading engine config");
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}
