//! Scenario file loading
//!
//! Scenarios are TOML by default; a `.json` extension selects JSON.

use std::path::Path;
use thiserror::Error;
use tripvote_application::Scenario;

/// Errors that can occur while reading a scenario file
#[derive(Error, Debug)]
pub enum ScenarioLoadError {
    #[error("Failed to read scenario {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML scenario: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON scenario: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads [`Scenario`] files
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: impl AsRef<Path>) -> Result<Scenario, ScenarioLoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    pub fn from_toml(content: &str) -> Result<Scenario, ScenarioLoadError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Scenario, ScenarioLoadError> {
        Ok(serde_json::from_str(content)?)
    }
}
