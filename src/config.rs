use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

use crate::core::progress::ProgressStep;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown phase label {0:?} in fail_at")]
    UnknownPhase(String),
}

/// Settings for the local backend and the desktop app.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding `resources/QGIS` and `tmp`.
    pub workspace_dir: PathBuf,
    /// Pause between two job phases.
    pub phase_delay_ms: u64,
    /// Phase label at which the local job fails, for exercising the error path.
    pub fail_at: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace_dir: PathBuf::from("."),
            phase_delay_ms: 500,
            fail_at: None,
        }
    }
}

impl AppConfig {
    /// Load from `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn phase_delay(&self) -> Duration {
        Duration::from_millis(self.phase_delay_ms)
    }

    pub fn fail_step(&self) -> Result<Option<ProgressStep>, ConfigError> {
        self.fail_at
            .as_deref()
            .map(|label| {
                ProgressStep::from_label(label).ok_or_else(|| ConfigError::UnknownPhase(label.into()))
            })
            .transpose()
    }
}
