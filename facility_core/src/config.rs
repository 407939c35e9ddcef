use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, mapgen::GeneratorConfig};

/// Environment variable holding an optional JSON config override path.
pub const CONFIG_PATH_ENV: &str = "FACILITY_SIM_CONFIG";

/// Session-wide simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: i32,
    pub height: i32,
    pub seed: u64,
    /// Field-of-view radius around the controlled entity.
    pub fov_radius: i32,
    /// Autopilot runs on every Nth tick.
    pub autopilot_interval: u64,
    pub entity_capacity: u32,
    pub generator: GeneratorConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 25,
            seed: 0xD1CE,
            fov_radius: 8,
            autopilot_interval: 4,
            entity_capacity: 1000,
            generator: GeneratorConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config named by `FACILITY_SIM_CONFIG`, falling back to the
    /// defaults when the variable is unset or the file is unusable.
    pub fn load() -> Self {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => match Self::from_path(Path::new(&path)) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(
                        target: "facility_core::config",
                        %err,
                        path,
                        "config override unusable, using defaults"
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
