use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spatial::ZoomTier;

/// Environment variable naming a JSON config file for [`SpaceConfig::from_env`].
pub const CONFIG_PATH_ENV: &str = "SECTORSPACE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// World-to-render scalar for each zoom tier.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TierScales {
    pub galaxy: f64,
    pub sector: f64,
    pub system: f64,
    pub orbit: f64,
}

impl Default for TierScales {
    fn default() -> Self {
        Self {
            galaxy: 0.01,
            sector: 1.0,
            system: 100.0,
            orbit: 10_000.0,
        }
    }
}

impl TierScales {
    pub fn get(&self, tier: ZoomTier) -> f64 {
        match tier {
            ZoomTier::Galaxy => self.galaxy,
            ZoomTier::Sector => self.sector,
            ZoomTier::System => self.system,
            ZoomTier::Orbit => self.orbit,
        }
    }
}

/// Render-frame settings shared by every spatial transform.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpaceConfig {
    /// Culling radius around the render origin, in render units.
    pub render_radius: f64,
    /// Render-space drift of the focus point that triggers a re-center.
    pub recenter_threshold: f64,
    pub tiers: TierScales,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            render_radius: 5_000.0,
            recenter_threshold: 1_000.0,
            tiers: TierScales::default(),
        }
    }
}

impl SpaceConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SpaceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Loads the file named by `SECTORSPACE_CONFIG`, or the defaults when the
    /// variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.render_radius.is_finite() || self.render_radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "render_radius must be positive, got {}",
                self.render_radius
            )));
        }
        if !self.recenter_threshold.is_finite() || self.recenter_threshold <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "recenter_threshold must be positive, got {}",
                self.recenter_threshold
            )));
        }
        for tier in ZoomTier::ALL {
            let scale = self.tiers.get(tier);
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{tier:?} scale must be positive, got {scale}"
                )));
            }
        }
        Ok(())
    }
}
