use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::services::power_curve::RatedBandPolicy;
use crate::services::wind_predictor::SpeedUnit;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const CONFIG_PATH_ENV: &str = "WIND_ENERGY_CONFIG";

fn default_max_days() -> u32 { 366 }
fn default_max_candidates() -> usize { 25 }

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub predictor: PredictorConfig,
    #[serde(default)]
    pub power_curve: PowerCurveConfig,
    /// Longest horizon a single request may simulate
    #[serde(default = "default_max_days")]
    pub max_days: u32,
    /// Most candidate sites a single best-location request may rank
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub port: u16,
    /// Empty means any origin.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PredictorVariant {
    /// 12 cyclical time features, optional scaler
    Cyclical,
    /// longitude, latitude, month, day
    Raw,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct PredictorConfig {
    pub variant: PredictorVariant,
    pub model_path: PathBuf,
    #[serde(default)]
    pub scaler_path: Option<PathBuf>,
    #[serde(default)]
    pub output_unit: Option<SpeedUnit>,
}

impl PredictorConfig {
    /// Unit the model emits; cyclical models are trained on m/s, raw ones on km/h.
    pub fn output_unit(&self) -> SpeedUnit {
        self.output_unit.unwrap_or(match self.variant {
            PredictorVariant::Cyclical => SpeedUnit::MetersPerSecond,
            PredictorVariant::Raw => SpeedUnit::KilometersPerHour,
        })
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct PowerCurveConfig {
    #[serde(default)]
    pub rated_band: RatedBandPolicy,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// `$WIND_ENERGY_CONFIG`, falling back to `config.json`.
    pub fn path_from_env() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_days == 0 {
            return Err(ConfigError::Invalid("max_days must be at least 1".into()));
        }
        if self.max_candidates == 0 {
            return Err(ConfigError::Invalid("max_candidates must be at least 1".into()));
        }
        if self.predictor.variant == PredictorVariant::Raw && self.predictor.scaler_path.is_some() {
            return Err(ConfigError::Invalid(
                "scaler_path is only supported by the cyclical predictor".into(),
            ));
        }
        Ok(())
    }
}
