use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::config::{PredictorConfig, PredictorVariant};
use crate::error::{EnergyError, ModelLoadError};
use crate::models::energy::Location;
use crate::services::feature_encoder::{
    CYCLICAL_FEATURES, RAW_FEATURES, encode_cyclical, encode_raw,
};
use crate::services::regression::{Regressor, StandardScaler};

/// Unit of the raw value a regressor outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedUnit {
    #[serde(rename = "m_s")]
    MetersPerSecond,
    #[serde(rename = "km_h")]
    KilometersPerHour,
}

impl SpeedUnit {
    pub fn to_m_per_s(self, value: f64) -> f64 {
        match self {
            SpeedUnit::MetersPerSecond => value,
            SpeedUnit::KilometersPerHour => value * 1000.0 / 3600.0,
        }
    }
}

/// Wind speed at a site and instant, in m/s.
///
/// Implementations own their feature construction and unit conversion.
/// They are built once at startup and shared read-only across requests.
pub trait WindSpeedPredictor: Send + Sync + fmt::Debug {
    fn predict(&self, location: &Location, at: NaiveDateTime) -> Result<f64, EnergyError>;

    /// Short identifier for logs and the health endpoint.
    fn name(&self) -> &'static str;
}

/// Negative regressor output means calm air as far as the turbine is concerned.
fn finish(raw: f64, unit: SpeedUnit) -> f64 {
    unit.to_m_per_s(raw).max(0.0)
}

/// 12 cyclical time features, optionally standardised before the regressor.
#[derive(Debug)]
pub struct CyclicalPredictor {
    model: Regressor,
    scaler: Option<StandardScaler>,
    unit: SpeedUnit,
}

impl CyclicalPredictor {
    pub fn new(
        model: Regressor,
        scaler: Option<StandardScaler>,
        unit: SpeedUnit,
    ) -> Result<Self, ModelLoadError> {
        expect_features("model", model.n_features(), CYCLICAL_FEATURES)?;
        if let Some(s) = &scaler {
            expect_features("scaler", s.n_features(), CYCLICAL_FEATURES)?;
        }
        Ok(Self { model, scaler, unit })
    }
}

impl WindSpeedPredictor for CyclicalPredictor {
    fn predict(&self, location: &Location, at: NaiveDateTime) -> Result<f64, EnergyError> {
        let features = encode_cyclical(location, at);
        let raw = match &self.scaler {
            Some(scaler) => self.model.predict(&scaler.transform(&features)?)?,
            None => self.model.predict(&features)?,
        };
        Ok(finish(raw, self.unit))
    }

    fn name(&self) -> &'static str {
        "cyclical"
    }
}

/// 4 raw features (longitude, latitude, month, day), no scaling.
#[derive(Debug)]
pub struct RawPredictor {
    model: Regressor,
    unit: SpeedUnit,
}

impl RawPredictor {
    pub fn new(model: Regressor, unit: SpeedUnit) -> Result<Self, ModelLoadError> {
        expect_features("model", model.n_features(), RAW_FEATURES)?;
        Ok(Self { model, unit })
    }
}

impl WindSpeedPredictor for RawPredictor {
    fn predict(&self, location: &Location, at: NaiveDateTime) -> Result<f64, EnergyError> {
        let raw = self.model.predict(&encode_raw(location, at))?;
        Ok(finish(raw, self.unit))
    }

    fn name(&self) -> &'static str {
        "raw"
    }
}

fn expect_features(what: &str, got: usize, want: usize) -> Result<(), ModelLoadError> {
    if got != want {
        return Err(ModelLoadError::Shape(format!(
            "{what} expects {got} features, predictor supplies {want}"
        )));
    }
    Ok(())
}

/// Loads the configured artifacts. Any failure here must abort startup.
pub fn load_predictor(cfg: &PredictorConfig) -> Result<Arc<dyn WindSpeedPredictor>, ModelLoadError> {
    let model = Regressor::from_file(&cfg.model_path)?;
    let unit = cfg.output_unit();
    let predictor: Arc<dyn WindSpeedPredictor> = match cfg.variant {
        PredictorVariant::Cyclical => {
            let scaler = cfg
                .scaler_path
                .as_deref()
                .map(StandardScaler::from_file)
                .transpose()?;
            Arc::new(CyclicalPredictor::new(model, scaler, unit)?)
        }
        PredictorVariant::Raw => Arc::new(RawPredictor::new(model, unit)?),
    };
    tracing::info!(
        predictor = predictor.name(),
        model = %cfg.model_path.display(),
        unit = ?unit,
        "wind speed predictor loaded"
    );
    Ok(predictor)
}

/// Fixed wind speed regardless of site or time.
#[cfg(test)]
#[derive(Debug)]
pub struct ConstantPredictor(pub f64);

#[cfg(test)]
impl WindSpeedPredictor for ConstantPredictor {
    fn predict(&self, _location: &Location, _at: NaiveDateTime) -> Result<f64, EnergyError> {
        Ok(self.0)
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}
