use std::sync::Arc;

use crate::config::Config;
use crate::services::energy_service::EnergyEstimator;
use crate::services::power_curve::RatedBandPolicy;
use crate::services::wind_predictor::WindSpeedPredictor;

/// Read-only state shared by every request handler.
///
/// Built once in `main` after the predictor artifacts are loaded; nothing in
/// here is mutated afterwards, so no locking is needed.
#[derive(Clone, Debug)]
pub struct AppState {
    pub predictor: Arc<dyn WindSpeedPredictor>,
    pub rated_band: RatedBandPolicy,
    pub max_days: u32,
    pub max_candidates: usize,
}

impl AppState {
    pub fn new(predictor: Arc<dyn WindSpeedPredictor>, config: &Config) -> Self {
        Self {
            predictor,
            rated_band: config.power_curve.rated_band,
            max_days: config.max_days,
            max_candidates: config.max_candidates,
        }
    }

    pub fn estimator(&self) -> EnergyEstimator<'_> {
        EnergyEstimator::new(self.predictor.as_ref(), self.rated_band, self.max_days)
    }
}
