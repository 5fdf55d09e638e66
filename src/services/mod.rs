pub mod energy_service;
pub mod feature_encoder;
pub mod power_curve;
pub mod regression;
pub mod wind_predictor;
