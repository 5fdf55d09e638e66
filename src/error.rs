use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Request-time failures of the energy engine.
///
/// Every variant aborts the whole request; no partial report is ever produced.
#[derive(Debug, Error)]
pub enum EnergyError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("invalid turbine: {0}")]
    InvalidTurbine(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("invalid date {value:?}, expected YYYY-MM-DD")]
    Format { value: String },

    #[error("date range rejected: {0}")]
    Range(String),

    #[error("wind speed prediction failed: {0}")]
    Prediction(String),
}

impl EnergyError {
    /// Short machine-readable reason reported to API clients.
    pub fn reason(&self) -> &'static str {
        match self {
            EnergyError::MissingFields(_) => "missing_fields",
            EnergyError::InvalidTurbine(_) => "invalid_turbine",
            EnergyError::Validation(_) => "invalid_request",
            EnergyError::Format { .. } => "invalid_date_format",
            EnergyError::Range(_) => "invalid_date_range",
            EnergyError::Prediction(_) => "prediction_failed",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            EnergyError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error payload returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable reason, e.g. `invalid_date_format`
    pub error: String,
    /// Human-readable description
    pub message: String,
}

impl IntoResponse for EnergyError {
    fn into_response(self) -> Response {
        let message = match &self {
            // Model internals stay in the logs.
            EnergyError::Prediction(detail) => {
                tracing::error!(%detail, "prediction failed");
                "wind speed prediction failed".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorResponse {
            error: self.reason().to_string(),
            message,
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Startup-fatal problems with the model or scaler artifact.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("cannot read artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse artifact {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed artifact: {0}")]
    Shape(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_are_stable() {
        assert_eq!(EnergyError::MissingFields(vec!["cut_in"]).reason(), "missing_fields");
        assert_eq!(
            EnergyError::Format { value: "2024-13-40".into() }.reason(),
            "invalid_date_format"
        );
        assert_eq!(EnergyError::Range("x".into()).reason(), "invalid_date_range");
        assert_eq!(EnergyError::Prediction("x".into()).reason(), "prediction_failed");
    }

    #[test]
    fn user_errors_map_to_bad_request() {
        assert_eq!(EnergyError::Range("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            EnergyError::InvalidTurbine("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EnergyError::Prediction("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn missing_fields_message_lists_names() {
        let e = EnergyError::MissingFields(vec!["cut_in", "end_date"]);
        assert_eq!(e.to_string(), "missing required fields: cut_in, end_date");
    }
}
