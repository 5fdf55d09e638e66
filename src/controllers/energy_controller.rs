use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::{EnergyError, ErrorResponse};
use crate::models::api::{
    BestLocationRequest, BestLocationResponse, DaysAheadRequest, DaysAheadResponse,
    EnergyRangeRequest, EnergyReportResponse, HealthStatus, RankedLocationResponse,
};
use crate::shared_state::AppState;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, EnergyError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| EnergyError::Validation(rejection.body_text()))
}

/// POST /api/generated-energy
/// Hourly energy estimate over a date range
///
/// Simulates every hour of every day from `start_date` to `end_date` (inclusive)
/// and returns hourly, daily and total energy in MWh.
#[utoipa::path(
    post,
    path = "/api/generated-energy",
    request_body = EnergyRangeRequest,
    responses(
        (status = 200, description = "Energy report", body = EnergyReportResponse),
        (status = 400, description = "Missing fields, malformed date or reversed range", body = ErrorResponse),
        (status = 500, description = "Wind speed prediction failed", body = ErrorResponse)
    )
)]
pub async fn generated_energy(
    State(state): State<AppState>,
    payload: Result<Json<EnergyRangeRequest>, JsonRejection>,
) -> Result<Json<EnergyReportResponse>, EnergyError> {
    let (turbine, location, range) = body(payload)?.validate()?;
    let report = state.estimator().estimate_range(&turbine, &location, &range)?;
    Ok(Json(EnergyReportResponse::from(&report)))
}

/// POST /api/generated-energy/daily
/// Daily energy estimate for the next N days
///
/// One wind speed prediction per day starting today; the resulting power is
/// assumed constant for the whole day.
#[utoipa::path(
    post,
    path = "/api/generated-energy/daily",
    request_body = DaysAheadRequest,
    responses(
        (status = 200, description = "Daily energy report", body = DaysAheadResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 500, description = "Wind speed prediction failed", body = ErrorResponse)
    )
)]
pub async fn generated_energy_daily(
    State(state): State<AppState>,
    payload: Result<Json<DaysAheadRequest>, JsonRejection>,
) -> Result<Json<DaysAheadResponse>, EnergyError> {
    let (turbine, location, days) = body(payload)?.validate()?;
    let today = chrono::Local::now().naive_local();
    let report = state
        .estimator()
        .estimate_days_ahead(&turbine, &location, today, days)?;
    Ok(Json(DaysAheadResponse::from(&report)))
}

/// POST /api/best-location
/// Rank candidate sites for a turbine
///
/// Runs the hourly estimate for each candidate over the date range and returns
/// them ordered by total energy, best first.
#[utoipa::path(
    post,
    path = "/api/best-location",
    request_body = BestLocationRequest,
    responses(
        (status = 200, description = "Ranked candidates", body = BestLocationResponse),
        (status = 400, description = "Missing or invalid fields, or too many candidates", body = ErrorResponse),
        (status = 500, description = "Wind speed prediction failed", body = ErrorResponse)
    )
)]
pub async fn best_location(
    State(state): State<AppState>,
    payload: Result<Json<BestLocationRequest>, JsonRejection>,
) -> Result<Json<BestLocationResponse>, EnergyError> {
    let (turbine, candidates, range) = body(payload)?.validate(state.max_candidates)?;
    let ranked = state.estimator().rank_locations(&turbine, candidates, &range)?;
    let ranking: Vec<RankedLocationResponse> =
        ranked.iter().map(RankedLocationResponse::from).collect();
    let best = ranked
        .first()
        .map(RankedLocationResponse::from)
        .ok_or_else(|| EnergyError::Validation("no candidate locations".into()))?;
    Ok(Json(BestLocationResponse { best, ranking, num_days: range.num_days() }))
}

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthStatus)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        predictor: state.predictor.name().to_string(),
        rated_band: state.rated_band.as_str().to_string(),
    })
}
