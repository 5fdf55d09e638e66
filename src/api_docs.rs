use utoipa::OpenApi;
use crate::controllers::energy_controller;
use crate::models::{api, energy};
use crate::error;

#[derive(OpenApi)]
#[openapi(
    paths(
        energy_controller::generated_energy,
        energy_controller::generated_energy_daily,
        energy_controller::best_location,
        energy_controller::health
    ),
    components(
        schemas(
            api::EnergyRangeRequest,
            api::EnergyReportResponse,
            api::DailyEnergyResponse,
            api::HourlyEnergyResponse,
            api::DaysAheadRequest,
            api::DaysAheadResponse,
            api::DayAheadEnergyResponse,
            api::BestLocationRequest,
            api::BestLocationResponse,
            api::RankedLocationResponse,
            api::HealthStatus,
            energy::Candidate,
            error::ErrorResponse
        )
    ),
    tags(
        (name = "wind-energy-estimator", description = "Wind turbine energy estimation API")
    )
)]
pub struct ApiDoc;
