use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::EnergyError;
use crate::models::energy::{
    Candidate, DATE_FORMAT, DailyEstimate, DateRange, DayAheadEstimate, DayAheadReport,
    HourlyEstimate, Location, RankedCandidate, Report, TurbineSpec,
};

const ENERGY_DECIMALS: i32 = 4;
const SPEED_DECIMALS: i32 = 2;

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ─── Requests ────────────────────────────────────────────────────────────────
// Every field is optional on the wire so that absent fields can be reported
// together as `missing_fields` instead of a generic deserialisation failure.

macro_rules! collect_missing {
    ($req:expr; $($field:ident),+ $(,)?) => {{
        let mut missing: Vec<&'static str> = Vec::new();
        $( if $req.$field.is_none() { missing.push(stringify!($field)); } )+
        missing
    }};
}

/// Body of `POST /api/generated-energy`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EnergyRangeRequest {
    pub cut_in: Option<f64>,
    pub rated: Option<f64>,
    pub cut_out: Option<f64>,
    pub rated_power: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`, inclusive
    pub end_date: Option<String>,
}

impl EnergyRangeRequest {
    /// Presence first, then date format, then range order.
    pub fn validate(self) -> Result<(TurbineSpec, Location, DateRange), EnergyError> {
        let missing = collect_missing!(self;
            cut_in, rated, cut_out, rated_power, latitude, longitude, start_date, end_date);
        let (
            Some(cut_in),
            Some(rated),
            Some(cut_out),
            Some(rated_power),
            Some(latitude),
            Some(longitude),
            Some(start_date),
            Some(end_date),
        ) = (
            self.cut_in,
            self.rated,
            self.cut_out,
            self.rated_power,
            self.latitude,
            self.longitude,
            self.start_date,
            self.end_date,
        )
        else {
            return Err(EnergyError::MissingFields(missing));
        };

        let range = DateRange::parse(&start_date, &end_date)?;
        let turbine = TurbineSpec::new(cut_in, rated, cut_out, rated_power)?;
        let location = Location::new(latitude, longitude)?;
        Ok((turbine, location, range))
    }
}

/// Body of `POST /api/generated-energy/daily`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DaysAheadRequest {
    pub cut_in: Option<f64>,
    pub rated: Option<f64>,
    pub cut_out: Option<f64>,
    pub rated_power: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Number of days starting today
    pub days: Option<u32>,
}

impl DaysAheadRequest {
    pub fn validate(self) -> Result<(TurbineSpec, Location, u32), EnergyError> {
        let missing =
            collect_missing!(self; cut_in, rated, cut_out, rated_power, latitude, longitude, days);
        let (
            Some(cut_in),
            Some(rated),
            Some(cut_out),
            Some(rated_power),
            Some(latitude),
            Some(longitude),
            Some(days),
        ) = (
            self.cut_in,
            self.rated,
            self.cut_out,
            self.rated_power,
            self.latitude,
            self.longitude,
            self.days,
        )
        else {
            return Err(EnergyError::MissingFields(missing));
        };

        let turbine = TurbineSpec::new(cut_in, rated, cut_out, rated_power)?;
        let location = Location::new(latitude, longitude)?;
        Ok((turbine, location, days))
    }
}

/// Body of `POST /api/best-location`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BestLocationRequest {
    pub cut_in: Option<f64>,
    pub rated: Option<f64>,
    pub cut_out: Option<f64>,
    pub rated_power: Option<f64>,
    pub candidates: Option<Vec<Candidate>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl BestLocationRequest {
    /// Rejects more than `max_candidates` sites before any prediction runs.
    pub fn validate(
        self,
        max_candidates: usize,
    ) -> Result<(TurbineSpec, Vec<Candidate>, DateRange), EnergyError> {
        let missing = collect_missing!(self;
            cut_in, rated, cut_out, rated_power, candidates, start_date, end_date);
        let (
            Some(cut_in),
            Some(rated),
            Some(cut_out),
            Some(rated_power),
            Some(candidates),
            Some(start_date),
            Some(end_date),
        ) = (
            self.cut_in,
            self.rated,
            self.cut_out,
            self.rated_power,
            self.candidates,
            self.start_date,
            self.end_date,
        )
        else {
            return Err(EnergyError::MissingFields(missing));
        };

        if candidates.len() > max_candidates {
            return Err(EnergyError::Range(format!(
                "{} candidate locations requested, at most {max_candidates} allowed",
                candidates.len()
            )));
        }
        let range = DateRange::parse(&start_date, &end_date)?;
        let turbine = TurbineSpec::new(cut_in, rated, cut_out, rated_power)?;
        for c in &candidates {
            Location::new(c.latitude, c.longitude)?;
        }
        Ok((turbine, candidates, range))
    }
}

// ─── Responses ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HourlyEnergyResponse {
    /// `HH:MM`
    pub hour: String,
    pub predicted_wind_speed_m_s: f64,
    #[serde(rename = "hourly_energy_MWh")]
    pub hourly_energy_mwh: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailyEnergyResponse {
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(rename = "daily_total_energy_MWh")]
    pub daily_total_energy_mwh: f64,
    pub hourly_energies: Vec<HourlyEnergyResponse>,
}

/// Hourly-resolution energy report.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EnergyReportResponse {
    #[serde(rename = "total_energy_MWh")]
    pub total_energy_mwh: f64,
    pub daily_energies: Vec<DailyEnergyResponse>,
    pub num_days: u32,
}

impl From<&HourlyEstimate> for HourlyEnergyResponse {
    fn from(h: &HourlyEstimate) -> Self {
        Self {
            hour: h.timestamp.format("%H:%M").to_string(),
            predicted_wind_speed_m_s: round_to(h.wind_speed_m_s, SPEED_DECIMALS),
            hourly_energy_mwh: round_to(h.energy_mwh, ENERGY_DECIMALS),
        }
    }
}

impl From<&DailyEstimate> for DailyEnergyResponse {
    fn from(d: &DailyEstimate) -> Self {
        Self {
            date: d.date.format(DATE_FORMAT).to_string(),
            daily_total_energy_mwh: round_to(d.total_energy_mwh, ENERGY_DECIMALS),
            hourly_energies: d.hours.iter().map(HourlyEnergyResponse::from).collect(),
        }
    }
}

impl From<&Report> for EnergyReportResponse {
    fn from(r: &Report) -> Self {
        Self {
            total_energy_mwh: round_to(r.total_energy_mwh, ENERGY_DECIMALS),
            daily_energies: r.days.iter().map(DailyEnergyResponse::from).collect(),
            num_days: r.num_days,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DayAheadEnergyResponse {
    pub date: String,
    pub predicted_wind_speed_m_s: f64,
    #[serde(rename = "daily_energy_MWh")]
    pub daily_energy_mwh: f64,
}

/// Daily-resolution energy report, one prediction per day.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DaysAheadResponse {
    #[serde(rename = "total_energy_MWh")]
    pub total_energy_mwh: f64,
    pub daily_energies: Vec<DayAheadEnergyResponse>,
    pub num_days: u32,
}

impl From<&DayAheadEstimate> for DayAheadEnergyResponse {
    fn from(d: &DayAheadEstimate) -> Self {
        Self {
            date: d.date.format(DATE_FORMAT).to_string(),
            predicted_wind_speed_m_s: round_to(d.wind_speed_m_s, SPEED_DECIMALS),
            daily_energy_mwh: round_to(d.energy_mwh, ENERGY_DECIMALS),
        }
    }
}

impl From<&DayAheadReport> for DaysAheadResponse {
    fn from(r: &DayAheadReport) -> Self {
        Self {
            total_energy_mwh: round_to(r.total_energy_mwh, ENERGY_DECIMALS),
            daily_energies: r.days.iter().map(DayAheadEnergyResponse::from).collect(),
            num_days: r.num_days,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RankedLocationResponse {
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "total_energy_MWh")]
    pub total_energy_mwh: f64,
}

impl From<&RankedCandidate> for RankedLocationResponse {
    fn from(r: &RankedCandidate) -> Self {
        Self {
            name: r.candidate.name.clone(),
            latitude: r.candidate.latitude,
            longitude: r.candidate.longitude,
            total_energy_mwh: round_to(r.total_energy_mwh, ENERGY_DECIMALS),
        }
    }
}

/// Candidates ordered by estimated energy, best first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BestLocationResponse {
    pub best: RankedLocationResponse,
    pub ranking: Vec<RankedLocationResponse>,
    pub num_days: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    /// Active predictor variant
    pub predictor: String,
    /// Active rated-band policy of the power curve
    pub rated_band: String,
}
