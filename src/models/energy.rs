use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::EnergyError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Request-scoped inputs ───────────────────────────────────────────────────

/// Turbine characteristics. Speeds in m/s, power in kW.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurbineSpec {
    pub cut_in: f64,
    pub rated: f64,
    pub cut_out: f64,
    pub rated_power: f64,
}

impl TurbineSpec {
    /// Enforces `0 < cut_in < rated < cut_out` and `rated_power > 0`.
    pub fn new(cut_in: f64, rated: f64, cut_out: f64, rated_power: f64) -> Result<Self, EnergyError> {
        let all_finite = [cut_in, rated, cut_out, rated_power]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(EnergyError::InvalidTurbine(
                "all turbine parameters must be finite numbers".into(),
            ));
        }
        if cut_in <= 0.0 {
            return Err(EnergyError::InvalidTurbine("cut_in must be positive".into()));
        }
        if !(cut_in < rated && rated < cut_out) {
            return Err(EnergyError::InvalidTurbine(format!(
                "expected cut_in < rated < cut_out, got {cut_in} / {rated} / {cut_out}"
            )));
        }
        if rated_power <= 0.0 {
            return Err(EnergyError::InvalidTurbine("rated_power must be positive".into()));
        }
        Ok(Self { cut_in, rated, cut_out, rated_power })
    }
}

/// Site coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, EnergyError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(EnergyError::Validation(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(EnergyError::Validation(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        Ok(Self { latitude, longitude })
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, EnergyError> {
        if end < start {
            return Err(EnergyError::Range(format!(
                "end date {end} is before start date {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parses both bounds as `YYYY-MM-DD`.
    pub fn parse(start: &str, end: &str) -> Result<Self, EnergyError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Number of calendar days, both ends included.
    pub fn num_days(&self) -> u32 {
        ((self.end - self.start).num_days() + 1) as u32
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.num_days() as usize)
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, EnergyError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| EnergyError::Format {
        value: value.to_string(),
    })
}

// ─── Engine output ───────────────────────────────────────────────────────────
// All figures are kept at full precision; rounding happens in models::api.

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyEstimate {
    pub timestamp: NaiveDateTime,
    pub wind_speed_m_s: f64,
    pub energy_mwh: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyEstimate {
    pub date: NaiveDate,
    pub total_energy_mwh: f64,
    pub hours: Vec<HourlyEstimate>,
}

/// Hourly-resolution result over an inclusive date range.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub total_energy_mwh: f64,
    pub days: Vec<DailyEstimate>,
    pub num_days: u32,
}

/// One day of the daily-resolution mode: a single prediction held for 24 h.
#[derive(Debug, Clone, PartialEq)]
pub struct DayAheadEstimate {
    pub date: NaiveDate,
    pub wind_speed_m_s: f64,
    pub energy_mwh: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayAheadReport {
    pub total_energy_mwh: f64,
    pub days: Vec<DayAheadEstimate>,
    pub num_days: u32,
}

/// A candidate site with an optional display name.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct Candidate {
    #[serde(default)]
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub candidate: Candidate,
    pub total_energy_mwh: f64,
}
