//! Energy aggregation: date range → hourly/daily/total MWh.
//!
//! Pipeline per simulated interval:
//!   timestamp → predictor (features + model) → power curve (kW) → energy (MWh)
//!
//! Accumulation runs at full precision; rounding belongs to the response layer.
//! The first failing prediction aborts the whole estimate.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use tracing::{debug, info};

use crate::error::EnergyError;
use crate::models::energy::{
    Candidate, DailyEstimate, DateRange, DayAheadEstimate, DayAheadReport, HourlyEstimate,
    Location, RankedCandidate, Report, TurbineSpec,
};
use crate::services::power_curve::{RatedBandPolicy, power_output_kw};
use crate::services::wind_predictor::WindSpeedPredictor;

const HOURS_PER_DAY: u32 = 24;
const KW_PER_MW: f64 = 1000.0;

pub struct EnergyEstimator<'a> {
    predictor: &'a dyn WindSpeedPredictor,
    policy: RatedBandPolicy,
    max_days: u32,
}

impl<'a> EnergyEstimator<'a> {
    pub fn new(predictor: &'a dyn WindSpeedPredictor, policy: RatedBandPolicy, max_days: u32) -> Self {
        Self { predictor, policy, max_days }
    }

    fn check_horizon(&self, num_days: u32) -> Result<(), EnergyError> {
        if num_days > self.max_days {
            return Err(EnergyError::Range(format!(
                "{num_days} days requested, at most {} allowed",
                self.max_days
            )));
        }
        Ok(())
    }

    /// Wind speed (m/s) and power (kW) at one instant.
    fn sample(
        &self,
        turbine: &TurbineSpec,
        location: &Location,
        at: NaiveDateTime,
    ) -> Result<(f64, f64), EnergyError> {
        let wind_speed = self.predictor.predict(location, at)?;
        let power_kw = power_output_kw(wind_speed, turbine, self.policy);
        Ok((wind_speed, power_kw))
    }

    fn estimate_day(
        &self,
        turbine: &TurbineSpec,
        location: &Location,
        date: NaiveDate,
    ) -> Result<DailyEstimate, EnergyError> {
        let midnight = date.and_time(NaiveTime::MIN);
        let mut hours = Vec::with_capacity(HOURS_PER_DAY as usize);
        let mut total = 0.0;

        for hour in 0..HOURS_PER_DAY {
            let timestamp = midnight + TimeDelta::hours(i64::from(hour));
            let (wind_speed, power_kw) = self.sample(turbine, location, timestamp)?;
            // one hour at constant power
            let energy_mwh = power_kw / KW_PER_MW;
            debug!(%timestamp, wind_speed, power_kw, "hourly estimate");

            total += energy_mwh;
            hours.push(HourlyEstimate { timestamp, wind_speed_m_s: wind_speed, energy_mwh });
        }

        Ok(DailyEstimate { date, total_energy_mwh: total, hours })
    }

    /// Hourly simulation over every day of `range`, both ends included.
    pub fn estimate_range(
        &self,
        turbine: &TurbineSpec,
        location: &Location,
        range: &DateRange,
    ) -> Result<Report, EnergyError> {
        let num_days = range.num_days();
        self.check_horizon(num_days)?;

        let mut days = Vec::with_capacity(num_days as usize);
        let mut total = 0.0;
        for date in range.days() {
            let day = self.estimate_day(turbine, location, date)?;
            total += day.total_energy_mwh;
            days.push(day);
        }

        info!(
            predictor = self.predictor.name(),
            lat = location.latitude,
            lon = location.longitude,
            start = %range.start,
            end = %range.end,
            num_days,
            total_energy_mwh = total,
            "range estimate complete"
        );
        Ok(Report { total_energy_mwh: total, days, num_days })
    }

    /// One prediction per day for `days` consecutive days from `start`,
    /// with the resulting power held for the full 24 h.
    pub fn estimate_days_ahead(
        &self,
        turbine: &TurbineSpec,
        location: &Location,
        start: NaiveDateTime,
        days: u32,
    ) -> Result<DayAheadReport, EnergyError> {
        if days == 0 {
            return Err(EnergyError::Validation("days must be at least 1".into()));
        }
        self.check_horizon(days)?;

        let mut estimates = Vec::with_capacity(days as usize);
        let mut total = 0.0;
        for i in 0..days {
            let at = start + TimeDelta::days(i64::from(i));
            let (wind_speed, power_kw) = self.sample(turbine, location, at)?;
            let energy_mwh = power_kw * f64::from(HOURS_PER_DAY) / KW_PER_MW;
            debug!(date = %at.date(), wind_speed, power_kw, "daily estimate");

            total += energy_mwh;
            estimates.push(DayAheadEstimate {
                date: at.date(),
                wind_speed_m_s: wind_speed,
                energy_mwh,
            });
        }

        info!(
            predictor = self.predictor.name(),
            lat = location.latitude,
            lon = location.longitude,
            days,
            total_energy_mwh = total,
            "days-ahead estimate complete"
        );
        Ok(DayAheadReport { total_energy_mwh: total, days: estimates, num_days: days })
    }

    /// Candidates ordered by total energy over `range`, best first.
    /// Ties keep their request order.
    pub fn rank_locations(
        &self,
        turbine: &TurbineSpec,
        candidates: Vec<Candidate>,
        range: &DateRange,
    ) -> Result<Vec<RankedCandidate>, EnergyError> {
        if candidates.is_empty() {
            return Err(EnergyError::Validation("at least one candidate location is required".into()));
        }

        let mut ranked = candidates
            .into_iter()
            .map(|candidate| -> Result<RankedCandidate, EnergyError> {
                let location = Location::new(candidate.latitude, candidate.longitude)?;
                let report = self.estimate_range(turbine, &location, range)?;
                Ok(RankedCandidate { candidate, total_energy_mwh: report.total_energy_mwh })
            })
            .collect::<Result<Vec<_>, _>>()?;

        ranked.sort_by(|a, b| b.total_energy_mwh.total_cmp(&a.total_energy_mwh));
        Ok(ranked)
    }
}
