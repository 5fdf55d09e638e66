//! Temporal feature encoding for the wind-speed regressors.
//!
//! Feature order is part of each model's contract: the regressors are trained
//! on columns in exactly this order and index them positionally.

use chrono::{Datelike, NaiveDateTime, Timelike};
use std::f64::consts::PI;

use crate::models::energy::Location;

pub const CYCLICAL_FEATURES: usize = 12;
pub const RAW_FEATURES: usize = 4;

/// `(sin, cos)` of `value` on a circle of the given period.
#[inline]
fn cyclical(value: f64, period: f64) -> (f64, f64) {
    let angle = 2.0 * PI * value / period;
    (angle.sin(), angle.cos())
}

/// 12 features: longitude, latitude, then sin/cos pairs for month (12),
/// day of month (31), hour (24), day of year (365) and day of week (7, Monday = 0).
pub fn encode_cyclical(location: &Location, at: NaiveDateTime) -> [f64; CYCLICAL_FEATURES] {
    let (month_sin, month_cos) = cyclical(at.month() as f64, 12.0);
    let (day_sin, day_cos) = cyclical(at.day() as f64, 31.0);
    let (hour_sin, hour_cos) = cyclical(at.hour() as f64, 24.0);
    let (doy_sin, doy_cos) = cyclical(at.ordinal() as f64, 365.0);
    let (dow_sin, dow_cos) = cyclical(at.weekday().num_days_from_monday() as f64, 7.0);

    [
        location.longitude,
        location.latitude,
        month_sin,
        month_cos,
        day_sin,
        day_cos,
        hour_sin,
        hour_cos,
        doy_sin,
        doy_cos,
        dow_sin,
        dow_cos,
    ]
}

/// 4 features: longitude, latitude, month, day of month. No transform.
pub fn encode_raw(location: &Location, at: NaiveDateTime) -> [f64; RAW_FEATURES] {
    [
        location.longitude,
        location.latitude,
        at.month() as f64,
        at.day() as f64,
    ]
}
