use serde::{Deserialize, Serialize};

use crate::models::energy::TurbineSpec;

/// Behaviour between rated and cut-out speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatedBandPolicy {
    /// Hold `rated_power` until cut-out.
    #[default]
    Constant,
    /// `rated_power * (1 - y³)` with `y = (v - rated) / (cut_out - rated)`.
    CubicDecay,
}

impl RatedBandPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            RatedBandPolicy::Constant => "constant",
            RatedBandPolicy::CubicDecay => "cubic_decay",
        }
    }
}

/// Instantaneous output (kW) at wind speed `v` (m/s).
///
/// Total over all reals and never negative. Below cut-in the turbine is idle,
/// from cut-in to rated it follows the quintic smoothstep
/// `x³(10 - 15x + 6x²)`, which reaches exactly `rated_power` at `x = 1`.
/// `turbine` must already be validated (`cut_in < rated < cut_out`).
pub fn power_output_kw(v: f64, turbine: &TurbineSpec, policy: RatedBandPolicy) -> f64 {
    if v.is_nan() || v < turbine.cut_in || v >= turbine.cut_out {
        return 0.0;
    }

    if v < turbine.rated {
        let x = (v - turbine.cut_in) / (turbine.rated - turbine.cut_in);
        return (turbine.rated_power * x.powi(3) * (10.0 - 15.0 * x + 6.0 * x * x)).min(turbine.rated_power);
    }

    match policy {
        RatedBandPolicy::Constant => turbine.rated_power,
        RatedBandPolicy::CubicDecay => {
            let y = (v - turbine.rated) / (turbine.cut_out - turbine.rated);
            (turbine.rated_power * (1.0 - y.powi(3))).max(0.0)
        }
    }
}
