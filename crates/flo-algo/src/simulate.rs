//! Growth simulator: accumulate Growing-Degree-Days and daily stresses
//! from a start date, producing an [`IntermediateResult`].

use crate::weather::WeatherAccessor;
use chrono::NaiveDate;
use flo_core::error::{ModelError, ModelResult};
use flo_core::model::{CropProfile, YieldImpactAccumulator};

/// One simulation of a candidate start date.
#[derive(Debug, Clone, PartialEq)]
pub struct IntermediateResult {
    pub start_date: NaiveDate,
    pub completion_date: Option<NaiveDate>,
    pub growth_days: Option<i64>,
    pub accumulated_gdd: f64,
    pub yield_factor: f64,
    pub harvest_start_date: Option<NaiveDate>,
    pub base_temperature: f64,
}

impl IntermediateResult {
    pub fn is_feasible(&self) -> bool {
        self.completion_date.is_some()
    }
}

/// Simulate a crop's growth from `start_date`, stopping at the first day
/// thermal completion is reached or at `horizon_end`, whichever comes
/// first. `base_temperature` defaults to the profile's first stage base
/// temperature when `None`.
pub fn simulate(
    profile: &CropProfile,
    weather: &WeatherAccessor,
    start_date: NaiveDate,
    horizon_end: NaiveDate,
    base_temperature: Option<f64>,
) -> ModelResult<IntermediateResult> {
    let base_temp = base_temperature.unwrap_or_else(|| profile.base_temperature());
    let required_total = profile.total_required_gdd();
    let final_stage = profile.stages.last();

    // Failure mode: no weather at all for the start day means the
    // simulation cannot even begin.
    if weather.get(start_date).is_none() {
        return Err(ModelError::InsufficientWeather { start: start_date });
    }

    let mut accumulated_gdd = 0.0;
    let mut yield_acc = YieldImpactAccumulator::new();
    let mut harvest_start_date = None;
    let mut completion_date = None;
    let mut date = start_date;

    while date <= horizon_end {
        let Some(day) = weather.get(date) else {
            // Weather coverage ran out before completion: infeasible for
            // this start, not a hard error.
            break;
        };
        let t_mean = day.t_mean.unwrap_or(base_temp);
        let daily_gdd = (t_mean - base_temp).max(0.0);
        accumulated_gdd += daily_gdd;

        if let Some(stage_req) = profile.stage_at(accumulated_gdd) {
            let tp = &stage_req.temperature;
            if let Some(t_max) = day.t_max {
                if tp.is_high_temp_stress(t_max) {
                    yield_acc.apply_daily_impact(tp.high_temp_daily_impact);
                }
                if tp.is_sterility_risk(t_max) {
                    yield_acc.apply_daily_impact(tp.sterility_daily_impact);
                }
            }
            if let Some(t_min) = day.t_min {
                if tp.is_frost_risk(t_min) {
                    yield_acc.apply_daily_impact(tp.frost_daily_impact);
                }
            }
            if tp.is_low_temp_stress(t_mean) {
                yield_acc.apply_daily_impact(tp.low_temp_daily_impact);
            }
        }

        if harvest_start_date.is_none() {
            if let Some(final_req) = final_stage {
                if final_req.thermal.harvest_start_gdd.is_some()
                    && final_req.thermal.is_harvest_started(accumulated_gdd)
                {
                    harvest_start_date = Some(date);
                }
            }
        }

        if accumulated_gdd >= required_total {
            completion_date = Some(date);
            break;
        }

        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    let growth_days = completion_date.map(|c| (c - start_date).num_days());

    Ok(IntermediateResult {
        start_date,
        completion_date,
        growth_days,
        accumulated_gdd,
        yield_factor: yield_acc.yield_factor(),
        harvest_start_date,
        base_temperature: base_temp,
    })
}
