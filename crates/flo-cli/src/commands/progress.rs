use super::loader;
use crate::error::CliError;
use chrono::NaiveDate;
use flo_algo::simulate::simulate;
use serde::Serialize;
use std::path::Path;

/// Growth progress as of a date, expressed by truncating the simulation
/// horizon at `as_of`: a `completion_date` of `None` means the crop is still
/// growing on that date, not that it never finishes.
#[derive(Serialize)]
struct ProgressReport {
    field_id: String,
    crop_id: String,
    start_date: NaiveDate,
    as_of: NaiveDate,
    accumulated_gdd: f64,
    percent_complete: f64,
    yield_factor: f64,
    completed: bool,
    completion_date: Option<NaiveDate>,
}

pub fn run(field_id: &str, crop_id: &str, crops: &Path, weather: &Path, start_date: NaiveDate, as_of: NaiveDate) -> Result<(), CliError> {
    let (_crop_list, profiles) = loader::load_crops(crops)?;
    let weather = loader::load_weather(weather)?;

    let profile = profiles
        .iter()
        .find(|p| p.crop_id == crop_id)
        .ok_or_else(|| CliError::Validation(format!("no growth profile for crop '{crop_id}'")))?;

    if as_of < start_date {
        return Err(CliError::Validation("as-of must be on or after start-date".to_string()));
    }

    let result = simulate(profile, &weather, start_date, as_of, None)?;
    let total_gdd = profile.total_required_gdd();
    let percent_complete = if total_gdd > 0.0 {
        (result.accumulated_gdd / total_gdd * 100.0).min(100.0)
    } else {
        100.0
    };

    let report = ProgressReport {
        field_id: field_id.to_string(),
        crop_id: crop_id.to_string(),
        start_date,
        as_of,
        accumulated_gdd: result.accumulated_gdd,
        percent_complete,
        yield_factor: result.yield_factor,
        completed: result.is_feasible(),
        completion_date: result.completion_date,
    };

    crate::output::print_success_json(&report);
    Ok(())
}
