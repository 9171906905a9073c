use super::loader;
use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;
use chrono::NaiveDate;
use flo_algo::optimal_period;
use serde::Serialize;
use std::path::Path;

/// `optimal_period` needs a `horizon_end` distinct from `window_end` so a
/// crop started near the end of the window can still finish growing; the
/// command surface has no separate flag for it, so it defaults to one year
/// past the window.
fn implied_horizon_end(window_end: NaiveDate) -> NaiveDate {
    window_end + chrono::Duration::days(365)
}

#[derive(Serialize)]
struct PeriodRow {
    start_date: NaiveDate,
    completion_date: Option<NaiveDate>,
    growth_days: Option<i64>,
    cost: f64,
    revenue: Option<f64>,
    profit: f64,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    field_id: &str,
    crop_id: &str,
    fields: &Path,
    crops: &Path,
    weather: &Path,
    window_start: NaiveDate,
    window_end: NaiveDate,
    format: OutputFormat,
) -> Result<(), CliError> {
    let fields = loader::load_fields(fields)?;
    let (crop_list, profiles) = loader::load_crops(crops)?;
    let weather = loader::load_weather(weather)?;

    let field = fields
        .iter()
        .find(|f| f.field_id == field_id)
        .ok_or_else(|| CliError::Validation(format!("unknown field '{field_id}'")))?;
    let crop = crop_list
        .iter()
        .find(|c| c.crop_id == crop_id)
        .ok_or_else(|| CliError::Validation(format!("unknown crop '{crop_id}'")))?;
    let profile = profiles
        .iter()
        .find(|p| p.crop_id == crop_id)
        .ok_or_else(|| CliError::Validation(format!("no growth profile for crop '{crop_id}'")))?;

    if window_end < window_start {
        return Err(CliError::Validation("window-end must be on or after window-start".to_string()));
    }

    let horizon_end = implied_horizon_end(window_end);
    let result = optimal_period(profile, field, crop, &weather, window_start, window_end, horizon_end);

    if result.ranked.is_empty() {
        return Err(CliError::Infeasible(format!(
            "no admissible start for '{crop_id}' on '{field_id}' in [{window_start}, {window_end}]"
        )));
    }

    let rows: Vec<PeriodRow> = result
        .ranked
        .iter()
        .map(|eval| PeriodRow {
            start_date: eval.result.start_date,
            completion_date: eval.result.completion_date,
            growth_days: eval.result.growth_days,
            cost: eval.cost,
            revenue: eval.revenue,
            profit: eval.profit,
        })
        .collect();

    match format {
        OutputFormat::Json => output::print_success_json(&rows),
        OutputFormat::Table => {
            let table_rows: Vec<Vec<String>> = rows
                .iter()
                .map(|r| {
                    vec![
                        r.start_date.to_string(),
                        r.completion_date.map(|d| d.to_string()).unwrap_or_default(),
                        r.growth_days.map(|d| d.to_string()).unwrap_or_default(),
                        format!("{:.2}", r.cost),
                        r.revenue.map(|v| format!("{v:.2}")).unwrap_or_default(),
                        format!("{:.2}", r.profit),
                    ]
                })
                .collect();
            output::print_table(&["start", "completion", "growth_days", "cost", "revenue", "profit"], &table_rows)?;
        }
    }
    Ok(())
}
