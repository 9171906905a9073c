use super::loader;
use crate::cli::{ConfigProfile, OutputFormat};
use crate::error::CliError;
use crate::output;
use chrono::NaiveDate;
use flo_algo::candidates::{generate_candidates, CropWithProfile};
use std::path::Path;

#[allow(clippy::too_many_arguments)]
pub fn run(
    fields: &Path,
    crops: &Path,
    weather: &Path,
    horizon_start: NaiveDate,
    horizon_end: NaiveDate,
    profile: ConfigProfile,
    format: OutputFormat,
) -> Result<(), CliError> {
    let fields = loader::load_fields(fields)?;
    let (crop_list, profiles) = loader::load_crops(crops)?;
    let weather = loader::load_weather(weather)?;

    if horizon_end < horizon_start {
        return Err(CliError::Validation("horizon-end must be on or after horizon-start".to_string()));
    }

    let pairs: Vec<CropWithProfile<'_>> = crop_list
        .iter()
        .filter_map(|crop| {
            profiles
                .iter()
                .find(|p| p.crop_id == crop.crop_id && p.variety == crop.variety)
                .map(|profile| CropWithProfile { crop, profile })
        })
        .collect();

    let config = profile.to_config();
    let candidates = generate_candidates(&fields, &pairs, &weather, horizon_start, horizon_end, &config);

    match format {
        OutputFormat::Json => output::print_success_json(&candidates),
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = candidates
                .iter()
                .map(|c| {
                    vec![
                        c.field.field_id.clone(),
                        c.crop.key(),
                        c.start_date.to_string(),
                        c.completion_date.to_string(),
                        format!("{:.2}", c.area_used),
                        format!("{:.2}", c.profit),
                        format!("{:.3}", c.profit_rate),
                    ]
                })
                .collect();
            output::print_table(&["field", "crop", "start", "completion", "area", "profit", "profit_rate"], &rows)?;
        }
    }
    Ok(())
}
