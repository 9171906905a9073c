//! Shared input loading for every subcommand: fields/weather/rules go
//! through the `flo-io` JSON gateways directly; crops and their growth
//! profiles come from one combined file (`{"crops": [...], "profiles": [...]}`)
//! since the command surface exposes a single `--crops` flag for both.

use anyhow::{Context, Result};
use flo_algo::WeatherAccessor;
use flo_core::gateways::{FieldSource, InteractionRuleSource, WeatherSource};
use flo_core::model::{Crop, CropProfile, Field, InteractionRule};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

#[derive(Deserialize)]
struct CropFile {
    crops: Vec<Crop>,
    profiles: Vec<CropProfile>,
}

pub fn load_crops(path: &Path) -> Result<(Vec<Crop>, Vec<CropProfile>)> {
    let file = File::open(path).with_context(|| format!("opening '{}'", path.display()))?;
    let parsed: CropFile = serde_json::from_reader(file).with_context(|| format!("parsing '{}'", path.display()))?;
    Ok((parsed.crops, parsed.profiles))
}

pub fn load_fields(path: &Path) -> Result<Vec<Field>> {
    Ok(flo_io::JsonFieldSource::load(path)?.get_all())
}

pub fn load_weather(path: &Path) -> Result<WeatherAccessor> {
    let source = flo_io::JsonWeatherSource::load(path)?;
    let days = source.get_range(chrono::NaiveDate::MIN, chrono::NaiveDate::MAX);
    Ok(WeatherAccessor::new(days)?)
}

pub fn load_rules(path: Option<&Path>) -> Result<Vec<InteractionRule>> {
    match path {
        Some(p) => Ok(flo_io::JsonInteractionRuleSource::load(p)?.get_rules()),
        None => Ok(Vec::new()),
    }
}
