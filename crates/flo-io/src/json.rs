//! Load gateway inputs from a JSON array file and write results back out the
//! same way: `serde_json::to_writer_pretty`/`from_reader` wrapped in
//! `anyhow::Context` at the file boundary.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use flo_core::error::ModelError;
use flo_core::gateways::{CropProfileSource, CropSource, FieldSource, InteractionRuleSource, OptimizationResultSink, WeatherSource};
use flo_core::model::{Crop, CropProfile, Field, InteractionRule, MultiFieldOptimizationResult, WeatherDay};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("opening '{}'", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("parsing '{}'", path.display()))
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating '{}'", path.display()))?;
    serde_json::to_writer_pretty(file, value).with_context(|| format!("writing '{}'", path.display()))
}

pub struct JsonFieldSource {
    fields: Vec<Field>,
}

impl JsonFieldSource {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self { fields: load_json(path)? })
    }
}

impl FieldSource for JsonFieldSource {
    fn get(&self, field_id: &str) -> Option<Field> {
        self.fields.iter().find(|f| f.field_id == field_id).cloned()
    }

    fn get_all(&self) -> Vec<Field> {
        self.fields.clone()
    }
}

pub struct JsonCropSource {
    crops: Vec<Crop>,
}

impl JsonCropSource {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self { crops: load_json(path)? })
    }
}

impl CropSource for JsonCropSource {
    fn get(&self, crop_id: &str, variety: Option<&str>) -> Option<Crop> {
        self.crops.iter().find(|c| c.crop_id == crop_id && c.variety.as_deref() == variety).cloned()
    }

    fn get_all(&self) -> Vec<Crop> {
        self.crops.clone()
    }
}

pub struct JsonCropProfileSource {
    profiles: Vec<CropProfile>,
}

impl JsonCropProfileSource {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self { profiles: load_json(path)? })
    }
}

impl CropProfileSource for JsonCropProfileSource {
    fn get(&self, crop_id: &str, variety: Option<&str>) -> Option<CropProfile> {
        self.profiles.iter().find(|p| p.crop_id == crop_id && p.variety.as_deref() == variety).cloned()
    }

    fn get_all(&self) -> Vec<CropProfile> {
        self.profiles.clone()
    }
}

pub struct JsonWeatherSource {
    days: Vec<WeatherDay>,
}

impl JsonWeatherSource {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self { days: load_json(path)? })
    }
}

impl WeatherSource for JsonWeatherSource {
    fn get_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<WeatherDay> {
        self.days.iter().filter(|d| d.date >= start && d.date <= end).copied().collect()
    }
}

pub struct JsonInteractionRuleSource {
    rules: Vec<InteractionRule>,
}

impl JsonInteractionRuleSource {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self { rules: load_json(path)? })
    }
}

impl InteractionRuleSource for JsonInteractionRuleSource {
    fn get_rules(&self) -> Vec<InteractionRule> {
        self.rules.clone()
    }
}

pub struct JsonOptimizationResultSink {
    path: PathBuf,
}

impl JsonOptimizationResultSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OptimizationResultSink for JsonOptimizationResultSink {
    fn save(&self, schedule: &MultiFieldOptimizationResult) -> Result<(), ModelError> {
        save_json(&self.path, schedule).map_err(|e| ModelError::InvariantBreach(format!("writing optimization result: {e:#}")))
    }
}
