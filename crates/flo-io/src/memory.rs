//! In-memory gateway implementations: fixtures for tests and for callers
//! that already have the data loaded (e.g. the CLI after parsing a single
//! combined scenario file).

use chrono::NaiveDate;
use flo_core::gateways::{CropProfileSource, CropSource, FieldSource, InteractionRuleSource, WeatherSource};
use flo_core::model::{Crop, CropProfile, Field, InteractionRule, WeatherDay};

pub struct InMemoryFieldSource(pub Vec<Field>);

impl FieldSource for InMemoryFieldSource {
    fn get(&self, field_id: &str) -> Option<Field> {
        self.0.iter().find(|f| f.field_id == field_id).cloned()
    }

    fn get_all(&self) -> Vec<Field> {
        self.0.clone()
    }
}

pub struct InMemoryCropSource(pub Vec<Crop>);

impl CropSource for InMemoryCropSource {
    fn get(&self, crop_id: &str, variety: Option<&str>) -> Option<Crop> {
        self.0.iter().find(|c| c.crop_id == crop_id && c.variety.as_deref() == variety).cloned()
    }

    fn get_all(&self) -> Vec<Crop> {
        self.0.clone()
    }
}

pub struct InMemoryCropProfileSource(pub Vec<CropProfile>);

impl CropProfileSource for InMemoryCropProfileSource {
    fn get(&self, crop_id: &str, variety: Option<&str>) -> Option<CropProfile> {
        self.0.iter().find(|p| p.crop_id == crop_id && p.variety.as_deref() == variety).cloned()
    }

    fn get_all(&self) -> Vec<CropProfile> {
        self.0.clone()
    }
}

pub struct InMemoryWeatherSource(pub Vec<WeatherDay>);

impl WeatherSource for InMemoryWeatherSource {
    fn get_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<WeatherDay> {
        self.0.iter().filter(|d| d.date >= start && d.date <= end).copied().collect()
    }
}

pub struct InMemoryInteractionRuleSource(pub Vec<InteractionRule>);

impl InteractionRuleSource for InMemoryInteractionRuleSource {
    fn get_rules(&self) -> Vec<InteractionRule> {
        self.0.clone()
    }
}
