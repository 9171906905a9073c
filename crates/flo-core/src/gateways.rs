//! Gateway traits adapters implement to supply the core with its inputs.
//! Algorithms in `flo-algo`/`flo-interact` depend only on these traits,
//! never on a concrete adapter.

use crate::error::ModelError;
use crate::model::allocation::MultiFieldOptimizationResult;
use crate::model::crop::Crop;
use crate::model::field::Field;
use crate::model::profile::CropProfile;
use crate::model::rules::InteractionRule;
use crate::model::weather::WeatherDay;
use chrono::NaiveDate;

pub trait FieldSource {
    fn get(&self, field_id: &str) -> Option<Field>;
    fn get_all(&self) -> Vec<Field>;
}

pub trait CropSource {
    fn get(&self, crop_id: &str, variety: Option<&str>) -> Option<Crop>;
    fn get_all(&self) -> Vec<Crop>;
}

pub trait CropProfileSource {
    fn get(&self, crop_id: &str, variety: Option<&str>) -> Option<CropProfile>;
    fn get_all(&self) -> Vec<CropProfile>;
}

/// Daily-resolution weather series. Timezone is fixed at construction by the
/// adapter; the core treats dates as naive calendar days.
pub trait WeatherSource {
    fn get_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<WeatherDay>;
}

pub trait InteractionRuleSource {
    fn get_rules(&self) -> Vec<InteractionRule>;
}

pub trait OptimizationResultSink {
    fn save(&self, schedule: &MultiFieldOptimizationResult) -> Result<(), ModelError>;
}

/// Cooperative cancellation signal polled at the top of each ALNS iteration
/// and between neighbour batches in hill-climb.
pub trait CancellationToken {
    fn is_cancelled(&self) -> bool;
}

/// A token that never cancels, for callers that don't need one.
pub struct NeverCancel;

impl CancellationToken for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl CancellationToken for std::sync::atomic::AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(std::sync::atomic::Ordering::Relaxed)
    }
}
