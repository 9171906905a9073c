//! JSON-file-backed and in-memory adapters implementing the core's gateway
//! traits.

pub mod json;
pub mod memory;

pub use json::{
    JsonCropProfileSource, JsonCropSource, JsonFieldSource, JsonInteractionRuleSource, JsonOptimizationResultSink, JsonWeatherSource,
};
pub use memory::{InMemoryCropProfileSource, InMemoryCropSource, InMemoryFieldSource, InMemoryInteractionRuleSource, InMemoryWeatherSource};
