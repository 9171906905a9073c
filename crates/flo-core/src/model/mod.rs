//! Entity and value-object definitions. All entities are immutable value
//! objects; mutation happens only by constructing new versions.

pub mod allocation;
pub mod crop;
pub mod field;
pub mod profile;
pub mod rules;
pub mod violation;
pub mod weather;

pub use allocation::{AllocationCandidate, CropAllocation, FieldSchedule, MultiFieldOptimizationResult};
pub use crop::Crop;
pub use field::Field;
pub use profile::{CropProfile, GrowthStage, StageRequirement, SunshineProfile, TemperatureProfile, ThermalRequirement};
pub use rules::{InteractionRule, InteractionRuleType};
pub use violation::{is_feasible, Severity, Violation, ViolationType, YieldImpactAccumulator};
pub use weather::WeatherDay;
