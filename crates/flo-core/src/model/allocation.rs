use super::crop::Crop;
use super::field::Field;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// A hypothetical `(field, crop, start, completion, area)` tuple, simulated
/// but not yet selected into a solution.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AllocationCandidate {
    pub field: Field,
    pub crop: Crop,
    pub start_date: NaiveDate,
    pub completion_date: NaiveDate,
    pub growth_days: i64,
    pub accumulated_gdd: f64,
    pub area_used: f64,
    pub cost: f64,
    pub revenue: f64,
    pub profit: f64,
    pub profit_rate: f64,
    pub yield_factor: f64,
}

impl AllocationCandidate {
    /// `profit / cost` when cost is positive (the normalised rate
    /// `min_profit_rate_threshold` filters against); falls back to raw
    /// profit when cost is zero so a free allocation isn't filtered out by
    /// division-by-zero.
    pub fn compute_profit_rate(profit: f64, cost: f64) -> f64 {
        if cost > 0.0 {
            profit / cost
        } else {
            profit
        }
    }

    pub fn promote(self, allocation_id: impl Into<String>) -> CropAllocation {
        CropAllocation {
            allocation_id: allocation_id.into(),
            field: self.field,
            crop: self.crop,
            start_date: self.start_date,
            completion_date: self.completion_date,
            growth_days: self.growth_days,
            accumulated_gdd: self.accumulated_gdd,
            area_used: self.area_used,
            cost: self.cost,
            revenue: self.revenue,
            profit: self.profit,
            profit_rate: self.profit_rate,
            yield_factor: self.yield_factor,
        }
    }
}

/// A selected candidate, promoted into a solution.
///
/// Invariants: `0 < area_used <= field.area`; `completion_date > start_date`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropAllocation {
    pub allocation_id: String,
    pub field: Field,
    pub crop: Crop,
    pub start_date: NaiveDate,
    pub completion_date: NaiveDate,
    pub growth_days: i64,
    pub accumulated_gdd: f64,
    pub area_used: f64,
    pub cost: f64,
    pub revenue: f64,
    pub profit: f64,
    pub profit_rate: f64,
    pub yield_factor: f64,
}

impl CropAllocation {
    /// Deterministic allocation id: `"{crop_id}-{variety}-{start_ts}"`.
    pub fn deterministic_id(crop: &Crop, start_date: NaiveDate) -> String {
        let variety = crop.variety.as_deref().unwrap_or("na");
        let start_ts = start_date.and_hms_opt(0, 0, 0).unwrap().timestamp();
        format!("{}-{}-{}", crop.crop_id, variety, start_ts)
    }

    /// Forward-only fallow semantics: violated iff
    /// `previous.completion_date + fallow_period_days > self.start_date`.
    pub fn overlaps_with_fallow(&self, previous: &CropAllocation, fallow_period_days: i64) -> bool {
        previous.completion_date + Duration::days(fallow_period_days) > self.start_date
    }

    /// Whether this allocation's `[start_date, completion_date)` interval
    /// covers the given day.
    pub fn covers(&self, day: NaiveDate) -> bool {
        day >= self.start_date && day < self.completion_date
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.area_used <= 0.0 || self.area_used > self.field.area * (1.0 + 1e-6) {
            return Err(format!(
                "area_used {} out of range (0, {}]",
                self.area_used, self.field.area
            ));
        }
        if self.completion_date <= self.start_date {
            return Err("completion_date must be after start_date".to_string());
        }
        Ok(())
    }
}

/// One field's selected allocations plus aggregate totals.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FieldSchedule {
    pub field: Field,
    pub allocations: Vec<CropAllocation>,
    pub total_cost: f64,
    pub total_revenue: f64,
    pub total_profit: f64,
    pub total_area_used: f64,
    pub utilization_rate: f64,
}

impl FieldSchedule {
    pub fn new(field: Field, mut allocations: Vec<CropAllocation>) -> Self {
        allocations.sort_by_key(|a| a.start_date);
        let total_cost: f64 = allocations.iter().map(|a| a.cost).sum();
        let total_revenue: f64 = allocations.iter().map(|a| a.revenue).sum();
        let total_profit: f64 = allocations.iter().map(|a| a.profit).sum();
        let total_area_used: f64 = allocations.iter().map(|a| a.area_used).sum();
        let utilization_rate = if field.area > 0.0 {
            total_area_used / (field.area * allocations.len().max(1) as f64)
        } else {
            0.0
        };
        Self {
            field,
            allocations,
            total_cost,
            total_revenue,
            total_profit,
            total_area_used,
            utilization_rate,
        }
    }

    /// Pairwise-non-overlapping check (with fallow) across this field's
    /// allocations.
    pub fn is_feasible_sequence(&self) -> bool {
        for window in self.allocations.windows(2) {
            let (prev, next) = (&window[0], &window[1]);
            if next.overlaps_with_fallow(prev, self.field.fallow_period_days) {
                return false;
            }
        }
        true
    }
}

/// The full multi-field result of an optimisation run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MultiFieldOptimizationResult {
    pub optimization_id: String,
    pub schedules: Vec<FieldSchedule>,
    pub total_cost: f64,
    pub total_revenue: f64,
    pub total_profit: f64,
    pub per_crop_area: BTreeMap<String, f64>,
    pub algorithm_used: String,
    pub optimization_time_seconds: f64,
    pub is_optimal: bool,
}

impl MultiFieldOptimizationResult {
    pub fn from_schedules(
        optimization_id: impl Into<String>,
        schedules: Vec<FieldSchedule>,
        algorithm_used: impl Into<String>,
        optimization_time_seconds: f64,
        is_optimal: bool,
    ) -> Self {
        let total_cost = schedules.iter().map(|s| s.total_cost).sum();
        let total_revenue = schedules.iter().map(|s| s.total_revenue).sum();
        let total_profit = schedules.iter().map(|s| s.total_profit).sum();
        let mut per_crop_area: BTreeMap<String, f64> = BTreeMap::new();
        for schedule in &schedules {
            for alloc in &schedule.allocations {
                *per_crop_area.entry(alloc.crop.crop_id.clone()).or_insert(0.0) += alloc.area_used;
            }
        }
        Self {
            optimization_id: optimization_id.into(),
            schedules,
            total_cost,
            total_revenue,
            total_profit,
            per_crop_area,
            algorithm_used: algorithm_used.into(),
            optimization_time_seconds,
            is_optimal,
        }
    }

    pub fn all_allocations(&self) -> impl Iterator<Item = &CropAllocation> {
        self.schedules.iter().flat_map(|s| s.allocations.iter())
    }
}
