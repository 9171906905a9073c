//! Period optimiser: for one (field, crop), rank every admissible
//! start in an evaluation window by the unified objective and pick the
//! optimum.

use crate::simulate::{simulate, IntermediateResult};
use crate::weather::WeatherAccessor;
use chrono::NaiveDate;
use flo_core::model::{Crop, CropProfile, Field};

/// One admissible start's full cost/revenue/profit evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodEvaluation {
    pub result: IntermediateResult,
    pub cost: f64,
    pub revenue: Option<f64>,
    /// Unified objective: `revenue - cost` when revenue is known, else `-cost`.
    pub profit: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PeriodOptimizationResult {
    /// All admissible evaluations, ranked best-first.
    pub ranked: Vec<PeriodEvaluation>,
}

impl PeriodOptimizationResult {
    pub fn best(&self) -> Option<&PeriodEvaluation> {
        self.ranked.first()
    }
}

/// Cost/revenue at a nominal area (the full field). Simulation outputs
/// (GDD, yield factor, growth days) are area-independent, so the candidate
/// generator reuses these per-start results across quantity levels without
/// re-simulating.
fn evaluate(profile: &CropProfile, field: &Field, crop: &Crop, result: IntermediateResult) -> Option<PeriodEvaluation> {
    if !result.is_feasible() {
        return None;
    }
    let growth_days = result.growth_days.unwrap();
    let cost = growth_days as f64 * field.daily_fixed_cost;
    let revenue = crop.revenue_per_area.map(|rpa| {
        let raw = field.area * rpa * result.yield_factor;
        match crop.max_revenue {
            Some(cap) => raw.min(cap),
            None => raw,
        }
    });
    let profit = match revenue {
        Some(r) => r - cost,
        None => -cost,
    };
    let _ = profile;
    Some(PeriodEvaluation { result, cost, revenue, profit })
}

pub fn optimal_period(
    profile: &CropProfile,
    field: &Field,
    crop: &Crop,
    weather: &WeatherAccessor,
    window_start: NaiveDate,
    window_end: NaiveDate,
    horizon_end: NaiveDate,
) -> PeriodOptimizationResult {
    let mut evaluations = Vec::new();
    let mut date = window_start;
    while date <= window_end {
        if let Ok(result) = simulate(profile, weather, date, horizon_end, None) {
            if let Some(eval) = evaluate(profile, field, crop, result) {
                evaluations.push(eval);
            }
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    let deduped = dedupe_redundant(evaluations);
    let mut ranked = deduped;
    ranked.sort_by(|a, b| {
        b.profit
            .partial_cmp(&a.profit)
            .unwrap()
            .then_with(|| a.result.completion_date.cmp(&b.result.completion_date))
            .then_with(|| a.result.growth_days.cmp(&b.result.growth_days))
    });
    PeriodOptimizationResult { ranked }
}

/// Drop starts within 1 day of a retained start with an identical
/// completion date and near-equal cost, keeping the earlier one.
fn dedupe_redundant(mut evaluations: Vec<PeriodEvaluation>) -> Vec<PeriodEvaluation> {
    evaluations.sort_by_key(|e| e.result.start_date);
    let mut kept: Vec<PeriodEvaluation> = Vec::with_capacity(evaluations.len());
    for eval in evaluations {
        let is_redundant = kept.last().is_some_and(|last| {
            (eval.result.start_date - last.result.start_date).num_days() <= 1
                && eval.result.completion_date == last.result.completion_date
                && (eval.cost - last.cost).abs() < 1e-6
        });
        if !is_redundant {
            kept.push(eval);
        }
    }
    kept
}
