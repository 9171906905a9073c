//! Top-level pipeline wiring candidate generation, the per-field interval
//! scheduler, local search, and the revenue-cap trim into one multi-field
//! result. The entry point callers outside this crate use.

use crate::alns;
use crate::candidates::{generate_candidates, CropWithProfile};
use crate::dp;
use crate::driver;
use crate::greedy;
use crate::neighbors::NeighborContext;
use crate::weather::WeatherAccessor;
use chrono::NaiveDate;
use flo_core::config::OptimizationConfig;
use flo_core::gateways::CancellationToken;
use flo_core::model::{AllocationCandidate, Crop, CropProfile, Field, FieldSchedule, MultiFieldOptimizationResult};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Dp,
    Greedy,
}

pub struct SolveInput<'a> {
    pub fields: &'a [Field],
    pub crops: &'a [Crop],
    pub profiles: &'a [CropProfile],
    pub weather: &'a WeatherAccessor,
    pub horizon_start: NaiveDate,
    pub horizon_end: NaiveDate,
    pub algorithm: Algorithm,
}

pub fn run_optimization(
    optimization_id: impl Into<String>,
    input: &SolveInput<'_>,
    config: &OptimizationConfig,
    cancellation: &dyn CancellationToken,
) -> MultiFieldOptimizationResult {
    let crop_pairs: Vec<CropWithProfile<'_>> = input
        .crops
        .iter()
        .filter_map(|crop| {
            input
                .profiles
                .iter()
                .find(|p| p.crop_id == crop.crop_id && p.variety == crop.variety)
                .map(|profile| CropWithProfile { crop, profile })
        })
        .collect();

    let candidates = generate_candidates(input.fields, &crop_pairs, input.weather, input.horizon_start, input.horizon_end, config);
    tracing::debug!(count = candidates.len(), "global candidate pool generated");

    let mut by_field: HashMap<&str, Vec<AllocationCandidate>> = HashMap::new();
    for candidate in &candidates {
        by_field.entry(candidate.field.field_id.as_str()).or_default().push(candidate.clone());
    }

    let mut seed = Vec::new();
    for field in input.fields {
        if cancellation.is_cancelled() {
            break;
        }
        let field_candidates = by_field.remove(field.field_id.as_str()).unwrap_or_default();
        let field_result = match input.algorithm {
            Algorithm::Dp => dp::solve_field(field, field_candidates),
            Algorithm::Greedy => greedy::solve_field(field, field_candidates),
        };
        seed.extend(field_result.selected);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
    let searched = if config.enable_local_search && !cancellation.is_cancelled() {
        if config.enable_alns {
            alns::run(seed, &candidates, input.crops, config, &mut rng, cancellation).best_solution
        } else {
            let ctx = NeighborContext { candidates: &candidates, fields: input.fields, config };
            driver::hill_climb(seed, &ctx, input.crops, config, &mut rng, cancellation).solution
        }
    } else {
        seed
    };

    let final_solution = dp::enforce_revenue_caps(searched, input.crops);

    let schedules: Vec<FieldSchedule> = input
        .fields
        .iter()
        .map(|field| {
            let allocations: Vec<_> = final_solution.iter().filter(|a| a.field.field_id == field.field_id).cloned().collect();
            FieldSchedule::new(field.clone(), allocations)
        })
        .filter(|schedule| !schedule.allocations.is_empty())
        .collect();

    let is_optimal = input.algorithm == Algorithm::Dp && !config.enable_local_search;
    let algorithm_used = algorithm_label(input.algorithm, config);

    MultiFieldOptimizationResult::from_schedules(optimization_id, schedules, algorithm_used, 0.0, is_optimal)
}

fn algorithm_label(algorithm: Algorithm, config: &OptimizationConfig) -> &'static str {
    match (algorithm, config.enable_local_search, config.enable_alns) {
        (Algorithm::Dp, false, _) => "dp",
        (Algorithm::Dp, true, true) => "dp+alns",
        (Algorithm::Dp, true, false) => "dp+hill_climb",
        (Algorithm::Greedy, false, _) => "greedy",
        (Algorithm::Greedy, true, true) => "greedy+alns",
        (Algorithm::Greedy, true, false) => "greedy+hill_climb",
    }
}
