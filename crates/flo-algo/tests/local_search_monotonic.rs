//! Neither hill-climb nor ALNS ever returns a total profit below the
//! DP-only seed.

mod common;

use chrono::NaiveDate;
use common::{crop, field};
use flo_algo::alns;
use flo_algo::dp::solve_field;
use flo_algo::driver;
use flo_algo::neighbors::NeighborContext;
use flo_core::config::OptimizationConfig;
use flo_core::gateways::NeverCancel;
use flo_core::model::AllocationCandidate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn candidate(f: &flo_core::model::Field, c: &flo_core::model::Crop, start: NaiveDate, completion: NaiveDate, profit: f64) -> AllocationCandidate {
    AllocationCandidate {
        field: f.clone(),
        crop: c.clone(),
        start_date: start,
        completion_date: completion,
        growth_days: (completion - start).num_days(),
        accumulated_gdd: 1200.0,
        area_used: f.area,
        cost: 300.0,
        revenue: profit + 300.0,
        profit,
        profit_rate: profit / 300.0,
        yield_factor: 1.0,
    }
}

fn candidate_pool() -> (flo_core::model::Field, flo_core::model::Field, Vec<AllocationCandidate>) {
    let f1 = field("f1", 1000.0, 5000.0);
    let f2 = field("f2", 1000.0, 5000.0);
    let rice = crop("rice", 1.0);
    let tomato = crop("tomato", 1.0);
    let candidates = vec![
        candidate(&f1, &rice, d(2024, 1, 1), d(2024, 3, 1), 500.0),
        candidate(&f1, &tomato, d(2024, 4, 1), d(2024, 6, 1), 900.0),
        candidate(&f2, &rice, d(2024, 1, 1), d(2024, 3, 1), 400.0),
        candidate(&f2, &tomato, d(2024, 4, 1), d(2024, 6, 1), 1100.0),
    ];
    (f1, f2, candidates)
}

#[test]
fn hill_climb_never_regresses_below_dp_seed() {
    let (f1, f2, candidates) = candidate_pool();
    let dp_f1 = solve_field(&f1, candidates.iter().filter(|c| c.field.field_id == "f1").cloned().collect());
    let dp_f2 = solve_field(&f2, candidates.iter().filter(|c| c.field.field_id == "f2").cloned().collect());
    let mut seed: Vec<_> = dp_f1.selected;
    seed.extend(dp_f2.selected);
    let dp_profit: f64 = seed.iter().map(|a| a.profit).sum();

    let fields = vec![f1, f2];
    let crops = vec![];
    let config = OptimizationConfig::fast();
    let ctx = NeighborContext { candidates: &candidates, fields: &fields, config: &config };
    let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
    let result = driver::hill_climb(seed, &ctx, &crops, &config, &mut rng, &NeverCancel);
    assert!(result.profit >= dp_profit - 1e-9);
}

#[test]
fn alns_never_regresses_below_dp_seed() {
    let (f1, f2, candidates) = candidate_pool();
    let dp_f1 = solve_field(&f1, candidates.iter().filter(|c| c.field.field_id == "f1").cloned().collect());
    let dp_f2 = solve_field(&f2, candidates.iter().filter(|c| c.field.field_id == "f2").cloned().collect());
    let mut seed: Vec<_> = dp_f1.selected;
    seed.extend(dp_f2.selected);
    let dp_profit: f64 = seed.iter().map(|a| a.profit).sum();

    let crops = vec![];
    let mut config = OptimizationConfig::fast();
    config.enable_alns = true;
    config.alns_iterations = 40;
    let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
    let result = alns::run(seed, &candidates, &crops, &config, &mut rng, &NeverCancel);
    assert!(result.best_profit >= dp_profit - 1e-9);
}
