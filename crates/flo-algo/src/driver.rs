//! Hill-climb local-search mode (`enable_alns = false`): from the DP seed,
//! repeatedly accept the best strictly-improving neighbour until none
//! exists or adaptive early stopping triggers.

use crate::dp::respects_revenue_caps;
use crate::neighbors::{generate_neighbors, solution_is_feasible, NeighborContext};
use flo_core::config::OptimizationConfig;
use flo_core::gateways::CancellationToken;
use flo_core::model::{Crop, CropAllocation};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone)]
pub struct HillClimbResult {
    pub solution: Vec<CropAllocation>,
    pub profit: f64,
    pub iterations_run: usize,
}

pub fn total_profit(solution: &[CropAllocation]) -> f64 {
    solution.iter().map(|a| a.profit).sum()
}

pub fn hill_climb(
    initial: Vec<CropAllocation>,
    ctx: &NeighborContext<'_>,
    crops: &[Crop],
    config: &OptimizationConfig,
    rng: &mut ChaCha8Rng,
    cancellation: &dyn CancellationToken,
) -> HillClimbResult {
    let mut current = initial;
    let mut current_profit = total_profit(&current);
    let mut no_improvement_streak = 0usize;
    let mut iterations_run = 0usize;

    for _ in 0..config.max_local_search_iterations {
        if cancellation.is_cancelled() {
            break;
        }
        iterations_run += 1;

        let neighbors = generate_neighbors(&current, ctx, rng);
        let best_improving = neighbors
            .into_iter()
            .filter(|n| solution_is_feasible(&n.solution) && respects_revenue_caps(&n.solution, crops))
            .map(|n| {
                let profit = total_profit(&n.solution);
                (n.solution, profit)
            })
            .filter(|(_, profit)| *profit > current_profit)
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap());

        let Some((solution, profit)) = best_improving else {
            tracing::debug!(iterations_run, current_profit, "hill climb found no improving neighbour, stopping");
            break;
        };

        let improvement_ratio = if current_profit.abs() > 1e-9 {
            (profit - current_profit) / current_profit.abs()
        } else {
            1.0
        };
        current = solution;
        current_profit = profit;

        if config.enable_adaptive_early_stopping && improvement_ratio < config.improvement_threshold_ratio {
            no_improvement_streak += 1;
        } else {
            no_improvement_streak = 0;
        }
        if config.enable_adaptive_early_stopping && no_improvement_streak >= config.max_no_improvement {
            tracing::debug!(iterations_run, current_profit, "hill climb adaptive early stop");
            break;
        }
    }

    HillClimbResult { solution: current, profit: current_profit, iterations_run }
}
