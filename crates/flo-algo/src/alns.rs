//! Adaptive large neighborhood search (`enable_alns = true`): adaptive destroy
//! (random / worst removal) and repair (greedy / regret-k reinsert) with a
//! simulated-annealing-style acceptance rule and adaptive operator weights.

use crate::dp::respects_revenue_caps;
use crate::neighbors::{others_on_field, respects_fallow_and_area, solution_is_feasible, try_insert};
use flo_core::config::OptimizationConfig;
use flo_core::gateways::CancellationToken;
use flo_core::model::{AllocationCandidate, Crop, CropAllocation};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

const SIGMA_NEW_BEST: f64 = 3.0;
const SIGMA_BETTER: f64 = 1.5;
const SIGMA_ACCEPTED_WORSE: f64 = 0.8;
const SIGMA_REJECTED: f64 = 0.5;
const SMOOTHING_RATE: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct AlnsResult {
    pub best_solution: Vec<CropAllocation>,
    pub best_profit: f64,
    pub iterations_run: usize,
}

pub fn total_profit(solution: &[CropAllocation]) -> f64 {
    solution.iter().map(|a| a.profit).sum()
}

/// Drive the destroy/repair loop from `initial`, tracking the best-so-far
/// solution across `config.alns_iterations` iterations (or until cancelled,
/// or until `max_no_improvement` consecutive non-improving steps when
/// `enable_adaptive_early_stopping` is set).
pub fn run(
    initial: Vec<CropAllocation>,
    candidates: &[AllocationCandidate],
    crops: &[Crop],
    config: &OptimizationConfig,
    rng: &mut ChaCha8Rng,
    cancellation: &dyn CancellationToken,
) -> AlnsResult {
    let mut removal_weights = [1.0_f64, 1.0_f64]; // [random, worst]
    let mut repair_weights = [1.0_f64, 1.0_f64]; // [greedy, regret-k]

    let mut current = initial;
    let mut current_profit = total_profit(&current);
    let mut best = current.clone();
    let mut best_profit = current_profit;
    let mut iterations_run = 0usize;
    let mut no_improvement_streak = 0usize;

    for iter in 0..config.alns_iterations {
        if cancellation.is_cancelled() {
            break;
        }
        iterations_run += 1;

        if current.is_empty() {
            break;
        }
        let removal_count = ((current.len() as f64) * config.alns_removal_rate).ceil().max(1.0) as usize;
        let removal_count = removal_count.min(current.len());

        let removal_idx = weighted_choice(&removal_weights, rng);
        let (partial, removed) = match removal_idx {
            0 => random_removal(&current, removal_count, rng),
            _ => worst_removal(&current, removal_count),
        };

        let repair_idx = weighted_choice(&repair_weights, rng);
        let repaired = match repair_idx {
            0 => greedy_repair(partial, removed, candidates, crops),
            _ => regret_k_repair(partial, removed, candidates, crops),
        };

        if !solution_is_feasible(&repaired) || !respects_revenue_caps(&repaired, crops) {
            tracing::debug!(removal_idx, repair_idx, "alns step produced infeasible solution, rejected");
            removal_weights[removal_idx] = smooth(removal_weights[removal_idx], SIGMA_REJECTED);
            repair_weights[repair_idx] = smooth(repair_weights[repair_idx], SIGMA_REJECTED);
            no_improvement_streak += 1;
        } else {
            let candidate_profit = total_profit(&repaired);
            let accept_probability = config.alns_accept_worse_probability_initial * config.alns_cooling_rate.powi(iter as i32);

            let (accepted, sigma) = if candidate_profit > best_profit {
                (true, SIGMA_NEW_BEST)
            } else if candidate_profit > current_profit {
                (true, SIGMA_BETTER)
            } else if rng.gen::<f64>() < accept_probability {
                (true, SIGMA_ACCEPTED_WORSE)
            } else {
                (false, SIGMA_REJECTED)
            };

            removal_weights[removal_idx] = smooth(removal_weights[removal_idx], sigma);
            repair_weights[repair_idx] = smooth(repair_weights[repair_idx], sigma);

            if accepted {
                current = repaired;
                current_profit = candidate_profit;
                if candidate_profit > best_profit {
                    best = current.clone();
                    best_profit = candidate_profit;
                    no_improvement_streak = 0;
                    tracing::debug!(iter, best_profit, "alns found new best");
                } else {
                    no_improvement_streak += 1;
                }
            } else {
                no_improvement_streak += 1;
            }
        }

        if config.enable_adaptive_early_stopping && no_improvement_streak >= config.max_no_improvement {
            break;
        }
    }

    AlnsResult { best_solution: best, best_profit, iterations_run }
}

fn smooth(old: f64, sigma: f64) -> f64 {
    (1.0 - SMOOTHING_RATE) * old + SMOOTHING_RATE * sigma
}

fn weighted_choice(weights: &[f64; 2], rng: &mut ChaCha8Rng) -> usize {
    let total: f64 = weights.iter().sum();
    let mut r = rng.gen::<f64>() * total;
    for (i, &w) in weights.iter().enumerate() {
        if r < w {
            return i;
        }
        r -= w;
    }
    weights.len() - 1
}

fn random_removal(solution: &[CropAllocation], count: usize, rng: &mut ChaCha8Rng) -> (Vec<CropAllocation>, Vec<CropAllocation>) {
    let mut indices: Vec<usize> = (0..solution.len()).collect();
    indices.shuffle(rng);
    let removed_idx: HashSet<usize> = indices.into_iter().take(count).collect();
    split_by_index(solution, &removed_idx)
}

/// Remove the `count` allocations with the lowest `profit_rate` first.
fn worst_removal(solution: &[CropAllocation], count: usize) -> (Vec<CropAllocation>, Vec<CropAllocation>) {
    let mut by_rate: Vec<usize> = (0..solution.len()).collect();
    by_rate.sort_by(|&a, &b| solution[a].profit_rate.partial_cmp(&solution[b].profit_rate).unwrap());
    let removed_idx: HashSet<usize> = by_rate.into_iter().take(count).collect();
    split_by_index(solution, &removed_idx)
}

fn split_by_index(solution: &[CropAllocation], removed_idx: &HashSet<usize>) -> (Vec<CropAllocation>, Vec<CropAllocation>) {
    let mut partial = Vec::new();
    let mut removed = Vec::new();
    for (i, allocation) in solution.iter().enumerate() {
        if removed_idx.contains(&i) {
            removed.push(allocation.clone());
        } else {
            partial.push(allocation.clone());
        }
    }
    (partial, removed)
}

/// Greedy reinsert: for each removed slot, insert the single highest-profit
/// still-feasible candidate across the whole pool.
fn greedy_repair(
    mut partial: Vec<CropAllocation>,
    removed: Vec<CropAllocation>,
    candidates: &[AllocationCandidate],
    crops: &[Crop],
) -> Vec<CropAllocation> {
    for _ in 0..removed.len() {
        let best = candidates
            .iter()
            .filter_map(|c| try_insert(&partial, c, crops).map(|a| (a, c.profit)))
            .max_by(|(_, p1), (_, p2)| p1.partial_cmp(p2).unwrap());
        match best {
            Some((allocation, _)) => partial.push(allocation),
            None => break,
        }
    }
    partial
}

/// Regret-k reinsert: for each still-unassigned removed allocation's crop,
/// compute the gap between its best and second-best feasible insertion;
/// insert the crop with the largest such regret first, covering the urgent
/// placements (few remaining feasible slots) before the flexible ones.
fn regret_k_repair(
    mut partial: Vec<CropAllocation>,
    mut pending: Vec<CropAllocation>,
    candidates: &[AllocationCandidate],
    crops: &[Crop],
) -> Vec<CropAllocation> {
    while !pending.is_empty() {
        let mut chosen: Option<(usize, CropAllocation, f64)> = None;

        for (idx, removed) in pending.iter().enumerate() {
            let mut options: Vec<&AllocationCandidate> = candidates.iter().filter(|c| c.crop.key() == removed.crop.key()).collect();
            options.sort_by(|a, b| b.profit.partial_cmp(&a.profit).unwrap());

            let mut feasible_profits = Vec::new();
            let mut best_feasible = None;
            for option in &options {
                if let Some(inserted) = try_insert(&partial, option, crops) {
                    feasible_profits.push(option.profit);
                    if best_feasible.is_none() {
                        best_feasible = Some(inserted);
                    }
                    if feasible_profits.len() >= 2 {
                        break;
                    }
                }
            }
            let Some(insertion) = best_feasible else { continue };
            let regret = feasible_profits[0] - feasible_profits.get(1).copied().unwrap_or(0.0);
            if chosen.as_ref().map_or(true, |(_, _, r)| regret > *r) {
                chosen = Some((idx, insertion, regret));
            }
        }

        match chosen {
            Some((idx, insertion, _)) => {
                partial.push(insertion);
                pending.remove(idx);
            }
            None => break,
        }
    }
    partial
}
