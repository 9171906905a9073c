//! Tunable options for the candidate generator and search driver.
//!
//! `fast` / `balanced` / `quality` presets trade runtime against solution
//! quality; `Default` is `balanced`.

/// Scaling the quantity of a crop applied to a candidate, mapped to an area
/// via `crop.area_per_unit`.
pub type QuantityLevel = f64;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OptimizationConfig {
    // --- candidate generation ---
    pub enable_parallel_candidate_generation: bool,
    pub enable_candidate_filtering: bool,
    pub min_profit_rate_threshold: f64,
    pub min_revenue_cost_ratio: f64,
    pub max_candidates_per_field_crop: usize,
    pub quantity_levels: Vec<QuantityLevel>,
    pub area_adjustment_multipliers: Vec<f64>,

    // --- local search / ALNS ---
    pub enable_local_search: bool,
    pub max_local_search_iterations: usize,
    pub enable_neighbor_sampling: bool,
    pub max_neighbors_per_iteration: usize,
    pub enable_alns: bool,
    pub alns_iterations: usize,
    pub alns_removal_rate: f64,
    pub alns_accept_worse_probability_initial: f64,
    pub alns_cooling_rate: f64,
    pub enable_adaptive_early_stopping: bool,
    pub max_no_improvement: usize,
    pub improvement_threshold_ratio: f64,

    /// Single process-wide debug-log knob (§9), passed at construction —
    /// never read from the environment inside the core crates.
    pub debug_logging: bool,

    /// Seed for the single RNG threaded through ALNS/sampling (§5).
    pub rng_seed: u64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self::balanced()
    }
}

impl OptimizationConfig {
    pub fn fast() -> Self {
        Self {
            enable_parallel_candidate_generation: true,
            enable_candidate_filtering: true,
            min_profit_rate_threshold: 0.1,
            min_revenue_cost_ratio: 1.1,
            max_candidates_per_field_crop: 20,
            quantity_levels: vec![1.0],
            area_adjustment_multipliers: vec![0.75, 1.0, 1.25],
            enable_local_search: true,
            max_local_search_iterations: 50,
            enable_neighbor_sampling: true,
            max_neighbors_per_iteration: 20,
            enable_alns: false,
            alns_iterations: 0,
            alns_removal_rate: 0.2,
            alns_accept_worse_probability_initial: 0.1,
            alns_cooling_rate: 0.99,
            enable_adaptive_early_stopping: true,
            max_no_improvement: 10,
            improvement_threshold_ratio: 0.01,
            debug_logging: false,
            rng_seed: 42,
        }
    }

    pub fn balanced() -> Self {
        Self {
            enable_parallel_candidate_generation: true,
            enable_candidate_filtering: true,
            min_profit_rate_threshold: 0.0,
            min_revenue_cost_ratio: 1.0,
            max_candidates_per_field_crop: 100,
            quantity_levels: vec![0.5, 0.75, 1.0],
            area_adjustment_multipliers: vec![0.5, 0.75, 1.0, 1.25, 1.5],
            enable_local_search: true,
            max_local_search_iterations: 200,
            enable_neighbor_sampling: true,
            max_neighbors_per_iteration: 50,
            enable_alns: true,
            alns_iterations: 300,
            alns_removal_rate: 0.3,
            alns_accept_worse_probability_initial: 0.2,
            alns_cooling_rate: 0.995,
            enable_adaptive_early_stopping: true,
            max_no_improvement: 30,
            improvement_threshold_ratio: 0.001,
            debug_logging: false,
            rng_seed: 42,
        }
    }

    pub fn quality() -> Self {
        Self {
            enable_parallel_candidate_generation: true,
            enable_candidate_filtering: false,
            min_profit_rate_threshold: 0.0,
            min_revenue_cost_ratio: 0.0,
            max_candidates_per_field_crop: usize::MAX,
            quantity_levels: vec![0.25, 0.5, 0.75, 1.0, 1.25],
            area_adjustment_multipliers: vec![0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0],
            enable_local_search: true,
            max_local_search_iterations: 1000,
            enable_neighbor_sampling: false,
            max_neighbors_per_iteration: usize::MAX,
            enable_alns: true,
            alns_iterations: 2000,
            alns_removal_rate: 0.35,
            alns_accept_worse_probability_initial: 0.3,
            alns_cooling_rate: 0.998,
            enable_adaptive_early_stopping: false,
            max_no_improvement: 200,
            improvement_threshold_ratio: 0.0001,
            debug_logging: false,
            rng_seed: 42,
        }
    }
}
