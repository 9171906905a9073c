//! Growth simulation, period optimisation, candidate generation, allocation
//! solving (dynamic programming + adaptive large neighborhood search), and
//! constraint checking for the seasonal field allocation optimiser.

pub mod alns;
pub mod candidates;
pub mod dp;
pub mod driver;
pub mod greedy;
pub mod neighbors;
pub mod period;
pub mod simulate;
pub mod solve;
pub mod violations;
pub mod weather;

mod test_support;

pub use candidates::{generate_candidates, CropWithProfile};
pub use period::{optimal_period, PeriodEvaluation, PeriodOptimizationResult};
pub use simulate::{simulate, IntermediateResult};
pub use solve::{run_optimization, Algorithm, SolveInput};
pub use weather::WeatherAccessor;
