pub mod adjust;
pub mod allocate;
pub mod candidates;
pub mod loader;
pub mod period;
pub mod progress;

use flo_core::model::{InteractionRule, MultiFieldOptimizationResult, Violation};

/// Informational violation scan over an already-solved result: the core
/// search loop only enforces fallow/area feasibility and revenue caps
/// directly, so interaction-rule and stress warnings are reported here as a
/// separate, read-only pass instead of folded into the objective.
pub fn collect_violations(result: &MultiFieldOptimizationResult, rules: &[InteractionRule]) -> Vec<Violation> {
    let mut violations = Vec::new();
    for schedule in &result.schedules {
        for (i, alloc) in schedule.allocations.iter().enumerate() {
            let previous = schedule.allocations[..i].last();
            let others: Vec<_> = schedule
                .allocations
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, a)| a.clone())
                .collect();
            let ctx = flo_algo::violations::ViolationContext {
                previous_allocation: previous,
                other_allocations: &others,
                weather: &[],
                crop_profile: None,
                rules,
            };
            violations.extend(flo_algo::violations::check_violations(alloc, &ctx));
        }
    }
    violations
}
