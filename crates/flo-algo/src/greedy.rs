//! Greedy interval-scheduling alternative to [`crate::dp::solve_field`]:
//! sort by completion date and take every candidate that doesn't conflict
//! with what's already picked. Faster and simpler than the DP, not optimal.

use crate::dp::FieldDpResult;
use flo_core::model::{AllocationCandidate, CropAllocation, Field};

pub fn solve_field(field: &Field, mut candidates: Vec<AllocationCandidate>) -> FieldDpResult {
    if candidates.is_empty() {
        return FieldDpResult::default();
    }

    candidates.sort_by(|a, b| {
        a.completion_date
            .cmp(&b.completion_date)
            .then_with(|| a.crop.key().cmp(&b.crop.key()))
            .then_with(|| a.start_date.cmp(&b.start_date))
    });

    let fallow = field.fallow_period_days;
    let mut selected: Vec<CropAllocation> = Vec::new();
    let mut total_profit = 0.0;
    let mut last_completion: Option<chrono::NaiveDate> = None;

    for candidate in candidates {
        if candidate.profit <= 0.0 {
            continue;
        }
        let clears_fallow = last_completion.map_or(true, |last| last + chrono::Duration::days(fallow) <= candidate.start_date);
        if !clears_fallow {
            continue;
        }
        last_completion = Some(candidate.completion_date);
        total_profit += candidate.profit;
        let id = CropAllocation::deterministic_id(&candidate.crop, candidate.start_date);
        selected.push(candidate.promote(id));
    }

    FieldDpResult { selected, total_profit }
}
