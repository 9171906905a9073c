//! Interval-scheduling dynamic program: per field, the maximum-profit
//! non-overlapping (fallow-respecting) subset of candidates.

use flo_core::model::{AllocationCandidate, Crop, CropAllocation, Field};
use std::collections::HashMap;

/// One field's optimal non-overlapping subset plus its total profit.
#[derive(Debug, Clone, Default)]
pub struct FieldDpResult {
    pub selected: Vec<CropAllocation>,
    pub total_profit: f64,
}

/// Solve weighted interval scheduling for one field's candidates.
///
/// Candidates are sorted by `completion_date` ascending; `p(i)` is the
/// largest index `j < i` whose completion plus fallow clears candidate `i`'s
/// start, found by binary search (candidates are sorted so this exists as a
/// monotonic boundary). `M[i] = max(M[i-1], profit_i + M[p(i)])`, with
/// traceback reconstructing the selected set. Ties at equal `M[i]` favour the
/// earlier-built table entry, i.e. lexicographically smaller
/// `(field_id, crop_id)` since candidates are pre-sorted that way on input.
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

    let n = candidates.len();
    let fallow = field.fallow_period_days;
    let predecessor: Vec<Option<usize>> = (0..n)
        .map(|i| find_predecessor(&candidates, i, fallow))
        .collect();

    // table[i] = best profit achievable using only candidates[0..=i].
    let mut table = vec![0.0_f64; n];
    let mut take = vec![false; n];
    for i in 0..n {
        let skip = if i == 0 { 0.0 } else { table[i - 1] };
        let with_i = candidates[i].profit + predecessor[i].map(|p| table[p]).unwrap_or(0.0);
        if with_i > skip {
            table[i] = with_i;
            take[i] = true;
        } else {
            table[i] = skip;
            take[i] = false;
        }
    }

    let mut selected_idx = Vec::new();
    let mut i = n as isize - 1;
    while i >= 0 {
        let idx = i as usize;
        if take[idx] {
            selected_idx.push(idx);
            i = predecessor[idx].map(|p| p as isize).unwrap_or(-1);
        } else {
            i -= 1;
        }
    }
    selected_idx.reverse();

    let total_profit = table[n - 1];
    let selected = selected_idx
        .into_iter()
        .map(|idx| {
            let candidate = candidates[idx].clone();
            let id = CropAllocation::deterministic_id(&candidate.crop, candidate.start_date);
            candidate.promote(id)
        })
        .collect();

    FieldDpResult { selected, total_profit }
}

/// Largest `j < i` such that `candidates[j].completion_date + fallow <=
/// candidates[i].start_date`, via binary search over the completion-sorted
/// prefix `[0, i)`.
fn find_predecessor(candidates: &[AllocationCandidate], i: usize, fallow: i64) -> Option<usize> {
    if i == 0 {
        return None;
    }
    let deadline = candidates[i].start_date - chrono::Duration::days(fallow);
    let mut lo = 0isize;
    let mut hi = i as isize - 1;
    let mut result = None;
    while lo <= hi {
        let mid = (lo + hi) / 2;
        if candidates[mid as usize].completion_date <= deadline {
            result = Some(mid as usize);
            lo = mid + 1;
        } else {
            hi = mid - 1;
        }
    }
    result
}

/// Per-crop `max_revenue` cap, enforced as a post-hoc greedy trim across the
/// union of per-field DP solutions. Kept post-hoc rather than folded into
/// the per-allocation violation check so the DP's own profit ordering is
/// never silently changed.
pub fn enforce_revenue_caps(mut allocations: Vec<CropAllocation>, crops: &[Crop]) -> Vec<CropAllocation> {
    let caps: HashMap<&str, f64> = crops
        .iter()
        .filter_map(|c| c.max_revenue.map(|cap| (c.crop_id.as_str(), cap)))
        .collect();
    if caps.is_empty() {
        return allocations;
    }

    loop {
        let mut over_cap: Option<(&str, f64)> = None;
        for (&crop_id, &cap) in &caps {
            let total: f64 = allocations.iter().filter(|a| a.crop.crop_id == crop_id).map(|a| a.revenue).sum();
            if total > cap * (1.0 + 1e-6) {
                over_cap = Some((crop_id, cap));
                break;
            }
        }
        let Some((crop_id, _cap)) = over_cap else { break };

        let worst = allocations
            .iter()
            .enumerate()
            .filter(|(_, a)| a.crop.crop_id == crop_id)
            .min_by(|(_, a), (_, b)| a.profit.partial_cmp(&b.profit).unwrap())
            .map(|(idx, _)| idx);

        match worst {
            Some(idx) => {
                allocations.remove(idx);
            }
            None => break,
        }
    }
    allocations
}

/// Whether every capped crop's total revenue across `solution` stays within
/// its `max_revenue`, 1e-6 relative tolerance. Used by the local-search
/// driver to re-check the cap after each destroy/repair step.
pub fn respects_revenue_caps(solution: &[CropAllocation], crops: &[Crop]) -> bool {
    for crop in crops {
        let Some(cap) = crop.max_revenue else { continue };
        let total: f64 = solution.iter().filter(|a| a.crop.crop_id == crop.crop_id).map(|a| a.revenue).sum();
        if total > cap * (1.0 + 1e-6) {
            return false;
        }
    }
    true
}
