//! Neighbour operations: 8 structural move generators on a solution. Every
//! operator funnels its candidate solution through
//! [`respects_fallow_and_area`] before it is ever returned, so no move can
//! silently produce an infeasible solution.

use crate::violations::exceeds_area_capacity;
use flo_core::config::OptimizationConfig;
use flo_core::model::{AllocationCandidate, CropAllocation, Field};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

/// Which operator produced a neighbour solution, for ALNS weight bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    FieldSwap,
    FieldMove,
    FieldReplace,
    FieldRemove,
    CropInsert,
    CropChange,
    PeriodReplace,
    AreaAdjust,
}

pub const ALL_MOVE_KINDS: [MoveKind; 8] = [
    MoveKind::FieldSwap,
    MoveKind::FieldMove,
    MoveKind::FieldReplace,
    MoveKind::CropInsert,
    MoveKind::CropChange,
    MoveKind::PeriodReplace,
    MoveKind::FieldRemove,
    MoveKind::AreaAdjust,
];

#[derive(Debug, Clone)]
pub struct Neighbor {
    pub kind: MoveKind,
    pub solution: Vec<CropAllocation>,
}

/// Whether inserting/moving `candidate` onto `field`, given the solution's
/// other allocations already on that field (excluding the allocation being
/// replaced, if any), respects both fallow and area-capacity constraints.
/// The single guard every move operator below calls before emitting a
/// neighbour.
pub fn respects_fallow_and_area(candidate: &CropAllocation, others_on_field: &[CropAllocation]) -> bool {
    let fallow = candidate.field.fallow_period_days;
    for other in others_on_field {
        if candidate.overlaps_with_fallow(other, fallow) || other.overlaps_with_fallow(candidate, fallow) {
            return false;
        }
    }
    !exceeds_area_capacity(candidate, others_on_field)
}

pub(crate) fn others_on_field(solution: &[CropAllocation], field_id: &str, excluding: &str) -> Vec<CropAllocation> {
    solution
        .iter()
        .filter(|a| a.field.field_id == field_id && a.allocation_id != excluding)
        .cloned()
        .collect()
}

pub struct NeighborContext<'a> {
    /// The full generated candidate pool, the source of alternative
    /// insertions/replacements for every operator except `FieldRemove`.
    pub candidates: &'a [AllocationCandidate],
    pub fields: &'a [Field],
    pub config: &'a OptimizationConfig,
}

/// Generate the union of all eight move kinds' neighbour solutions, uniformly
/// subsampled to `max_neighbors_per_iteration` when
/// `enable_neighbor_sampling` is set.
pub fn generate_neighbors(solution: &[CropAllocation], ctx: &NeighborContext<'_>, rng: &mut ChaCha8Rng) -> Vec<Neighbor> {
    let mut neighbors = Vec::new();
    neighbors.extend(field_swap(solution));
    neighbors.extend(field_move(solution, ctx.fields));
    neighbors.extend(field_replace(solution, ctx.candidates));
    neighbors.extend(field_remove(solution));
    neighbors.extend(crop_insert(solution, ctx.candidates));
    neighbors.extend(crop_change(solution, ctx.candidates));
    neighbors.extend(period_replace(solution, ctx.candidates));
    neighbors.extend(area_adjust(solution, &ctx.config.area_adjustment_multipliers));

    if ctx.config.enable_neighbor_sampling && neighbors.len() > ctx.config.max_neighbors_per_iteration {
        neighbors.shuffle(rng);
        neighbors.truncate(ctx.config.max_neighbors_per_iteration);
    }
    neighbors
}

fn field_swap(solution: &[CropAllocation]) -> Vec<Neighbor> {
    let mut out = Vec::new();
    for i in 0..solution.len() {
        for j in (i + 1)..solution.len() {
            let (a, b) = (&solution[i], &solution[j]);
            if a.field.field_id == b.field.field_id {
                continue;
            }
            let mut swapped_a = a.clone();
            let mut swapped_b = b.clone();
            std::mem::swap(&mut swapped_a.field, &mut swapped_b.field);
            if swapped_a.area_used > swapped_a.field.area || swapped_b.area_used > swapped_b.field.area {
                continue;
            }

            let others_a = others_on_field(solution, &swapped_a.field.field_id, &a.allocation_id);
            let others_b = others_on_field(solution, &swapped_b.field.field_id, &b.allocation_id);
            if !respects_fallow_and_area(&swapped_a, &others_a) || !respects_fallow_and_area(&swapped_b, &others_b) {
                continue;
            }

            let mut new_solution = solution.to_vec();
            new_solution[i] = swapped_a;
            new_solution[j] = swapped_b;
            out.push(Neighbor { kind: MoveKind::FieldSwap, solution: new_solution });
        }
    }
    out
}

fn field_move(solution: &[CropAllocation], fields: &[Field]) -> Vec<Neighbor> {
    let mut out = Vec::new();
    for (i, allocation) in solution.iter().enumerate() {
        for target_field in fields.iter().filter(|f| f.field_id != allocation.field.field_id) {
            let mut moved = allocation.clone();
            moved.field = target_field.clone();
            if moved.area_used > moved.field.area {
                continue;
            }
            let others = others_on_field(solution, &target_field.field_id, &allocation.allocation_id);
            if !respects_fallow_and_area(&moved, &others) {
                continue;
            }
            let mut new_solution = solution.to_vec();
            new_solution[i] = moved;
            out.push(Neighbor { kind: MoveKind::FieldMove, solution: new_solution });
        }
    }
    out
}

fn field_replace(solution: &[CropAllocation], candidates: &[AllocationCandidate]) -> Vec<Neighbor> {
    let mut out = Vec::new();
    for (i, allocation) in solution.iter().enumerate() {
        let alternatives = candidates
            .iter()
            .filter(|c| c.crop.key() == allocation.crop.key() && c.field.field_id != allocation.field.field_id);
        for alt in alternatives {
            let replacement = alt.clone().promote(CropAllocation::deterministic_id(&alt.crop, alt.start_date));
            let others = others_on_field(solution, &replacement.field.field_id, &allocation.allocation_id);
            if !respects_fallow_and_area(&replacement, &others) {
                continue;
            }
            let mut new_solution = solution.to_vec();
            new_solution[i] = replacement;
            out.push(Neighbor { kind: MoveKind::FieldReplace, solution: new_solution });
        }
    }
    out
}

fn field_remove(solution: &[CropAllocation]) -> Vec<Neighbor> {
    (0..solution.len())
        .map(|i| {
            let mut new_solution = solution.to_vec();
            new_solution.remove(i);
            Neighbor { kind: MoveKind::FieldRemove, solution: new_solution }
        })
        .collect()
}

fn crop_insert(solution: &[CropAllocation], candidates: &[AllocationCandidate]) -> Vec<Neighbor> {
    let used: std::collections::HashSet<String> = solution
        .iter()
        .map(|a| format!("{}|{}|{}", a.field.field_id, a.crop.key(), a.start_date))
        .collect();
    let mut out = Vec::new();
    for candidate in candidates {
        let key = format!("{}|{}|{}", candidate.field.field_id, candidate.crop.key(), candidate.start_date);
        if used.contains(&key) {
            continue;
        }
        let inserted = candidate.clone().promote(CropAllocation::deterministic_id(&candidate.crop, candidate.start_date));
        let others = others_on_field(solution, &inserted.field.field_id, "");
        if !respects_fallow_and_area(&inserted, &others) {
            continue;
        }
        let mut new_solution = solution.to_vec();
        new_solution.push(inserted);
        out.push(Neighbor { kind: MoveKind::CropInsert, solution: new_solution });
    }
    out
}

fn crop_change(solution: &[CropAllocation], candidates: &[AllocationCandidate]) -> Vec<Neighbor> {
    let mut out = Vec::new();
    for (i, allocation) in solution.iter().enumerate() {
        let alternatives = candidates
            .iter()
            .filter(|c| c.field.field_id == allocation.field.field_id && c.crop.key() != allocation.crop.key());
        for alt in alternatives {
            let replacement = alt.clone().promote(CropAllocation::deterministic_id(&alt.crop, alt.start_date));
            let others = others_on_field(solution, &replacement.field.field_id, &allocation.allocation_id);
            if !respects_fallow_and_area(&replacement, &others) {
                continue;
            }
            let mut new_solution = solution.to_vec();
            new_solution[i] = replacement;
            out.push(Neighbor { kind: MoveKind::CropChange, solution: new_solution });
        }
    }
    out
}

fn period_replace(solution: &[CropAllocation], candidates: &[AllocationCandidate]) -> Vec<Neighbor> {
    let mut out = Vec::new();
    for (i, allocation) in solution.iter().enumerate() {
        let alternatives = candidates.iter().filter(|c| {
            c.field.field_id == allocation.field.field_id
                && c.crop.key() == allocation.crop.key()
                && c.start_date != allocation.start_date
        });
        for alt in alternatives {
            let replacement = alt.clone().promote(allocation.allocation_id.clone());
            let others = others_on_field(solution, &replacement.field.field_id, &allocation.allocation_id);
            if !respects_fallow_and_area(&replacement, &others) {
                continue;
            }
            let mut new_solution = solution.to_vec();
            new_solution[i] = replacement;
            out.push(Neighbor { kind: MoveKind::PeriodReplace, solution: new_solution });
        }
    }
    out
}

fn area_adjust(solution: &[CropAllocation], multipliers: &[f64]) -> Vec<Neighbor> {
    let mut out = Vec::new();
    for (i, allocation) in solution.iter().enumerate() {
        for &multiplier in multipliers {
            let adjusted_area = (allocation.area_used * multiplier).min(allocation.field.area);
            if adjusted_area <= 0.0 || (adjusted_area - allocation.area_used).abs() < 1e-9 {
                continue;
            }
            let mut adjusted = allocation.clone();
            let revenue_per_area_unit = if allocation.area_used > 0.0 {
                allocation.revenue / allocation.area_used
            } else {
                0.0
            };
            adjusted.area_used = adjusted_area;
            adjusted.revenue = adjusted_area * revenue_per_area_unit;
            if let Some(cap) = allocation.crop.max_revenue {
                adjusted.revenue = adjusted.revenue.min(cap);
            }
            adjusted.profit = adjusted.revenue - adjusted.cost;
            adjusted.profit_rate = AllocationCandidate::compute_profit_rate(adjusted.profit, adjusted.cost);

            let others = others_on_field(solution, &adjusted.field.field_id, &allocation.allocation_id);
            if !respects_fallow_and_area(&adjusted, &others) {
                continue;
            }
            let mut new_solution = solution.to_vec();
            new_solution[i] = adjusted;
            out.push(Neighbor { kind: MoveKind::AreaAdjust, solution: new_solution });
        }
    }
    out
}

/// Promote `candidate` and check it against `partial`'s field-level
/// constraints and the crop's revenue cap; used by the ALNS repair operators
/// (`flo_algo::alns`) which build a solution back up one insertion at a time.
pub(crate) fn try_insert(
    partial: &[CropAllocation],
    candidate: &AllocationCandidate,
    crops: &[flo_core::model::Crop],
) -> Option<CropAllocation> {
    let already_present = partial
        .iter()
        .any(|a| a.field.field_id == candidate.field.field_id && a.crop.key() == candidate.crop.key() && a.start_date == candidate.start_date);
    if already_present {
        return None;
    }
    let inserted = candidate.clone().promote(CropAllocation::deterministic_id(&candidate.crop, candidate.start_date));
    let others = others_on_field(partial, &inserted.field.field_id, "");
    if !respects_fallow_and_area(&inserted, &others) {
        return None;
    }
    let mut hypothetical = partial.to_vec();
    hypothetical.push(inserted.clone());
    if !crate::dp::respects_revenue_caps(&hypothetical, crops) {
        return None;
    }
    Some(inserted)
}

/// Whole-solution feasibility: every allocation respects fallow and area
/// capacity against its field's other occupants. Used by the ALNS/hill-climb
/// driver after a multi-allocation destroy/repair step, where no single
/// move operator's pairwise guard applies.
pub fn solution_is_feasible(solution: &[CropAllocation]) -> bool {
    solution.iter().all(|allocation| {
        let others = others_on_field(solution, &allocation.field.field_id, &allocation.allocation_id);
        respects_fallow_and_area(allocation, &others)
    })
}

/// Group-by-field helper ALNS destroy operators use for worst-removal
/// (lowest `profit_rate` first).
pub fn group_by_field(solution: &[CropAllocation]) -> HashMap<String, Vec<CropAllocation>> {
    let mut map: HashMap<String, Vec<CropAllocation>> = HashMap::new();
    for allocation in solution {
        map.entry(allocation.field.field_id.clone()).or_default().push(allocation.clone());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{crop, field};
    use chrono::NaiveDate;

    fn alloc(field: &Field, crop_id: &str, start: (i32, u32, u32), completion: (i32, u32, u32)) -> CropAllocation {
        let c = crop(crop_id, 10000.0);
        let start_date = NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap();
        let completion_date = NaiveDate::from_ymd_opt(completion.0, completion.1, completion.2).unwrap();
        CropAllocation {
            allocation_id: format!("{crop_id}-{start_date}"),
            field: field.clone(),
            crop: c,
            start_date,
            completion_date,
            growth_days: (completion_date - start_date).num_days(),
            accumulated_gdd: 1000.0,
            area_used: field.area,
            cost: 500.0,
            revenue: 2000.0,
            profit: 1500.0,
            profit_rate: 3.0,
            yield_factor: 1.0,
        }
    }

    #[test]
    fn field_remove_drops_exactly_one_allocation() {
        let f = field("f1", 1000.0, 5000.0);
        let solution = vec![alloc(&f, "rice", (2024, 1, 1), (2024, 3, 1))];
        let neighbors = field_remove(&solution);
        assert_eq!(neighbors.len(), 1);
        assert!(neighbors[0].solution.is_empty());
    }

    #[test]
    fn respects_fallow_and_area_rejects_overlapping_insert() {
        let f = field("f1", 1000.0, 5000.0);
        let existing = alloc(&f, "rice", (2024, 4, 1), (2024, 6, 30));
        let too_soon = alloc(&f, "tomato", (2024, 7, 1), (2024, 9, 30));
        assert!(!respects_fallow_and_area(&too_soon, &[existing.clone()]));

        let ok = alloc(&f, "tomato", (2024, 7, 28), (2024, 9, 30));
        assert!(respects_fallow_and_area(&ok, &[existing]));
    }

    #[test]
    fn area_adjust_produces_scaled_candidates_within_capacity() {
        let f = field("f1", 1000.0, 5000.0);
        let mut a = alloc(&f, "rice", (2024, 1, 1), (2024, 3, 1));
        a.area_used = 400.0;
        let solution = vec![a];
        let neighbors = area_adjust(&solution, &[0.5, 1.0, 1.5]);
        assert!(neighbors.iter().all(|n| n.solution[0].area_used <= n.solution[0].field.area + 1e-9));
        assert!(neighbors.iter().any(|n| (n.solution[0].area_used - 200.0).abs() < 1e-9));
    }
}
