//! Apply explicit move instructions against an existing optimisation result:
//! move, insert, or remove one allocation, re-simulate and re-check the
//! touched allocation, and report which moves were applied versus rejected.
//! No search runs here; every move is local and deterministic.

use chrono::NaiveDate;
use flo_algo::simulate::simulate;
use flo_algo::violations::check_violations;
use flo_algo::WeatherAccessor;
use flo_core::model::{
    Crop, CropAllocation, CropProfile, Field, FieldSchedule, InteractionRule, MultiFieldOptimizationResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAction {
    Move,
    Insert,
    Remove,
}

/// One requested change to an existing solution.
///
/// `crop_id`/`variety` are only consulted for `Insert`, where there is no
/// existing allocation to read the crop from.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveInstruction {
    pub allocation_id: String,
    pub action: MoveAction,
    pub to_field_id: Option<String>,
    pub to_start_date: Option<NaiveDate>,
    pub to_area: Option<f64>,
    pub crop_id: Option<String>,
    pub variety: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedMove {
    pub instruction: MoveInstruction,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdjustOutcome {
    pub result: MultiFieldOptimizationResult,
    pub applied_moves: Vec<MoveInstruction>,
    pub rejected_moves: Vec<RejectedMove>,
}

pub struct AdjustContext<'a> {
    pub fields: &'a [Field],
    pub crops: &'a [Crop],
    pub profiles: &'a [CropProfile],
    pub weather: &'a WeatherAccessor,
    pub rules: &'a [InteractionRule],
    pub horizon_end: NaiveDate,
}

impl<'a> AdjustContext<'a> {
    fn field(&self, field_id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.field_id == field_id)
    }

    fn crop(&self, crop_id: &str, variety: Option<&str>) -> Option<&Crop> {
        self.crops
            .iter()
            .find(|c| c.crop_id == crop_id && c.variety.as_deref() == variety)
    }

    fn profile(&self, crop_id: &str, variety: Option<&str>) -> Option<&CropProfile> {
        self.profiles.iter().find(|p| p.crop_id == crop_id && p.variety.as_deref() == variety)
    }
}

/// Apply `moves` in order against `result`'s flattened allocations, returning
/// the mutated result plus a record of what was applied and what was
/// rejected (and why).
pub fn apply_adjustments(result: MultiFieldOptimizationResult, moves: &[MoveInstruction], ctx: &AdjustContext<'_>) -> AdjustOutcome {
    let mut working: Vec<CropAllocation> = result.all_allocations().cloned().collect();
    let mut applied_moves = Vec::new();
    let mut rejected_moves = Vec::new();

    for instruction in moves {
        match apply_one(&working, instruction, ctx) {
            Ok(new_working) => {
                working = new_working;
                applied_moves.push(instruction.clone());
            }
            Err(reason) => {
                rejected_moves.push(RejectedMove { instruction: instruction.clone(), reason });
            }
        }
    }

    let mutated = rebuild_result(&result.optimization_id, working, &result.algorithm_used, ctx.fields);
    AdjustOutcome { result: mutated, applied_moves, rejected_moves }
}

fn apply_one(working: &[CropAllocation], instruction: &MoveInstruction, ctx: &AdjustContext<'_>) -> Result<Vec<CropAllocation>, String> {
    match instruction.action {
        MoveAction::Remove => {
            let idx = find_index(working, &instruction.allocation_id)?;
            let mut next = working.to_vec();
            next.remove(idx);
            Ok(next)
        }
        MoveAction::Move => {
            let idx = find_index(working, &instruction.allocation_id)?;
            let existing = &working[idx];
            let field_id = instruction.to_field_id.clone().unwrap_or_else(|| existing.field.field_id.clone());
            let start_date = instruction.to_start_date.unwrap_or(existing.start_date);
            let area_used = instruction.to_area.unwrap_or(existing.area_used);
            let crop = existing.crop.clone();

            let field = ctx.field(&field_id).ok_or_else(|| format!("unknown field '{field_id}'"))?;
            let profile = ctx
                .profile(&crop.crop_id, crop.variety.as_deref())
                .ok_or_else(|| format!("no crop profile for '{}'", crop.key()))?;

            let mut next = working.to_vec();
            next.remove(idx);
            let rebuilt = resimulate(field, &crop, profile, ctx.weather, start_date, area_used, ctx.horizon_end)?;
            check_feasible(&rebuilt, &next, ctx)?;
            next.push(rebuilt);
            Ok(next)
        }
        MoveAction::Insert => {
            let field_id = instruction
                .to_field_id
                .clone()
                .ok_or_else(|| "insert requires to_field_id".to_string())?;
            let start_date = instruction
                .to_start_date
                .ok_or_else(|| "insert requires to_start_date".to_string())?;
            let crop_id = instruction.crop_id.clone().ok_or_else(|| "insert requires crop_id".to_string())?;

            let field = ctx.field(&field_id).ok_or_else(|| format!("unknown field '{field_id}'"))?;
            let crop = ctx
                .crop(&crop_id, instruction.variety.as_deref())
                .ok_or_else(|| format!("unknown crop '{crop_id}'"))?
                .clone();
            let profile = ctx
                .profile(&crop_id, instruction.variety.as_deref())
                .ok_or_else(|| format!("no crop profile for '{crop_id}'"))?;
            let area_used = instruction.to_area.unwrap_or(field.area);

            let rebuilt = resimulate(field, &crop, profile, ctx.weather, start_date, area_used, ctx.horizon_end)?;
            check_feasible(&rebuilt, working, ctx)?;
            let mut next = working.to_vec();
            next.push(rebuilt);
            Ok(next)
        }
    }
}

fn find_index(working: &[CropAllocation], allocation_id: &str) -> Result<usize, String> {
    working
        .iter()
        .position(|a| a.allocation_id == allocation_id)
        .ok_or_else(|| format!("no allocation with id '{allocation_id}'"))
}

#[allow(clippy::too_many_arguments)]
fn resimulate(
    field: &Field,
    crop: &Crop,
    profile: &CropProfile,
    weather: &WeatherAccessor,
    start_date: NaiveDate,
    area_used: f64,
    horizon_end: NaiveDate,
) -> Result<CropAllocation, String> {
    let sim = simulate(profile, weather, start_date, horizon_end, None).map_err(|e| e.to_string())?;
    let completion_date = sim.completion_date.ok_or_else(|| "crop does not complete within horizon".to_string())?;
    let growth_days = sim.growth_days.unwrap();
    let cost = growth_days as f64 * field.daily_fixed_cost;
    let revenue = crop
        .revenue_per_area
        .map(|rpa| {
            let raw = area_used * rpa * sim.yield_factor;
            match crop.max_revenue {
                Some(cap) => raw.min(cap),
                None => raw,
            }
        })
        .unwrap_or(0.0);
    let profit = revenue - cost;
    let profit_rate = flo_core::model::AllocationCandidate::compute_profit_rate(profit, cost);

    Ok(CropAllocation {
        allocation_id: CropAllocation::deterministic_id(crop, start_date),
        field: field.clone(),
        crop: crop.clone(),
        start_date,
        completion_date,
        growth_days,
        accumulated_gdd: sim.accumulated_gdd,
        area_used,
        cost,
        revenue,
        profit,
        profit_rate,
        yield_factor: sim.yield_factor,
    })
}

fn check_feasible(candidate: &CropAllocation, others: &[CropAllocation], ctx: &AdjustContext<'_>) -> Result<(), String> {
    let previous = others
        .iter()
        .filter(|a| a.field.field_id == candidate.field.field_id && a.completion_date <= candidate.start_date)
        .max_by_key(|a| a.completion_date);
    let same_field: Vec<CropAllocation> = others.iter().filter(|a| a.field.field_id == candidate.field.field_id).cloned().collect();
    let ctx_v = flo_algo::violations::ViolationContext {
        previous_allocation: previous,
        other_allocations: &same_field,
        weather: &[],
        crop_profile: None,
        rules: ctx.rules,
    };
    let violations = check_violations(candidate, &ctx_v);
    if let Some(v) = violations.iter().find(|v| v.is_error()) {
        return Err(format!("{:?}: {}", v.violation_type, v.message));
    }
    Ok(())
}

fn rebuild_result(optimization_id: &str, allocations: Vec<CropAllocation>, algorithm_used: &str, fields: &[Field]) -> MultiFieldOptimizationResult {
    let schedules: Vec<FieldSchedule> = fields
        .iter()
        .map(|field| {
            let field_allocations: Vec<CropAllocation> = allocations.iter().filter(|a| a.field.field_id == field.field_id).cloned().collect();
            FieldSchedule::new(field.clone(), field_allocations)
        })
        .filter(|schedule| !schedule.allocations.is_empty())
        .collect();
    MultiFieldOptimizationResult::from_schedules(optimization_id.to_string(), schedules, algorithm_used.to_string(), 0.0, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flo_core::model::{GrowthStage, StageRequirement, SunshineProfile, TemperatureProfile, ThermalRequirement, WeatherDay};

    fn temp_profile(base: f64) -> TemperatureProfile {
        TemperatureProfile {
            base_temperature: base,
            optimal_min: base + 10.0,
            optimal_max: base + 18.0,
            low_stress_threshold: base + 2.0,
            high_stress_threshold: base + 25.0,
            frost_threshold: 0.0,
            sterility_risk_threshold: Some(base + 28.0),
            max_temperature: None,
            high_temp_daily_impact: 0.05,
            low_temp_daily_impact: 0.05,
            frost_daily_impact: 0.5,
            sterility_daily_impact: 0.2,
        }
    }

    fn rice_profile() -> CropProfile {
        let stage = |name: &str, order: u32, gdd: f64| StageRequirement {
            stage: GrowthStage { name: name.to_string(), order },
            temperature: temp_profile(10.0),
            sunshine: SunshineProfile { minimum_sunshine_hours: 4.0, target_sunshine_hours: 8.0 },
            thermal: ThermalRequirement::new(gdd, None).unwrap(),
        };
        CropProfile {
            crop_id: "rice".to_string(),
            variety: None,
            stages: vec![stage("seedling", 1, 500.0), stage("vegetative", 2, 1000.0), stage("flowering", 3, 500.0)],
        }
    }

    fn weather(year: i32, month: u32, day: u32, count: i64, t_mean: f64) -> WeatherAccessor {
        let start = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        let mut days = Vec::new();
        for i in 0..count {
            let date = start + chrono::Duration::days(i);
            days.push(WeatherDay { t_max: Some(t_mean + 5.0), t_min: Some(t_mean - 5.0), t_mean: Some(t_mean), ..WeatherDay::new(date) });
        }
        WeatherAccessor::new(days).unwrap()
    }

    fn field() -> Field {
        Field::new("f1", "Field 1", 1000.0, 5000.0).unwrap()
    }

    fn crop() -> Crop {
        let mut c = Crop::new("rice", "Rice", 1.0).unwrap();
        c.revenue_per_area = Some(10000.0);
        c
    }

    fn base_allocation(id: &str, start: NaiveDate, completion: NaiveDate) -> CropAllocation {
        CropAllocation {
            allocation_id: id.into(),
            field: field(),
            crop: crop(),
            start_date: start,
            completion_date: completion,
            growth_days: (completion - start).num_days(),
            accumulated_gdd: 2000.0,
            area_used: 1000.0,
            cost: 500.0,
            revenue: 2000.0,
            profit: 1500.0,
            profit_rate: 3.0,
            yield_factor: 1.0,
        }
    }

    #[test]
    fn applying_no_moves_returns_an_equal_result() {
        let allocation = base_allocation("a1", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let schedule = FieldSchedule::new(field(), vec![allocation]);
        let result = MultiFieldOptimizationResult::from_schedules("run-1", vec![schedule], "dp", 0.0, true);

        let fields = vec![field()];
        let crops = vec![crop()];
        let profiles = vec![rice_profile()];
        let weather = weather(2024, 1, 1, 300, 25.0);
        let ctx = AdjustContext {
            fields: &fields,
            crops: &crops,
            profiles: &profiles,
            weather: &weather,
            rules: &[],
            horizon_end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        };

        let outcome = apply_adjustments(result.clone(), &[], &ctx);
        assert_eq!(outcome.result.total_profit, result.total_profit);
        assert_eq!(outcome.result.all_allocations().count(), result.all_allocations().count());
        assert!(outcome.applied_moves.is_empty());
        assert!(outcome.rejected_moves.is_empty());
    }

    #[test]
    fn rejects_move_into_too_soon_fallow_and_accepts_later_date() {
        let previous = base_allocation("a1", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        let moved = base_allocation("a2", NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 11, 1).unwrap());
        let schedule = FieldSchedule::new(field(), vec![previous, moved]);
        let result = MultiFieldOptimizationResult::from_schedules("run-1", vec![schedule], "dp", 0.0, true);

        let fields = vec![field()];
        let crops = vec![crop()];
        let profiles = vec![rice_profile()];
        let weather = weather(2024, 1, 1, 400, 25.0);
        let ctx = AdjustContext {
            fields: &fields,
            crops: &crops,
            profiles: &profiles,
            weather: &weather,
            rules: &[],
            horizon_end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        };

        let too_soon = MoveInstruction {
            allocation_id: "a2".into(),
            action: MoveAction::Move,
            to_field_id: None,
            to_start_date: Some(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()),
            to_area: None,
            crop_id: None,
            variety: None,
        };
        let outcome = apply_adjustments(result.clone(), &[too_soon], &ctx);
        assert_eq!(outcome.rejected_moves.len(), 1);
        assert!(outcome.rejected_moves[0].reason.contains("FallowPeriod"));

        let accepted = MoveInstruction {
            allocation_id: "a2".into(),
            action: MoveAction::Move,
            to_field_id: None,
            to_start_date: Some(NaiveDate::from_ymd_opt(2024, 7, 28).unwrap()),
            to_area: None,
            crop_id: None,
            variety: None,
        };
        let outcome = apply_adjustments(result, &[accepted], &ctx);
        assert_eq!(outcome.applied_moves.len(), 1);
        assert!(outcome.rejected_moves.is_empty());
    }

    #[test]
    fn remove_drops_the_allocation() {
        let allocation = base_allocation("a1", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let schedule = FieldSchedule::new(field(), vec![allocation]);
        let result = MultiFieldOptimizationResult::from_schedules("run-1", vec![schedule], "dp", 0.0, true);

        let fields = vec![field()];
        let crops = vec![crop()];
        let profiles = vec![rice_profile()];
        let weather = weather(2024, 1, 1, 300, 25.0);
        let ctx = AdjustContext {
            fields: &fields,
            crops: &crops,
            profiles: &profiles,
            weather: &weather,
            rules: &[],
            horizon_end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        };

        let remove = MoveInstruction {
            allocation_id: "a1".into(),
            action: MoveAction::Remove,
            to_field_id: None,
            to_start_date: None,
            to_area: None,
            crop_id: None,
            variety: None,
        };
        let outcome = apply_adjustments(result, &[remove], &ctx);
        assert_eq!(outcome.applied_moves.len(), 1);
        assert_eq!(outcome.result.all_allocations().count(), 0);
    }
}
