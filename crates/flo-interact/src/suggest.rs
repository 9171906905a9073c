//! Suggest where an additional crop could still be inserted into an existing
//! solution: for each field, the single admissible start with the highest
//! projected profit that doesn't violate fallow or area constraints against
//! what is already scheduled there.

use crate::adjust::{MoveAction, MoveInstruction};
use chrono::NaiveDate;
use flo_algo::period::optimal_period;
use flo_algo::violations::{check_violations, ViolationContext};
use flo_algo::WeatherAccessor;
use flo_core::model::{Crop, CropAllocation, CropProfile, Field, InteractionRule};

pub struct SuggestionContext<'a> {
    pub fields: &'a [Field],
    pub existing: &'a [CropAllocation],
    pub weather: &'a WeatherAccessor,
    pub rules: &'a [InteractionRule],
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub horizon_end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub field_id: String,
    pub instruction: MoveInstruction,
    pub projected_profit: f64,
}

/// Best insertable slot per field for `crop`, ranked by projected profit
/// descending. A field with no feasible slot is omitted.
pub fn suggest_candidates(crop: &Crop, profile: &CropProfile, ctx: &SuggestionContext<'_>) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = ctx
        .fields
        .iter()
        .filter_map(|field| best_slot_for_field(field, crop, profile, ctx))
        .collect();
    suggestions.sort_by(|a, b| b.projected_profit.partial_cmp(&a.projected_profit).unwrap());
    suggestions
}

fn best_slot_for_field(field: &Field, crop: &Crop, profile: &CropProfile, ctx: &SuggestionContext<'_>) -> Option<Suggestion> {
    let on_field: Vec<CropAllocation> = ctx.existing.iter().filter(|a| a.field.field_id == field.field_id).cloned().collect();
    let period = optimal_period(profile, field, crop, ctx.weather, ctx.window_start, ctx.window_end, ctx.horizon_end);

    for eval in &period.ranked {
        let result = &eval.result;
        let (Some(completion_date), Some(growth_days)) = (result.completion_date, result.growth_days) else {
            continue;
        };
        let area_used = field.area;
        let revenue = crop
            .revenue_per_area
            .map(|rpa| {
                let raw = area_used * rpa * result.yield_factor;
                match crop.max_revenue {
                    Some(cap) => raw.min(cap),
                    None => raw,
                }
            })
            .unwrap_or(0.0);
        let profit = revenue - eval.cost;

        let candidate = CropAllocation {
            allocation_id: CropAllocation::deterministic_id(crop, result.start_date),
            field: field.clone(),
            crop: crop.clone(),
            start_date: result.start_date,
            completion_date,
            growth_days,
            accumulated_gdd: result.accumulated_gdd,
            area_used,
            cost: eval.cost,
            revenue,
            profit,
            profit_rate: flo_core::model::AllocationCandidate::compute_profit_rate(profit, eval.cost),
            yield_factor: result.yield_factor,
        };

        let previous = on_field.iter().filter(|a| a.completion_date <= candidate.start_date).max_by_key(|a| a.completion_date);
        let violation_ctx = ViolationContext {
            previous_allocation: previous,
            other_allocations: &on_field,
            weather: &[],
            crop_profile: None,
            rules: ctx.rules,
        };
        let violations = check_violations(&candidate, &violation_ctx);
        if violations.iter().any(|v| v.is_error()) {
            continue;
        }

        return Some(Suggestion {
            field_id: field.field_id.clone(),
            instruction: MoveInstruction {
                allocation_id: candidate.allocation_id,
                action: MoveAction::Insert,
                to_field_id: Some(field.field_id.clone()),
                to_start_date: Some(candidate.start_date),
                to_area: Some(area_used),
                crop_id: Some(crop.crop_id.clone()),
                variety: crop.variety.clone(),
            },
            projected_profit: profit,
        });
    }
    None
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

    #[test]
    fn suggests_a_slot_after_existing_allocation_clears_fallow() {
        let profile = rice_profile();
        let crop = crop();
        let existing = vec![CropAllocation {
            allocation_id: "a1".into(),
            field: field(),
            crop: crop.clone(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            completion_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            growth_days: 60,
            accumulated_gdd: 2000.0,
            area_used: 1000.0,
            cost: 500.0,
            revenue: 2000.0,
            profit: 1500.0,
            profit_rate: 3.0,
            yield_factor: 1.0,
        }];
        let fields = vec![field()];
        let weather = weather(2024, 1, 1, 400, 25.0);
        let ctx = SuggestionContext {
            fields: &fields,
            existing: &existing,
            weather: &weather,
            rules: &[],
            window_start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            window_end: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            horizon_end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        };

        let suggestions = suggest_candidates(&crop, &profile, &ctx);
        assert_eq!(suggestions.len(), 1);
        let suggestion = &suggestions[0];
        assert_eq!(suggestion.field_id, "f1");
        assert!(suggestion.instruction.to_start_date.unwrap() >= NaiveDate::from_ymd_opt(2024, 3, 29).unwrap());
        assert_eq!(suggestion.instruction.action, MoveAction::Insert);
    }

    #[test]
    fn no_suggestion_when_window_entirely_within_fallow() {
        let profile = rice_profile();
        let crop = crop();
        let existing = vec![CropAllocation {
            allocation_id: "a1".into(),
            field: field(),
            crop: crop.clone(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            completion_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            growth_days: 180,
            accumulated_gdd: 2000.0,
            area_used: 1000.0,
            cost: 500.0,
            revenue: 2000.0,
            profit: 1500.0,
            profit_rate: 3.0,
            yield_factor: 1.0,
        }];
        let fields = vec![field()];
        let weather = weather(2024, 1, 1, 400, 25.0);
        let ctx = SuggestionContext {
            fields: &fields,
            existing: &existing,
            weather: &weather,
            rules: &[],
            window_start: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            window_end: NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
            horizon_end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        };

        let suggestions = suggest_candidates(&crop, &profile, &ctx);
        assert!(suggestions.is_empty());
    }
}
