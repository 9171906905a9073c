//! Violation checker: fallow overlap, continuous-cultivation penalty, area
//! capacity, and temperature-stress warnings. The yield accumulator itself
//! ([`flo_core::model::YieldImpactAccumulator`]) is applied during growth
//! simulation; this module only reports display warnings, independent of
//! that cost calculation.

use chrono::NaiveDate;
use flo_core::model::{CropAllocation, CropProfile, InteractionRule, InteractionRuleType, Severity, Violation, ViolationType, WeatherDay};

pub use flo_core::model::is_feasible;

pub struct ViolationContext<'a> {
    pub previous_allocation: Option<&'a CropAllocation>,
    /// All other allocations already in the solution (not including the one
    /// being checked).
    pub other_allocations: &'a [CropAllocation],
    pub weather: &'a [WeatherDay],
    pub crop_profile: Option<&'a CropProfile>,
    pub rules: &'a [InteractionRule],
}

pub fn check_violations(allocation: &CropAllocation, ctx: &ViolationContext<'_>) -> Vec<Violation> {
    let mut violations = Vec::new();

    if let Some(previous) = ctx.previous_allocation {
        if allocation.overlaps_with_fallow(previous, allocation.field.fallow_period_days) {
            violations.push(fallow_violation(allocation, previous));
        }
        if let Some(v) = continuous_cultivation_violation(allocation, previous, ctx.rules) {
            violations.push(v);
        }
    }

    if exceeds_area_capacity(allocation, ctx.other_allocations) {
        violations.push(area_violation(allocation));
    }

    if let Some(profile) = ctx.crop_profile {
        violations.extend(temperature_stress_violations(ctx.weather, profile));
    }

    violations
}

fn fallow_violation(allocation: &CropAllocation, previous: &CropAllocation) -> Violation {
    let required = previous.completion_date + chrono::Duration::days(allocation.field.fallow_period_days);
    Violation {
        violation_type: ViolationType::FallowPeriod,
        severity: Severity::Error,
        impact_ratio: 1.0,
        code: "FALLOW_001".to_string(),
        message: format!("fallow period violation: next crop must start on or after {required}"),
        details: Some(format!(
            "previous crop: {}, fallow period: {} days",
            previous.crop.name, allocation.field.fallow_period_days
        )),
    }
}

fn continuous_cultivation_violation(
    allocation: &CropAllocation,
    previous: &CropAllocation,
    rules: &[InteractionRule],
) -> Option<Violation> {
    let prev_groups: Vec<String> = previous.crop.groups.iter().cloned().collect();
    let cur_groups: Vec<String> = allocation.crop.groups.iter().cloned().collect();
    // Empty product (no matching rule) is 1.0, i.e. neutral.
    let combined: f64 = rules
        .iter()
        .filter(|r| r.rule_type == InteractionRuleType::ContinuousCultivation && r.matches(&prev_groups, &cur_groups))
        .map(|r| r.impact_ratio)
        .product();
    if combined < 1.0 {
        let yield_reduction = (1.0 - combined) * 100.0;
        Some(Violation {
            violation_type: ViolationType::ContinuousCultivation,
            severity: Severity::Warning,
            impact_ratio: combined,
            code: "CONT_CULT_001".to_string(),
            message: format!("continuous cultivation: {yield_reduction:.1}% yield reduction due to repeated cultivation"),
            details: Some(format!("previous: {}, current: {}", previous.crop.name, allocation.crop.name)),
        })
    } else {
        None
    }
}

/// Sum of areas concurrent with this allocation on any day in its interval
/// must not exceed field capacity, 1% tolerance.
///
/// `pub(crate)`: also the area half of [`crate::neighbors`]'s central
/// fallow/area feasibility guard.
pub(crate) fn exceeds_area_capacity(allocation: &CropAllocation, other_allocations: &[CropAllocation]) -> bool {
    let mut day = allocation.start_date;
    while day < allocation.completion_date {
        let concurrent: f64 = allocation.area_used
            + other_allocations
                .iter()
                .filter(|a| a.field.field_id == allocation.field.field_id && a.covers(day))
                .map(|a| a.area_used)
                .sum::<f64>();
        if concurrent > allocation.field.area * 1.01 {
            return true;
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    false
}

fn area_violation(allocation: &CropAllocation) -> Violation {
    Violation {
        violation_type: ViolationType::AreaConstraint,
        severity: Severity::Error,
        impact_ratio: 1.0,
        code: "AREA_001".to_string(),
        message: format!(
            "area constraint violated: {:.2}m\u{b2} exceeds field capacity {:.2}m\u{b2}",
            allocation.area_used, allocation.field.area
        ),
        details: Some(format!("field: {}", allocation.field.field_id)),
    }
}

fn temperature_stress_violations(weather: &[WeatherDay], profile: &CropProfile) -> Vec<Violation> {
    let mut violations = Vec::new();
    for day in weather {
        for stage_req in &profile.stages {
            let tp = &stage_req.temperature;
            if let Some(t_max) = day.t_max {
                if tp.is_high_temp_stress(t_max) {
                    violations.push(stress_violation(
                        ViolationType::HighTempStress,
                        "HIGH_TEMP_001",
                        day.date,
                        t_max,
                        1.0 - tp.high_temp_daily_impact,
                        &stage_req.stage.name,
                        tp.high_stress_threshold,
                    ));
                }
                if tp.is_sterility_risk(t_max) {
                    violations.push(stress_violation(
                        ViolationType::SterilityRisk,
                        "STERILITY_001",
                        day.date,
                        t_max,
                        1.0 - tp.sterility_daily_impact,
                        &stage_req.stage.name,
                        tp.sterility_risk_threshold.unwrap_or(tp.high_stress_threshold),
                    ));
                }
            }
            if let Some(t_mean) = day.t_mean {
                if tp.is_low_temp_stress(t_mean) {
                    violations.push(stress_violation(
                        ViolationType::LowTempStress,
                        "LOW_TEMP_001",
                        day.date,
                        t_mean,
                        1.0 - tp.low_temp_daily_impact,
                        &stage_req.stage.name,
                        tp.low_stress_threshold,
                    ));
                }
            }
            if let Some(t_min) = day.t_min {
                if tp.is_frost_risk(t_min) {
                    violations.push(stress_violation(
                        ViolationType::FrostRisk,
                        "FROST_001",
                        day.date,
                        t_min,
                        1.0 - tp.frost_daily_impact,
                        &stage_req.stage.name,
                        tp.frost_threshold,
                    ));
                }
            }
        }
    }
    violations
}

#[allow(clippy::too_many_arguments)]
fn stress_violation(
    violation_type: ViolationType,
    code: &str,
    date: NaiveDate,
    observed: f64,
    impact_ratio: f64,
    stage_name: &str,
    threshold: f64,
) -> Violation {
    let label = match violation_type {
        ViolationType::HighTempStress => "high temperature stress",
        ViolationType::LowTempStress => "low temperature stress",
        ViolationType::FrostRisk => "frost risk",
        ViolationType::SterilityRisk => "sterility risk",
        _ => "temperature stress",
    };
    Violation {
        violation_type,
        severity: Severity::Warning,
        impact_ratio,
        code: code.to_string(),
        message: format!("{label} on {date}: {observed:.1}\u{b0}C"),
        details: Some(format!("stage: {stage_name}, threshold: {threshold}\u{b0}C")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{crop, field, rice_profile};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn allocation(id: &str, start: NaiveDate, completion: NaiveDate, area: f64) -> CropAllocation {
        CropAllocation {
            allocation_id: id.into(),
            field: field("f1", 1000.0, 5000.0),
            crop: crop("rice", 10000.0),
            start_date: start,
            completion_date: completion,
            growth_days: (completion - start).num_days(),
            accumulated_gdd: 1500.0,
            area_used: area,
            cost: 1000.0,
            revenue: 2000.0,
            profit: 1000.0,
            profit_rate: 1.0,
            yield_factor: 1.0,
        }
    }

    #[test]
    fn rejects_allocation_started_before_fallow_elapses() {
        let previous = allocation("a1", d(2024, 4, 1), d(2024, 6, 30), 500.0);
        let too_soon = allocation("a2", d(2024, 7, 1), d(2024, 9, 30), 500.0);
        let ok = allocation("a3", d(2024, 7, 28), d(2024, 9, 30), 500.0);

        let ctx = ViolationContext {
            previous_allocation: Some(&previous),
            other_allocations: &[previous.clone()],
            weather: &[],
            crop_profile: None,
            rules: &[],
        };
        let v = check_violations(&too_soon, &ctx);
        assert!(v.iter().any(|x| x.violation_type == ViolationType::FallowPeriod && x.is_error()));

        let v_ok = check_violations(&ok, &ctx);
        assert!(!v_ok.iter().any(|x| x.violation_type == ViolationType::FallowPeriod));
    }

    #[test]
    fn area_capacity_error_when_concurrent_exceeds_field() {
        let a = allocation("a1", d(2024, 4, 1), d(2024, 6, 30), 700.0);
        let b = allocation("a2", d(2024, 4, 15), d(2024, 7, 30), 700.0);
        let ctx = ViolationContext {
            previous_allocation: None,
            other_allocations: std::slice::from_ref(&a),
            weather: &[],
            crop_profile: None,
            rules: &[],
        };
        let v = check_violations(&b, &ctx);
        assert!(v.iter().any(|x| x.violation_type == ViolationType::AreaConstraint && x.is_error()));
    }

    #[test]
    fn yield_accumulation_matches_expected_factor() {
        use flo_core::model::YieldImpactAccumulator;
        let mut acc = YieldImpactAccumulator::new();
        for _ in 0..3 {
            acc.apply_daily_impact(0.05);
        }
        for _ in 0..2 {
            acc.apply_daily_impact(0.20);
        }
        assert!((acc.yield_factor() - 0.5488).abs() < 1e-3);
        let _ = rice_profile();
    }
}
