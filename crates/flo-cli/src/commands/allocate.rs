use super::loader;
use crate::cli::{AlgorithmArg, ConfigProfile, OutputFormat};
use crate::error::CliError;
use crate::output;
use chrono::NaiveDate;
use flo_algo::{run_optimization, Algorithm, SolveInput};
use flo_core::gateways::{NeverCancel, OptimizationResultSink};
use flo_core::model::MultiFieldOptimizationResult;
use flo_core::model::Violation;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct AllocateOutput<'a> {
    result: &'a MultiFieldOptimizationResult,
    violations: &'a [Violation],
}

/// `optimization_id` must be deterministic within a run so that re-running
/// the optimiser on identical inputs yields byte-equal JSON output: the
/// earliest allocation's own deterministic id
/// (`"{crop_id}-{variety}-{start_ts}"`) stands in for the whole run, broken
/// by field id when two allocations tie on crop and start date. An empty
/// schedule falls back to the horizon start, which is still fixed by the
/// input rather than by wall-clock time or randomness.
fn deterministic_optimization_id(result: &MultiFieldOptimizationResult, horizon_start: NaiveDate) -> String {
    result
        .all_allocations()
        .min_by(|a, b| a.crop.key().cmp(&b.crop.key()).then_with(|| a.start_date.cmp(&b.start_date)).then_with(|| a.field.field_id.cmp(&b.field.field_id)))
        .map(|a| a.allocation_id.clone())
        .unwrap_or_else(|| format!("empty-{horizon_start}"))
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    fields: &Path,
    crops: &Path,
    weather: &Path,
    rules: Option<&Path>,
    horizon_start: NaiveDate,
    horizon_end: NaiveDate,
    profile: ConfigProfile,
    algorithm: AlgorithmArg,
    enable_local_search: bool,
    enable_alns: bool,
    format: OutputFormat,
    out: Option<&Path>,
) -> Result<(), CliError> {
    let fields = loader::load_fields(fields)?;
    let (crop_list, profiles) = loader::load_crops(crops)?;
    let weather = loader::load_weather(weather)?;
    let rules = loader::load_rules(rules)?;

    if fields.is_empty() {
        return Err(CliError::Validation("no fields supplied".to_string()));
    }
    if horizon_end < horizon_start {
        return Err(CliError::Validation("horizon-end must be on or after horizon-start".to_string()));
    }

    let mut config = profile.to_config();
    config.enable_local_search = enable_local_search;
    config.enable_alns = enable_alns && enable_local_search;

    let input = SolveInput {
        fields: &fields,
        crops: &crop_list,
        profiles: &profiles,
        weather: &weather,
        horizon_start,
        horizon_end,
        algorithm: algorithm.to_algorithm(),
    };

    let mut result = run_optimization(String::new(), &input, &config, &NeverCancel);
    result.optimization_id = deterministic_optimization_id(&result, horizon_start);
    let violations = super::collect_violations(&result, &rules);

    if let Some(out_path) = out {
        let sink = flo_io::JsonOptimizationResultSink::new(out_path);
        sink.save(&result)?;
    }

    match format {
        OutputFormat::Json => output::print_success_json(&AllocateOutput { result: &result, violations: &violations }),
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = result
                .all_allocations()
                .map(|a| {
                    vec![
                        a.field.field_id.clone(),
                        a.crop.key(),
                        a.start_date.to_string(),
                        a.completion_date.to_string(),
                        format!("{:.2}", a.area_used),
                        format!("{:.2}", a.profit),
                    ]
                })
                .collect();
            output::print_table(&["field", "crop", "start", "completion", "area", "profit"], &rows).map_err(CliError::from)?;
            println!("total_cost\t{:.2}", result.total_cost);
            println!("total_revenue\t{:.2}", result.total_revenue);
            println!("total_profit\t{:.2}", result.total_profit);
            println!("algorithm_used\t{}", result.algorithm_used);
            if !violations.is_empty() {
                println!("\nwarnings:");
                for v in &violations {
                    println!("  [{}] {}", v.code, v.message);
                }
            }
        }
    }
    Ok(())
}
