use super::loader;
use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;
use anyhow::Context;
use chrono::NaiveDate;
use flo_core::gateways::OptimizationResultSink;
use flo_core::model::MultiFieldOptimizationResult;
use flo_interact::{apply_adjustments, AdjustContext, MoveAction, MoveInstruction};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum MoveActionDto {
    Move,
    Insert,
    Remove,
}

impl From<MoveActionDto> for MoveAction {
    fn from(dto: MoveActionDto) -> Self {
        match dto {
            MoveActionDto::Move => MoveAction::Move,
            MoveActionDto::Insert => MoveAction::Insert,
            MoveActionDto::Remove => MoveAction::Remove,
        }
    }
}

#[derive(Deserialize)]
struct MoveInstructionDto {
    allocation_id: String,
    action: MoveActionDto,
    #[serde(default)]
    to_field_id: Option<String>,
    #[serde(default)]
    to_start_date: Option<NaiveDate>,
    #[serde(default)]
    to_area: Option<f64>,
    #[serde(default)]
    crop_id: Option<String>,
    #[serde(default)]
    variety: Option<String>,
}

impl From<MoveInstructionDto> for MoveInstruction {
    fn from(dto: MoveInstructionDto) -> Self {
        MoveInstruction {
            allocation_id: dto.allocation_id,
            action: dto.action.into(),
            to_field_id: dto.to_field_id,
            to_start_date: dto.to_start_date,
            to_area: dto.to_area,
            crop_id: dto.crop_id,
            variety: dto.variety,
        }
    }
}

#[derive(Serialize)]
struct AppliedMoveView<'a> {
    allocation_id: &'a str,
}

#[derive(Serialize)]
struct RejectedMoveView<'a> {
    allocation_id: &'a str,
    reason: &'a str,
}

#[derive(Serialize)]
struct AdjustOutput<'a> {
    result: &'a MultiFieldOptimizationResult,
    applied: Vec<AppliedMoveView<'a>>,
    rejected: Vec<RejectedMoveView<'a>>,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    result_path: &Path,
    moves_path: &Path,
    fields: &Path,
    crops: &Path,
    weather: &Path,
    rules: Option<&Path>,
    format: OutputFormat,
    out: Option<&Path>,
) -> Result<(), CliError> {
    let file = File::open(result_path).with_context(|| format!("opening '{}'", result_path.display()))?;
    let existing: MultiFieldOptimizationResult =
        serde_json::from_reader(file).with_context(|| format!("parsing '{}'", result_path.display()))?;

    let moves_file = File::open(moves_path).with_context(|| format!("opening '{}'", moves_path.display()))?;
    let move_dtos: Vec<MoveInstructionDto> =
        serde_json::from_reader(moves_file).with_context(|| format!("parsing '{}'", moves_path.display()))?;
    let moves: Vec<MoveInstruction> = move_dtos.into_iter().map(MoveInstruction::from).collect();

    let fields = loader::load_fields(fields)?;
    let (crop_list, profiles) = loader::load_crops(crops)?;
    let weather = loader::load_weather(weather)?;
    let rules = loader::load_rules(rules)?;
    let horizon_end = weather.coverage().1;

    let ctx = AdjustContext { fields: &fields, crops: &crop_list, profiles: &profiles, weather: &weather, rules: &rules, horizon_end };
    let outcome = apply_adjustments(existing, &moves, &ctx);

    if let Some(out_path) = out {
        let sink = flo_io::JsonOptimizationResultSink::new(out_path);
        sink.save(&outcome.result)?;
    }

    match format {
        OutputFormat::Json => {
            let view = AdjustOutput {
                result: &outcome.result,
                applied: outcome.applied_moves.iter().map(|m| AppliedMoveView { allocation_id: &m.allocation_id }).collect(),
                rejected: outcome
                    .rejected_moves
                    .iter()
                    .map(|r| RejectedMoveView { allocation_id: &r.instruction.allocation_id, reason: &r.reason })
                    .collect(),
            };
            output::print_success_json(&view);
        }
        OutputFormat::Table => {
            println!("applied: {}", outcome.applied_moves.len());
            for m in &outcome.applied_moves {
                println!("  {} ({:?})", m.allocation_id, m.action);
            }
            println!("rejected: {}", outcome.rejected_moves.len());
            for r in &outcome.rejected_moves {
                println!("  {}: {}", r.instruction.allocation_id, r.reason);
            }
            println!("total_profit\t{:.2}", outcome.result.total_profit);
        }
    }
    Ok(())
}
