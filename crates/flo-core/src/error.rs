//! Unified error type for the field-allocation core.
//!
//! Domain/validation failures and the one internal-invariant-breach variant
//! used by the solver are represented here. Adapter crates (`flo-io`,
//! `flo-cli`) wrap this in `anyhow` at their own boundary; this crate never
//! depends on `anyhow`.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("invalid field '{field_id}': {reason}")]
    InvalidField { field_id: String, reason: String },

    #[error("invalid crop '{crop_id}': {reason}")]
    InvalidCrop { crop_id: String, reason: String },

    #[error("invalid crop profile for '{crop_id}': {reason}")]
    InvalidProfile { crop_id: String, reason: String },

    #[error(
        "evaluation window {start}..{end} outside weather coverage {have_start}..{have_end}"
    )]
    WindowOutsideWeather {
        start: NaiveDate,
        end: NaiveDate,
        have_start: NaiveDate,
        have_end: NaiveDate,
    },

    #[error("insufficient weather data for simulation starting {start}")]
    InsufficientWeather { start: NaiveDate },

    #[error("internal invariant breach: {0}")]
    InvariantBreach(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
