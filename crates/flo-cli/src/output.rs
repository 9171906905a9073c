//! JSON success/error envelope and plain tab-aligned table rendering for
//! command output.

use crate::error::CliError;
use serde::Serialize;
use std::io::Write;
use tabwriter::TabWriter;

#[derive(Serialize)]
struct SuccessEnvelope<'a, T: Serialize> {
    success: bool,
    data: &'a T,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

pub fn print_success_json<T: Serialize>(data: &T) {
    let envelope = SuccessEnvelope { success: true, data };
    println!("{}", serde_json::to_string_pretty(&envelope).expect("envelope serializes"));
}

pub fn print_error_json(err: &CliError) {
    let envelope = ErrorEnvelope { success: false, error: ErrorBody { code: err.code().to_string(), message: err.to_string() } };
    println!("{}", serde_json::to_string_pretty(&envelope).expect("envelope serializes"));
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) -> anyhow::Result<()> {
    let mut tw = TabWriter::new(std::io::stdout());
    writeln!(tw, "{}", headers.join("\t"))?;
    for row in rows {
        writeln!(tw, "{}", row.join("\t"))?;
    }
    tw.flush()?;
    Ok(())
}
