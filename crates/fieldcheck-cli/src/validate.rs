//! # Validate Subcommand
//!
//! Validates one record against a schema file. The record is either read
//! directly (`--record`) or extracted from a raw payload (`--payload`) with
//! optional `--path COLUMN=PATH` mappings.
//!
//! Exit code 0 when the record is valid, 1 when any field fails. Read and
//! parse failures propagate as errors.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use fieldcheck_schema::{AbsencePolicy, ErrorReport, Validator};
use serde::Serialize;

use crate::input::{load_schema_file, parse_path_mapping, path_map, read_payload_record, read_record_file};

/// Report output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the `fieldcheck validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema file (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Raw payload to extract the record from.
    #[arg(long, value_name = "FILE", conflicts_with = "record", required_unless_present = "record")]
    pub payload: Option<PathBuf>,

    /// Record file, validated as is.
    #[arg(long, value_name = "FILE")]
    pub record: Option<PathBuf>,

    /// Column extraction path for --payload. Repeatable.
    #[arg(long = "path", value_name = "COLUMN=PATH", value_parser = parse_path_mapping)]
    pub paths: Vec<(String, String)>,

    /// Only validate schema fields present in the record.
    #[arg(long)]
    pub present_only: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    valid: bool,
    errors: &'a ErrorReport,
}

/// Execute the validate subcommand, writing the report to `out`.
///
/// Returns exit code: 0 when valid, 1 on validation failure.
pub fn run_validate(args: &ValidateArgs, out: &mut dyn Write) -> Result<u8> {
    let schema = load_schema_file(&args.schema)?;

    let record = match (&args.payload, &args.record) {
        (Some(payload), _) => read_payload_record(payload, &path_map(&args.paths))?,
        (None, Some(record)) => read_record_file(record)?,
        (None, None) => anyhow::bail!("one of --payload or --record is required"),
    };
    if args.record.is_some() && !args.paths.is_empty() {
        tracing::warn!("--path is ignored with --record");
    }

    let absence = if args.present_only {
        AbsencePolicy::PresentOnly
    } else {
        AbsencePolicy::VisitAll
    };
    let report = Validator::default()
        .with_absence_policy(absence)
        .validate(&record, &schema);

    tracing::info!(
        fields = schema.len(),
        failing_fields = report.len(),
        "validation finished"
    );

    match args.format {
        OutputFormat::Text if report.is_empty() => writeln!(out, "OK: record is valid")?,
        OutputFormat::Text => {
            writeln!(out, "FAIL: {} field(s) failed validation", report.len())?;
            writeln!(out, "{report}")?;
        }
        OutputFormat::Json => {
            let output = JsonOutput {
                valid: report.is_empty(),
                errors: &report,
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }
    }

    Ok(if report.is_empty() { 0 } else { 1 })
}
