//! # Extract Subcommand
//!
//! Runs the field extractor over a payload file and prints the resulting
//! record as JSON. Columns whose path resolves to nothing print as `null`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::input::{parse_path_mapping, path_map, read_payload_record};

/// Arguments for the `fieldcheck extract` subcommand.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Raw payload file (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub payload: PathBuf,

    /// Column extraction path. Repeatable. Without any, the whole payload
    /// is the record.
    #[arg(long = "path", value_name = "COLUMN=PATH", value_parser = parse_path_mapping)]
    pub paths: Vec<(String, String)>,
}

pub fn run_extract(args: &ExtractArgs, out: &mut dyn Write) -> Result<u8> {
    let record = read_payload_record(&args.payload, &path_map(&args.paths))?;
    writeln!(out, "{}", serde_json::to_string_pretty(&record.to_json())?)?;
    Ok(0)
}
