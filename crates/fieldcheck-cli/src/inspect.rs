//! # Schema and Rule Inspection
//!
//! `fieldcheck schema <FILE>` prints each declared field with its type,
//! label and rules. `fieldcheck rules` lists the registered rule names.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use fieldcheck_schema::RuleRegistry;

use crate::input::load_schema_file;

/// Arguments for the `fieldcheck schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Schema file (JSON or YAML).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

pub fn run_schema(args: &SchemaArgs, out: &mut dyn Write) -> Result<u8> {
    let schema = load_schema_file(&args.file)?;
    let registry = RuleRegistry::builtin();

    if let Some(title) = schema.title() {
        writeln!(out, "{title}")?;
    }
    if let Some(description) = schema.description() {
        writeln!(out, "  {description}")?;
    }
    writeln!(out, "{} field(s)", schema.len())?;

    for (name, field) in &schema {
        let field_type = if field.field_type.is_empty() {
            "-"
        } else {
            field.field_type.as_str()
        };
        writeln!(
            out,
            "  {name} ({field_type}) label={}",
            field.display_label(name)
        )?;
        for (rule, param) in field.validations() {
            // Unregistered rules fail every record that reaches them.
            let marker = if registry.contains(rule) { "" } else { "  [unsupported]" };
            writeln!(out, "    {rule} = {param}{marker}")?;
        }
    }
    Ok(0)
}

pub fn run_rules(out: &mut dyn Write) -> Result<u8> {
    let registry = RuleRegistry::builtin();
    for name in registry.names() {
        writeln!(out, "{name}")?;
    }
    Ok(0)
}
