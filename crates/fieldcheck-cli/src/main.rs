//! # fieldcheck CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fieldcheck_cli::extract::{run_extract, ExtractArgs};
use fieldcheck_cli::inspect::{run_rules, run_schema, SchemaArgs};
use fieldcheck_cli::validate::{run_validate, ValidateArgs};
use fieldcheck_cli::EXIT_ERROR;

/// fieldcheck: schema-driven record validation.
///
/// Validates records against declarative field schemas, extracts records
/// from nested payloads by path, and inspects schemas and rules.
#[derive(Parser, Debug)]
#[command(name = "fieldcheck", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a record or payload against a schema file.
    Validate(ValidateArgs),

    /// Extract a record from a payload and print it as JSON.
    Extract(ExtractArgs),

    /// Show the fields and rules declared by a schema file.
    Schema(SchemaArgs),

    /// List registered validation rules.
    Rules,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level. Logs go to stderr;
    // stdout carries reports only.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &mut stdout),
        Commands::Extract(args) => run_extract(&args, &mut stdout),
        Commands::Schema(args) => run_schema(&args, &mut stdout),
        Commands::Rules => run_rules(&mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldcheck_cli::validate::OutputFormat;

    #[test]
    fn cli_parse_validate_payload_with_paths() {
        let cli = Cli::try_parse_from([
            "fieldcheck",
            "validate",
            "--schema",
            "users.yaml",
            "--payload",
            "body.json",
            "--path",
            "id=data.id",
            "--path",
            "email=/data/email",
            "--format",
            "json",
        ])
        .unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.schema.to_str(), Some("users.yaml"));
        assert_eq!(
            args.paths,
            vec![
                ("id".to_string(), "data.id".to_string()),
                ("email".to_string(), "/data/email".to_string()),
            ]
        );
        assert_eq!(args.format, OutputFormat::Json);
        assert!(!args.present_only);
    }

    #[test]
    fn cli_parse_validate_requires_an_input() {
        assert!(Cli::try_parse_from(["fieldcheck", "validate", "--schema", "s.json"]).is_err());
    }

    #[test]
    fn cli_parse_validate_inputs_conflict() {
        assert!(Cli::try_parse_from([
            "fieldcheck",
            "validate",
            "--schema",
            "s.json",
            "--payload",
            "p.json",
            "--record",
            "r.json",
        ])
        .is_err());
    }

    #[test]
    fn cli_parse_rejects_bad_path_mapping() {
        assert!(Cli::try_parse_from([
            "fieldcheck",
            "extract",
            "--payload",
            "p.json",
            "--path",
            "data.id",
        ])
        .is_err());
    }

    #[test]
    fn cli_parse_verbose_is_global() {
        let cli = Cli::try_parse_from(["fieldcheck", "rules", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Rules));
    }

    #[test]
    fn cli_parse_schema() {
        let cli = Cli::try_parse_from(["fieldcheck", "schema", "users.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema(ref a) if a.file.to_str() == Some("users.json")));
    }
}
