//! `ferrum` command line
//!
//! Usage:
//!   ferrum validate [--config validator.yaml] [--fhir-version R5] [--format text|json] FILE...
//!   ferrum fields Endpoint

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ferrum_validator::{FhirVersion, RecordRegistry, ValidationOutcome, Validator, ValidatorConfig};
use serde_json::Value;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "ferrum")]
#[command(about = "Validate FHIR resources against the ferrum record models")]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate JSON resources
    Validate {
        /// Validator configuration (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// FHIR version (R5, STU3), overrides the configuration file
        #[arg(short = 'f', long)]
        fhir_version: Option<FhirVersion>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Resource files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the field declarations of a record type
    Fields {
        /// Record type, e.g. Endpoint or DetectedIssueMitigation
        record_type: String,

        /// Only look in this FHIR version
        #[arg(short = 'f', long)]
        fhir_version: Option<FhirVersion>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    /// One OperationOutcome per file
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Validate {
            config,
            fhir_version,
            format,
            files,
        } => {
            let config = load_config(config.as_deref(), fhir_version)?;
            let validator = Validator::from_config(&config).context("invalid validator configuration")?;
            info!(
                fhir_version = validator.plan().fhir_version.label(),
                steps = validator.plan().steps.len(),
                "validator ready"
            );

            let mut failed = false;
            for file in &files {
                let resource = read_resource(file)?;
                let outcome = validator.validate(&resource);
                failed |= outcome.has_errors();
                print_outcome(file, &outcome, format)?;
            }

            Ok(if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::Fields {
            record_type,
            fhir_version,
        } => {
            print_fields(&record_type, fhir_version)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .init();
}

fn load_config(path: Option<&Path>, fhir_version: Option<FhirVersion>) -> Result<ValidatorConfig> {
    let mut config = match path {
        Some(path) => {
            let yaml = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            ValidatorConfig::from_yaml(&yaml)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => ValidatorConfig::default(),
    };

    if let Some(version) = fhir_version {
        config.fhir.version = version;
    }
    debug!(?config, "loaded configuration");
    Ok(config)
}

fn read_resource(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn print_outcome(file: &Path, outcome: &ValidationOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome.to_operation_outcome())?);
        }
        OutputFormat::Text => {
            let status = if outcome.valid { "OK" } else { "FAILED" };
            println!(
                "{}: {status} ({} errors, {} warnings)",
                file.display(),
                outcome.error_count(),
                outcome.warning_count()
            );
            for issue in &outcome.issues {
                println!(
                    "  {} [{}] {} @ {}",
                    issue.severity,
                    issue.code,
                    issue.diagnostics,
                    issue.location.as_deref().unwrap_or("-")
                );
            }
        }
    }
    Ok(())
}

fn print_fields(record_type: &str, fhir_version: Option<FhirVersion>) -> Result<()> {
    let versions = match fhir_version {
        Some(version) => vec![version],
        None => vec![FhirVersion::R5, FhirVersion::Stu3],
    };

    let registry = versions
        .into_iter()
        .map(RecordRegistry::for_version)
        .find(|registry| registry.get(record_type).is_some())
        .with_context(|| format!("unknown record type {record_type}"))?;
    let descriptor = registry
        .get(record_type)
        .with_context(|| format!("unknown record type {record_type}"))?;

    println!("{record_type} (FHIR {})", registry.version().label());
    for decl in descriptor.fields {
        let cardinality = match (decl.required, decl.is_list) {
            (true, true) => "1..*",
            (true, false) => "1..1",
            (false, true) => "0..*",
            (false, false) => "0..1",
        };
        let mut line = format!("  {:<22} {:<16} {cardinality}", decl.alias, decl.type_code);
        if let Some(ext) = decl.extension_alias {
            line.push_str(&format!("  ext={ext}"));
        }
        if !decl.enum_values.is_empty() {
            let open = if decl.codes_extensible { "|+" } else { "" };
            line.push_str(&format!("  codes={}{open}", decl.enum_values.join("|")));
        }
        if !decl.reference_types.is_empty() {
            line.push_str(&format!("  refs={}", decl.reference_types.join("|")));
        }
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from([
            "ferrum",
            "validate",
            "--fhir-version",
            "STU3",
            "--format",
            "json",
            "a.json",
            "b.json",
        ])
        .unwrap();

        match cli.command {
            Commands::Validate {
                fhir_version,
                format,
                files,
                ..
            } => {
                assert_eq!(fhir_version, Some(FhirVersion::Stu3));
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(files.len(), 2);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_version_flag_overrides_default() {
        let config = load_config(None, Some(FhirVersion::Stu3)).unwrap();
        assert_eq!(config.fhir.version, FhirVersion::Stu3);
    }

    #[test]
    fn test_fields_unknown_type() {
        assert!(print_fields("Patient", None).is_err());
        assert!(print_fields("DetectedIssueMitigation", None).is_ok());
        assert!(print_fields("Endpoint", Some(FhirVersion::Stu3)).is_err());
    }
}
