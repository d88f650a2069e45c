//! Fixture-driven validator suite
//!
//! Uses libtest-mimic to generate one test per entry of
//! `tests/fixtures/manifest.json`. Each test validates a resource from
//! `tests/fixtures/cases/` and compares the outcome with the expectation.
//!
//! ```bash
//! cargo test -p ferrum-validator --test fixture_suite
//!
//! # Filter by name
//! cargo test -p ferrum-validator --test fixture_suite -- endpoint
//! ```

use std::fs;
use std::path::PathBuf;

use ferrum_validator::{FhirVersion, Preset, ValidationOutcome, Validator, ValidatorConfig};
use libtest_mimic::{Arguments, Failed, Trial};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct Manifest {
    test_cases: Vec<TestCase>,
}

#[derive(Debug, Clone, Deserialize)]
struct TestCase {
    name: String,
    file: String,
    version: String,
    #[serde(default)]
    preset: Option<Preset>,
    expected: Expectation,
}

#[derive(Debug, Clone, Deserialize)]
struct Expectation {
    errors: usize,
    #[serde(default)]
    warnings: Option<usize>,
    #[serde(default)]
    locations: Option<Vec<String>>,
    #[serde(default)]
    codes: Option<Vec<String>>,
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_manifest() -> Result<Manifest, String> {
    let path = fixtures_dir().join("manifest.json");
    let content = fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))?;
    serde_json::from_str(&content).map_err(|e| format!("{}: {e}", path.display()))
}

fn load_resource(file: &str) -> Result<Value, Failed> {
    let path = fixtures_dir().join("cases").join(file);
    let content = fs::read_to_string(&path)
        .map_err(|e| Failed::from(format!("could not load resource {}: {e}", path.display())))?;
    serde_json::from_str(&content).map_err(|e| Failed::from(format!("{file}: {e}")))
}

fn build_validator(tc: &TestCase) -> Result<Validator, Failed> {
    let version: FhirVersion = tc.version.parse().map_err(|e| Failed::from(format!("{e}")))?;
    let mut builder = ValidatorConfig::builder();
    if let Some(preset) = tc.preset {
        builder = builder.preset(preset);
    }
    let config = builder.fhir_version(version).build();
    Validator::from_config(&config).map_err(|e| Failed::from(format!("{e}")))
}

fn run_single_test(tc: &TestCase) -> Result<(), Failed> {
    let resource = load_resource(&tc.file)?;
    let outcome = build_validator(tc)?.validate(&resource);
    check_outcome(&outcome, &tc.expected).map_err(|msg| Failed::from(describe(msg, &outcome)))
}

fn check_outcome(outcome: &ValidationOutcome, expected: &Expectation) -> Result<(), String> {
    let errors = outcome.error_count();
    if errors != expected.errors {
        return Err(format!(
            "error count mismatch: expected {}, got {errors}",
            expected.errors
        ));
    }

    if let Some(warnings) = expected.warnings {
        if outcome.warning_count() != warnings {
            return Err(format!(
                "warning count mismatch: expected {warnings}, got {}",
                outcome.warning_count()
            ));
        }
    }

    if let Some(ref locations) = expected.locations {
        let actual: Vec<&str> = outcome
            .issues
            .iter()
            .filter_map(|i| i.location.as_deref())
            .collect();
        if actual != *locations {
            return Err(format!("locations mismatch: expected {locations:?}, got {actual:?}"));
        }
    }

    if let Some(ref codes) = expected.codes {
        let actual: Vec<String> = outcome.issues.iter().map(|i| i.code.to_string()).collect();
        if actual != *codes {
            return Err(format!("codes mismatch: expected {codes:?}, got {actual:?}"));
        }
    }

    Ok(())
}

fn describe(mut msg: String, outcome: &ValidationOutcome) -> String {
    for (i, issue) in outcome.issues.iter().enumerate() {
        msg.push_str(&format!(
            "\n  [{i}] {} {}: {} @ {}",
            issue.severity,
            issue.code,
            issue.diagnostics,
            issue.location.as_deref().unwrap_or("-"),
        ));
    }
    msg
}

fn make_trial(tc: &TestCase) -> Trial {
    let test_name = format!("{}::{}", tc.version, tc.name);
    let tc = tc.clone();
    Trial::test(test_name, move || run_single_test(&tc))
}

fn main() {
    let args = Arguments::from_args();

    let manifest = match load_manifest() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("could not read fixture manifest: {e}");
            std::process::exit(1);
        }
    };

    let trials: Vec<Trial> = manifest.test_cases.iter().map(make_trial).collect();
    eprintln!("Fixture suite: {} cases", trials.len());

    libtest_mimic::run(&args, trials).exit();
}
