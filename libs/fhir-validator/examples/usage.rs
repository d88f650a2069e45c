use ferrum_validator::*;
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example 1: Using presets
    let ingestion_cfg = ValidatorConfig::preset(Preset::Ingestion);
    let plan = ingestion_cfg.compile()?;
    println!("Ingestion plan has {} steps", plan.steps.len());

    // Example 2: Builder pattern
    let custom_cfg = ValidatorConfig::builder()
        .preset(Preset::Authoring)
        .codes_mode(CodesMode::Error)
        .reference_mode(ReferenceMode::TypeOnly)
        .fail_fast(true)
        .max_issues(500)
        .build();

    let plan = custom_cfg.compile()?;
    println!("Custom plan has {} steps", plan.steps.len());

    // Example 3: YAML configuration
    let yaml = r#"
preset: Authoring
fhir:
  version: STU3
codes:
  mode: Error
exec:
  fail_fast: false
  max_issues: 1000
"#;

    let cfg = ValidatorConfig::from_yaml(yaml)?;
    let validator = Validator::from_config(&cfg)?;
    println!(
        "YAML validator knows {:?}",
        validator.registry().resource_types()
    );

    // Example 4: Error handling
    let invalid_cfg = ValidatorConfig::builder()
        .required_elements(false)
        .codes_mode(CodesMode::Off)
        .reference_mode(ReferenceMode::Off)
        .build();

    match invalid_cfg.compile() {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Caught expected error: {}", e),
    }

    // Example 5: A status explained by an extension instead of a value
    let outcome = validator.validate(&json!({
        "resourceType": "DetectedIssue",
        "_status": {"extension": [{
            "url": "http://hl7.org/fhir/StructureDefinition/data-absent-reason",
            "valueCode": "asked-unknown"
        }]}
    }));
    println!("valid: {} ({} issues)", outcome.valid, outcome.issues.len());

    let outcome = validator.validate(&json!({"resourceType": "DetectedIssue"}));
    println!(
        "{}",
        serde_json::to_string_pretty(&outcome.to_operation_outcome())?
    );

    // Example 6: Export to YAML
    let cfg = ValidatorConfig::preset(Preset::Strict);
    println!("\nStrict preset as YAML:\n{}", cfg.to_yaml()?);

    Ok(())
}
