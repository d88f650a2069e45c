//! Required code binding checks for fields declared with a fixed value set

use crate::validator::{IssueCode, ValidationIssue};
use crate::{CodesMode, CodesPlan, RecordDescriptor, RecordRegistry};
use serde_json::Value;

pub fn validate_codes(
    resource: &Value,
    plan: &CodesPlan,
    descriptor: &RecordDescriptor,
    registry: &RecordRegistry,
    issues: &mut Vec<ValidationIssue>,
) {
    if plan.mode == CodesMode::Off {
        return;
    }

    super::walk_fields(
        resource,
        descriptor,
        registry,
        descriptor.record_type,
        &mut |decl, value, location| {
            if decl.enum_values.is_empty() {
                return;
            }
            // Non-string values are a structure problem, not a code problem
            let Some(code) = value.as_str() else {
                return;
            };
            if decl.enum_values.iter().any(|allowed| *allowed == code) {
                return;
            }

            // An open value set only names the common codes; others are legal
            let issue = if decl.codes_extensible {
                ValidationIssue::warning(
                    IssueCode::CodeInvalid,
                    format!(
                        "code {code:?} is not one of the listed codes {} (others allowed)",
                        decl.enum_values.join(" | ")
                    ),
                )
            } else {
                let diagnostics = format!(
                    "code {code:?} is not one of {}",
                    decl.enum_values.join(" | ")
                );
                match plan.mode {
                    CodesMode::Error => ValidationIssue::error(IssueCode::CodeInvalid, diagnostics),
                    _ => ValidationIssue::warning(IssueCode::CodeInvalid, diagnostics),
                }
            };
            issues.push(issue.with_location(location.to_string()));
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::IssueSeverity;
    use crate::FhirVersion;
    use serde_json::json;

    fn run(mode: CodesMode, resource: Value) -> Vec<ValidationIssue> {
        let registry = RecordRegistry::for_version(FhirVersion::Stu3);
        let descriptor = registry.get("DetectedIssue").unwrap();
        let mut issues = Vec::new();
        validate_codes(&resource, &CodesPlan { mode }, descriptor, &registry, &mut issues);
        issues
    }

    #[test]
    fn test_known_codes_pass() {
        let issues = run(
            CodesMode::Error,
            json!({"resourceType": "DetectedIssue", "status": "amended", "severity": "low"}),
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_unknown_code_severity_follows_mode() {
        let resource = json!({"resourceType": "DetectedIssue", "severity": "severe"});

        let warn = run(CodesMode::Warn, resource.clone());
        assert_eq!(warn.len(), 1);
        assert_eq!(warn[0].severity, IssueSeverity::Warning);
        assert_eq!(warn[0].location.as_deref(), Some("DetectedIssue.severity"));

        let error = run(CodesMode::Error, resource);
        assert_eq!(error[0].severity, IssueSeverity::Error);
        assert_eq!(error[0].code, IssueCode::CodeInvalid);
    }

    #[test]
    fn test_open_value_set_only_warns() {
        for code in ["cancelled", "entered-in-error", "+"] {
            let issues = run(
                CodesMode::Error,
                json!({"resourceType": "DetectedIssue", "status": code}),
            );

            assert_eq!(issues.len(), 1, "{code}");
            assert_eq!(issues[0].severity, IssueSeverity::Warning);
            assert!(issues[0].diagnostics.contains("others allowed"));
            assert!(issues[0]
                .diagnostics
                .ends_with("registered | preliminary | final | amended (others allowed)"));
        }
    }

    #[test]
    fn test_null_and_absent_codes_are_skipped() {
        let issues = run(
            CodesMode::Error,
            json!({"resourceType": "DetectedIssue", "status": null}),
        );
        assert!(issues.is_empty());
    }
}
