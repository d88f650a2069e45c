//! Required-element validation
//!
//! Builds the typed record from the resource. The record constructor runs the
//! required primitive check first, so every missing pair is reported together;
//! a record that passes it can still fail typed coercion.

use crate::validator::{IssueCode, ValidationIssue};
use crate::{RecordDescriptor, RequiredPlan};
use ferrum_models::{Error, FieldError, FieldErrorKind, RawRecord};
use serde_json::Value;

pub fn validate_required(
    resource: &Value,
    _plan: &RequiredPlan,
    descriptor: &RecordDescriptor,
    issues: &mut Vec<ValidationIssue>,
) {
    let result = RawRecord::from_json(resource.clone()).and_then(|raw| descriptor.construct(raw));

    let Err(err) = result else {
        return;
    };

    match err {
        Error::RequiredElements(err) => {
            for field in &err.errors {
                issues.push(field_issue(descriptor.record_type, field));
            }
        }
        Error::SerializationError(err) => {
            issues.push(ValidationIssue::error(
                IssueCode::Processing,
                format!("could not read {}: {err}", descriptor.record_type),
            ));
        }
        other => {
            issues.push(
                ValidationIssue::error(IssueCode::Structure, other.to_string())
                    .with_location(descriptor.record_type.to_string()),
            );
        }
    }
}

fn field_issue(record_type: &str, field: &FieldError) -> ValidationIssue {
    let location = format!("{record_type}.{}", field.alias);
    let issue = match &field.kind {
        FieldErrorKind::MissingValue => ValidationIssue::error(
            IssueCode::Required,
            format!("{location} is required but missing"),
        ),
        FieldErrorKind::NullNotAllowed => ValidationIssue::error(
            IssueCode::Required,
            format!("{location} is required and must not be null without an extension"),
        ),
        FieldErrorKind::ExtensionCoercionFailed(err) => ValidationIssue::error(
            IssueCode::Structure,
            format!("{location} is not a valid primitive extension: {err}"),
        ),
    };
    issue.with_location(location)
}
