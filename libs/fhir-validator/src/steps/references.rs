//! Reference target type checks

use crate::validator::{IssueCode, ValidationIssue};
use crate::{RecordDescriptor, RecordRegistry, ReferenceMode, ReferencesPlan};
use ferrum_models::Reference;
use serde_json::Value;
use tracing::trace;

pub fn validate_references(
    resource: &Value,
    plan: &ReferencesPlan,
    descriptor: &RecordDescriptor,
    registry: &RecordRegistry,
    issues: &mut Vec<ValidationIssue>,
) {
    if plan.mode == ReferenceMode::Off {
        return;
    }

    super::walk_fields(
        resource,
        descriptor,
        registry,
        descriptor.record_type,
        &mut |decl, value, location| {
            let allowed = decl.reference_types;
            if allowed.is_empty() || allowed.contains(&"Resource") {
                return;
            }

            let Ok(reference) = serde_json::from_value::<Reference>(value.clone()) else {
                return;
            };
            // Absolute, contained and logical references are not checked
            let Some(target) = reference.target_type() else {
                trace!(location, "skipping non-relative reference");
                return;
            };
            if allowed.iter().any(|t| *t == target) {
                return;
            }

            let diagnostics = format!(
                "reference to {target} is not allowed here (expected {})",
                allowed.join(" | ")
            );
            let issue = if plan.warn_only {
                ValidationIssue::warning(IssueCode::Invalid, diagnostics)
            } else {
                ValidationIssue::error(IssueCode::Invalid, diagnostics)
            };
            issues.push(issue.with_location(location.to_string()));
        },
    );
}
