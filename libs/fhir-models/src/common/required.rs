//! Required primitive elements with extension fallback
//!
//! A primitive element with minimum cardinality 1 must be present, but a
//! record may omit (or null) the value when the sibling `_field` carries at
//! least one extension explaining why
//! (<https://www.hl7.org/fhir/extensibility.html#Special-Case>).
//!
//! The check runs on the raw record, before any field is coerced, and
//! reports every violated pair at once.

use super::error::{FieldError, FieldErrorKind, RequiredElementsError};
use super::extension::FhirPrimitiveExtension;
use super::field::{FieldValue, Presence, RawRecord, RequiredPair};
use serde_json::Value;
use tracing::debug;

/// Gate a raw record on its required primitive pairs.
///
/// Returns `raw` untouched when every pair is satisfied.
pub fn validate_required_primitive_elements(
    record_type: &'static str,
    raw: RawRecord,
    pairs: &[RequiredPair],
) -> Result<RawRecord, RequiredElementsError> {
    let errors = check_required_primitive_elements(&raw, pairs);
    if errors.is_empty() {
        return Ok(raw);
    }

    debug!(
        record_type,
        errors = errors.len(),
        "rejecting record with unsatisfied required elements"
    );
    Err(RequiredElementsError {
        record_type,
        errors,
    })
}

/// Collect the field errors for `pairs` without consuming the record.
pub fn check_required_primitive_elements(
    raw: &RawRecord,
    pairs: &[RequiredPair],
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for pair in pairs {
        let value = raw.get(pair.primary);
        if value.is_present_non_null() {
            continue;
        }

        let missing_extension = match extension_state(raw.get(pair.extension)) {
            ExtensionState::Explained => false,
            ExtensionState::Missing => true,
            ExtensionState::Invalid(err) => {
                debug!(alias = pair.extension, error = %err, "extension coercion failed");
                errors.push(FieldError::new(
                    pair.extension,
                    FieldErrorKind::ExtensionCoercionFailed(err),
                ));
                continue;
            }
        };

        if missing_extension {
            let kind = match value {
                Presence::Absent => FieldErrorKind::MissingValue,
                _ => FieldErrorKind::NullNotAllowed,
            };
            debug!(alias = pair.primary, kind = kind.code(), "required element missing");
            errors.push(FieldError::new(pair.primary, kind));
        }
    }

    errors
}

enum ExtensionState {
    Explained,
    Missing,
    Invalid(super::error::ExtensionError),
}

fn extension_state(value: Presence<'_>) -> ExtensionState {
    let value = match value {
        Presence::Absent | Presence::Null => return ExtensionState::Missing,
        Presence::Value(value) => value,
    };

    // Entries of an untyped map are not inspected, only counted. A
    // non-array `extension` counts as none.
    let explained = if let Some(map) = value.as_map() {
        matches!(
            map.get("extension"),
            Some(Value::Array(entries)) if !entries.is_empty()
        )
    } else {
        match value {
            FieldValue::PrimitiveExtension(ext) => ext.has_extensions(),
            other => match FhirPrimitiveExtension::coerce(other) {
                Ok(ext) => ext.has_extensions(),
                Err(err) => return ExtensionState::Invalid(err),
            },
        }
    };

    if explained {
        ExtensionState::Explained
    } else {
        ExtensionState::Missing
    }
}
