//! Record construction
//!
//! Every model is built the same way: the raw record is gated by the
//! required-element check, its `resourceType` is matched, and only then is
//! it coerced into the typed struct by serde.

use super::error::{Error, Result};
use super::field::{FieldDeclaration, RawRecord, RequiredPair};
use super::required::validate_required_primitive_elements;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// A typed FHIR record (resource or backbone element).
pub trait FhirRecord: Sized + Serialize + DeserializeOwned {
    /// Name the record is reported under; the `resourceType` of resources.
    const RESOURCE_TYPE: &'static str;

    /// Whether the JSON form carries a `resourceType` member.
    const IS_RESOURCE: bool = true;

    /// Field table, in declaration order.
    fn field_declarations() -> &'static [FieldDeclaration];

    /// Element names in FHIR element order.
    fn elements_sequence() -> &'static [&'static str];

    fn required_primitive_pairs() -> Vec<RequiredPair> {
        Self::field_declarations()
            .iter()
            .filter_map(FieldDeclaration::required_pair)
            .collect()
    }

    fn from_raw(raw: RawRecord) -> Result<Self> {
        let raw = validate_required_primitive_elements(
            Self::RESOURCE_TYPE,
            raw,
            &Self::required_primitive_pairs(),
        )?;

        if Self::IS_RESOURCE {
            if let Some(found) = raw.resource_type() {
                if found != Self::RESOURCE_TYPE {
                    return Err(Error::ResourceTypeMismatch {
                        expected: Self::RESOURCE_TYPE.to_string(),
                        found: found.to_string(),
                    });
                }
            }
        }

        let record = serde_json::from_value(raw.to_json()?).map_err(|source| Error::Coercion {
            record_type: Self::RESOURCE_TYPE,
            source,
        })?;
        debug!(record_type = Self::RESOURCE_TYPE, "record constructed");
        Ok(record)
    }

    fn from_value(value: Value) -> Result<Self> {
        Self::from_raw(RawRecord::from_json(value)?)
    }

    fn from_json_str(input: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(input)?)
    }

    fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Error::from)
    }
}
