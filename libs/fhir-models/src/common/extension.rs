//! Extension-only companion of a primitive element
//!
//! In FHIR JSON a primitive `status` may carry its metadata in a sibling
//! `_status` object holding only `id` and `extension`. When the primitive
//! value itself is missing, that object explains why (see
//! <https://www.hl7.org/fhir/extensibility.html#Special-Case>).

use super::complex::Extension;
use super::error::ExtensionError;
use super::field::FieldValue;
use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// `_field` value of a primitive element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FhirPrimitiveExtension {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,
}

fn id_pattern() -> &'static Regex {
    static ID: OnceLock<Regex> = OnceLock::new();
    ID.get_or_init(|| Regex::new(r"^[A-Za-z0-9\-\.]{1,64}$").expect("valid id pattern"))
}

impl FhirPrimitiveExtension {
    pub const TYPE_NAME: &'static str = "FHIRPrimitiveExtension";

    pub fn new(extension: Vec<Extension>) -> Self {
        Self {
            id: None,
            extension: Some(extension),
        }
    }

    /// Extension entries, empty when none were given.
    pub fn extensions(&self) -> &[Extension] {
        self.extension.as_deref().unwrap_or(&[])
    }

    /// Whether the value explains an absent primitive.
    pub fn has_extensions(&self) -> bool {
        !self.extensions().is_empty()
    }

    /// Check the content rules serde cannot express.
    pub fn validate(&self) -> Result<(), ExtensionError> {
        if let Some(id) = &self.id {
            if !id_pattern().is_match(id) {
                return Err(ExtensionError::InvalidId(id.clone()));
            }
        }
        for (index, ext) in self.extensions().iter().enumerate() {
            if ext.url.is_empty() {
                return Err(ExtensionError::MissingUrl { index });
            }
        }
        Ok(())
    }

    /// Read a JSON value as a primitive extension.
    pub fn from_json(value: &Value) -> Result<Self, ExtensionError> {
        match value {
            Value::Object(_) => {
                let ext: Self =
                    serde_json::from_value(value.clone()).map_err(ExtensionError::Invalid)?;
                ext.validate()?;
                Ok(ext)
            }
            Value::String(document) => Self::from_document(document.as_bytes()),
            other => Err(ExtensionError::NotAnObject {
                found: FieldValue::Json(other.clone()).shape(),
            }),
        }
    }

    /// Coerce any raw value into this shape.
    ///
    /// Objects and already typed values are taken as they are; strings and
    /// bytes are parsed as a JSON document first. Everything else fails.
    pub fn coerce(value: &FieldValue) -> Result<Self, ExtensionError> {
        match value {
            FieldValue::PrimitiveExtension(ext) => {
                ext.validate()?;
                Ok(ext.clone())
            }
            FieldValue::Json(json) => Self::from_json(json),
            FieldValue::Bytes(bytes) => Self::from_document(bytes),
            FieldValue::Null => Err(ExtensionError::NotAnObject { found: "null" }),
        }
    }

    fn from_document(bytes: &[u8]) -> Result<Self, ExtensionError> {
        let parsed: Value = serde_json::from_slice(bytes).map_err(ExtensionError::InvalidJson)?;
        match parsed {
            Value::Object(_) => Self::from_json(&parsed),
            other => Err(ExtensionError::NotAnObject {
                found: FieldValue::from(other).shape(),
            }),
        }
    }
}

/// `deserialize_with` helper for `_field` members of the models.
///
/// Accepts whatever [`FhirPrimitiveExtension::from_json`] accepts, so a JSON
/// document in a string coerces the same way it does in the required check.
pub fn deserialize_optional<'de, D>(
    deserializer: D,
) -> Result<Option<FhirPrimitiveExtension>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => FhirPrimitiveExtension::from_json(&value)
            .map(Some)
            .map_err(D::Error::custom),
    }
}

/// `deserialize_with` helper for `_field` members of list primitives.
///
/// Each item coerces like [`deserialize_optional`]; `null` keeps its slot.
pub fn deserialize_optional_list<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<Option<FhirPrimitiveExtension>>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Vec<Value>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => Ok(None),
                value => FhirPrimitiveExtension::from_json(value).map(Some),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
            .map_err(D::Error::custom),
    }
}
