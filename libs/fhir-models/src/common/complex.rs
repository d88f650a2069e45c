//! FHIR complex types and shared data structures
//!
//! Data types reused across the resource models. Unknown properties are
//! kept in the flattened `extensions` map rather than rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// FHIR Extension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    pub url: String,

    /// `id`, nested `extension` and the `value[x]` choice
    #[serde(flatten)]
    pub value: serde_json::Map<String, Value>,
}

impl Extension {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            value: serde_json::Map::new(),
        }
    }

    /// Attach a `value[x]` entry, e.g. `with_value("valueCode", json!("unknown"))`.
    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.value.insert(key.into(), value);
        self
    }
}

/// Coding - a reference to a code defined by a terminology system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_selected: Option<bool>,

    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

/// Concept - reference to a terminology or just text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coding: Option<Vec<Coding>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

/// Contact point (phone, email, etc.)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>, // phone | fax | email | pager | url | sms | other

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>, // home | work | temp | old | mobile

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,

    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

/// Identifier - business identifier of a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>, // usual | official | temp | secondary | old

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,

    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

/// Period - time range defined by start and end date/time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

/// Reference - a reference from one resource to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

impl Reference {
    /// Resource type of a relative `Type/id` reference.
    ///
    /// Absolute URLs, contained (`#id`) and logical references yield `None`.
    pub fn target_type(&self) -> Option<&str> {
        let reference = self.reference.as_deref()?;
        if reference.starts_with('#') || reference.contains("://") || reference.starts_with("urn:") {
            return None;
        }
        let (resource_type, rest) = reference.split_once('/')?;
        if rest.is_empty() || !resource_type.starts_with(|c: char| c.is_ascii_uppercase()) {
            return None;
        }
        Some(resource_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference(value: &str) -> Reference {
        serde_json::from_value(json!({ "reference": value })).unwrap()
    }

    #[test]
    fn test_reference_target_type() {
        assert_eq!(reference("Organization/1").target_type(), Some("Organization"));
        assert_eq!(
            reference("Patient/1/_history/2").target_type(),
            Some("Patient")
        );
        assert_eq!(reference("#contained").target_type(), None);
        assert_eq!(reference("http://x.org/fhir/Patient/1").target_type(), None);
        assert_eq!(reference("urn:uuid:1234").target_type(), None);
        assert_eq!(reference("Patient/").target_type(), None);
    }

    #[test]
    fn test_extension_keeps_value_choice() {
        let ext: Extension = serde_json::from_value(json!({
            "url": "http://hl7.org/fhir/StructureDefinition/data-absent-reason",
            "valueCode": "unknown"
        }))
        .unwrap();

        assert_eq!(ext.value["valueCode"], "unknown");
        assert_eq!(
            serde_json::to_value(&ext).unwrap()["valueCode"],
            json!("unknown")
        );
    }
}
