//! DetectedIssue resource (STU3)
//!
//! Canonical URL: http://hl7.org/fhir/StructureDefinition/DetectedIssue

use crate::common::extension::deserialize_optional;
use crate::common::{
    CodeableConcept, Extension, FhirPrimitiveExtension, FhirRecord, FieldDeclaration, Identifier,
    Reference,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

static DETECTED_ISSUE_FIELDS: &[FieldDeclaration] = &[
    FieldDeclaration::complex(
        "author",
        "author",
        "Reference",
        "The provider or device that identified the issue",
    )
    .references(&["Practitioner", "Device"]),
    FieldDeclaration::complex(
        "category",
        "category",
        "CodeableConcept",
        "Issue Category, e.g. drug-drug, duplicate therapy, etc.",
    ),
    FieldDeclaration::primitive("date", "date", "_date", "dateTime", "When identified"),
    FieldDeclaration::primitive(
        "detail",
        "detail",
        "_detail",
        "string",
        "Description and context",
    ),
    FieldDeclaration::complex(
        "identifier",
        "identifier",
        "Identifier",
        "Unique id for the detected issue",
    ),
    FieldDeclaration::complex("implicated", "implicated", "Reference", "Problem resource")
        .list()
        .references(&["Resource"]),
    FieldDeclaration::backbone(
        "mitigation",
        "mitigation",
        "DetectedIssueMitigation",
        "Step taken to address",
    )
    .list(),
    FieldDeclaration::complex("patient", "patient", "Reference", "Associated patient")
        .references(&["Patient"]),
    FieldDeclaration::primitive(
        "reference",
        "reference",
        "_reference",
        "uri",
        "Authority for issue",
    ),
    FieldDeclaration::primitive("severity", "severity", "_severity", "code", "high | moderate | low")
        .codes(&["high", "moderate", "low"]),
    FieldDeclaration::primitive(
        "status",
        "status",
        "_status",
        "code",
        "registered | preliminary | final | amended +",
    )
    .required()
    .extensible_codes(&["registered", "preliminary", "final", "amended"]),
];

/// Clinical issue with action.
///
/// Indicates an actual or potential clinical issue with or between one or
/// more active or proposed clinical actions for a patient; e.g. Drug-drug
/// interaction, Ineffective treatment frequency, Procedure-condition
/// conflict, etc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DetectedIssue {
    /// Resource type - always "DetectedIssue"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit_rules: Option<String>,

    #[serde(
        rename = "_implicitRules",
        default,
        deserialize_with = "deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub implicit_rules_ext: Option<FhirPrimitiveExtension>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(
        rename = "_language",
        default,
        deserialize_with = "deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub language_ext: Option<FhirPrimitiveExtension>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contained: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// The provider or device that identified the issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(
        rename = "_date",
        default,
        deserialize_with = "deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_ext: Option<FhirPrimitiveExtension>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(
        rename = "_detail",
        default,
        deserialize_with = "deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub detail_ext: Option<FhirPrimitiveExtension>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,

    /// Problem resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicated: Option<Vec<Reference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mitigation: Option<Vec<DetectedIssueMitigation>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<Reference>,

    /// Authority for issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(
        rename = "_reference",
        default,
        deserialize_with = "deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub reference_ext: Option<FhirPrimitiveExtension>,

    /// high | moderate | low
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    #[serde(
        rename = "_severity",
        default,
        deserialize_with = "deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub severity_ext: Option<FhirPrimitiveExtension>,

    /// registered | preliminary | final | amended +
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(
        rename = "_status",
        default,
        deserialize_with = "deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub status_ext: Option<FhirPrimitiveExtension>,
}

fn default_resource_type() -> String {
    "DetectedIssue".to_string()
}

impl FhirRecord for DetectedIssue {
    const RESOURCE_TYPE: &'static str = "DetectedIssue";

    fn field_declarations() -> &'static [FieldDeclaration] {
        DETECTED_ISSUE_FIELDS
    }

    fn elements_sequence() -> &'static [&'static str] {
        &[
            "id",
            "meta",
            "implicitRules",
            "language",
            "text",
            "contained",
            "extension",
            "modifierExtension",
            "identifier",
            "status",
            "category",
            "severity",
            "patient",
            "date",
            "author",
            "implicated",
            "detail",
            "reference",
            "mitigation",
        ]
    }
}

static DETECTED_ISSUE_MITIGATION_FIELDS: &[FieldDeclaration] = &[
    FieldDeclaration::complex("action", "action", "CodeableConcept", "What mitigation?").required(),
    FieldDeclaration::complex("author", "author", "Reference", "Who is committing?")
        .references(&["Practitioner"]),
    FieldDeclaration::primitive("date", "date", "_date", "dateTime", "Date committed"),
];

/// Step taken to address.
///
/// Backbone element for DetectedIssue.mitigation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DetectedIssueMitigation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// What mitigation?
    pub action: CodeableConcept,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(
        rename = "_date",
        default,
        deserialize_with = "deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_ext: Option<FhirPrimitiveExtension>,
}

impl FhirRecord for DetectedIssueMitigation {
    const RESOURCE_TYPE: &'static str = "DetectedIssueMitigation";
    const IS_RESOURCE: bool = false;

    fn field_declarations() -> &'static [FieldDeclaration] {
        DETECTED_ISSUE_MITIGATION_FIELDS
    }

    fn elements_sequence() -> &'static [&'static str] {
        &["id", "extension", "modifierExtension", "action", "date", "author"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Error, FieldErrorKind, FieldValue, RawRecord};
    use serde_json::json;

    #[test]
    fn test_status_is_the_only_required_pair() {
        let pairs = DetectedIssue::required_primitive_pairs();
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].primary, pairs[0].extension), ("status", "_status"));
    }

    #[test]
    fn test_empty_input_is_missing_status() {
        let err = DetectedIssue::from_value(json!({})).unwrap_err();

        let Error::RequiredElements(err) = err else {
            panic!("expected required element failure");
        };
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].alias, "status");
        assert!(matches!(err.errors[0].kind, FieldErrorKind::MissingValue));
    }

    #[test]
    fn test_final_status_passes() {
        let issue = DetectedIssue::from_value(json!({"status": "final"})).unwrap();
        assert_eq!(issue.status.as_deref(), Some("final"));
        assert_eq!(issue.resource_type, "DetectedIssue");
    }

    #[test]
    fn test_null_status_with_extension_passes() {
        let issue = DetectedIssue::from_value(json!({
            "status": null,
            "_status": {"extension": [{"url": "x"}]}
        }))
        .unwrap();

        assert!(issue.status.is_none());
        assert_eq!(issue.status_ext.unwrap().extensions()[0].url, "x");
    }

    #[test]
    fn test_null_status_with_empty_extension_fails() {
        let err = DetectedIssue::from_value(json!({"status": null, "_status": {"extension": []}}))
            .unwrap_err();

        let Error::RequiredElements(err) = err else {
            panic!("expected required element failure");
        };
        assert_eq!(err.errors[0].alias, "status");
        assert!(matches!(err.errors[0].kind, FieldErrorKind::NullNotAllowed));
    }

    #[test]
    fn test_string_document_extension_coerces() {
        let raw = RawRecord::new().with(
            "_status",
            FieldValue::from(r#"{"extension": [{"url": "http://example.org/reason"}]}"#),
        );

        let issue = DetectedIssue::from_raw(raw).unwrap();
        assert!(issue.status_ext.unwrap().has_extensions());
    }

    #[test]
    fn test_mitigation_requires_action() {
        let err = DetectedIssue::from_value(json!({
            "status": "final",
            "mitigation": [{"date": "2017-01-01"}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("action"));

        let mitigation = DetectedIssueMitigation::from_value(json!({
            "action": {"text": "Stopped drug"},
            "author": {"reference": "Practitioner/example"}
        }))
        .unwrap();
        assert_eq!(mitigation.action.text.as_deref(), Some("Stopped drug"));
    }
}
