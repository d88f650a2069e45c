//! Endpoint resource (R5)
//!
//! Canonical URL: http://hl7.org/fhir/StructureDefinition/Endpoint

use crate::common::extension::{deserialize_optional, deserialize_optional_list};
use crate::common::{
    CodeableConcept, ContactPoint, Extension, FhirPrimitiveExtension, FhirRecord,
    FieldDeclaration, Identifier, Period, Reference,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const ENDPOINT_STATUS: &[&str] = &["active", "suspended", "error", "off", "entered-in-error", "test"];

static ENDPOINT_FIELDS: &[FieldDeclaration] = &[
    FieldDeclaration::primitive(
        "address",
        "address",
        "_address",
        "url",
        "The technical base address for connecting to this endpoint",
    )
    .required(),
    FieldDeclaration::complex(
        "connection_type",
        "connectionType",
        "CodeableConcept",
        "Protocol/Profile/Standard to be used with this endpoint connection",
    )
    .required()
    .list(),
    FieldDeclaration::complex(
        "contact",
        "contact",
        "ContactPoint",
        "Contact details for source (e.g. troubleshooting)",
    )
    .list(),
    FieldDeclaration::primitive(
        "description",
        "description",
        "_description",
        "string",
        "Additional details about the endpoint that could be displayed as further information to identify the description beyond its name",
    ),
    FieldDeclaration::complex(
        "environment_type",
        "environmentType",
        "CodeableConcept",
        "The type of environment(s) exposed at this endpoint",
    )
    .list(),
    FieldDeclaration::primitive(
        "header",
        "header",
        "_header",
        "string",
        "Usage depends on the channel type",
    )
    .list(),
    FieldDeclaration::complex(
        "identifier",
        "identifier",
        "Identifier",
        "Identifies this endpoint across multiple systems",
    )
    .list(),
    FieldDeclaration::complex(
        "managing_organization",
        "managingOrganization",
        "Reference",
        "Organization that manages this endpoint (might not be the organization that exposes the endpoint)",
    )
    .references(&["Organization"]),
    FieldDeclaration::primitive(
        "name",
        "name",
        "_name",
        "string",
        "A name that this endpoint can be identified by",
    ),
    FieldDeclaration::backbone(
        "payload",
        "payload",
        "EndpointPayload",
        "Set of payloads that are provided by this endpoint",
    )
    .list(),
    FieldDeclaration::complex(
        "period",
        "period",
        "Period",
        "Interval the endpoint is expected to be operational",
    ),
    FieldDeclaration::primitive(
        "status",
        "status",
        "_status",
        "code",
        "active | suspended | error | off | entered-in-error | test",
    )
    .required()
    .codes(ENDPOINT_STATUS),
];

/// The technical details of an endpoint that can be used for electronic
/// services, such as for web services providing XDS.b, a REST endpoint for
/// another FHIR server, or a s/Mime email address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Endpoint {
    /// Resource type - always "Endpoint"
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

    /// The technical base address for connecting to this endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(
        rename = "_address",
        default,
        deserialize_with = "deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub address_ext: Option<FhirPrimitiveExtension>,

    /// Protocol/Profile/Standard to be used with this endpoint connection
    pub connection_type: Vec<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Vec<ContactPoint>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        rename = "_description",
        default,
        deserialize_with = "deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub description_ext: Option<FhirPrimitiveExtension>,

    /// The type of environment(s) exposed at this endpoint (dev, prod, test, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_type: Option<Vec<CodeableConcept>>,

    /// Additional headers / information to send as part of the notification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Vec<Option<String>>>,

    #[serde(
        rename = "_header",
        default,
        deserialize_with = "deserialize_optional_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub header_ext: Option<Vec<Option<FhirPrimitiveExtension>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Vec<Identifier>>,

    /// Organization that manages this endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managing_organization: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(
        rename = "_name",
        default,
        deserialize_with = "deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub name_ext: Option<FhirPrimitiveExtension>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Vec<EndpointPayload>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,

    /// active | suspended | error | off | entered-in-error | test
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
    "Endpoint".to_string()
}

impl FhirRecord for Endpoint {
    const RESOURCE_TYPE: &'static str = "Endpoint";

    fn field_declarations() -> &'static [FieldDeclaration] {
        ENDPOINT_FIELDS
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
            "connectionType",
            "name",
            "description",
            "environmentType",
            "managingOrganization",
            "contact",
            "period",
            "payload",
            "address",
            "header",
        ]
    }
}

impl Endpoint {
    /// Whether the endpoint is expected to be usable right now.
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("active")
    }
}

static ENDPOINT_PAYLOAD_FIELDS: &[FieldDeclaration] = &[
    FieldDeclaration::primitive(
        "mime_type",
        "mimeType",
        "_mimeType",
        "code",
        "Mimetype to send. If not specified, the content could be anything (including no payload, if the connectionType defined this)",
    )
    .list(),
    FieldDeclaration::complex(
        "type_",
        "type",
        "CodeableConcept",
        "The type of content that may be used at this endpoint (e.g. XDS Discharge summaries)",
    )
    .list(),
];

/// Set of payloads that are provided by this endpoint
///
/// Backbone element for Endpoint.payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EndpointPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<Vec<Option<String>>>,

    #[serde(
        rename = "_mimeType",
        default,
        deserialize_with = "deserialize_optional_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub mime_type_ext: Option<Vec<Option<FhirPrimitiveExtension>>>,
}

impl FhirRecord for EndpointPayload {
    const RESOURCE_TYPE: &'static str = "EndpointPayload";
    const IS_RESOURCE: bool = false;

    fn field_declarations() -> &'static [FieldDeclaration] {
        ENDPOINT_PAYLOAD_FIELDS
    }

    fn elements_sequence() -> &'static [&'static str] {
        &["id", "extension", "modifierExtension", "type", "mimeType"]
    }
}
