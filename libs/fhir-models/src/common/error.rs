//! Error types for FHIR models

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid FHIR resource: {0}")]
    InvalidResource(String),

    #[error("Resource type mismatch: expected {expected}, got {found}")]
    ResourceTypeMismatch { expected: String, found: String },

    #[error(transparent)]
    RequiredElements(#[from] RequiredElementsError),

    #[error("Invalid {record_type}: {source}")]
    Coercion {
        record_type: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure to read a value as a [`FhirPrimitiveExtension`](super::FhirPrimitiveExtension).
#[derive(Error, Debug)]
pub enum ExtensionError {
    #[error("invalid JSON document: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("value is not a valid object (found {found})")]
    NotAnObject { found: &'static str },

    #[error("{0}")]
    Invalid(#[source] serde_json::Error),

    #[error("id {0:?} does not match [A-Za-z0-9\\-\\.]{{1,64}}")]
    InvalidId(String),

    #[error("extension[{index}].url is required")]
    MissingUrl { index: usize },
}

/// Why a single field failed the required-element check.
#[derive(Error, Debug)]
pub enum FieldErrorKind {
    /// Required key absent and no usable extension given.
    #[error("field required")]
    MissingValue,
    /// Required key explicitly null and no usable extension given.
    #[error("none is not an allowed value")]
    NullNotAllowed,
    /// The `_field` value could not be read as a primitive extension.
    #[error("{0}")]
    ExtensionCoercionFailed(#[source] ExtensionError),
}

impl FieldErrorKind {
    /// Stable machine-readable name of the kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingValue => "value_error.missing",
            Self::NullNotAllowed => "type_error.none.not_allowed",
            Self::ExtensionCoercionFailed(_) => "value_error.extension",
        }
    }
}

/// Error attached to one wire alias of a record.
#[derive(Error, Debug)]
#[error("{alias}: {kind}")]
pub struct FieldError {
    pub alias: String,
    #[source]
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(alias: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            alias: alias.into(),
            kind,
        }
    }

    /// Nested cause, present only for extension coercion failures.
    pub fn nested(&self) -> Option<&ExtensionError> {
        match &self.kind {
            FieldErrorKind::ExtensionCoercionFailed(err) => Some(err),
            _ => None,
        }
    }
}

/// Aggregated rejection of a record by the required-element check.
///
/// Holds every violating pair in declaration order; never empty.
#[derive(Error, Debug)]
#[error("{}", summarize(.record_type, .errors))]
pub struct RequiredElementsError {
    pub record_type: &'static str,
    pub errors: Vec<FieldError>,
}

impl RequiredElementsError {
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.alias.as_str())
    }
}

fn summarize(record_type: &str, errors: &[FieldError]) -> String {
    let count = errors.len();
    let mut out = format!(
        "{count} validation error{} for {record_type}",
        if count == 1 { "" } else { "s" }
    );
    for error in errors {
        out.push_str(&format!(
            "\n{}\n  {} ({})",
            error.alias,
            error.kind,
            error.kind.code()
        ));
    }
    out
}
