//! Version-agnostic FHIR models
//!
//! Raw records, field declarations, primitive extensions, shared datatypes
//! and the required-element check used by the `r5` and `stu3` models.

pub mod complex;
pub mod error;
pub mod extension;
pub mod field;
pub mod record;
pub mod required;

// Re-export commonly used types
pub use complex::*;
pub use error::{
    Error, ExtensionError, FieldError, FieldErrorKind, RequiredElementsError, Result,
};
pub use extension::FhirPrimitiveExtension;
pub use field::*;
pub use record::FhirRecord;
pub use required::{check_required_primitive_elements, validate_required_primitive_elements};
