//! FHIR data models
//!
//! This crate provides strongly-typed Rust structures for FHIR resources,
//! built from raw JSON through a validating constructor.
//!
//! # Module Organization
//!
//! - `common`: Version-agnostic building blocks (raw records, field
//!   declarations, primitive extensions, the required-element check)
//! - `r5`, `stu3`: Version-specific resource models
//!
//! # Required primitives
//!
//! A primitive element with minimum cardinality 1 may be left out (or set to
//! `null`) when its `_element` sibling carries an extension explaining why.
//! Construction checks this for every required primitive before coercing
//! the record, and reports all violations together.
//!
//! # Example
//!
//! ```rust
//! use ferrum_models::common::{Error, FhirRecord, FieldErrorKind};
//! use ferrum_models::stu3::DetectedIssue;
//! use serde_json::json;
//!
//! let issue = DetectedIssue::from_value(json!({
//!     "resourceType": "DetectedIssue",
//!     "status": null,
//!     "_status": {
//!         "extension": [{
//!             "url": "http://hl7.org/fhir/StructureDefinition/data-absent-reason",
//!             "valueCode": "unknown"
//!         }]
//!     }
//! }))
//! .unwrap();
//! assert!(issue.status.is_none());
//!
//! let err = DetectedIssue::from_value(json!({})).unwrap_err();
//! match err {
//!     Error::RequiredElements(err) => {
//!         assert_eq!(err.errors[0].alias, "status");
//!         assert!(matches!(err.errors[0].kind, FieldErrorKind::MissingValue));
//!     }
//!     other => panic!("unexpected error: {other}"),
//! }
//! ```

pub mod common;
pub mod r5;
pub mod stu3;

// Re-export commonly used types
pub use common::*;
