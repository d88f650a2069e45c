//! FHIR R5 (5.0.0) resource models

pub mod endpoint;

pub use endpoint::*;
