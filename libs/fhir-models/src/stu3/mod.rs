//! FHIR STU3 (3.0.2) resource models

pub mod detected_issue;

pub use detected_issue::*;
