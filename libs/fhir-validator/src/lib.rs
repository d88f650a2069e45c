//! Configurable validation of FHIR resources against the ferrum record models.
//!
//! ```
//! use ferrum_validator::{Validator, ValidatorConfig};
//! use serde_json::json;
//!
//! let validator = Validator::from_config(&ValidatorConfig::default()).unwrap();
//! let outcome = validator.validate(&json!({
//!     "resourceType": "Endpoint",
//!     "status": null,
//!     "_status": {"extension": [{
//!         "url": "http://hl7.org/fhir/StructureDefinition/data-absent-reason",
//!         "valueCode": "unknown"
//!     }]},
//!     "address": "https://example.org/fhir",
//!     "connectionType": [{"coding": [{"code": "hl7-fhir-rest"}]}]
//! }));
//! assert!(outcome.valid);
//! ```

mod config;
mod error;
mod plan;
mod registry;
mod steps;
mod validator;

pub use config::{
    CodesConfig, CodesMode, ExecConfig, FhirConfig, FhirVersion, Preset, ReferenceMode,
    ReferencesConfig, RequiredConfig, ValidatorConfig, ValidatorConfigBuilder,
};
pub use error::ConfigError;
pub use plan::{CodesPlan, ReferencesPlan, RequiredPlan, Step, ValidationPlan};
pub use registry::{RecordDescriptor, RecordRegistry};
pub use validator::{IssueCode, IssueSeverity, ValidationIssue, ValidationOutcome, Validator};
