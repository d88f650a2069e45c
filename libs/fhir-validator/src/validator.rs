use crate::{ConfigError, RecordDescriptor, RecordRegistry, ValidationPlan};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace};

/// Reusable validator - owns plan and record registry
pub struct Validator {
    plan: ValidationPlan,
    registry: Arc<RecordRegistry>,
}

impl Validator {
    pub fn new(plan: ValidationPlan, registry: RecordRegistry) -> Self {
        Self {
            plan,
            registry: Arc::new(registry),
        }
    }

    /// Compile `config` and load the models of its FHIR version.
    pub fn from_config(config: &crate::ValidatorConfig) -> Result<Self, ConfigError> {
        let plan = config.compile()?;
        let registry = RecordRegistry::for_version(plan.fhir_version);
        Ok(Self::new(plan, registry))
    }

    pub fn validate(&self, resource: &Value) -> ValidationOutcome {
        ValidationRun::new(&self.plan, &self.registry, resource).execute()
    }

    pub fn validate_batch(&self, resources: &[Value]) -> Vec<ValidationOutcome> {
        resources.iter().map(|r| self.validate(r)).collect()
    }

    pub fn plan(&self) -> &ValidationPlan {
        &self.plan
    }

    pub fn registry(&self) -> &Arc<RecordRegistry> {
        &self.registry
    }
}

/// Short-lived validation execution
struct ValidationRun<'a> {
    plan: &'a ValidationPlan,
    registry: &'a RecordRegistry,
    resource: &'a Value,
    issues: Vec<ValidationIssue>,
}

impl<'a> ValidationRun<'a> {
    fn new(plan: &'a ValidationPlan, registry: &'a RecordRegistry, resource: &'a Value) -> Self {
        Self {
            plan,
            registry,
            resource,
            issues: Vec::new(),
        }
    }

    fn execute(mut self) -> ValidationOutcome {
        let resource_type = self.get_resource_type();

        let plan = self.plan;
        if let Some(descriptor) = self.resolve_descriptor(resource_type.as_deref()) {
            for step in &plan.steps {
                if plan.fail_fast && self.has_errors() {
                    break;
                }

                if self.issues.len() >= plan.max_issues {
                    debug!(max_issues = plan.max_issues, "issue limit reached");
                    break;
                }

                self.execute_step(step, descriptor);
            }
        }

        self.issues.truncate(self.plan.max_issues);
        let valid = !self.has_errors();
        debug!(
            resource_type = resource_type.as_deref().unwrap_or("-"),
            valid,
            issues = self.issues.len(),
            "validation finished"
        );

        ValidationOutcome {
            resource_type,
            valid,
            issues: self.issues,
        }
    }

    fn resolve_descriptor(&mut self, resource_type: Option<&str>) -> Option<&'a RecordDescriptor> {
        if !self.resource.is_object() {
            self.issues.push(ValidationIssue::fatal(
                IssueCode::Structure,
                "resource must be a JSON object".to_string(),
            ));
            return None;
        }

        let Some(resource_type) = resource_type else {
            self.issues.push(ValidationIssue::fatal(
                IssueCode::Structure,
                "missing resourceType property".to_string(),
            ));
            return None;
        };

        let registry = self.registry;
        match registry.get(resource_type).filter(|d| d.is_resource) {
            Some(descriptor) => Some(descriptor),
            None => {
                self.issues.push(
                    ValidationIssue::error(
                        IssueCode::NotSupported,
                        format!(
                            "resource type {resource_type} is not supported for FHIR {}",
                            registry.version().label()
                        ),
                    )
                    .with_location(resource_type.to_string()),
                );
                None
            }
        }
    }

    fn execute_step(&mut self, step: &crate::Step, descriptor: &RecordDescriptor) {
        use crate::Step;

        match step {
            Step::RequiredElements(plan) => {
                trace!(record_type = descriptor.record_type, "step: required elements");
                crate::steps::required::validate_required(
                    self.resource,
                    plan,
                    descriptor,
                    &mut self.issues,
                );
            }
            Step::Codes(plan) => {
                trace!(record_type = descriptor.record_type, "step: codes");
                crate::steps::codes::validate_codes(
                    self.resource,
                    plan,
                    descriptor,
                    self.registry,
                    &mut self.issues,
                );
            }
            Step::References(plan) => {
                trace!(record_type = descriptor.record_type, "step: references");
                crate::steps::references::validate_references(
                    self.resource,
                    plan,
                    descriptor,
                    self.registry,
                    &mut self.issues,
                );
            }
        }
    }

    fn has_errors(&self) -> bool {
        self.issues.iter().any(ValidationIssue::is_error)
    }

    fn get_resource_type(&self) -> Option<String> {
        self.resource
            .get("resourceType")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }
}

/// Validation result for a single resource
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub resource_type: Option<String>,
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    pub fn has_errors(&self) -> bool {
        !self.valid
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
            .count()
    }

    pub fn to_operation_outcome(&self) -> Value {
        serde_json::json!({
            "resourceType": "OperationOutcome",
            "issue": self.issues.iter().map(|i| i.to_json()).collect::<Vec<_>>()
        })
    }
}

/// Individual validation issue
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: IssueCode,
    pub diagnostics: String,
    pub location: Option<String>,
    pub expression: Option<Vec<String>>,
}

impl ValidationIssue {
    pub fn fatal(code: IssueCode, diagnostics: String) -> Self {
        Self::new(IssueSeverity::Fatal, code, diagnostics)
    }

    pub fn error(code: IssueCode, diagnostics: String) -> Self {
        Self::new(IssueSeverity::Error, code, diagnostics)
    }

    pub fn warning(code: IssueCode, diagnostics: String) -> Self {
        Self::new(IssueSeverity::Warning, code, diagnostics)
    }

    fn new(severity: IssueSeverity, code: IssueCode, diagnostics: String) -> Self {
        Self {
            severity,
            code,
            diagnostics,
            location: None,
            expression: None,
        }
    }

    /// Location doubles as the single FHIRPath expression.
    pub fn with_location(mut self, location: String) -> Self {
        self.expression = Some(vec![location.clone()]);
        self.location = Some(location);
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, IssueSeverity::Error | IssueSeverity::Fatal)
    }

    fn to_json(&self) -> Value {
        let mut issue = serde_json::json!({
            "severity": self.severity.to_string().to_lowercase(),
            "code": self.code.to_string(),
            "diagnostics": self.diagnostics,
        });

        if let Some(ref loc) = self.location {
            issue["location"] = serde_json::json!([loc]);
        }

        if let Some(ref expr) = self.expression {
            issue["expression"] = serde_json::json!(expr);
        }

        issue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Fatal,
    Error,
    Warning,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fatal => write!(f, "Fatal"),
            Self::Error => write!(f, "Error"),
            Self::Warning => write!(f, "Warning"),
        }
    }
}

/// Subset of the FHIR `issue-type` codes this validator reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCode {
    Invalid,
    Structure,
    Required,
    CodeInvalid,
    NotSupported,
    Processing,
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Invalid => "invalid",
            Self::Structure => "structure",
            Self::Required => "required",
            Self::CodeInvalid => "code-invalid",
            Self::NotSupported => "not-supported",
            Self::Processing => "processing",
        };
        write!(f, "{}", s)
    }
}
