use crate::{CodesConfig, CodesMode, FhirVersion, ReferenceMode, ReferencesConfig, RequiredConfig};

/// Compiled validation plan - list of steps to execute
#[derive(Debug, Clone)]
pub struct ValidationPlan {
    pub fhir_version: FhirVersion,
    pub steps: Vec<Step>,
    pub fail_fast: bool,
    pub max_issues: usize,
}

#[derive(Debug, Clone)]
pub enum Step {
    RequiredElements(RequiredPlan),
    Codes(CodesPlan),
    References(ReferencesPlan),
}

// ============================================================================
// Step Plans
// ============================================================================

#[derive(Debug, Clone)]
pub struct RequiredPlan {}

impl From<&RequiredConfig> for RequiredPlan {
    fn from(_cfg: &RequiredConfig) -> Self {
        Self {}
    }
}

#[derive(Debug, Clone)]
pub struct CodesPlan {
    pub mode: CodesMode,
}

impl From<&CodesConfig> for CodesPlan {
    fn from(cfg: &CodesConfig) -> Self {
        Self { mode: cfg.mode }
    }
}

#[derive(Debug, Clone)]
pub struct ReferencesPlan {
    pub mode: ReferenceMode,
    pub warn_only: bool,
}

impl From<&ReferencesConfig> for ReferencesPlan {
    fn from(cfg: &ReferencesConfig) -> Self {
        Self {
            mode: cfg.mode,
            warn_only: cfg.warn_only,
        }
    }
}
