//! Validator configuration
//!
//! A [`ValidatorConfig`] is what users write (YAML, builder or preset); it is
//! compiled into a [`ValidationPlan`] once and reused for every resource.
//!
//! ```yaml
//! preset: Authoring
//! fhir:
//!   version: R5
//! codes:
//!   mode: Error
//! exec:
//!   fail_fast: false
//!   max_issues: 1000
//! ```
//!
//! Keys given next to a `preset` override the preset's values.

use crate::{CodesPlan, ConfigError, ReferencesPlan, RequiredPlan, Step, ValidationPlan};
use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FhirVersion {
    #[serde(rename = "STU3")]
    Stu3,
    R5,
}

impl FhirVersion {
    pub fn label(self) -> &'static str {
        match self {
            Self::Stu3 => "STU3",
            Self::R5 => "R5",
        }
    }
}

impl std::str::FromStr for FhirVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "STU3" | "R3" | "3.0" | "3.0.2" => Ok(Self::Stu3),
            "R5" | "5.0" | "5.0.0" => Ok(Self::R5),
            other => Err(ConfigError::InvalidConfig(format!(
                "unsupported FHIR version {other:?} (expected STU3 or R5)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    /// Gate incoming data: required elements only, stop at the first error
    Ingestion,
    /// Everything on, code and reference findings as warnings
    Authoring,
    /// Everything on, every finding is an error
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodesMode {
    Off,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceMode {
    Off,
    /// Check the target type of relative references
    TypeOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FhirConfig {
    pub version: FhirVersion,
}

impl Default for FhirConfig {
    fn default() -> Self {
        Self {
            version: FhirVersion::R5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequiredConfig {
    pub enabled: bool,
}

impl Default for RequiredConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodesConfig {
    pub mode: CodesMode,
}

impl Default for CodesConfig {
    fn default() -> Self {
        Self {
            mode: CodesMode::Warn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencesConfig {
    pub mode: ReferenceMode,
    /// Report a mismatch as a warning instead of an error
    pub warn_only: bool,
}

impl Default for ReferencesConfig {
    fn default() -> Self {
        Self {
            mode: ReferenceMode::TypeOnly,
            warn_only: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    pub fail_fast: bool,
    pub max_issues: usize,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            max_issues: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,
    pub fhir: FhirConfig,
    pub required: RequiredConfig,
    pub codes: CodesConfig,
    pub references: ReferencesConfig,
    pub exec: ExecConfig,
}

impl ValidatorConfig {
    pub fn preset(preset: Preset) -> Self {
        let mut cfg = Self {
            preset: Some(preset),
            ..Self::default()
        };
        match preset {
            Preset::Ingestion => {
                cfg.codes.mode = CodesMode::Off;
                cfg.references.mode = ReferenceMode::Off;
                cfg.exec.fail_fast = true;
            }
            Preset::Authoring => {}
            Preset::Strict => {
                cfg.codes.mode = CodesMode::Error;
                cfg.references.warn_only = false;
            }
        }
        cfg
    }

    pub fn builder() -> ValidatorConfigBuilder {
        ValidatorConfigBuilder {
            config: Self::default(),
        }
    }

    /// Parse YAML. Keys present next to `preset` override the preset.
    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        let overlay: YamlValue = serde_yaml::from_str(input)?;
        let preset = match overlay.get("preset") {
            Some(value) => Some(serde_yaml::from_value::<Preset>(value.clone())?),
            None => None,
        };

        let merged = match preset {
            Some(preset) => {
                let mut base = serde_yaml::to_value(Self::preset(preset))?;
                merge_yaml(&mut base, overlay);
                base
            }
            None => overlay,
        };

        // An empty document parses as null
        if merged.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_value(merged)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn compile(&self) -> Result<ValidationPlan, ConfigError> {
        if self.exec.max_issues == 0 {
            return Err(ConfigError::ZeroMaxIssues);
        }

        let mut steps = Vec::new();
        if self.required.enabled {
            steps.push(Step::RequiredElements(RequiredPlan::from(&self.required)));
        }
        if self.codes.mode != CodesMode::Off {
            steps.push(Step::Codes(CodesPlan::from(&self.codes)));
        }
        if self.references.mode != ReferenceMode::Off {
            steps.push(Step::References(ReferencesPlan::from(&self.references)));
        }
        if steps.is_empty() {
            return Err(ConfigError::EmptyPlan);
        }

        Ok(ValidationPlan {
            fhir_version: self.fhir.version,
            steps,
            fail_fast: self.exec.fail_fast,
            max_issues: self.exec.max_issues,
        })
    }
}

fn merge_yaml(base: &mut YamlValue, overlay: YamlValue) {
    match (base, overlay) {
        (YamlValue::Mapping(base), YamlValue::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_yaml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

pub struct ValidatorConfigBuilder {
    config: ValidatorConfig,
}

impl ValidatorConfigBuilder {
    /// Reset to a preset; later calls override its values.
    pub fn preset(mut self, preset: Preset) -> Self {
        self.config = ValidatorConfig::preset(preset);
        self
    }

    pub fn fhir_version(mut self, version: FhirVersion) -> Self {
        self.config.fhir.version = version;
        self
    }

    pub fn required_elements(mut self, enabled: bool) -> Self {
        self.config.required.enabled = enabled;
        self
    }

    pub fn codes_mode(mut self, mode: CodesMode) -> Self {
        self.config.codes.mode = mode;
        self
    }

    pub fn reference_mode(mut self, mode: ReferenceMode) -> Self {
        self.config.references.mode = mode;
        self
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.config.exec.fail_fast = fail_fast;
        self
    }

    pub fn max_issues(mut self, max_issues: usize) -> Self {
        self.config.exec.max_issues = max_issues;
        self
    }

    pub fn build(self) -> ValidatorConfig {
        self.config
    }
}
