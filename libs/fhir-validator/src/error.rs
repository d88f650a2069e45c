use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no validation step is enabled")]
    EmptyPlan,

    #[error("exec.max_issues must be greater than zero")]
    ZeroMaxIssues,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
