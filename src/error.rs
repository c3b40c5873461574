//! Error types for formation and allocation runs.

use thiserror::Error;

use crate::validation::ValidationError;

/// A configuration problem detected before any computation starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    /// Offending field (e.g., "ga.crossover_rate").
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl ConfigIssue {
    pub(crate) fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Fatal failure of a single run. No partial output accompanies an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Insufficient population: {available} individuals, at least {min_size} required")]
    InsufficientPopulation { available: usize, min_size: usize },

    #[error("Invalid configuration: {}", join(.0))]
    InvalidConfiguration(Vec<ConfigIssue>),

    #[error("Invalid input: {}", join(.0))]
    InvalidInput(Vec<ValidationError>),

    #[error("Group '{group}' references unknown individual '{member}'")]
    UnknownMember { group: String, member: String },

    #[error("Group '{0}' has no members to receive work items")]
    EmptyGroup(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Turns collected issues into `Ok(())` or `InvalidConfiguration`.
pub(crate) fn check_issues(issues: Vec<ConfigIssue>) -> Result<()> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(EngineError::InvalidConfiguration(issues))
    }
}
