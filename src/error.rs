//! Custom error types for budget-planner
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Validation problems in a budget draft are
//! not errors: they are reported through `ValidationReport`.

use thiserror::Error;

/// The main error type for budget-planner operations
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Submission was blocked by validation flags
    #[error("Submission blocked: {0}")]
    Submission(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PlannerError {
    /// Create a "not found" error for parent budgets
    pub fn parent_budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Parent budget",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for line items
    pub fn line_item_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Line item",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for linked entities
    pub fn entity_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Entity",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budget drafts
    pub fn draft_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Draft",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for PlannerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for PlannerError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

impl From<csv::Error> for PlannerError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for budget-planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
