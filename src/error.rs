//! Error types for the configurables library
//!
//! Three families of failure are kept apart:
//!
//! - [`Error`]: structural misuse (bad arguments, duplicate relations). Returned
//!   from constructors and builder operations and meant to be propagated with `?`.
//! - [`ValidationError`]: a field-level problem with a supplied value. Returned
//!   as plain data so a caller can collect every problem in one pass.
//! - [`ConflictError`]: a set of mutually exclusive requirements was supplied
//!   together. Returned as the `Err` side of relational validation.

use crate::relations::Relation;
use crate::requirement::Requirement;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for configurables operations
pub type Result<T> = std::result::Result<T, Error>;

/// Structural error raised by constructors and graph builders
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    #[error("Invalid collection bounds: {0}")]
    InvalidArity(String),

    #[error("Requirement '{0}' has no validator")]
    MissingValidator(String),

    #[error("Cannot add a relation of type {0}")]
    IllegalRelation(Relation),

    #[error("Requirement '{0}' cannot be related to itself")]
    SelfRelation(String),

    #[error("A relation builder cannot be merged into itself")]
    SelfMerge,

    #[error("Requirement type '{0}' is already registered")]
    DuplicateType(String),

    #[error("Requirement '{0}' is already part of the set")]
    DuplicateRequirement(String),

    // -------------------------------------------------------------------------
    // Builder Misuse Errors
    // -------------------------------------------------------------------------
    #[error("A relationship between '{primary}' and '{secondary}' already exists")]
    RelationExists { primary: String, secondary: String },

    #[error("Merge would duplicate {} existing relationship(s)", .duplicates.len())]
    MergeConflict { duplicates: Vec<(String, String)> },
}

impl Error {
    /// Check if this error was caused by a malformed argument
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgument { .. }
                | Error::InvalidArity(_)
                | Error::MissingValidator(_)
                | Error::IllegalRelation(_)
                | Error::SelfRelation(_)
                | Error::SelfMerge
                | Error::DuplicateType(_)
                | Error::DuplicateRequirement(_)
        )
    }

    /// Check if this error was caused by registering a second relation for a pair
    #[must_use]
    pub fn is_builder_misuse(&self) -> bool {
        matches!(
            self,
            Error::RelationExists { .. } | Error::MergeConflict { .. }
        )
    }

    pub(crate) fn blank(argument: &'static str) -> Self {
        Error::InvalidArgument {
            argument,
            reason: "String must not be empty or whitespace".to_string(),
        }
    }
}

// =============================================================================
// Field-level Validation Errors
// =============================================================================

/// A problem with the values supplied for a single requirement
///
/// These are returned, never raised, so that callers can aggregate every
/// field-level problem before reporting.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Required value for '{requirement}' was not supplied")]
    MissingRequired { requirement: String },

    #[error("'{requirement}' expects a single value, got {count}")]
    NotScalar { requirement: String, count: usize },

    #[error("'{requirement}' requires at least {minimum} value(s), got {count}")]
    BelowRange {
        requirement: String,
        minimum: usize,
        count: usize,
    },

    #[error("'{requirement}' allows at most {maximum} value(s), got {count}")]
    AboveRange {
        requirement: String,
        maximum: usize,
        count: usize,
    },

    #[error("Value for '{requirement}' has the wrong type, expected '{expected}' ({reason})")]
    TypeMismatch {
        requirement: String,
        expected: String,
        reason: String,
    },

    #[error("Value for '{requirement}' was rejected: {reason}")]
    Rejected { requirement: String, reason: String },

    #[error("Validator for '{requirement}' panicked: {message}")]
    ValidatorPanicked { requirement: String, message: String },

    #[error("Item {index} of '{requirement}' is invalid")]
    Item {
        requirement: String,
        index: usize,
        #[source]
        error: Box<ValidationError>,
    },

    #[error("'{requirement}' depends on {} which were not supplied", .missing.join(", "))]
    DependencyMissing {
        requirement: String,
        missing: Vec<String>,
    },

    #[error("'{requirement}' is not part of the requirement set")]
    UnknownRequirement { requirement: String },
}

impl ValidationError {
    /// Name of the requirement this error is attributed to
    #[must_use]
    pub fn requirement(&self) -> &str {
        match self {
            ValidationError::MissingRequired { requirement }
            | ValidationError::NotScalar { requirement, .. }
            | ValidationError::BelowRange { requirement, .. }
            | ValidationError::AboveRange { requirement, .. }
            | ValidationError::TypeMismatch { requirement, .. }
            | ValidationError::Rejected { requirement, .. }
            | ValidationError::ValidatorPanicked { requirement, .. }
            | ValidationError::Item { requirement, .. }
            | ValidationError::DependencyMissing { requirement, .. }
            | ValidationError::UnknownRequirement { requirement } => requirement,
        }
    }

    /// Check if this is an arity (below/above range or scalar count) error
    #[must_use]
    pub fn is_arity_error(&self) -> bool {
        matches!(
            self,
            ValidationError::NotScalar { .. }
                | ValidationError::BelowRange { .. }
                | ValidationError::AboveRange { .. }
        )
    }
}

// =============================================================================
// Relational Conflict Error
// =============================================================================

/// Mutually exclusive requirements were supplied together
///
/// Carries the requirement under consideration and the complete set of other
/// supplied requirements it conflicts with.
#[derive(Error, Debug, Clone)]
#[error(
    "Requirement '{}' conflicts with supplied requirement(s): {}",
    .requirement.name(),
    join_names(.conflicting)
)]
pub struct ConflictError {
    requirement: Arc<Requirement>,
    conflicting: Vec<Arc<Requirement>>,
}

impl ConflictError {
    pub(crate) fn new(requirement: Arc<Requirement>, conflicting: Vec<Arc<Requirement>>) -> Self {
        Self {
            requirement,
            conflicting,
        }
    }

    /// The requirement that had a conflict
    #[must_use]
    pub fn requirement(&self) -> &Arc<Requirement> {
        &self.requirement
    }

    /// Every supplied requirement in conflict with [`Self::requirement`]
    #[must_use]
    pub fn conflicting(&self) -> &[Arc<Requirement>] {
        &self.conflicting
    }

    /// Names of the conflicting requirements, in graph order
    #[must_use]
    pub fn conflicting_names(&self) -> Vec<&str> {
        self.conflicting.iter().map(|r| r.name()).collect()
    }
}

fn join_names(requirements: &[Arc<Requirement>]) -> String {
    requirements
        .iter()
        .map(|r| r.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let misuse = Error::RelationExists {
            primary: "a".into(),
            secondary: "b".into(),
        };
        assert!(misuse.is_builder_misuse());
        assert!(!misuse.is_argument_error());

        let argument = Error::IllegalRelation(Relation::None);
        assert!(argument.is_argument_error());
        assert!(!argument.is_builder_misuse());
    }

    #[test]
    fn test_merge_conflict_message() {
        let err = Error::MergeConflict {
            duplicates: vec![("x".into(), "y".into()), ("y".into(), "z".into())],
        };
        assert_eq!(
            err.to_string(),
            "Merge would duplicate 2 existing relationship(s)"
        );
    }

    #[test]
    fn test_validation_error_serialization() {
        let err = ValidationError::BelowRange {
            requirement: "tags".into(),
            minimum: 2,
            count: 1,
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "below_range");
        assert_eq!(json["minimum"], 2);
        assert_eq!(err.requirement(), "tags");
        assert!(err.is_arity_error());
    }

    #[test]
    fn test_dependency_missing_message() {
        let err = ValidationError::DependencyMissing {
            requirement: "password".into(),
            missing: vec!["username".into(), "website".into()],
        };
        assert_eq!(
            err.to_string(),
            "'password' depends on username, website which were not supplied"
        );
    }
}
