//! Aggregated outcome of a validation pass

use crate::error::{ConflictError, ValidationError};
use std::fmt;

/// Every field-level error and relational conflict found in one pass
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub(crate) errors: Vec<ValidationError>,
    pub(crate) conflicts: Vec<ConflictError>,
}

impl ValidationReport {
    /// `true` when nothing was found
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.conflicts.is_empty()
    }

    /// Field-level errors, per-requirement checks first, then dependency violations
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// One conflict per supplied requirement that has exclusive partners supplied
    #[must_use]
    pub fn conflicts(&self) -> &[ConflictError] {
        &self.conflicts
    }

    /// Errors attributed to requirements named `name`
    pub fn errors_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |e| e.requirement() == name)
    }

    #[must_use]
    pub fn problem_count(&self) -> usize {
        self.errors.len() + self.conflicts.len()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return f.write_str("no problems found");
        }
        writeln!(f, "{} problem(s) found:", self.problem_count())?;
        for error in &self.errors {
            writeln!(f, "  - {error}")?;
        }
        for conflict in &self.conflicts {
            writeln!(f, "  - {conflict}")?;
        }
        Ok(())
    }
}
