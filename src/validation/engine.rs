//! The validation engine
//!
//! Field-level checks and relational checks report differently:
//!
//! - [`ValidationEngine::validate_requirement`] returns an optional
//!   [`ValidationError`] that the caller collects alongside the others.
//! - [`ValidationEngine::validate_relations`] returns `Err(ConflictError)` as
//!   soon as a requirement is found supplied together with exclusive partners,
//!   naming all of them, and skips that requirement's remaining checks.
//!
//! [`ValidationEngine::run`] does both for a whole value set and gathers the
//! results into a [`ValidationReport`].

use super::options::ValidationOptions;
use super::report::ValidationReport;
use super::supplied::SuppliedValues;
use crate::error::{ConflictError, ValidationError};
use crate::relations::RelationGraph;
use crate::requirement::{Requirement, RequirementSet};
use std::sync::Arc;

/// Validates supplied values against requirements and their relations
///
/// Holds only shared references to immutable data, so one engine can serve
/// many validation calls, from many threads.
///
/// # Example
///
/// ```
/// use configurables::{
///     Relation, RelationGraphBuilder, Requirement, RequirementSet, SuppliedValues,
///     ValidationEngine,
/// };
/// use serde_json::json;
///
/// let username = Requirement::string("username", "Login name").build()?;
/// let anonymous = Requirement::boolean("anonymous", "Skip login").optional().build()?;
///
/// let builder = RelationGraphBuilder::new();
/// builder.add(&username, &anonymous, Relation::Exclusive)?;
/// let graph = builder.build();
/// let requirements = RequirementSet::from_requirements([&username, &anonymous])?;
///
/// let engine = ValidationEngine::new(&requirements, &graph);
/// let supplied = SuppliedValues::new()
///     .with(&username, json!("admin"))
///     .with(&anonymous, json!(true));
///
/// // Field-level checks pass
/// assert!(engine.validate_requirement(&username, &supplied).is_none());
///
/// // The relational check reports the conflict
/// let conflict = engine.validate_relations(&username, &supplied).unwrap_err();
/// assert_eq!(conflict.conflicting_names(), vec!["anonymous"]);
/// # Ok::<(), configurables::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ValidationEngine<'a> {
    requirements: &'a RequirementSet,
    graph: &'a RelationGraph,
    options: ValidationOptions,
}

impl<'a> ValidationEngine<'a> {
    /// Create an engine with default options
    #[must_use]
    pub fn new(requirements: &'a RequirementSet, graph: &'a RelationGraph) -> Self {
        Self {
            requirements,
            graph,
            options: ValidationOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    // =========================================================================
    // Per-requirement checks
    // =========================================================================

    /// Check the values supplied for one requirement.
    ///
    /// - absent and required: [`ValidationError::MissingRequired`]
    /// - absent and optional: nothing
    /// - scalar with other than one value: [`ValidationError::NotScalar`]
    /// - collection out of its arity: [`ValidationError::BelowRange`] /
    ///   [`ValidationError::AboveRange`]
    /// - otherwise the first value failing [`Requirement::validate`]; for
    ///   collections wrapped in [`ValidationError::Item`]
    #[must_use]
    pub fn validate_requirement(
        &self,
        requirement: &Requirement,
        supplied: &SuppliedValues,
    ) -> Option<ValidationError> {
        self.check_requirement(requirement, supplied, true)
            .into_iter()
            .next()
    }

    fn check_requirement(
        &self,
        requirement: &Requirement,
        supplied: &SuppliedValues,
        first_only: bool,
    ) -> Vec<ValidationError> {
        let name = || requirement.name().to_string();

        let Some(values) = supplied.values(requirement) else {
            if requirement.is_optional() {
                return Vec::new();
            }
            return vec![ValidationError::MissingRequired {
                requirement: name(),
            }];
        };

        let count = values.len();
        let mut errors = Vec::new();

        match requirement.collection() {
            None if count != 1 => {
                // Nothing sensible to validate item by item
                return vec![ValidationError::NotScalar {
                    requirement: name(),
                    count,
                }];
            }
            None => {}
            Some(info) => {
                if info.is_below_range(count) {
                    errors.push(ValidationError::BelowRange {
                        requirement: name(),
                        minimum: info.minimum().unwrap_or_default(),
                        count,
                    });
                } else if info.is_above_range(count) {
                    errors.push(ValidationError::AboveRange {
                        requirement: name(),
                        maximum: info.maximum().unwrap_or_default(),
                        count,
                    });
                }
                if first_only && !errors.is_empty() {
                    return errors;
                }
            }
        }

        for (index, value) in values.iter().enumerate() {
            log::trace!("Validating item {index} of '{}'", requirement.name());

            let Some(error) = requirement.validate(value) else {
                continue;
            };

            errors.push(if requirement.is_collection() {
                ValidationError::Item {
                    requirement: name(),
                    index,
                    error: Box::new(error),
                }
            } else {
                error
            });

            if first_only {
                break;
            }
        }

        errors
    }

    // =========================================================================
    // Relational checks
    // =========================================================================

    /// Check the relations of one supplied requirement.
    ///
    /// Returns `Ok(None)` when the requirement is not supplied or all its
    /// relations hold, and `Ok(Some(DependencyMissing))` naming every
    /// dependency that was not supplied.
    ///
    /// # Errors
    ///
    /// Returns a [`ConflictError`] carrying every supplied member of the
    /// requirement set that is exclusive with `requirement`. Supplied values
    /// for requirements outside the set never conflict. Dependencies are not
    /// checked when a conflict is found.
    pub fn validate_relations(
        &self,
        requirement: &Arc<Requirement>,
        supplied: &SuppliedValues,
    ) -> Result<Option<ValidationError>, ConflictError> {
        if !supplied.contains(requirement) {
            return Ok(None);
        }

        let conflicting: Vec<Arc<Requirement>> = self
            .graph
            .exclusions_of(requirement)
            .filter(|other| self.requirements.contains(other) && supplied.contains(other))
            .cloned()
            .collect();

        if !conflicting.is_empty() {
            return Err(ConflictError::new(Arc::clone(requirement), conflicting));
        }

        let missing: Vec<String> = self
            .graph
            .dependencies_of(requirement)
            .filter(|dependency| !supplied.contains(dependency))
            .map(|dependency| dependency.name().to_string())
            .collect();

        if missing.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ValidationError::DependencyMissing {
                requirement: requirement.name().to_string(),
                missing,
            }))
        }
    }

    // =========================================================================
    // Full pass
    // =========================================================================

    /// Validate a whole value set.
    ///
    /// Runs every per-requirement check over the requirement set first, then
    /// the relational checks for each supplied requirement, catching conflicts
    /// into [`ValidationReport::conflicts`] without discarding field errors.
    #[must_use]
    pub fn run(&self, supplied: &SuppliedValues) -> ValidationReport {
        let first_only = !self.options.report_every_item;
        let mut report = ValidationReport::default();

        for requirement in self.requirements.iter() {
            report
                .errors
                .extend(self.check_requirement(requirement, supplied, first_only));
        }

        let (known, unknown): (Vec<_>, Vec<_>) = supplied
            .requirements()
            .partition(|r| self.requirements.contains(r));

        if self.options.reject_unknown {
            report
                .errors
                .extend(unknown.iter().map(|r| ValidationError::UnknownRequirement {
                    requirement: r.name().to_string(),
                }));
        }

        for requirement in known {
            match self.validate_relations(requirement, supplied) {
                Ok(None) => {}
                Ok(Some(error)) => report.errors.push(error),
                Err(conflict) => {
                    log::debug!("{conflict}");
                    report.conflicts.push(conflict);
                }
            }
        }

        log::debug!(
            "Validated {} supplied requirement(s): {} error(s), {} conflict(s)",
            supplied.len(),
            report.errors.len(),
            report.conflicts.len()
        );
        report
    }
}
