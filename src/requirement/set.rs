//! Ordered set of requirements keyed by identity

use super::descriptor::{Requirement, RequirementId};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The requirements a validation engine knows about
///
/// Iteration follows construction order of the requirements (their ids),
/// which keeps validation reports deterministic.
#[derive(Debug, Clone, Default)]
pub struct RequirementSet {
    items: BTreeMap<RequirementId, Arc<Requirement>>,
}

impl RequirementSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from requirements, rejecting the same instance twice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRequirement`] on a repeated instance.
    pub fn from_requirements<'a, I>(requirements: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Arc<Requirement>>,
    {
        let mut set = Self::new();
        for requirement in requirements {
            set.insert(requirement)?;
        }
        Ok(set)
    }

    /// Add a requirement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRequirement`] if this instance is already present.
    /// A different instance with the same name is accepted.
    pub fn insert(&mut self, requirement: &Arc<Requirement>) -> Result<()> {
        if self.items.contains_key(&requirement.id()) {
            return Err(Error::DuplicateRequirement(requirement.name().to_string()));
        }
        self.items.insert(requirement.id(), Arc::clone(requirement));
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, requirement: &Requirement) -> bool {
        self.items.contains_key(&requirement.id())
    }

    #[must_use]
    pub fn get(&self, id: RequirementId) -> Option<&Arc<Requirement>> {
        self.items.get(&id)
    }

    /// All requirements with the given name (names are not unique)
    pub fn find_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Arc<Requirement>> {
        self.items.values().filter(move |r| r.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Requirement>> {
        self.items.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
