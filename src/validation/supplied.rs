//! Values presented for validation

use crate::requirement::{Requirement, RequirementId};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Entry {
    requirement: Arc<Requirement>,
    values: Vec<Value>,
}

/// Mapping from requirement to zero or more supplied values
///
/// A requirement counts as supplied as soon as it has an entry, even an empty
/// one; this lets a collection requirement be supplied with zero items.
///
/// # Example
///
/// ```
/// use configurables::{Requirement, SuppliedValues};
/// use serde_json::json;
///
/// let host = Requirement::string("host", "Server host").build()?;
/// let mut supplied = SuppliedValues::new();
/// supplied.insert(&host, json!("localhost"));
///
/// assert!(supplied.contains(&host));
/// assert_eq!(supplied.values(&host), Some(&[json!("localhost")][..]));
/// # Ok::<(), configurables::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SuppliedValues {
    entries: BTreeMap<RequirementId, Entry>,
}

impl SuppliedValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value for `requirement`
    pub fn insert(
        &mut self,
        requirement: &Arc<Requirement>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.entry(requirement).values.push(value.into());
        self
    }

    /// Append several values for `requirement`, marking it supplied even when empty
    pub fn insert_many<I, V>(&mut self, requirement: &Arc<Requirement>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.entry(requirement)
            .values
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// By-value variant of [`Self::insert`] for building inline
    #[must_use]
    pub fn with(mut self, requirement: &Arc<Requirement>, value: impl Into<Value>) -> Self {
        self.insert(requirement, value);
        self
    }

    fn entry(&mut self, requirement: &Arc<Requirement>) -> &mut Entry {
        self.entries
            .entry(requirement.id())
            .or_insert_with(|| Entry {
                requirement: Arc::clone(requirement),
                values: Vec::new(),
            })
    }

    /// Forget everything supplied for `requirement`
    pub fn remove(&mut self, requirement: &Requirement) -> Option<Vec<Value>> {
        self.entries.remove(&requirement.id()).map(|e| e.values)
    }

    #[must_use]
    pub fn contains(&self, requirement: &Requirement) -> bool {
        self.entries.contains_key(&requirement.id())
    }

    #[must_use]
    pub fn values(&self, requirement: &Requirement) -> Option<&[Value]> {
        self.entries
            .get(&requirement.id())
            .map(|e| e.values.as_slice())
    }

    /// Supplied requirements in construction order
    pub fn requirements(&self) -> impl Iterator<Item = &Arc<Requirement>> {
        self.entries.values().map(|e| &e.requirement)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Arc<Requirement>, &[Value])> {
        self.entries
            .values()
            .map(|e| (&e.requirement, e.values.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
