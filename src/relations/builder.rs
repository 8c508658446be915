//! Thread-safe builder for relation graphs
//!
//! Every operation holds the builder's lock for its full duration, so
//! operations on one builder are linearizable. [`RelationGraphBuilder::merge`]
//! is the only operation touching two builders; it acquires both locks in
//! ascending builder-id order.

use super::graph::{Adjacency, RelationGraph, pair_key};
use super::relation::Relation;
use crate::error::{Error, Result};
use crate::requirement::Requirement;
use crate::sync::{MutexExt, lock_ordered};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

static NEXT_BUILDER_ID: AtomicU64 = AtomicU64::new(1);

/// Mutable accumulator of relations that freezes into a [`RelationGraph`]
///
/// At most one relation may ever be recorded between two requirements,
/// whichever direction it was added from.
///
/// # Example
///
/// ```
/// use configurables::{Relation, RelationGraphBuilder, Requirement};
///
/// let username = Requirement::string("username", "Login name").build()?;
/// let password = Requirement::secure_string("password", "Login secret").build()?;
///
/// let builder = RelationGraphBuilder::new();
/// builder.add(&password, &username, Relation::DependsOn)?;
///
/// let graph = builder.build();
/// assert_eq!(graph.relation(&password, &username), Relation::DependsOn);
/// assert_eq!(graph.relation(&username, &password), Relation::RequiredBy);
///
/// // The pair is taken, from either side
/// assert!(builder.add(&username, &password, Relation::Exclusive).is_err());
/// # Ok::<(), configurables::Error>(())
/// ```
#[derive(Debug)]
pub struct RelationGraphBuilder {
    id: u64,
    state: Mutex<Adjacency>,
}

impl RelationGraphBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_BUILDER_ID.fetch_add(1, Ordering::Relaxed),
            state: Mutex::new(Adjacency::default()),
        }
    }

    /// Process-unique id, used to order lock acquisition during merges
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Record `primary -> secondary: relation` and its inverse.
    ///
    /// # Errors
    ///
    /// - [`Error::IllegalRelation`] for [`Relation::None`]
    /// - [`Error::SelfRelation`] if `primary` and `secondary` are the same instance
    /// - [`Error::RelationExists`] if the pair is already related
    pub fn add(
        &self,
        primary: &Arc<Requirement>,
        secondary: &Arc<Requirement>,
        relation: Relation,
    ) -> Result<&Self> {
        let mut state = self.state.lock_recovered()?;

        state.check(primary, secondary, relation, &BTreeSet::new())?;
        state.insert(primary, secondary, relation)?;

        log::debug!(
            "Builder {}: '{}' {relation} '{}'",
            self.id,
            primary.name(),
            secondary.name()
        );
        Ok(self)
    }

    /// Record several relations from the same primary.
    ///
    /// The whole batch is checked before anything is recorded; if any entry
    /// is invalid the builder is left unchanged.
    ///
    /// # Errors
    ///
    /// The first error [`Self::add`] would report for an entry, including a
    /// pair repeated within the batch.
    pub fn add_all<I>(&self, primary: &Arc<Requirement>, relations: I) -> Result<&Self>
    where
        I: IntoIterator<Item = (Arc<Requirement>, Relation)>,
    {
        let entries: Vec<_> = relations
            .into_iter()
            .map(|(secondary, relation)| (Arc::clone(primary), secondary, relation))
            .collect();

        self.commit_batch(&entries)
    }

    /// Record the relations declared on a requirement.
    ///
    /// Registers `depends_on` entries as [`Relation::DependsOn`] and
    /// `exclusive_with` entries as [`Relation::Exclusive`], atomically.
    ///
    /// # Errors
    ///
    /// Same as [`Self::add_all`].
    pub fn add_declared(&self, requirement: &Arc<Requirement>) -> Result<&Self> {
        let dependencies = requirement
            .depends_on()
            .iter()
            .map(|d| (Arc::clone(d), Relation::DependsOn));
        let exclusions = requirement
            .exclusive_with()
            .iter()
            .map(|e| (Arc::clone(e), Relation::Exclusive));

        self.add_all(requirement, dependencies.chain(exclusions))
    }

    fn commit_batch(
        &self,
        entries: &[(Arc<Requirement>, Arc<Requirement>, Relation)],
    ) -> Result<&Self> {
        let mut state = self.state.lock_recovered()?;

        let mut staged = BTreeSet::new();
        for (primary, secondary, relation) in entries {
            state.check(primary, secondary, *relation, &staged)?;
            staged.insert(pair_key(primary, secondary));
        }

        for (primary, secondary, relation) in entries {
            state.insert(primary, secondary, *relation)?;
        }

        log::debug!("Builder {}: added {} relation(s)", self.id, entries.len());
        Ok(self)
    }

    /// Merge every relation of `other` into this builder.
    ///
    /// Atomic: if any relation of `other` is already present here, every such
    /// pair is reported and nothing is merged. `other` is never modified.
    ///
    /// # Errors
    ///
    /// - [`Error::SelfMerge`] if `other` is this builder
    /// - [`Error::MergeConflict`] listing each already-related pair
    pub fn merge(&self, other: &RelationGraphBuilder) -> Result<&Self> {
        if self.id == other.id {
            return Err(Error::SelfMerge);
        }

        let (mut target, source) =
            lock_ordered((self.id, &self.state), (other.id, &other.state))?;

        let incoming: Vec<_> = source
            .pairs()
            .map(|(a, b, relation)| (Arc::clone(a), Arc::clone(b), relation))
            .collect();
        drop(source);

        let duplicates: Vec<(String, String)> = incoming
            .iter()
            .filter(|(a, b, _)| target.relation(a.id(), b.id()).is_some())
            .map(|(a, b, _)| (a.name().to_string(), b.name().to_string()))
            .collect();

        if !duplicates.is_empty() {
            log::debug!(
                "Builder {}: merge from builder {} rejected, {} duplicate pair(s)",
                self.id,
                other.id,
                duplicates.len()
            );
            return Err(Error::MergeConflict { duplicates });
        }

        for (a, b, relation) in &incoming {
            target.insert(a, b, *relation)?;
        }

        log::debug!(
            "Builder {}: merged {} relation(s) from builder {}",
            self.id,
            incoming.len(),
            other.id
        );
        Ok(self)
    }

    /// Freeze the current relations into an immutable graph.
    ///
    /// The builder stays usable; later changes do not affect the returned graph.
    #[must_use]
    pub fn build(&self) -> RelationGraph {
        let state = self
            .state
            .lock_recovered()
            .map(|s| s.clone())
            .unwrap_or_default();

        log::debug!(
            "Builder {}: froze graph with {} requirement(s)",
            self.id,
            state.node_count()
        );
        RelationGraph::from_adjacency(state)
    }

    /// Remove every relation
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.lock_recovered() {
            state.clear();
        }
    }

    /// Number of requirements taking part in at least one relation
    #[must_use]
    pub fn count(&self) -> usize {
        self.state
            .lock_recovered()
            .map(|s| s.node_count())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

impl Default for RelationGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
