//! Symmetric adjacency storage and the frozen relation graph

use super::relation::Relation;
use crate::error::{Error, Result};
use crate::requirement::{Requirement, RequirementId};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Id-indexed adjacency shared by the builder and the graph.
///
/// Invariant: `edges[a][b] == r` if and only if `edges[b][a] == r.inverse()`,
/// and every id appearing in `edges` has an entry in `nodes`.
#[derive(Debug, Clone, Default)]
pub(crate) struct Adjacency {
    nodes: BTreeMap<RequirementId, Arc<Requirement>>,
    edges: BTreeMap<RequirementId, BTreeMap<RequirementId, Relation>>,
}

/// Unordered pair key, smaller id first
pub(crate) type PairKey = (RequirementId, RequirementId);

pub(crate) fn pair_key(a: &Requirement, b: &Requirement) -> PairKey {
    if a.id() <= b.id() {
        (a.id(), b.id())
    } else {
        (b.id(), a.id())
    }
}

impl Adjacency {
    pub(crate) fn relation(
        &self,
        primary: RequirementId,
        secondary: RequirementId,
    ) -> Option<Relation> {
        self.edges
            .get(&primary)
            .and_then(|targets| targets.get(&secondary))
            .copied()
    }

    /// Check a single edge against current state and edges staged in the same batch.
    pub(crate) fn check(
        &self,
        primary: &Requirement,
        secondary: &Requirement,
        relation: Relation,
        staged: &BTreeSet<PairKey>,
    ) -> Result<()> {
        if !relation.is_storable() {
            return Err(Error::IllegalRelation(relation));
        }
        if primary.id() == secondary.id() {
            return Err(Error::SelfRelation(primary.name().to_string()));
        }
        // The reverse direction is always present too, so one lookup covers both
        if self.relation(primary.id(), secondary.id()).is_some()
            || staged.contains(&pair_key(primary, secondary))
        {
            return Err(Error::RelationExists {
                primary: primary.name().to_string(),
                secondary: secondary.name().to_string(),
            });
        }
        Ok(())
    }

    /// Insert both directions of an edge that already passed [`Self::check`].
    pub(crate) fn insert(
        &mut self,
        primary: &Arc<Requirement>,
        secondary: &Arc<Requirement>,
        relation: Relation,
    ) -> Result<()> {
        let inverse = relation.inverse()?;

        self.nodes
            .entry(primary.id())
            .or_insert_with(|| Arc::clone(primary));
        self.nodes
            .entry(secondary.id())
            .or_insert_with(|| Arc::clone(secondary));

        self.edges
            .entry(primary.id())
            .or_default()
            .insert(secondary.id(), relation);
        self.edges
            .entry(secondary.id())
            .or_default()
            .insert(primary.id(), inverse);

        Ok(())
    }

    /// Each undirected edge once, as stored from its lower-id end.
    pub(crate) fn pairs(
        &self,
    ) -> impl Iterator<Item = (&Arc<Requirement>, &Arc<Requirement>, Relation)> {
        self.edges.iter().flat_map(move |(primary, targets)| {
            targets
                .iter()
                .filter(move |(secondary, _)| primary < *secondary)
                .filter_map(move |(secondary, relation)| {
                    let a = self.nodes.get(primary)?;
                    let b = self.nodes.get(secondary)?;
                    Some((a, b, *relation))
                })
        })
    }

    pub(crate) fn neighbours(
        &self,
        primary: RequirementId,
    ) -> impl Iterator<Item = (&Arc<Requirement>, Relation)> {
        self.edges
            .get(&primary)
            .into_iter()
            .flat_map(move |targets| {
                targets
                    .iter()
                    .filter_map(move |(id, relation)| self.nodes.get(id).map(|r| (r, *relation)))
            })
    }

    pub(crate) fn nodes(&self) -> impl Iterator<Item = &Arc<Requirement>> {
        self.nodes.values()
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    pub(crate) fn contains(&self, id: RequirementId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}

// =============================================================================
// Relation Graph
// =============================================================================

/// Immutable snapshot of the relations between requirements
///
/// Produced by [`RelationGraphBuilder::build`](super::RelationGraphBuilder::build).
/// Symmetric: if `a` depends on `b`, then `b` is required by `a`. Safe to
/// share between threads and read without locking.
#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    adjacency: Adjacency,
}

impl RelationGraph {
    pub(crate) fn from_adjacency(adjacency: Adjacency) -> Self {
        Self { adjacency }
    }

    /// The relation recorded from `primary` to `secondary`, or [`Relation::None`]
    #[must_use]
    pub fn relation(&self, primary: &Requirement, secondary: &Requirement) -> Relation {
        self.adjacency
            .relation(primary.id(), secondary.id())
            .unwrap_or(Relation::None)
    }

    /// Every requirement related to `primary`, with the relation seen from `primary`
    pub fn relations_of(
        &self,
        primary: &Requirement,
    ) -> impl Iterator<Item = (&Arc<Requirement>, Relation)> {
        self.adjacency.neighbours(primary.id())
    }

    /// Requirements `primary` depends on
    pub fn dependencies_of(
        &self,
        primary: &Requirement,
    ) -> impl Iterator<Item = &Arc<Requirement>> {
        self.related(primary, Relation::DependsOn)
    }

    /// Requirements that depend on `primary`
    pub fn dependents_of(&self, primary: &Requirement) -> impl Iterator<Item = &Arc<Requirement>> {
        self.related(primary, Relation::RequiredBy)
    }

    /// Requirements that must not be supplied alongside `primary`
    pub fn exclusions_of(&self, primary: &Requirement) -> impl Iterator<Item = &Arc<Requirement>> {
        self.related(primary, Relation::Exclusive)
    }

    fn related(
        &self,
        primary: &Requirement,
        kind: Relation,
    ) -> impl Iterator<Item = &Arc<Requirement>> {
        self.relations_of(primary)
            .filter(move |(_, relation)| *relation == kind)
            .map(|(requirement, _)| requirement)
    }

    /// Requirements that take part in at least one relation
    pub fn requirements(&self) -> impl Iterator<Item = &Arc<Requirement>> {
        self.adjacency.nodes()
    }

    /// Each relation once, from its lower-id end
    pub fn edges(&self) -> impl Iterator<Item = (&Arc<Requirement>, &Arc<Requirement>, Relation)> {
        self.adjacency.pairs()
    }

    #[must_use]
    pub fn contains(&self, requirement: &Requirement) -> bool {
        self.adjacency.contains(requirement.id())
    }

    /// Number of requirements that are graph nodes
    #[must_use]
    pub fn count(&self) -> usize {
        self.adjacency.node_count()
    }

    /// Number of directed entries (twice the number of relations)
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.node_count() == 0
    }
}
