//! Relation Graph Integration Tests
//!
//! - Symmetric storage of relations and their inverses
//! - Duplicate detection from either direction
//! - Batch and merge atomicity
//! - Frozen graphs are independent of their builder

mod common;

use common::{Schema, builder_with, requirement};
use configurables::{Error, Relation, RelationGraphBuilder};

// =============================================================================
// Symmetry
// =============================================================================

#[test]
fn test_every_edge_has_its_inverse() {
    let schema = Schema::new();
    let graph = schema.graph();

    for (primary, secondary, relation) in graph.edges() {
        assert_eq!(
            graph.relation(secondary, primary),
            relation.inverse().unwrap(),
            "{} -> {} has no inverse",
            primary.name(),
            secondary.name()
        );
    }
}

#[test]
fn test_declared_relations_are_recorded() {
    let schema = Schema::new();
    let graph = schema.graph();

    assert_eq!(
        graph.relation(&schema.password, &schema.username),
        Relation::DependsOn
    );
    assert_eq!(
        graph.relation(&schema.username, &schema.password),
        Relation::RequiredBy
    );
    assert_eq!(
        graph.relation(&schema.anonymous, &schema.key_file),
        Relation::Exclusive
    );
    assert_eq!(
        graph.relation(&schema.key_file, &schema.anonymous),
        Relation::Exclusive
    );
    assert_eq!(graph.relation(&schema.website, &schema.tags), Relation::None);

    let dependents: Vec<_> = graph
        .dependents_of(&schema.username)
        .map(|r| r.name())
        .collect();
    assert_eq!(dependents, vec!["password", "key_file"]);
}

#[test]
fn test_graph_counts_participating_requirements() {
    let schema = Schema::new();
    let graph = schema.graph();

    // website and tags take part in no relation
    assert_eq!(graph.count(), 4);
    // Each relation is stored in both directions
    assert_eq!(graph.edge_count(), 8);
    assert!(!graph.contains(&schema.website));
    assert!(graph.contains(&schema.anonymous));
}

// =============================================================================
// Duplicates
// =============================================================================

#[test]
fn test_duplicate_in_same_direction() {
    let a = requirement("a");
    let b = requirement("b");
    let builder = builder_with(&[(&a, &b, Relation::DependsOn)]);

    let err = builder.add(&a, &b, Relation::DependsOn).unwrap_err();
    assert!(err.is_builder_misuse());
}

#[test]
fn test_duplicate_in_reverse_direction() {
    let a = requirement("a");
    let b = requirement("b");
    let builder = builder_with(&[(&a, &b, Relation::DependsOn)]);

    // Even the matching inverse counts as a second relation
    let err = builder.add(&b, &a, Relation::RequiredBy).unwrap_err();
    assert_eq!(
        err,
        Error::RelationExists {
            primary: "b".into(),
            secondary: "a".into()
        }
    );
    assert!(builder.add(&b, &a, Relation::Exclusive).is_err());
    assert_eq!(builder.build().edge_count(), 2);
}

#[test]
fn test_illegal_arguments() {
    let a = requirement("a");
    let b = requirement("b");
    let builder = RelationGraphBuilder::new();

    let err = builder.add(&a, &b, Relation::None).unwrap_err();
    assert!(err.is_argument_error());

    let err = builder.add(&a, &a, Relation::Exclusive).unwrap_err();
    assert_eq!(err, Error::SelfRelation("a".into()));

    assert!(builder.is_empty());
}

#[test]
fn test_add_all_is_atomic() {
    let a = requirement("a");
    let b = requirement("b");
    let c = requirement("c");
    let builder = builder_with(&[(&b, &c, Relation::Exclusive)]);

    // Second entry repeats the first pair within the batch
    let result = builder.add_all(
        &a,
        [
            (b.clone(), Relation::DependsOn),
            (b.clone(), Relation::Exclusive),
        ],
    );
    assert!(result.is_err());
    assert_eq!(builder.build().relation(&a, &b), Relation::None);

    builder
        .add_all(
            &a,
            [
                (b.clone(), Relation::DependsOn),
                (c.clone(), Relation::DependsOn),
            ],
        )
        .unwrap();
    let graph = builder.build();
    assert_eq!(graph.count(), 3);
    assert_eq!(graph.relation(&c, &a), Relation::RequiredBy);
}

// =============================================================================
// Merge
// =============================================================================

#[test]
fn test_merge_then_remerge_fails() {
    let a = requirement("a");
    let b = requirement("b");
    let c = requirement("c");
    let d = requirement("d");
    let e = requirement("e");

    // builder2 holds X and Y, builder1 holds Z
    let builder2 = builder_with(&[
        (&a, &b, Relation::DependsOn),
        (&c, &d, Relation::Exclusive),
    ]);
    let builder1 = builder_with(&[(&e, &a, Relation::RequiredBy)]);

    builder1.merge(&builder2).unwrap();
    let merged = builder1.build();
    assert_eq!(merged.edge_count(), 6);
    assert_eq!(merged.relation(&b, &a), Relation::RequiredBy);
    assert_eq!(merged.relation(&d, &c), Relation::Exclusive);
    assert_eq!(merged.relation(&a, &e), Relation::DependsOn);

    let err = builder1.merge(&builder2).unwrap_err();
    assert!(err.is_builder_misuse());
    assert_eq!(
        err,
        Error::MergeConflict {
            duplicates: vec![("a".into(), "b".into()), ("c".into(), "d".into())]
        }
    );

    // Nothing changed on failure, and the source is untouched
    let after = builder1.build();
    assert_eq!(after.edge_count(), merged.edge_count());
    assert_eq!(after.count(), 5);
    assert_eq!(builder2.build().edge_count(), 4);
}

#[test]
fn test_partial_overlap_merges_nothing() {
    let a = requirement("a");
    let b = requirement("b");
    let c = requirement("c");

    let source = builder_with(&[
        (&a, &b, Relation::DependsOn),
        (&b, &c, Relation::DependsOn),
    ]);
    let target = builder_with(&[(&b, &a, Relation::Exclusive)]);

    let err = target.merge(&source).unwrap_err();
    assert!(matches!(err, Error::MergeConflict { ref duplicates } if duplicates.len() == 1));

    let graph = target.build();
    assert_eq!(graph.relation(&b, &c), Relation::None);
    assert_eq!(graph.relation(&a, &b), Relation::Exclusive);
}

#[test]
fn test_merge_into_self_rejected() {
    let builder = RelationGraphBuilder::new();
    assert_eq!(builder.merge(&builder).unwrap_err(), Error::SelfMerge);
}

// =============================================================================
// Frozen Graphs
// =============================================================================

#[test]
fn test_graph_unaffected_by_later_changes() {
    let a = requirement("a");
    let b = requirement("b");
    let c = requirement("c");
    let builder = builder_with(&[(&a, &b, Relation::DependsOn)]);

    let graph = builder.build();
    builder.add(&a, &c, Relation::Exclusive).unwrap();
    builder.clear();

    assert_eq!(graph.count(), 2);
    assert_eq!(graph.relation(&a, &c), Relation::None);
    assert!(builder.is_empty());
}
