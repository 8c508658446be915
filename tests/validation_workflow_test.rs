//! Validation Workflow Integration Tests
//!
//! Full passes over a realistic schema:
//! - Exclusive requirements supplied together
//! - Dependencies on optional and required requirements
//! - Collection arity and per-item validation
//! - Validators that misbehave

mod common;

use common::{Schema, builder_with, requirement};
use configurables::{
    Relation, Requirement, RequirementSet, SuppliedValues, ValidationEngine, ValidationError,
    ValidationOptions,
};
use serde_json::json;

// =============================================================================
// Happy Path
// =============================================================================

#[test]
fn test_complete_login_is_valid() {
    let schema = Schema::new();
    let requirements = schema.requirement_set();
    let graph = schema.graph();
    let engine = ValidationEngine::new(&requirements, &graph);

    let mut supplied = SuppliedValues::new();
    supplied
        .insert(&schema.website, "https://example.com")
        .insert(&schema.username, "admin")
        .insert(&schema.password, "hunter2")
        .insert_many(&schema.tags, ["news", "weekly"]);

    let report = engine.run(&supplied);
    assert!(report.is_valid(), "{report}");
}

#[test]
fn test_anonymous_is_valid_alone() {
    let schema = Schema::new();
    let requirements = schema.requirement_set();
    let graph = schema.graph();
    let engine = ValidationEngine::new(&requirements, &graph);

    let supplied = SuppliedValues::new()
        .with(&schema.website, "https://example.com")
        .with(&schema.anonymous, true);

    assert!(engine.run(&supplied).is_valid());
}

// =============================================================================
// Exclusivity
// =============================================================================

#[test]
fn test_exclusive_pair_conflicts_from_both_sides() {
    let a = requirement("a");
    let b = requirement("b");
    let builder = builder_with(&[(&a, &b, Relation::Exclusive)]);
    let graph = builder.build();
    let requirements = RequirementSet::from_requirements([&a, &b]).unwrap();
    let engine = ValidationEngine::new(&requirements, &graph);

    let supplied = SuppliedValues::new().with(&a, "x").with(&b, "y");

    let conflict = engine.validate_relations(&a, &supplied).unwrap_err();
    assert_eq!(conflict.requirement().name(), "a");
    assert_eq!(conflict.conflicting_names(), vec!["b"]);

    let conflict = engine.validate_relations(&b, &supplied).unwrap_err();
    assert_eq!(conflict.requirement().name(), "b");
    assert_eq!(conflict.conflicting_names(), vec!["a"]);

    let report = engine.run(&supplied);
    assert_eq!(report.conflicts().len(), 2);
    assert!(report.errors().is_empty());
}

#[test]
fn test_conflict_names_every_partner() {
    let schema = Schema::new();
    let requirements = schema.requirement_set();
    let graph = schema.graph();
    let engine = ValidationEngine::new(&requirements, &graph);

    let supplied = SuppliedValues::new()
        .with(&schema.website, "https://example.com")
        .with(&schema.username, "admin")
        .with(&schema.key_file, "/home/admin/.ssh/id_ed25519")
        .with(&schema.anonymous, true);

    let conflict = engine
        .validate_relations(&schema.anonymous, &supplied)
        .unwrap_err();
    assert_eq!(conflict.conflicting_names(), vec!["username", "key_file"]);
    assert!(conflict.to_string().contains("username, key_file"));

    let report = engine.run(&supplied);
    // anonymous, username and key_file each see a conflict
    assert_eq!(report.conflicts().len(), 3);
}

#[test]
fn test_conflicts_do_not_hide_field_errors() {
    let schema = Schema::new();
    let requirements = schema.requirement_set();
    let graph = schema.graph();
    let engine = ValidationEngine::new(&requirements, &graph);

    let supplied = SuppliedValues::new()
        .with(&schema.website, "not a uri")
        .with(&schema.username, "admin")
        .with(&schema.anonymous, true);

    let report = engine.run(&supplied);
    assert_eq!(report.conflicts().len(), 2);
    assert!(matches!(
        report.errors(),
        [ValidationError::TypeMismatch { requirement, .. }] if requirement == "website"
    ));
    assert_eq!(report.problem_count(), 3);
}

// =============================================================================
// Dependencies
// =============================================================================

#[test]
fn test_dependency_on_optional_requirement() {
    let schema = Schema::new();
    let requirements = schema.requirement_set();
    let graph = schema.graph();
    let engine = ValidationEngine::new(&requirements, &graph);

    // username is optional on its own, but password needs it
    let supplied = SuppliedValues::new()
        .with(&schema.website, "https://example.com")
        .with(&schema.password, "hunter2");

    assert!(
        engine
            .validate_requirement(&schema.username, &supplied)
            .is_none()
    );
    assert_eq!(
        engine.validate_relations(&schema.password, &supplied).unwrap(),
        Some(ValidationError::DependencyMissing {
            requirement: "password".into(),
            missing: vec!["username".into()],
        })
    );
    assert_eq!(engine.run(&supplied).problem_count(), 1);
}

#[test]
fn test_dependency_on_required_requirement() {
    let a = Requirement::string("a", "Depends on b").build().unwrap();
    let b = Requirement::string("b", "Always required").build().unwrap();
    let builder = builder_with(&[(&a, &b, Relation::DependsOn)]);
    let graph = builder.build();
    let requirements = RequirementSet::from_requirements([&a, &b]).unwrap();
    let engine = ValidationEngine::new(&requirements, &graph);

    let supplied = SuppliedValues::new().with(&a, "x");
    let report = engine.run(&supplied);

    // Reported both as missing and as an unmet dependency
    assert_eq!(
        report.errors(),
        &[
            ValidationError::MissingRequired {
                requirement: "b".into()
            },
            ValidationError::DependencyMissing {
                requirement: "a".into(),
                missing: vec!["b".into()],
            },
        ]
    );
}

#[test]
fn test_dependency_in_reverse_is_not_enforced() {
    let schema = Schema::new();
    let requirements = schema.requirement_set();
    let graph = schema.graph();
    let engine = ValidationEngine::new(&requirements, &graph);

    // username is required by password, but does not need it
    let supplied = SuppliedValues::new()
        .with(&schema.website, "https://example.com")
        .with(&schema.username, "admin");

    assert!(engine.run(&supplied).is_valid());
}

// =============================================================================
// Collections
// =============================================================================

#[test]
fn test_collection_bounds() {
    let schema = Schema::new();
    let requirements = schema.requirement_set();
    let graph = schema.graph();
    let engine = ValidationEngine::new(&requirements, &graph);

    let mut supplied = SuppliedValues::new();
    supplied.insert_many(&schema.tags, Vec::<&str>::new());
    assert_eq!(
        engine.validate_requirement(&schema.tags, &supplied),
        Some(ValidationError::BelowRange {
            requirement: "tags".into(),
            minimum: 1,
            count: 0
        })
    );

    supplied.insert_many(&schema.tags, ["a", "b", "c", "d"]);
    assert_eq!(
        engine.validate_requirement(&schema.tags, &supplied),
        Some(ValidationError::AboveRange {
            requirement: "tags".into(),
            maximum: 3,
            count: 4
        })
    );

    supplied.remove(&schema.tags);
    supplied.insert_many(&schema.tags, ["a", "b", "c"]);
    assert!(
        engine
            .validate_requirement(&schema.tags, &supplied)
            .is_none()
    );
}

#[test]
fn test_bad_items_reported() {
    let schema = Schema::new();
    let requirements = schema.requirement_set();
    let graph = schema.graph();

    let mut supplied = SuppliedValues::new();
    supplied
        .insert(&schema.website, "https://example.com")
        .insert_many(&schema.tags, [json!("ok"), json!(" "), json!(7)]);

    let first_only = ValidationEngine::new(&requirements, &graph).run(&supplied);
    assert_eq!(first_only.errors().len(), 1);
    assert!(matches!(
        &first_only.errors()[0],
        ValidationError::Item { index: 1, error, .. }
            if matches!(**error, ValidationError::Rejected { .. })
    ));

    let every_item = ValidationEngine::new(&requirements, &graph)
        .with_options(ValidationOptions::builder().report_every_item().build())
        .run(&supplied);
    let indices: Vec<_> = every_item
        .errors()
        .iter()
        .filter_map(|e| match e {
            ValidationError::Item { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(indices, vec![1, 2]);
}

#[test]
fn test_scalar_given_many_values() {
    let schema = Schema::new();
    let requirements = schema.requirement_set();
    let graph = schema.graph();
    let engine = ValidationEngine::new(&requirements, &graph);

    let mut supplied = SuppliedValues::new();
    supplied.insert_many(&schema.website, ["https://a.example", "https://b.example"]);

    let error = engine
        .validate_requirement(&schema.website, &supplied)
        .unwrap();
    assert!(error.is_arity_error());
}

// =============================================================================
// Misbehaving Validators
// =============================================================================

#[test]
fn test_panicking_validator_is_contained() {
    let fragile = Requirement::int32("port", "Listening port")
        .validator(|v| {
            let port = v.as_i64().unwrap_or_default();
            assert!(port > 0, "port must be positive");
            Ok(())
        })
        .build()
        .unwrap();
    let builder = builder_with(&[]);
    let graph = builder.build();
    let requirements = RequirementSet::from_requirements([&fragile]).unwrap();
    let engine = ValidationEngine::new(&requirements, &graph);

    let supplied = SuppliedValues::new().with(&fragile, -1);
    match engine.validate_requirement(&fragile, &supplied) {
        Some(ValidationError::ValidatorPanicked { requirement, message }) => {
            assert_eq!(requirement, "port");
            assert!(message.contains("port must be positive"));
        }
        other => panic!("unexpected result: {other:?}"),
    }

    // The engine is still usable afterwards
    let supplied = SuppliedValues::new().with(&fragile, 8080);
    assert!(engine.run(&supplied).is_valid());
}

#[test]
fn test_type_checked_before_validator() {
    let strict = Requirement::int32("retries", "Retry count")
        .validator(|_| Err("validator should not run".to_string()))
        .build()
        .unwrap();
    let graph = builder_with(&[]).build();
    let requirements = RequirementSet::from_requirements([&strict]).unwrap();
    let engine = ValidationEngine::new(&requirements, &graph);

    let supplied = SuppliedValues::new().with(&strict, "three");
    assert!(matches!(
        engine.validate_requirement(&strict, &supplied),
        Some(ValidationError::TypeMismatch { .. })
    ));
}

// =============================================================================
// Reports
// =============================================================================

#[test]
fn test_report_serializes_errors() {
    let schema = Schema::new();
    let requirements = schema.requirement_set();
    let graph = schema.graph();
    let engine = ValidationEngine::new(&requirements, &graph);

    let report = engine.run(&SuppliedValues::new());
    let errors = serde_json::to_value(report.errors()).unwrap();

    assert_eq!(
        errors,
        json!([{ "kind": "missing_required", "requirement": "website" }])
    );
    assert!(report.to_string().starts_with("1 problem(s) found:"));
}
