//! Common test utilities for configurables integration tests
//!
//! Provides a shared requirement schema and helper functions.

#![allow(dead_code)]

use configurables::{
    CollectionInfo, Relation, RelationGraph, RelationGraphBuilder, Requirement, RequirementSet,
};
use std::sync::Arc;

/// Enable log output for a test run (`RUST_LOG=debug cargo test`)
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// =============================================================================
// Test Schema
// =============================================================================

/// Requirements of a small publishing tool
///
/// - `username` and `password` go together (`password` depends on `username`)
/// - `key_file` depends on `username` as well
/// - `anonymous` excludes both `username` and `key_file`
/// - `tags` is an optional collection of one to three non-empty labels
pub struct Schema {
    pub website: Arc<Requirement>,
    pub username: Arc<Requirement>,
    pub password: Arc<Requirement>,
    pub key_file: Arc<Requirement>,
    pub anonymous: Arc<Requirement>,
    pub tags: Arc<Requirement>,
}

impl Schema {
    pub fn new() -> Self {
        init_logging();

        let website = Requirement::uri("website", "Site to publish to")
            .build()
            .unwrap();
        let username = Requirement::string("username", "Login name")
            .optional()
            .build()
            .unwrap();
        let password = Requirement::secure_string("password", "Login secret")
            .optional()
            .depends_on(&username)
            .build()
            .unwrap();
        let key_file = Requirement::file_path("key_file", "Private key for login")
            .optional()
            .depends_on(&username)
            .build()
            .unwrap();
        let anonymous = Requirement::boolean("anonymous", "Publish without logging in")
            .optional()
            .exclusive_with(&username)
            .exclusive_with(&key_file)
            .build()
            .unwrap();
        let tags = Requirement::string("tags", "Labels to attach")
            .optional()
            .collection(CollectionInfo::between(1, 3).unwrap())
            .validator(|v| match v.as_str() {
                Some(s) if s.trim().is_empty() => Err("tag must not be blank".to_string()),
                _ => Ok(()),
            })
            .build()
            .unwrap();

        Self {
            website,
            username,
            password,
            key_file,
            anonymous,
            tags,
        }
    }

    pub fn all(&self) -> Vec<&Arc<Requirement>> {
        vec![
            &self.website,
            &self.username,
            &self.password,
            &self.key_file,
            &self.anonymous,
            &self.tags,
        ]
    }

    pub fn requirement_set(&self) -> RequirementSet {
        RequirementSet::from_requirements(self.all()).unwrap()
    }

    /// Builder holding every declared relation
    pub fn builder(&self) -> RelationGraphBuilder {
        let builder = RelationGraphBuilder::new();
        for requirement in self.all() {
            builder.add_declared(requirement).unwrap();
        }
        builder
    }

    pub fn graph(&self) -> RelationGraph {
        self.builder().build()
    }
}

/// Fresh string requirement with a unique identity
pub fn requirement(name: &str) -> Arc<Requirement> {
    Requirement::string(name, format!("Test requirement {name}"))
        .optional()
        .build()
        .unwrap()
}

/// Builder with one relation per pair
pub fn builder_with(
    pairs: &[(&Arc<Requirement>, &Arc<Requirement>, Relation)],
) -> RelationGraphBuilder {
    let builder = RelationGraphBuilder::new();
    for (primary, secondary, relation) in pairs {
        builder.add(primary, secondary, *relation).unwrap();
    }
    builder
}
