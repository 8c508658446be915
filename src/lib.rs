//! # configurables - Configuration Requirements and Relations
//!
//! A library for describing what an application needs to be configured with,
//! how those needs relate to each other, and for checking supplied values
//! against both.
//!
//! ## Features
//!
//! - **Requirements**: Immutable descriptors with a name, a value type, optional
//!   arity bounds for collections, and a validator
//! - **Relations**: `DependsOn`, `RequiredBy` and `Exclusive`, always stored
//!   symmetrically together with their inverse
//! - **Graph Builder**: Thread-safe, mergeable accumulator that refuses duplicate
//!   relations and freezes into an immutable graph
//! - **Validation**: Field-level errors returned as data, relational conflicts
//!   returned as errors, or both gathered into one report
//!
//! ## Quick Start
//!
//! ```rust
//! use configurables::{
//!     CollectionInfo, Relation, RelationGraphBuilder, Requirement, RequirementSet,
//!     SuppliedValues, ValidationEngine, ValidationError,
//! };
//! use serde_json::json;
//!
//! let website = Requirement::uri("website", "Site to publish to").build()?;
//! let username = Requirement::string("username", "Login name").build()?;
//! let password = Requirement::secure_string("password", "Login secret")
//!     .depends_on(&username)
//!     .build()?;
//! let tags = Requirement::string("tags", "Labels to attach")
//!     .optional()
//!     .collection(CollectionInfo::between(1, 3)?)
//!     .build()?;
//!
//! // Relations declared on the requirement plus ones added by hand
//! let builder = RelationGraphBuilder::new();
//! builder.add_declared(&password)?;
//! builder.add(&tags, &website, Relation::DependsOn)?;
//! let graph = builder.build();
//!
//! let requirements = RequirementSet::from_requirements([&website, &username, &password, &tags])?;
//! let engine = ValidationEngine::new(&requirements, &graph);
//!
//! let supplied = SuppliedValues::new()
//!     .with(&website, json!("https://example.com"))
//!     .with(&password, json!("hunter2"));
//!
//! let report = engine.run(&supplied);
//! assert!(!report.is_valid());
//! assert!(report.errors().contains(&ValidationError::MissingRequired {
//!     requirement: "username".into(),
//! }));
//! # Ok::<(), configurables::Error>(())
//! ```
//!
//! ## Error Model
//!
//! - [`Error`] is returned by constructors and builder operations.
//! - [`ValidationError`] describes one bad field and is returned as a value.
//! - [`ConflictError`] names every exclusive partner supplied alongside a
//!   requirement.

// Core modules
mod error;
mod sync;

// Grouped modules
pub mod external;
pub mod relations;
pub mod requirement;
pub mod validation;

// Re-exports from core
pub use error::{ConflictError, Error, Result, ValidationError};
pub use external::{FilePath, SecretString};

// Re-exports from grouped modules
pub use relations::{Relation, RelationGraph, RelationGraphBuilder};
pub use requirement::{
    CollectionInfo, Requirement, RequirementBuilder, RequirementId, RequirementSet,
    RequirementType, TypeCheck, TypeRegistry, Validator,
};
pub use validation::{
    SuppliedValues, ValidationEngine, ValidationOptions, ValidationOptionsBuilder,
    ValidationReport,
};
