//! Requirement descriptors
//!
//! This module contains the leaf types of a configuration schema:
//! - `Requirement` - Immutable descriptor of one configurable item
//! - `CollectionInfo` - Arity bounds for collection requirements
//! - `RequirementType` / `TypeRegistry` - Value shapes and the default type set
//! - `RequirementSet` - The requirements a validation engine knows about

mod arity;
mod descriptor;
mod set;
mod types;

pub use arity::CollectionInfo;
pub use descriptor::{Requirement, RequirementBuilder, RequirementId, Validator};
pub use set::RequirementSet;
pub use types::{RequirementType, TypeCheck, TypeRegistry};
