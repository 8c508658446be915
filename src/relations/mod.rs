//! Relations between requirements
//!
//! - `Relation` - Closed set of relation kinds with inverses
//! - `RelationGraphBuilder` - Thread-safe, mergeable accumulator of relations
//! - `RelationGraph` - Immutable, symmetric snapshot read by the validation engine

mod builder;
mod graph;
mod relation;

pub use builder::RelationGraphBuilder;
pub use graph::RelationGraph;
pub use relation::Relation;
