//! Validation of supplied values
//!
//! - `SuppliedValues` - What the user supplied, per requirement
//! - `ValidationEngine` - Field-level and relational checks
//! - `ValidationOptions` - Knobs for a full pass
//! - `ValidationReport` - Aggregated outcome of a full pass

mod engine;
mod options;
mod report;
mod supplied;

pub use engine::ValidationEngine;
pub use options::{ValidationOptions, ValidationOptionsBuilder};
pub use report::ValidationReport;
pub use supplied::SuppliedValues;
