//! The requirement descriptor and its builder

use super::arity::CollectionInfo;
use super::types::RequirementType;
use crate::error::{Error, Result, ValidationError};
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Author-supplied check of a single candidate value
pub type Validator = Arc<dyn Fn(&Value) -> std::result::Result<(), String> + Send + Sync>;

static NEXT_REQUIREMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a [`Requirement`] instance
///
/// Assigned once at construction and unique for the lifetime of the process.
/// Graphs and value sets key on this, never on the requirement's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequirementId(u64);

impl RequirementId {
    fn next() -> Self {
        Self(NEXT_REQUIREMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Requirement
// =============================================================================

/// Immutable descriptor of one configurable item
///
/// Requirements are built once and shared as `Arc<Requirement>`. Two
/// requirements with the same name are still different requirements.
///
/// # Example
///
/// ```
/// use configurables::{CollectionInfo, Requirement};
/// use serde_json::json;
///
/// let tags = Requirement::string("tags", "Labels attached to the connection")
///     .collection(CollectionInfo::between(1, 3).unwrap())
///     .validator(|v| match v.as_str() {
///         Some(s) if s.len() <= 16 => Ok(()),
///         _ => Err("tag too long".to_string()),
///     })
///     .build()
///     .unwrap();
///
/// assert!(tags.validate(&json!("prod")).is_none());
/// assert!(tags.validate(&json!("a-very-long-tag-name")).is_some());
/// ```
pub struct Requirement {
    id: RequirementId,
    name: String,
    description: String,
    requirement_type: RequirementType,
    optional: bool,
    collection: Option<CollectionInfo>,
    validator: Validator,
    depends_on: Vec<Arc<Requirement>>,
    exclusive_with: Vec<Arc<Requirement>>,
    rendered: OnceLock<String>,
}

impl Requirement {
    /// Start building a requirement with no validator set
    ///
    /// [`RequirementBuilder::build`] fails until a validator is supplied.
    pub fn builder(
        name: impl Into<String>,
        description: impl Into<String>,
        requirement_type: RequirementType,
    ) -> RequirementBuilder {
        RequirementBuilder::new(name.into(), description.into(), requirement_type)
    }

    /// Start building a requirement whose validator accepts any well-typed value
    pub fn of_type(
        name: impl Into<String>,
        description: impl Into<String>,
        requirement_type: RequirementType,
    ) -> RequirementBuilder {
        Self::builder(name, description, requirement_type).validator(|_| Ok(()))
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> RequirementBuilder {
        Self::of_type(name, description, RequirementType::string())
    }

    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> RequirementBuilder {
        Self::of_type(name, description, RequirementType::boolean())
    }

    pub fn int32(name: impl Into<String>, description: impl Into<String>) -> RequirementBuilder {
        Self::of_type(name, description, RequirementType::int32())
    }

    pub fn int64(name: impl Into<String>, description: impl Into<String>) -> RequirementBuilder {
        Self::of_type(name, description, RequirementType::int64())
    }

    pub fn double(name: impl Into<String>, description: impl Into<String>) -> RequirementBuilder {
        Self::of_type(name, description, RequirementType::double())
    }

    pub fn uri(name: impl Into<String>, description: impl Into<String>) -> RequirementBuilder {
        Self::of_type(name, description, RequirementType::uri())
    }

    pub fn file_path(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> RequirementBuilder {
        Self::of_type(name, description, RequirementType::file_path())
    }

    pub fn secure_string(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> RequirementBuilder {
        Self::of_type(name, description, RequirementType::secure_string())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn id(&self) -> RequirementId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn requirement_type(&self) -> &RequirementType {
        &self.requirement_type
    }

    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// `None` for scalar requirements
    #[must_use]
    pub fn collection(&self) -> Option<&CollectionInfo> {
        self.collection.as_ref()
    }

    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.collection.is_some()
    }

    /// Requirements declared at construction as needing to be supplied alongside this one
    #[must_use]
    pub fn depends_on(&self) -> &[Arc<Requirement>] {
        &self.depends_on
    }

    /// Requirements declared at construction as never supplied alongside this one
    #[must_use]
    pub fn exclusive_with(&self) -> &[Arc<Requirement>] {
        &self.exclusive_with
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate a single candidate value.
    ///
    /// Checks the value's shape against the requirement type, then runs the
    /// validator. Nothing raised by either escapes this call: a panic inside
    /// author-supplied code is caught and returned as
    /// [`ValidationError::ValidatorPanicked`].
    ///
    /// Returns `None` when the candidate is acceptable.
    #[must_use]
    pub fn validate(&self, candidate: &Value) -> Option<ValidationError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            if let Err(reason) = self.requirement_type.check(candidate) {
                return Some(ValidationError::TypeMismatch {
                    requirement: self.name.clone(),
                    expected: self.requirement_type.name().to_string(),
                    reason,
                });
            }

            (self.validator)(candidate)
                .err()
                .map(|reason| ValidationError::Rejected {
                    requirement: self.name.clone(),
                    reason,
                })
        }));

        match outcome {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::warn!("Validator for '{}' panicked: {message}", self.name);
                Some(ValidationError::ValidatorPanicked {
                    requirement: self.name.clone(),
                    message,
                })
            }
        }
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    fn render(&self) -> String {
        let names = |list: &[Arc<Requirement>]| {
            let quoted: Vec<String> = list.iter().map(|r| json_string(&r.name)).collect();
            format!("[{}]", quoted.join(", "))
        };

        let collection = match &self.collection {
            None => "null".to_string(),
            Some(info) => format!(
                "{{ \"maximum\": {}, \"minimum\": {} }}",
                bound(info.maximum()),
                bound(info.minimum())
            ),
        };

        let fields = [
            format!("\"name\": {}", json_string(&self.name)),
            format!(
                "\"type\": {}",
                json_string(self.requirement_type.name())
            ),
            format!("\"optional\": {}", self.optional),
            format!("\"description\": {}", json_string(&self.description)),
            format!("\"collection\": {collection}"),
            format!("\"depends_on\": {}", names(&self.depends_on)),
            format!("\"exclusive_with\": {}", names(&self.exclusive_with)),
        ];

        format!("{{\n{}\n}}", fields.join(",\n"))
    }
}

fn json_string(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}

fn push_unique(list: &mut Vec<Arc<Requirement>>, other: &Arc<Requirement>) {
    if !list.iter().any(|r| r.id() == other.id()) {
        list.push(Arc::clone(other));
    }
}

fn bound(value: Option<usize>) -> String {
    value.map_or_else(|| "null".to_string(), |n| n.to_string())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Deterministic, escaped, multi-line rendering for logs and debugging
///
/// Computed on first use and cached. Not intended to be parsed back.
impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rendered.get_or_init(|| self.render()))
    }
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |list: &[Arc<Requirement>]| -> Vec<String> {
            list.iter().map(|r| r.name.clone()).collect()
        };
        f.debug_struct("Requirement")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("type", &self.requirement_type)
            .field("optional", &self.optional)
            .field("collection", &self.collection)
            .field("depends_on", &names(&self.depends_on))
            .field("exclusive_with", &names(&self.exclusive_with))
            .finish_non_exhaustive()
    }
}

impl PartialEq for Requirement {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Requirement {}

impl Hash for Requirement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`Requirement`] with a fluent API
#[must_use]
pub struct RequirementBuilder {
    name: String,
    description: String,
    requirement_type: RequirementType,
    optional: bool,
    collection: Option<CollectionInfo>,
    validator: Option<Validator>,
    depends_on: Vec<Arc<Requirement>>,
    exclusive_with: Vec<Arc<Requirement>>,
}

impl RequirementBuilder {
    fn new(name: String, description: String, requirement_type: RequirementType) -> Self {
        Self {
            name,
            description,
            requirement_type,
            optional: false,
            collection: None,
            validator: None,
            depends_on: Vec::new(),
            exclusive_with: Vec::new(),
        }
    }

    /// Mark the requirement as optional (required by default)
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Make this a collection requirement with the given arity
    pub fn collection(mut self, info: CollectionInfo) -> Self {
        self.collection = Some(info);
        self
    }

    /// Set the validator, replacing any previous one
    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Declare that this requirement must be supplied alongside `other`.
    ///
    /// Declaring the same requirement again has no effect.
    pub fn depends_on(mut self, other: &Arc<Requirement>) -> Self {
        push_unique(&mut self.depends_on, other);
        self
    }

    /// Declare that this requirement must never be supplied alongside `other`.
    ///
    /// Declaring the same requirement again has no effect.
    pub fn exclusive_with(mut self, other: &Arc<Requirement>) -> Self {
        push_unique(&mut self.exclusive_with, other);
        self
    }

    /// Build the requirement.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if the name or description is blank, or a
    ///   requirement is declared both as a dependency and as exclusive
    /// - [`Error::MissingValidator`] if no validator was set
    pub fn build(self) -> Result<Arc<Requirement>> {
        if self.name.trim().is_empty() {
            return Err(Error::blank("name"));
        }
        if self.description.trim().is_empty() {
            return Err(Error::blank("description"));
        }

        let validator = self
            .validator
            .ok_or_else(|| Error::MissingValidator(self.name.clone()))?;

        if let Some(both) = self
            .depends_on
            .iter()
            .find(|d| self.exclusive_with.iter().any(|e| e.id() == d.id()))
        {
            return Err(Error::InvalidArgument {
                argument: "exclusive_with",
                reason: format!(
                    "'{}' is declared both as a dependency and as exclusive",
                    both.name()
                ),
            });
        }

        let requirement = Requirement {
            id: RequirementId::next(),
            name: self.name,
            description: self.description,
            requirement_type: self.requirement_type,
            optional: self.optional,
            collection: self.collection,
            validator,
            depends_on: self.depends_on,
            exclusive_with: self.exclusive_with,
            rendered: OnceLock::new(),
        };
        log::trace!("Built requirement '{}' ({})", requirement.name, requirement.id);

        Ok(Arc::new(requirement))
    }
}
