//! Requirement type tokens and the registry of default types
//!
//! A [`RequirementType`] names the shape a supplied value must have and carries
//! the check for that shape. [`TypeRegistry`] is a plain value the host
//! application builds once (usually with [`TypeRegistry::with_defaults`]) and
//! passes to whatever needs to resolve types by name.

use crate::error::{Error, Result};
use crate::external::FilePath;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Shape check for a candidate value
pub type TypeCheck = Arc<dyn Fn(&Value) -> std::result::Result<(), String> + Send + Sync>;

static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+(\.\d+)?$").expect("static decimal pattern"));
static BIG_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+$").expect("static integer pattern"));
static URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s]+$").expect("static uri pattern")
});

// =============================================================================
// Requirement Type
// =============================================================================

/// The expected shape of values supplied for a requirement
#[derive(Clone)]
pub struct RequirementType {
    name: Arc<str>,
    check: TypeCheck,
}

impl RequirementType {
    /// Create a custom type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `name` is blank.
    pub fn new<F>(name: impl Into<String>, check: F) -> Result<Self>
    where
        F: Fn(&Value) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::blank("name"));
        }
        Ok(Self::builtin(&name, check))
    }

    fn builtin<F>(name: &str, check: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            check: Arc::new(check),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check a candidate value against this type's shape
    ///
    /// # Errors
    ///
    /// Returns a description of the mismatch.
    pub fn check(&self, value: &Value) -> std::result::Result<(), String> {
        (self.check)(value)
    }

    // =========================================================================
    // Default types
    // =========================================================================

    #[must_use]
    pub fn boolean() -> Self {
        Self::builtin("Boolean", |v| shape(v.is_boolean(), "a boolean"))
    }

    #[must_use]
    pub fn int32() -> Self {
        Self::builtin("Int32", |v| {
            let fits = v
                .as_i64()
                .is_some_and(|n| i32::try_from(n).is_ok());
            shape(fits, "a 32-bit signed integer")
        })
    }

    #[must_use]
    pub fn int64() -> Self {
        Self::builtin("Int64", |v| shape(v.is_i64(), "a 64-bit signed integer"))
    }

    #[must_use]
    pub fn uint64() -> Self {
        Self::builtin("UInt64", |v| {
            shape(v.is_u64(), "a 64-bit unsigned integer")
        })
    }

    #[must_use]
    pub fn single() -> Self {
        Self::builtin("Single", |v| {
            let fits = v
                .as_f64()
                .is_some_and(|n| n.is_finite() && n.abs() <= f64::from(f32::MAX));
            shape(fits, "a single-precision number")
        })
    }

    #[must_use]
    pub fn double() -> Self {
        Self::builtin("Double", |v| shape(v.is_number(), "a number"))
    }

    /// Decimal numbers, supplied either as JSON numbers or as digit strings
    #[must_use]
    pub fn decimal() -> Self {
        Self::builtin("Decimal", |v| {
            let ok = v.is_number() || v.as_str().is_some_and(|s| DECIMAL.is_match(s));
            shape(ok, "a decimal number")
        })
    }

    /// Arbitrary precision integers, supplied as JSON integers or digit strings
    #[must_use]
    pub fn big_integer() -> Self {
        Self::builtin("BigInteger", |v| {
            let ok = v.is_i64()
                || v.is_u64()
                || v.as_str().is_some_and(|s| BIG_INTEGER.is_match(s));
            shape(ok, "an integer")
        })
    }

    #[must_use]
    pub fn string() -> Self {
        Self::builtin("String", |v| shape(v.is_string(), "a string"))
    }

    #[must_use]
    pub fn uri() -> Self {
        Self::builtin("Uri", |v| {
            shape(v.as_str().is_some_and(|s| URI.is_match(s)), "an absolute URI")
        })
    }

    /// Fully-qualified file paths (see [`FilePath`])
    #[must_use]
    pub fn file_path() -> Self {
        Self::builtin("FilePath", |v| {
            FilePath::from_value(v, false)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
    }

    /// Secrets are supplied as strings and wrapped by the validator
    #[must_use]
    pub fn secure_string() -> Self {
        Self::builtin("SecureString", |v| shape(v.is_string(), "a secret string"))
    }

    /// Accepts any value, leaving all checking to the requirement's validator
    #[must_use]
    pub fn any() -> Self {
        Self::builtin("Any", |_| Ok(()))
    }
}

fn shape(ok: bool, what: &str) -> std::result::Result<(), String> {
    if ok {
        Ok(())
    } else {
        Err(format!("value must be {what}"))
    }
}

impl PartialEq for RequirementType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for RequirementType {}

impl fmt::Debug for RequirementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RequirementType").field(&self.name).finish()
    }
}

impl fmt::Display for RequirementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// =============================================================================
// Type Registry
// =============================================================================

/// A set of requirement types addressable by name
///
/// # Example
///
/// ```
/// use configurables::TypeRegistry;
///
/// let registry = TypeRegistry::with_defaults();
/// let uri = registry.get("Uri").unwrap();
/// assert!(uri.check(&serde_json::json!("https://example.com")).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, RequirementType>,
}

impl TypeRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the default supported types
    #[must_use]
    pub fn with_defaults() -> Self {
        let types = [
            RequirementType::big_integer(),
            RequirementType::boolean(),
            RequirementType::decimal(),
            RequirementType::double(),
            RequirementType::file_path(),
            RequirementType::int32(),
            RequirementType::int64(),
            RequirementType::secure_string(),
            RequirementType::single(),
            RequirementType::string(),
            RequirementType::uint64(),
            RequirementType::uri(),
        ];

        Self {
            types: types
                .into_iter()
                .map(|t| (t.name().to_string(), t))
                .collect(),
        }
    }

    /// Register a type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateType`] if a type with the same name exists.
    pub fn register(&mut self, ty: RequirementType) -> Result<()> {
        if self.types.contains_key(ty.name()) {
            return Err(Error::DuplicateType(ty.name().to_string()));
        }
        log::debug!("Registered requirement type '{}'", ty.name());
        self.types.insert(ty.name().to_string(), ty);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RequirementType> {
        self.types.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered type names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
