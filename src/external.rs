//! Opaque value wrappers used by requirement validators
//!
//! The core only relies on equality and representation of these types. Their
//! own rules (path normalization, secret redaction) live here.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};

// =============================================================================
// File Path
// =============================================================================

/// A fully-qualified local file path
///
/// Only absolute paths in canonical form are accepted: no `.` or `..`
/// components, no repeated or trailing separators. Two equal `FilePath`s
/// therefore name the same location textually.
///
/// Comparison is case-sensitive when either side is case-sensitive.
#[derive(Clone)]
pub struct FilePath {
    path: PathBuf,
    case_sensitive: bool,
}

impl FilePath {
    /// Create a new file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the path is relative, empty, or
    /// not normalized.
    pub fn new(path: impl Into<PathBuf>, case_sensitive: bool) -> Result<Self> {
        let path = path.into();

        // `components()` hides `.`, repeated and trailing separators, so the
        // rebuilt path must match the input text exactly
        let canonical = path.components().collect::<PathBuf>();
        let normalized = canonical.as_os_str() == path.as_os_str()
            && !path
                .components()
                .any(|c| matches!(c, Component::CurDir | Component::ParentDir));

        if !path.is_absolute() || !normalized {
            return Err(Error::InvalidArgument {
                argument: "path",
                reason: "The specified path is not a valid fully-qualified path".to_string(),
            });
        }

        Ok(Self {
            path,
            case_sensitive,
        })
    }

    /// Parse a file path out of a JSON string value
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the value is not a string or not a
    /// valid path.
    pub fn from_value(value: &Value, case_sensitive: bool) -> Result<Self> {
        let text = value.as_str().ok_or_else(|| Error::InvalidArgument {
            argument: "path",
            reason: "Expected a string".to_string(),
        })?;
        Self::new(text, case_sensitive)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    fn folded(&self) -> String {
        self.path.to_string_lossy().to_lowercase()
    }
}

impl PartialEq for FilePath {
    fn eq(&self, other: &Self) -> bool {
        if self.case_sensitive || other.case_sensitive {
            self.path.as_os_str() == other.path.as_os_str()
        } else {
            self.folded() == other.folded()
        }
    }
}

impl Eq for FilePath {}

impl Hash for FilePath {
    // Textually equal paths also fold equal, so this agrees with both branches of `eq`
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded().hash(state);
    }
}

impl fmt::Debug for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePath")
            .field("path", &self.path)
            .field("case_sensitive", &self.case_sensitive)
            .finish()
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

// =============================================================================
// Secret String
// =============================================================================

/// A string whose contents never appear in `Debug` or `Display` output
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Access the secret contents
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(***)")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
