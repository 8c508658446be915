//! Arity constraints for collection-typed requirements

use crate::error::{Error, Result};
use serde::Serialize;

/// Minimum/maximum count of values allowed for a collection requirement
///
/// An absent bound leaves that side unbounded. A requirement without a
/// `CollectionInfo` is scalar and expects exactly one value.
///
/// # Example
///
/// ```
/// use configurables::CollectionInfo;
///
/// let info = CollectionInfo::new(Some(2), Some(5)).unwrap();
/// assert!(info.is_below_range(1));
/// assert!(!info.is_below_range(2));
/// assert!(info.is_above_range(6));
/// assert!(!info.is_above_range(5));
///
/// assert!(CollectionInfo::new(Some(5), Some(3)).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CollectionInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    maximum: Option<usize>,
}

impl CollectionInfo {
    /// Create a new constraint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArity`] when `maximum` is 0 or smaller than
    /// `minimum`.
    pub fn new(minimum: Option<usize>, maximum: Option<usize>) -> Result<Self> {
        if let Some(max) = maximum {
            // A value that may never appear should not be part of the schema
            if max < 1 {
                return Err(Error::InvalidArity(
                    "maximum count must be at least 1".to_string(),
                ));
            }
            if let Some(min) = minimum {
                if max < min {
                    return Err(Error::InvalidArity(format!(
                        "maximum count ({max}) cannot be less than minimum count ({min})"
                    )));
                }
            }
        }

        Ok(Self { minimum, maximum })
    }

    /// A collection with no bounds on either side
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A collection with at least `minimum` values
    #[must_use]
    pub fn at_least(minimum: usize) -> Self {
        Self {
            minimum: Some(minimum),
            maximum: None,
        }
    }

    /// A collection with at most `maximum` values
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArity`] if `maximum` is 0.
    pub fn at_most(maximum: usize) -> Result<Self> {
        Self::new(None, Some(maximum))
    }

    /// A collection with between `minimum` and `maximum` values (inclusive)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArity`] on inverted or zero bounds.
    pub fn between(minimum: usize, maximum: usize) -> Result<Self> {
        Self::new(Some(minimum), Some(maximum))
    }

    #[must_use]
    pub fn minimum(&self) -> Option<usize> {
        self.minimum
    }

    #[must_use]
    pub fn maximum(&self) -> Option<usize> {
        self.maximum
    }

    /// `true` if `count` is under the minimum
    #[must_use]
    pub fn is_below_range(&self, count: usize) -> bool {
        self.minimum.is_some_and(|min| count < min)
    }

    /// `true` if `count` is over the maximum
    #[must_use]
    pub fn is_above_range(&self, count: usize) -> bool {
        self.maximum.is_some_and(|max| count > max)
    }

    #[must_use]
    pub fn contains(&self, count: usize) -> bool {
        !self.is_below_range(count) && !self.is_above_range(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_predicates() {
        let info = CollectionInfo::new(Some(2), Some(5)).unwrap();

        assert!(info.is_below_range(1));
        assert!(!info.is_below_range(2));
        assert!(info.is_above_range(6));
        assert!(!info.is_above_range(5));
        assert!(info.contains(3));
    }

    #[test]
    fn test_absent_bounds_are_unbounded() {
        let info = CollectionInfo::unbounded();
        assert!(!info.is_below_range(0));
        assert!(!info.is_above_range(usize::MAX));

        let floor = CollectionInfo::at_least(1);
        assert!(floor.is_below_range(0));
        assert!(!floor.is_above_range(10_000));
    }

    #[test]
    fn test_rejects_invalid_bounds() {
        let inverted = CollectionInfo::new(Some(5), Some(3));
        assert!(matches!(inverted, Err(Error::InvalidArity(_))));

        let zero = CollectionInfo::at_most(0);
        assert!(matches!(zero, Err(Error::InvalidArity(_))));

        assert!(CollectionInfo::between(3, 3).is_ok());
        assert!(CollectionInfo::new(Some(0), None).is_ok());
    }

    #[test]
    fn test_serialization_skips_absent_bounds() {
        let info = CollectionInfo::at_least(2);
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json, serde_json::json!({ "minimum": 2 }));
    }
}
