//! Options controlling a validation pass

/// Configuration for a [`ValidationEngine`](super::ValidationEngine) run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Report supplied requirements that are not part of the requirement set
    pub reject_unknown: bool,

    /// Report every failing item of a collection instead of only the first
    pub report_every_item: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            reject_unknown: true,
            report_every_item: false,
        }
    }
}

impl ValidationOptions {
    /// Create a new builder for ValidationOptions
    ///
    /// # Example
    /// ```rust
    /// use configurables::ValidationOptions;
    ///
    /// let options = ValidationOptions::builder()
    ///     .allow_unknown()
    ///     .report_every_item()
    ///     .build();
    /// assert!(!options.reject_unknown);
    /// ```
    pub fn builder() -> ValidationOptionsBuilder {
        ValidationOptionsBuilder::new()
    }
}

/// Builder for creating ValidationOptions with a fluent API
#[derive(Debug, Clone, Default)]
pub struct ValidationOptionsBuilder {
    options: ValidationOptions,
}

impl ValidationOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Silently ignore supplied values for requirements outside the set
    #[must_use]
    pub fn allow_unknown(mut self) -> Self {
        self.options.reject_unknown = false;
        self
    }

    /// Report each failing collection item
    #[must_use]
    pub fn report_every_item(mut self) -> Self {
        self.options.report_every_item = true;
        self
    }

    pub fn build(self) -> ValidationOptions {
        self.options
    }
}
