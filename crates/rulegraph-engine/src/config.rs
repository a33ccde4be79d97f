//! Compiler configuration.

use serde::Deserialize;

/// Settings shared by every compile call.
///
/// Hosts usually build one of these at startup (or load it from JSON) and
/// hand it to [`QueryCompiler`](crate::QueryCompiler).
///
/// # Examples
///
/// ```
/// use rulegraph_engine::CompilerConfig;
///
/// let config = CompilerConfig::default()
///     .with_statement_mode(true)
///     .with_default_limit(50);
/// assert_eq!(config.label_language, "en");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// The target store models properties as reified statements
    /// (Wikidata style).
    pub statement_mode: bool,
    /// Language tag label lookups are restricted to.
    pub label_language: String,
    /// Row limit when a widget does not set one.
    pub default_limit: usize,
    /// Bucket count when a plot axis does not set one.
    pub default_bins: usize,
    /// Exclusive year bounds for values on a date axis.
    pub year_range: (i32, i32),
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            statement_mode: false,
            label_language: "en".to_string(),
            default_limit: 20,
            default_bins: 20,
            year_range: (0, 2100),
        }
    }
}

impl CompilerConfig {
    /// Enables or disables statement mode.
    #[must_use]
    pub fn with_statement_mode(mut self, enabled: bool) -> Self {
        self.statement_mode = enabled;
        self
    }

    /// Sets the label language.
    #[must_use]
    pub fn with_label_language(mut self, language: impl Into<String>) -> Self {
        self.label_language = language.into();
        self
    }

    /// Sets the default row limit.
    #[must_use]
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// Sets the default bucket count.
    #[must_use]
    pub fn with_default_bins(mut self, bins: usize) -> Self {
        self.default_bins = bins.max(1);
        self
    }

    /// Sets the accepted year range for date axes.
    #[must_use]
    pub fn with_year_range(mut self, min_exclusive: i32, max_exclusive: i32) -> Self {
        self.year_range = (min_exclusive, max_exclusive);
        self
    }
}
