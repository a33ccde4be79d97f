//! The compiler entry point.

use rulegraph_adapters::rules::RuleGroup;
use rulegraph_adapters::widgets::Widget;
use rulegraph_common::utils::error::Result;

use crate::config::CompilerConfig;
use crate::query::compile_where;
use crate::widgets::{self, QueryBundle};

/// Compiles widget requests into query text.
///
/// A compiler holds only configuration; every call builds its own
/// [`QueryState`](crate::query::QueryState), so one compiler can be shared
/// freely across threads.
///
/// Two call styles are offered. [`compile`](Self::compile) propagates
/// errors and is meant for queries about to run. [`preview`](Self::preview)
/// never fails and is meant for live previews while a tree is being
/// edited.
///
/// # Examples
///
/// ```
/// use rulegraph_adapters::Widget;
/// use rulegraph_engine::QueryCompiler;
///
/// let widget = Widget::from_json(r#"{
///     "widget": "select",
///     "tree": { "combinator": "AND", "variable": { "value": "main" }, "rules": [] },
///     "select": [{ "value": "main" }]
/// }"#).unwrap();
///
/// let bundle = QueryCompiler::new().compile(&widget).unwrap();
/// assert!(bundle.primary.starts_with("SELECT ?main ?mainLabel WHERE {"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    config: CompilerConfig,
}

impl QueryCompiler {
    /// Creates a compiler with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a compiler with the given settings.
    pub fn with_config(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Returns the settings.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compiles a widget request.
    ///
    /// # Errors
    ///
    /// Returns the first error found in the request. Every error is a
    /// problem with the request itself; nothing is retried.
    pub fn compile(&self, widget: &Widget) -> Result<QueryBundle> {
        let bundle = widgets::build(widget, &self.config)?;
        tracing::debug!(
            widget = widget.kind(),
            auxiliary = bundle.auxiliary.len(),
            "compiled widget"
        );
        Ok(bundle)
    }

    /// Compiles a widget request, degrading to an empty bundle on error.
    pub fn preview(&self, widget: &Widget) -> QueryBundle {
        self.compile(widget).unwrap_or_else(|e| {
            if e.is_user_error() {
                tracing::warn!(widget = widget.kind(), kind = e.kind(), "preview unavailable: {}", e);
            } else {
                tracing::error!(widget = widget.kind(), "preview failed: {}", e);
            }
            QueryBundle::default()
        })
    }

    /// Decodes and previews a widget request. Malformed JSON also yields
    /// an empty bundle.
    pub fn preview_json(&self, text: &str) -> QueryBundle {
        match Widget::from_json(text) {
            Ok(widget) => self.preview(&widget),
            Err(e) => {
                tracing::warn!(kind = e.kind(), "preview unavailable: {}", e);
                QueryBundle::default()
            }
        }
    }

    /// Compiles a bare rule tree to its WHERE body, without braces.
    ///
    /// # Errors
    ///
    /// Returns the first error found in the tree.
    pub fn where_clause(&self, tree: &RuleGroup) -> Result<String> {
        compile_where(tree, self.config.statement_mode).map(|body| body.render())
    }
}
