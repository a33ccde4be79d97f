//! Widget query builders.
//!
//! Each builder turns one widget request into a [`QueryBundle`].
//!
//! - [`select`] - Variable listing
//! - [`plot`] - Grouped and aggregated chart data
//! - [`properties`] - Every property of one subject
//! - [`subgraph`] - Neighbourhood of an entity

pub mod plot;
pub mod properties;
pub mod select;
pub mod subgraph;

use rulegraph_adapters::widgets::Widget;
use rulegraph_common::utils::error::Result;
use serde::Serialize;

use crate::config::CompilerConfig;

/// Rendered queries for one widget.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct QueryBundle {
    /// The query whose results the widget displays.
    pub primary: String,
    /// Supporting queries, such as axis ranges for a plot.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub auxiliary: Vec<String>,
}

impl QueryBundle {
    /// A bundle with only a primary query.
    pub fn primary(query: impl Into<String>) -> Self {
        Self {
            primary: query.into(),
            auxiliary: Vec::new(),
        }
    }

    /// Returns true if the bundle holds no query.
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }
}

/// Builds the queries for any widget.
///
/// # Errors
///
/// Propagates the builder's error.
pub fn build(widget: &Widget, config: &CompilerConfig) -> Result<QueryBundle> {
    match widget {
        Widget::Select(request) => select::build(request, config),
        Widget::Plot(request) => plot::build(request, config),
        Widget::Properties(request) => properties::build(request, config),
        Widget::Subgraph(request) => subgraph::build(request, config),
    }
}
