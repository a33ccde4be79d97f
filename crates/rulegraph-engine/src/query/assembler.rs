//! Final SELECT assembly.

use rulegraph_common::types::Variable;
use rulegraph_common::utils::error::{Error, Result};
use rulegraph_core::query::{Expression, Fragment, OrderKey, Projection, SelectQuery};

use super::label::LabelBinding;

/// Collects the pieces of a SELECT query and checks them before
/// rendering.
///
/// The WHERE body is laid out as: compiled body, extra bounds (sanity
/// filters, discretization binds), then label lookups.
///
/// ```
/// use rulegraph_common::types::{Iri, Variable};
/// use rulegraph_core::query::Fragment;
/// use rulegraph_engine::query::QueryAssembler;
///
/// let main = Variable::new("main");
/// let body = vec![Fragment::triple(main.clone(), Iri::new("http://ex.org/p"), Variable::new("o"))];
/// let text = QueryAssembler::new(body)
///     .project(main)
///     .with_limit(10)
///     .assemble()
///     .unwrap();
/// assert!(text.starts_with("SELECT ?main WHERE {"));
/// assert!(text.ends_with("LIMIT 10"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryAssembler {
    body: Vec<Fragment>,
    bounds: Vec<Fragment>,
    labels: Vec<Fragment>,
    projection: Vec<Projection>,
    group_by: Vec<Variable>,
    order_by: Vec<OrderKey>,
    limit: Option<usize>,
}

impl QueryAssembler {
    /// Starts from a compiled WHERE body.
    pub fn new(body: Vec<Fragment>) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }

    /// Appends fragments after the body.
    #[must_use]
    pub fn with_bounds(mut self, bounds: impl IntoIterator<Item = Fragment>) -> Self {
        self.bounds.extend(bounds);
        self
    }

    /// Appends label lookups.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = LabelBinding>) -> Self {
        self.labels.extend(labels.into_iter().map(|l| l.fragment));
        self
    }

    /// Projects a variable.
    #[must_use]
    pub fn project(mut self, variable: Variable) -> Self {
        self.projection.push(Projection::Variable(variable));
        self
    }

    /// Projects `(expression AS ?alias)`.
    #[must_use]
    pub fn project_as(mut self, expression: Expression, alias: Variable) -> Self {
        self.projection.push(Projection::Expression { expression, alias });
        self
    }

    /// Adds a GROUP BY key.
    #[must_use]
    pub fn group(mut self, variable: Variable) -> Self {
        self.group_by.push(variable);
        self
    }

    /// Adds an ORDER BY key.
    #[must_use]
    pub fn order(mut self, key: OrderKey) -> Self {
        self.order_by.push(key);
        self
    }

    /// Sets the row limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Builds the query.
    ///
    /// # Errors
    ///
    /// Returns `NoProjection` when nothing is projected.
    pub fn build(self) -> Result<SelectQuery> {
        if self.projection.is_empty() {
            return Err(Error::NoProjection("query projects no variables".into()));
        }

        let mut where_clause = self.body;
        where_clause.extend(self.bounds);
        where_clause.extend(self.labels);

        tracing::debug!(
            columns = self.projection.len(),
            clauses = where_clause.len(),
            grouped = !self.group_by.is_empty(),
            "assembled select query"
        );

        Ok(SelectQuery {
            distinct: false,
            projection: self.projection,
            where_clause,
            group_by: self.group_by,
            order_by: self.order_by,
            limit: self.limit,
        })
    }

    /// Builds and renders the query.
    ///
    /// # Errors
    ///
    /// Returns `NoProjection` when nothing is projected.
    pub fn assemble(self) -> Result<String> {
        self.build().map(|q| q.to_string())
    }
}
