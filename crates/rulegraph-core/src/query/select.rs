//! Complete query forms: SELECT and CONSTRUCT.

use rulegraph_common::types::Variable;

use super::expression::Expression;
use super::fragment::{Fragment, TriplePattern};

/// One projected column.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// A bare variable.
    Variable(Variable),
    /// `(expr AS ?alias)`
    Expression {
        /// Computed expression.
        expression: Expression,
        /// Output name.
        alias: Variable,
    },
}

impl Projection {
    /// The output variable of this column.
    pub fn output(&self) -> &Variable {
        match self {
            Projection::Variable(v) => v,
            Projection::Expression { alias, .. } => alias,
        }
    }
}

impl From<Variable> for Projection {
    fn from(v: Variable) -> Self {
        Projection::Variable(v)
    }
}

/// One ORDER BY key.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderKey {
    /// Sort expression.
    pub expression: Expression,
    /// Sort descending.
    pub descending: bool,
}

impl OrderKey {
    /// Ascending key.
    pub fn asc(expression: Expression) -> Self {
        Self {
            expression,
            descending: false,
        }
    }

    /// Descending key.
    pub fn desc(expression: Expression) -> Self {
        Self {
            expression,
            descending: true,
        }
    }
}

/// A SELECT query, either top-level or nested as a sub-select.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectQuery {
    /// `SELECT DISTINCT`
    pub distinct: bool,
    /// Projected columns.
    pub projection: Vec<Projection>,
    /// WHERE body.
    pub where_clause: Vec<Fragment>,
    /// GROUP BY variables.
    pub group_by: Vec<Variable>,
    /// ORDER BY keys.
    pub order_by: Vec<OrderKey>,
    /// Row limit.
    pub limit: Option<usize>,
}

impl SelectQuery {
    /// Creates a query over the given body with no projection yet.
    pub fn new(where_clause: Vec<Fragment>) -> Self {
        Self {
            where_clause,
            ..Self::default()
        }
    }

    /// Sets DISTINCT.
    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Appends a projected column.
    pub fn project(mut self, projection: impl Into<Projection>) -> Self {
        self.projection.push(projection.into());
        self
    }

    /// Appends `(expr AS ?alias)`.
    pub fn project_as(mut self, expression: Expression, alias: Variable) -> Self {
        self.projection.push(Projection::Expression { expression, alias });
        self
    }

    /// Appends a GROUP BY variable.
    pub fn group(mut self, variable: Variable) -> Self {
        self.group_by.push(variable);
        self
    }

    /// Appends an ORDER BY key.
    pub fn order(mut self, key: OrderKey) -> Self {
        self.order_by.push(key);
        self
    }

    /// Sets the row limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A CONSTRUCT query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstructQuery {
    /// Template triples.
    pub template: Vec<TriplePattern>,
    /// WHERE body.
    pub where_clause: Vec<Fragment>,
    /// Row limit.
    pub limit: Option<usize>,
}

impl ConstructQuery {
    /// Creates a CONSTRUCT query.
    pub fn new(template: Vec<TriplePattern>, where_clause: Vec<Fragment>) -> Self {
        Self {
            template,
            where_clause,
            limit: None,
        }
    }

    /// Sets the row limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
