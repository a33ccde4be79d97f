//! Aggregate wrapping.

use rulegraph_common::utils::error::{Error, Result};
use rulegraph_core::query::{AggregateFunction, Expression};

/// Parses an aggregate keyword (`COUNT`, `SUM`, `AVG`, `MIN`, `MAX`,
/// `SAMPLE`), case-insensitively.
///
/// # Errors
///
/// Returns `UnknownAggregate` for anything else.
pub fn parse_aggregate(keyword: &str) -> Result<AggregateFunction> {
    AggregateFunction::from_keyword(keyword).ok_or_else(|| Error::UnknownAggregate(keyword.to_string()))
}

/// Wraps `expression` in the aggregate named by `keyword`.
///
/// # Errors
///
/// Returns `UnknownAggregate` for an unsupported keyword.
pub fn aggregate(keyword: &str, expression: Expression) -> Result<Expression> {
    Ok(Expression::aggregate(parse_aggregate(keyword)?, expression))
}
