//! Histogram bucketing inside the generated query.
//!
//! Numeric and date axis values are mapped onto `bins` uniform buckets
//! whose bounds come from a MIN/MAX sub-select over the same body. For an
//! axis variable `?x` the generated binds are:
//!
//! ```text
//! ?xStep     = (?xMax - ?xMin) / bins
//! ?xContinue = continuous form of ?x
//! ?xDiscrete = IF(?xStep = 0, ?xMin,
//!                 FLOOR(0.5 + (?xContinue - ?xMin) / ?xStep) * ?xStep + ?xMin)
//! ?xBucket   = ?xDiscrete mapped back to the axis domain
//! ```
//!
//! Rounding to the nearest multiple of the step centres buckets on those
//! multiples instead of left-aligning them. When the range is empty every
//! value collapses onto `?xMin`.
//!
//! Dates are made continuous as `YEAR + MONTH / 12` and mapped back to the
//! first day of the resulting month.

use rulegraph_adapters::widgets::AxisKind;
use rulegraph_common::types::vocab;
use rulegraph_common::types::{Iri, Literal, Variable};
use rulegraph_core::query::{AggregateFunction, BinaryOp, Expression, Fragment, SelectQuery};

/// Binds and output variables produced for one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Discretization {
    /// Sub-select plus per-variable BINDs, to append after the body.
    pub bounds: Vec<Fragment>,
    /// Group keys, one per input variable.
    pub outputs: Vec<Variable>,
}

impl Discretization {
    fn passthrough(vars: &[Variable]) -> Self {
        Self {
            bounds: Vec::new(),
            outputs: vars.to_vec(),
        }
    }
}

/// Returns true if values on this axis are bucketed.
pub fn is_binned(kind: AxisKind) -> bool {
    !matches!(kind, AxisKind::Categorical)
}

/// Bucketizes `vars` over `body`. Categorical axes pass through unchanged.
pub fn discretize(
    vars: &[Variable],
    kind: AxisKind,
    body: &[Fragment],
    bins: usize,
) -> Discretization {
    if !is_binned(kind) || vars.is_empty() {
        return Discretization::passthrough(vars);
    }

    let mut bounds = vec![Fragment::SubSelect(Box::new(range_query(vars, kind, body)))];
    let mut outputs = Vec::with_capacity(vars.len());
    let bins = bins.max(1);

    for v in vars {
        let min = Expression::var(&v.suffixed("Min"));
        let max = Expression::var(&v.suffixed("Max"));
        let step_var = v.suffixed("Step");
        let continue_var = v.suffixed("Continue");
        let discrete_var = v.suffixed("Discrete");
        let bucket_var = v.suffixed("Bucket");
        let step = Expression::var(&step_var);

        let width = Expression::binary(max, BinaryOp::Sub, min.clone());
        bounds.push(Fragment::bind(
            Expression::binary(width, BinaryOp::Div, Expression::number(bins.to_string())),
            step_var.clone(),
        ));

        bounds.push(Fragment::bind(continuize(v, kind), continue_var.clone()));

        let offset = Expression::binary(
            Expression::binary(Expression::var(&continue_var), BinaryOp::Sub, min.clone()),
            BinaryOp::Div,
            step.clone(),
        );
        let index = Expression::call(
            "FLOOR",
            [Expression::binary(Expression::number("0.5"), BinaryOp::Add, offset)],
        );
        let step_ref = step.clone();
        let center = Expression::binary(
            Expression::binary(index, BinaryOp::Mul, step),
            BinaryOp::Add,
            min.clone(),
        );
        let empty_range = Expression::binary(step_ref, BinaryOp::Eq, Expression::integer(0));
        bounds.push(Fragment::bind(
            Expression::call("IF", [empty_range, min, center]),
            discrete_var.clone(),
        ));

        bounds.push(Fragment::bind(
            decontinuize(&discrete_var, kind),
            bucket_var.clone(),
        ));
        outputs.push(bucket_var);
    }

    Discretization { bounds, outputs }
}

/// `SELECT (MIN(c) AS ?xMin) (MAX(c) AS ?xMax) ... WHERE { body }` where
/// `c` is the continuous form of each variable.
pub fn range_query(vars: &[Variable], kind: AxisKind, body: &[Fragment]) -> SelectQuery {
    let mut query = SelectQuery::new(body.to_vec());
    for v in vars {
        query = query
            .project_as(
                Expression::aggregate(AggregateFunction::Min, continuize(v, kind)),
                v.suffixed("Min"),
            )
            .project_as(
                Expression::aggregate(AggregateFunction::Max, continuize(v, kind)),
                v.suffixed("Max"),
            );
    }
    query
}

/// The continuous form of an axis value.
pub fn continuize(v: &Variable, kind: AxisKind) -> Expression {
    match kind {
        AxisKind::Date => Expression::binary(
            Expression::call("YEAR", [Expression::var(v)]),
            BinaryOp::Add,
            Expression::binary(
                Expression::call("MONTH", [Expression::var(v)]),
                BinaryOp::Div,
                Expression::integer(12),
            ),
        ),
        AxisKind::Numeric | AxisKind::Categorical => Expression::var(v),
    }
}

/// Maps a bucket centre back to the axis domain.
pub fn decontinuize(v: &Variable, kind: AxisKind) -> Expression {
    match kind {
        AxisKind::Date => date_from_continuous(v),
        AxisKind::Numeric | AxisKind::Categorical => Expression::var(v),
    }
}

/// `year*12 + month = ROUND(d*12)`, so with `mi = ROUND(d*12)` the year is
/// `FLOOR((mi - 1) / 12)` and the month `mi - 12*year`.
fn date_from_continuous(v: &Variable) -> Expression {
    let xsd_integer = || Iri::new(vocab::XSD_INTEGER);
    let month_index = Expression::cast(
        xsd_integer(),
        Expression::call(
            "ROUND",
            [Expression::binary(Expression::var(v), BinaryOp::Mul, Expression::integer(12))],
        ),
    );
    let year = Expression::cast(
        xsd_integer(),
        Expression::call(
            "FLOOR",
            [Expression::binary(
                Expression::binary(month_index.clone(), BinaryOp::Sub, Expression::integer(1)),
                BinaryOp::Div,
                Expression::integer(12),
            )],
        ),
    );
    let month = Expression::binary(
        month_index,
        BinaryOp::Sub,
        Expression::binary(Expression::integer(12), BinaryOp::Mul, year.clone()),
    );

    Expression::call(
        "STRDT",
        [
            Expression::call(
                "CONCAT",
                [
                    zero_pad(year, 4),
                    Expression::literal(Literal::simple("-")),
                    zero_pad(month, 2),
                    Expression::literal(Literal::simple("-01T00:00:00Z")),
                ],
            ),
            Expression::iri(Iri::new(vocab::XSD_DATE_TIME)),
        ],
    )
}

/// Left-pads the decimal form of a non-negative integer to `width` digits.
fn zero_pad(value: Expression, width: usize) -> Expression {
    let text = Expression::call("STR", [value]);
    Expression::call(
        "SUBSTR",
        [
            Expression::call(
                "CONCAT",
                [Expression::literal(Literal::simple("0".repeat(width))), text.clone()],
            ),
            Expression::binary(
                Expression::call("STRLEN", [text]),
                BinaryOp::Add,
                Expression::integer(1),
            ),
        ],
    )
}
