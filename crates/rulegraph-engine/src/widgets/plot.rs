//! Chart data: grouped X (and Z) axes against an aggregated Y axis.

use indexmap::IndexSet;
use rulegraph_adapters::rules::Choice;
use rulegraph_adapters::widgets::{AxisKind, PlotAxis, PlotRequest};
use rulegraph_common::types::{Iri, Variable, vocab};
use rulegraph_common::utils::error::{Error, Result};
use rulegraph_core::query::{AggregateFunction, BinaryOp, Expression, Fragment, OrderKey};

use super::QueryBundle;
use crate::config::CompilerConfig;
use crate::query::aggregate::parse_aggregate;
use crate::query::discretize::{is_binned, range_query};
use crate::query::{QueryAssembler, compile_where, discretize, label_bindings};

const RESULT_SUFFIX: &str = "Result";

/// Builds the grouped chart query.
///
/// X and Z values are bucketed when their axis is numeric or date. The
/// auxiliary queries return the observed range of each bucketed axis.
///
/// # Errors
///
/// Returns `NoProjection` when X or Y (or Z, with `xy_only` unset) has no
/// variables, `UnknownDatatype` or `UnknownAggregate` for bad axis
/// settings, and any error raised while compiling the tree.
pub fn build(request: &PlotRequest, config: &CompilerConfig) -> Result<QueryBundle> {
    let x_vars = axis_vars(request.x.as_ref());
    let y_vars = axis_vars(request.y.as_ref());
    let z_vars = if request.xy_only {
        Vec::new()
    } else {
        axis_vars(request.z.as_ref())
    };
    if x_vars.is_empty() || y_vars.is_empty() || (!request.xy_only && z_vars.is_empty()) {
        return Err(Error::NoProjection("plot axes have no variables selected".into()));
    }

    let x_kind = axis_kind(request.x.as_ref())?;
    let z_kind = axis_kind(request.z.as_ref())?;
    let aggregate = parse_aggregate(
        request
            .y
            .as_ref()
            .and_then(|y| y.aggregate.as_ref())
            .map_or("COUNT", Choice::as_str),
    )?;

    let body = compile_where(&request.tree, config.statement_mode)?;
    let mut query_body = body.fragments();
    for v in &x_vars {
        query_body.extend(axis_filters(v, x_kind, config));
    }
    for v in &z_vars {
        query_body.extend(axis_filters(v, z_kind, config));
    }
    if aggregate != AggregateFunction::Count {
        for v in &y_vars {
            query_body.extend(axis_filters(v, AxisKind::Numeric, config));
        }
    }

    let groups_x = request.max_groups_x.unwrap_or(config.default_bins).max(1);
    let groups_z = request.max_groups_z.unwrap_or(config.default_bins).max(1);
    let x_buckets = discretize(&x_vars, x_kind, &query_body, groups_x);
    let z_buckets = discretize(&z_vars, z_kind, &query_body, groups_z);

    let labelled: IndexSet<Variable> = x_vars.iter().chain(&z_vars).cloned().collect();
    let labelled: Vec<Variable> = labelled.into_iter().collect();
    let labels = label_bindings(&labelled, &config.label_language, config.statement_mode);

    let mut assembler = QueryAssembler::new(query_body.clone())
        .with_bounds(x_buckets.bounds)
        .with_bounds(z_buckets.bounds);

    for (v, key) in x_vars.iter().zip(&x_buckets.outputs) {
        assembler = assembler.project_as(Expression::var(key), v.suffixed(RESULT_SUFFIX));
    }
    for v in &y_vars {
        let measure = Expression::aggregate(aggregate, Expression::var(v));
        assembler = assembler.project_as(measure, v.suffixed(RESULT_SUFFIX));
    }
    for (v, key) in z_vars.iter().zip(&z_buckets.outputs) {
        assembler = assembler.project_as(Expression::var(key), v.suffixed(RESULT_SUFFIX));
    }
    for label in &labels {
        let sample = Expression::aggregate(AggregateFunction::Sample, Expression::var(&label.label));
        assembler = assembler.project_as(sample, label.label.suffixed(RESULT_SUFFIX));
    }

    for key in x_buckets.outputs.iter().chain(&z_buckets.outputs) {
        assembler = assembler.group(key.clone());
    }
    for v in &y_vars {
        assembler = assembler.order(OrderKey::desc(Expression::aggregate(
            aggregate,
            Expression::var(v),
        )));
    }

    let limit = if request.xy_only {
        groups_x
    } else {
        groups_x.saturating_mul(groups_z)
    };
    let primary = assembler.with_labels(labels).with_limit(limit).assemble()?;

    let mut auxiliary = Vec::new();
    if is_binned(x_kind) {
        auxiliary.push(range_query(&x_vars, x_kind, &query_body).to_string());
    }
    if is_binned(z_kind) && !z_vars.is_empty() {
        auxiliary.push(range_query(&z_vars, z_kind, &query_body).to_string());
    }

    Ok(QueryBundle { primary, auxiliary })
}

fn axis_vars(axis: Option<&PlotAxis>) -> Vec<Variable> {
    axis.map(|a| a.names().into_iter().map(Variable::new).collect())
        .unwrap_or_default()
}

fn axis_kind(axis: Option<&PlotAxis>) -> Result<AxisKind> {
    axis.map_or(Ok(AxisKind::Categorical), PlotAxis::kind)
}

/// Drops rows whose axis value cannot be plotted on an axis of `kind`.
pub fn axis_filters(v: &Variable, kind: AxisKind, config: &CompilerConfig) -> Vec<Fragment> {
    let bound = Expression::bound(v);
    match kind {
        AxisKind::Categorical => vec![Fragment::Filter(bound)],
        AxisKind::Numeric => vec![Fragment::Filter(Expression::and(
            bound,
            Expression::call("isNumeric", [Expression::var(v)]),
        ))],
        AxisKind::Date => {
            let datatype = Expression::In {
                expression: Box::new(Expression::call("DATATYPE", [Expression::var(v)])),
                list: vec![
                    Expression::iri(Iri::new(vocab::XSD_DATE)),
                    Expression::iri(Iri::new(vocab::XSD_DATE_TIME)),
                ],
            };
            let year = || Expression::call("YEAR", [Expression::var(v)]);
            let (after, before) = config.year_range;
            vec![
                Fragment::Filter(Expression::and(bound, datatype)),
                Fragment::Filter(Expression::and(
                    Expression::binary(year(), BinaryOp::Gt, Expression::integer(i64::from(after))),
                    Expression::binary(year(), BinaryOp::Lt, Expression::integer(i64::from(before))),
                )),
            ]
        }
    }
}
