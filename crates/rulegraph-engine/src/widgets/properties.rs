//! Every property of one subject.

use rulegraph_adapters::widgets::PropertiesRequest;
use rulegraph_common::types::{Literal, Variable};
use rulegraph_common::utils::error::{Error, Result};
use rulegraph_core::query::{BinaryOp, Expression, Fragment};

use super::QueryBundle;
use crate::config::CompilerConfig;
use crate::query::{QueryAssembler, QueryState, label_binding, resolve};

/// Lists `?p ?o` pairs of the subject with their labels. Literal objects
/// are kept only when untagged or tagged with the label language.
///
/// # Errors
///
/// Returns `MissingValue` when no subject is given, and any error raised
/// while resolving it.
pub fn build(request: &PropertiesRequest, config: &CompilerConfig) -> Result<QueryBundle> {
    let subject = request
        .subject
        .as_ref()
        .ok_or_else(|| Error::MissingValue("properties widget has no subject".into()))?;

    let mut state = QueryState::new(config.statement_mode);
    let resolved = resolve(&mut state, subject)?;

    let p = Variable::new("p");
    let o = Variable::new("o");
    let p_label = label_binding(&p, &config.label_language, false);
    let o_label = label_binding(&o, &config.label_language, false);

    let mut body = resolved.bindings;
    body.push(Fragment::triple(resolved.term, p.clone(), o.clone()));
    body.push(Fragment::Filter(object_filter(&o, &config.label_language)));

    let query = QueryAssembler::new(body)
        .project(p)
        .project(p_label.label.clone())
        .project(o)
        .project(o_label.label.clone())
        .with_labels([p_label, o_label])
        .with_limit(request.limit.unwrap_or(config.default_limit))
        .assemble()?;

    Ok(QueryBundle::primary(query))
}

fn object_filter(o: &Variable, language: &str) -> Expression {
    let lang_matches = |tag: &str| {
        Expression::call(
            "langMatches",
            [
                Expression::call("lang", [Expression::var(o)]),
                Expression::literal(Literal::simple(tag)),
            ],
        )
    };
    Expression::binary(
        Expression::binary(
            Expression::not(Expression::call("isLiteral", [Expression::var(o)])),
            BinaryOp::Or,
            lang_matches(language),
        ),
        BinaryOp::Or,
        lang_matches(""),
    )
}
