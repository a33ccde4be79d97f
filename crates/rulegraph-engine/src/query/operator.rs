//! Leaf rule compilation.
//!
//! Every rule compiles to an ordered clause list: binding clauses first,
//! then the pattern or filter they feed. `datatype` rules compile to no
//! local clauses; their filter is hoisted into the state's global bounds.

use rulegraph_adapters::rules::{
    ClassRule, CompareOp, ComparisonRule, DatatypeCheck, FilterRule, FlexibleTerm, FunctionKind,
    FunctionRule, Rule, ValueType, VariableRef,
};
use rulegraph_common::types::vocab::{self, P, PQ, PS, WDT};
use rulegraph_common::types::{Iri, Literal, Term, Variable};
use rulegraph_common::utils::error::{Error, Result};
use rulegraph_core::query::{BinaryOp, Expression, Fragment, Predicate, PropertyPath};

use super::state::QueryState;
use super::term_resolver::{self, Resolved};

/// Compiles one leaf rule anchored on `pivot`.
///
/// # Errors
///
/// Returns `UnknownOperator` for an unrecognized operator tag, and any
/// error raised while resolving the rule's terms.
pub fn compile_rule(
    state: &mut QueryState,
    rule: &Rule,
    pivot: Option<&str>,
) -> Result<Vec<Fragment>> {
    tracing::trace!(operator = rule.operator(), pivot, "compiling rule");
    let pivot = FlexibleTerm::Variable(pivot.map(str::to_string));
    match rule {
        Rule::Filter(filter) | Rule::FilterPath(filter) => compile_filter(state, filter, &pivot),
        Rule::Datatype(dt) => {
            let check = dt.check()?;
            let subject = term_resolver::resolve(state, &pivot)?;
            state.push_global(datatype_filter(&subject.term, check));
            Ok(Vec::new())
        }
        Rule::Operator(cmp) => compile_comparison(state, cmp, &pivot),
        Rule::Function(func) => compile_function(func, &pivot),
        Rule::SubclassOf(class) => compile_class(state, class, &pivot, true),
        Rule::InstanceOf(class) => compile_class(state, class, &pivot, false),
        Rule::Unknown(tag) => Err(Error::UnknownOperator(tag.clone())),
    }
}

fn compile_filter(
    state: &mut QueryState,
    filter: &FilterRule,
    pivot: &FlexibleTerm,
) -> Result<Vec<Fragment>> {
    let predicate = filter
        .predicate
        .as_ref()
        .ok_or_else(|| Error::MissingValue("filter rule has no predicate".into()))?;
    let input = filter
        .input
        .as_ref()
        .ok_or_else(|| Error::MissingValue("filter rule has no input".into()))?;
    let (subject, object) = if filter.reverse {
        (input, pivot)
    } else {
        (pivot, input)
    };
    compile_triple(state, subject, predicate, object)
}

/// Compiles `subject predicate object`, applying statement rewrites when
/// either end is a statement variable.
fn compile_triple(
    state: &mut QueryState,
    subject: &FlexibleTerm,
    predicate: &FlexibleTerm,
    object: &FlexibleTerm,
) -> Result<Vec<Fragment>> {
    let s = term_resolver::resolve(state, subject)?;
    let mut p = term_resolver::resolve(state, predicate)?;
    let o = term_resolver::resolve(state, object)?;

    let mut extra = Vec::new();
    let subject_is_stmt = state.is_statement(&s.term);
    let object_is_stmt = state.is_statement(&o.term);
    if subject_is_stmt || object_is_stmt {
        rewrite_statement_predicate(state, &mut p, &o, subject_is_stmt, object_is_stmt, &mut extra);
    }

    let Resolved {
        term: s_term,
        bindings: mut out,
    } = s;
    out.extend(p.bindings);
    out.extend(o.bindings);
    out.push(Fragment::triple(s_term, p.term, o.term));
    out.extend(extra);
    Ok(out)
}

fn rewrite_statement_predicate(
    state: &mut QueryState,
    predicate: &mut Resolved,
    object: &Resolved,
    subject_is_stmt: bool,
    object_is_stmt: bool,
    extra: &mut Vec<Fragment>,
) {
    let Some(values) = predicate.values_mut() else {
        return;
    };

    if subject_is_stmt {
        // ?stmt wdt:X ?o  also matches  ?stmt ps:X ?o  and  ?stmt pq:X ?o
        let value_props: Vec<Term> = values.iter().flat_map(direct_to_value_props).collect();
        values.extend(value_props);
    }

    if object_is_stmt && let Some(stmt) = object.term.as_variable() {
        let link = state.fresh_var();
        let mut link_props = values.clone();
        link_props.extend(values.iter().flat_map(direct_to_value_props));
        extra.push(Fragment::values(link.clone(), link_props));
        extra.push(Fragment::triple(stmt.clone(), link, stmt.suffixed("Value")));

        // ?s wdt:X ?stmt  becomes  ?s p:X ?stmt
        let (direct, other): (Vec<Term>, Vec<Term>) =
            values.drain(..).partition(|t| direct_local_name(t).is_some());
        values.extend(other);
        values.extend(
            direct
                .iter()
                .filter_map(direct_local_name)
                .map(|local| Term::Iri(P.iri(local))),
        );
    }
}

fn direct_local_name(term: &Term) -> Option<&str> {
    term.as_iri().and_then(|iri| WDT.local_name(iri))
}

fn direct_to_value_props(term: &Term) -> Vec<Term> {
    direct_local_name(term)
        .map(|local| vec![Term::Iri(PS.iri(local)), Term::Iri(PQ.iri(local))])
        .unwrap_or_default()
}

/// Builds the hoisted filter for a `datatype` rule.
pub fn datatype_filter(subject: &Term, check: DatatypeCheck) -> Fragment {
    let x = Expression::Term(subject.clone());
    let bound = || Expression::call("BOUND", [x.clone()]);
    let shape = |func: &'static str| Expression::and(bound(), Expression::call(func, [x.clone()]));
    let datatype_in = |iris: &[&str]| {
        Expression::and(
            bound(),
            Expression::In {
                expression: Box::new(Expression::call("DATATYPE", [x.clone()])),
                list: iris.iter().map(|iri| Expression::iri(Iri::new(*iri))).collect(),
            },
        )
    };

    let expr = match check {
        DatatypeCheck::Null => Expression::binary(
            Expression::not(bound()),
            BinaryOp::Or,
            Expression::call("isBLANK", [x.clone()]),
        ),
        DatatypeCheck::NonNull => bound(),
        DatatypeCheck::Iri => shape("isIRI"),
        DatatypeCheck::Url => shape("isURI"),
        DatatypeCheck::Literal => shape("isLITERAL"),
        DatatypeCheck::Number => shape("isNumeric"),
        DatatypeCheck::String => datatype_in(&[vocab::XSD_STRING]),
        DatatypeCheck::Integer => datatype_in(&[vocab::XSD_INTEGER]),
        DatatypeCheck::Boolean => datatype_in(&[vocab::XSD_BOOLEAN]),
        DatatypeCheck::Datetime => datatype_in(&[vocab::XSD_DATE, vocab::XSD_DATE_TIME]),
        DatatypeCheck::Float => {
            datatype_in(&[vocab::XSD_FLOAT, vocab::XSD_DOUBLE, vocab::XSD_DECIMAL])
        }
    };
    Fragment::Filter(expr)
}

fn compile_comparison(
    state: &mut QueryState,
    cmp: &ComparisonRule,
    pivot: &FlexibleTerm,
) -> Result<Vec<Fragment>> {
    let op = cmp.op()?;
    let Resolved {
        term: subject,
        bindings: mut out,
    } = term_resolver::resolve(state, pivot)?;
    let x = Expression::Term(subject);

    let binary = match op {
        CompareOp::Null => {
            out.push(Fragment::Filter(Expression::not(Expression::call("BOUND", [x]))));
            return Ok(out);
        }
        CompareOp::NotNull => {
            out.push(Fragment::Filter(Expression::call("BOUND", [x])));
            return Ok(out);
        }
        CompareOp::Raw => {
            let text = cmp
                .operand_text()
                .ok_or_else(|| Error::MissingValue("raw filter has no expression".into()))?;
            out.push(Fragment::Filter(Expression::Raw(text)));
            return Ok(out);
        }
        CompareOp::Eq => BinaryOp::Eq,
        CompareOp::Neq => BinaryOp::Ne,
        CompareOp::Gt => BinaryOp::Gt,
        CompareOp::Gte => BinaryOp::Ge,
        CompareOp::Lt => BinaryOp::Lt,
        CompareOp::Lte => BinaryOp::Le,
    };

    let operand = match cmp.dtype()? {
        ValueType::Term => {
            let resolved = term_resolver::resolve(state, &cmp.operand_term()?)?;
            out.extend(resolved.bindings);
            resolved.term
        }
        dtype => Term::Literal(typed_literal(dtype, cmp)?),
    };
    out.push(Fragment::Filter(Expression::binary(
        x,
        binary,
        Expression::Term(operand),
    )));
    Ok(out)
}

fn typed_literal(dtype: ValueType, cmp: &ComparisonRule) -> Result<Literal> {
    let text = cmp
        .operand_text()
        .ok_or_else(|| Error::MissingValue("comparison has no operand".into()))?;
    let datatype = match dtype {
        ValueType::String => return Ok(Literal::simple(text)),
        ValueType::Boolean => vocab::XSD_BOOLEAN,
        ValueType::Integer => vocab::XSD_INTEGER,
        ValueType::Decimal => vocab::XSD_DECIMAL,
        ValueType::Datetime => vocab::XSD_DATE_TIME,
        ValueType::Url => vocab::XSD_ANY_URI,
        ValueType::Term => return Err(Error::Internal("term operand typed as literal".into())),
    };
    Ok(Literal::typed(text, Iri::new(datatype)))
}

fn compile_function(func: &FunctionRule, pivot: &FlexibleTerm) -> Result<Vec<Fragment>> {
    match func.kind()? {
        FunctionKind::Raw => {
            let text = func
                .raw_fn
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| Error::MissingValue("raw function has no expression".into()))?;
            let output = func
                .output
                .as_ref()
                .and_then(VariableRef::name)
                .or_else(|| pivot.variable_name())
                .ok_or_else(|| Error::MissingValue("function has no output variable".into()))?;
            Ok(vec![Fragment::bind(
                Expression::Raw(text.to_string()),
                Variable::new(output),
            )])
        }
    }
}

fn compile_class(
    state: &mut QueryState,
    class: &ClassRule,
    pivot: &FlexibleTerm,
    transitive: bool,
) -> Result<Vec<Fragment>> {
    let input = class
        .input
        .as_ref()
        .ok_or_else(|| Error::MissingValue("class rule has no input".into()))?;
    let subject = term_resolver::resolve(state, pivot)?;
    let object = term_resolver::resolve(state, input)?;

    let (type_iri, subclass_iri) = if state.statement_mode() {
        (vocab::WDT_INSTANCE_OF, vocab::WDT_SUBCLASS_OF)
    } else {
        (vocab::RDF_TYPE, vocab::RDFS_SUBCLASS_OF)
    };
    let predicate = if transitive {
        Predicate::Path(PropertyPath::sequence(
            PropertyPath::Iri(Iri::new(type_iri)),
            PropertyPath::zero_or_more(PropertyPath::Iri(Iri::new(subclass_iri))),
        ))
    } else {
        Predicate::from(Iri::new(type_iri))
    };

    let mut out = subject.bindings;
    out.extend(object.bindings);
    out.push(Fragment::triple(subject.term, predicate, object.term));
    Ok(out)
}
