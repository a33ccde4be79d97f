//! Rule group compilation and flattening.

use rulegraph_adapters::rules::{GroupCombinator, RuleGroup, RuleNode};
use rulegraph_common::types::Variable;
use rulegraph_common::utils::error::Result;
use rulegraph_core::query::{Combinator, Conjunction, Fragment};

use super::operator;
use super::state::QueryState;

/// Compiles a rule group into a conjunction record.
///
/// A group without its own variable pivots on the enclosing group's.
/// Children are merged into the record with [`push_child`].
///
/// # Errors
///
/// Propagates the first error raised by any rule in the subtree.
pub fn compile_group(
    state: &mut QueryState,
    group: &RuleGroup,
    parent_pivot: Option<&str>,
) -> Result<Conjunction> {
    let pivot = group.pivot().or(parent_pivot);
    let combinator = match group.combinator {
        GroupCombinator::And => Combinator::And,
        GroupCombinator::Or => Combinator::Or,
    };
    let mut record = Conjunction::new(combinator, group.not);

    for node in &group.rules {
        let child = match node {
            RuleNode::Group(inner) => {
                let inner = compile_group(state, inner, pivot)?;
                // each UNION alternative is its own scope
                if combinator == Combinator::Or {
                    Child::Record(anchor_exclusions(state, inner, pivot))
                } else {
                    Child::Record(inner)
                }
            }
            RuleNode::Rule(rule) => Child::Clauses(operator::compile_rule(state, rule, pivot)?),
        };
        push_child(&mut record, child);
    }
    Ok(record)
}

/// Gives a scope that only excludes something a pattern to exclude from.
///
/// `FILTER NOT EXISTS` tests the solutions of its own scope. A negated
/// record, or an AND record whose terms are all exclusions and filters,
/// would test the single empty solution. Such scopes are prefixed with
/// `?pivot ?tmpN ?tmpM .` so the exclusion applies to every subject with
/// at least one statement.
pub fn anchor_exclusions(
    state: &mut QueryState,
    record: Conjunction,
    pivot: Option<&str>,
) -> Conjunction {
    let Some(pivot) = pivot else {
        return record;
    };
    if record.is_exclusion() {
        let mut scope = Conjunction::new(Combinator::And, false);
        scope.terms = vec![anchor(state, pivot), Fragment::Conjunction(record)];
        return scope;
    }
    let excludes = record
        .terms
        .iter()
        .filter_map(Fragment::as_conjunction)
        .any(Conjunction::is_exclusion);
    if record.combinator == Combinator::And
        && !record.negated
        && excludes
        && !record.terms.iter().any(Fragment::matches_data)
    {
        let mut record = record;
        record.terms.insert(0, anchor(state, pivot));
        return record;
    }
    record
}

fn anchor(state: &mut QueryState, pivot: &str) -> Fragment {
    let predicate = state.fresh_var();
    let object = state.fresh_var();
    Fragment::triple(Variable::new(pivot), predicate, object)
}

/// A compiled child of a group.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    /// Clause list from a leaf rule.
    Clauses(Vec<Fragment>),
    /// Record from a nested group.
    Record(Conjunction),
}

/// Merges one compiled child into `parent`.
///
/// An un-negated child record with the parent's combinator is spliced
/// into an un-negated parent. Any other non-empty record is kept scoped:
/// as a `{ ... }` block under AND, or as one alternative under OR. A
/// negated record under AND stays unwrapped so its `FILTER NOT EXISTS`
/// sees the parent's solutions. Clause lists are spliced under AND and
/// form a single alternative under OR.
pub fn push_child(parent: &mut Conjunction, child: Child) {
    match child {
        Child::Record(record) if record.is_empty() => {}
        Child::Record(record) if can_splice(parent, &record) => parent.terms.extend(record.terms),
        Child::Record(record) => {
            let scoped = match parent.combinator {
                Combinator::And if record.negated => Fragment::Conjunction(record),
                _ => Fragment::Group(vec![Fragment::Conjunction(record)]),
            };
            parent.terms.push(scoped);
        }
        Child::Clauses(clauses) => match parent.combinator {
            Combinator::And => parent.terms.extend(clauses),
            Combinator::Or => match <[Fragment; 1]>::try_from(clauses) {
                Ok([single]) => parent.terms.push(single),
                Err(clauses) if clauses.is_empty() => {}
                Err(clauses) => parent.terms.push(Fragment::Group(clauses)),
            },
        },
    }
}

// Both records must be un-negated, not merely equal in negation:
// NOT(a, NOT(b)) must not become NOT(a, b). Flattening decision in DESIGN.md.
fn can_splice(parent: &Conjunction, child: &Conjunction) -> bool {
    parent.combinator == child.combinator && !parent.negated && !child.negated
}
