//! Rule tree compilation.
//!
//! - [`state`] - Per-compile context (temp variables, hoisted fragments)
//! - [`term_resolver`] - Flexible terms to triple slots
//! - [`operator`] - Leaf rules to clauses
//! - [`conjunction`] - Groups to conjunction records, with flattening
//! - [`label`] - Optional label lookups
//! - [`aggregate`] - Aggregate keywords
//! - [`discretize`] - Histogram bucketing
//! - [`assembler`] - Final SELECT assembly

pub mod aggregate;
pub mod assembler;
pub mod conjunction;
pub mod discretize;
pub mod label;
pub mod operator;
pub mod state;
pub mod term_resolver;

pub use assembler::QueryAssembler;
pub use conjunction::{anchor_exclusions, compile_group};
pub use discretize::{Discretization, discretize};
pub use label::{LabelBinding, label_binding, label_bindings};
pub use state::QueryState;
pub use term_resolver::{Resolved, resolve};

use rulegraph_adapters::rules::RuleGroup;
use rulegraph_common::utils::error::{Error, Result};
use rulegraph_core::query::{Conjunction, Fragment, render_fragments};

/// A compiled WHERE body.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledBody {
    /// The root group's record.
    pub root: Conjunction,
    /// Fragments hoisted out of nested scopes.
    pub global_bounds: Vec<Fragment>,
    /// Temp variables allocated while compiling.
    pub temp_vars: usize,
}

impl CompiledBody {
    /// The body as a fragment list: root record, then hoisted fragments.
    pub fn fragments(&self) -> Vec<Fragment> {
        let mut fragments = Vec::with_capacity(1 + self.global_bounds.len());
        fragments.push(Fragment::Conjunction(self.root.clone()));
        fragments.extend(self.global_bounds.iter().cloned());
        fragments
    }

    /// Renders the body without surrounding braces.
    pub fn render(&self) -> String {
        render_fragments(&self.fragments())
    }
}

/// Compiles a rule tree with a fresh [`QueryState`].
///
/// # Errors
///
/// Returns `MissingValue` when the root group has no pivot variable, and
/// otherwise the first error raised by a rule.
pub fn compile_where(tree: &RuleGroup, statement_mode: bool) -> Result<CompiledBody> {
    let mut state = QueryState::for_tree(tree, statement_mode);
    compile_where_with(&mut state, tree)
}

/// Compiles a rule tree against an existing state.
///
/// Hoisted fragments are drained from `state`; its temp counter keeps
/// running.
///
/// # Errors
///
/// See [`compile_where`].
pub fn compile_where_with(state: &mut QueryState, tree: &RuleGroup) -> Result<CompiledBody> {
    if tree.pivot().is_none() {
        return Err(Error::MissingValue("root group has no variable".into()));
    }

    let root = compile_group(state, tree, None)?;
    let root = anchor_exclusions(state, root, tree.pivot());
    let global_bounds = state.take_global_bounds();
    let temp_vars = state.temp_count();

    tracing::debug!(
        rules = tree.rule_count(),
        temp_vars,
        global_bounds = global_bounds.len(),
        "compiled rule tree"
    );

    Ok(CompiledBody {
        root,
        global_bounds,
        temp_vars,
    })
}

#[cfg(test)]
mod tests {
    use rulegraph_adapters::rules::{DatatypeRule, FilterRule, FlexibleTerm, GroupCombinator, Rule};

    use super::*;

    fn filter(predicate: &str, object: FlexibleTerm) -> Rule {
        Rule::Filter(FilterRule {
            predicate: Some(FlexibleTerm::manual(predicate)),
            input: Some(object),
            reverse: false,
        })
    }

    #[test]
    fn test_manual_predicate_example() {
        let tree = RuleGroup::new("main")
            .with_rule(filter("<http://ex.org/p>", FlexibleTerm::variable("main2")));
        let body = compile_where(&tree, false).unwrap();
        assert_eq!(body.temp_vars, 1);
        assert_eq!(
            body.render(),
            "VALUES ?tmp0 { <http://ex.org/p> }\n?main ?tmp0 ?main2 ."
        );
    }

    #[test]
    fn test_global_bounds_follow_root() {
        let tree = RuleGroup::new("main")
            .with_combinator(GroupCombinator::Or)
            .with_rule(filter("<http://ex.org/a>", FlexibleTerm::variable("x")))
            .with_rule(Rule::Datatype(DatatypeRule {
                value: Some("non_null".into()),
            }));
        let body = compile_where(&tree, false).unwrap();
        assert_eq!(body.global_bounds.len(), 1);
        assert_eq!(body.fragments().len(), 2);
        assert!(body.render().ends_with("FILTER(BOUND(?main))"));
    }

    #[test]
    fn test_missing_root_pivot() {
        let mut tree = RuleGroup::new("main");
        tree.variable = None;
        assert!(matches!(compile_where(&tree, false), Err(Error::MissingValue(_))));
    }

    #[test]
    fn test_deterministic() {
        let tree = RuleGroup::new("main")
            .with_rule(filter("<http://ex.org/a>, <http://ex.org/b>", FlexibleTerm::Any))
            .with_group(
                RuleGroup::new("main")
                    .with_not(true)
                    .with_rule(filter("<http://ex.org/c>", FlexibleTerm::variable("y"))),
            );
        let first = compile_where(&tree, false).unwrap().render();
        let second = compile_where(&tree, false).unwrap().render();
        assert_eq!(first, second);
    }

    #[test]
    fn test_negated_root_is_anchored() {
        let tree = RuleGroup::new("main")
            .with_not(true)
            .with_rule(filter("<http://ex.org/b>", FlexibleTerm::variable("b")));
        let body = compile_where(&tree, false).unwrap();
        assert_eq!(body.temp_vars, 3);
        assert!(!body.root.negated);
        assert_eq!(
            body.render(),
            "?main ?tmp1 ?tmp2 .\nFILTER NOT EXISTS {\n  VALUES ?tmp0 { <http://ex.org/b> }\n  ?main ?tmp0 ?b .\n}"
        );
    }

    #[test]
    fn test_root_of_only_exclusions_is_anchored() {
        let tree = RuleGroup::new("main").with_group(
            RuleGroup::new("main")
                .with_not(true)
                .with_rule(filter("<http://ex.org/b>", FlexibleTerm::variable("b"))),
        );
        let body = compile_where(&tree, false).unwrap();
        assert_eq!(
            body.render(),
            "?main ?tmp1 ?tmp2 .\nFILTER NOT EXISTS {\n  VALUES ?tmp0 { <http://ex.org/b> }\n  ?main ?tmp0 ?b .\n}"
        );
    }

    #[test]
    fn test_empty_tree_is_noop() {
        let body = compile_where(&RuleGroup::new("main"), false).unwrap();
        assert_eq!(body.render(), "");
    }
}
