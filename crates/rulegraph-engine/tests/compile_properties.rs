//! Property tests for rule tree compilation.
//!
//! 1. Compiling the same tree twice gives identical text
//! 2. Temp variables are exactly `tmp0..tmpN-1`
//! 3. Trees of un-negated AND groups flatten completely
//! 4. Every scope that excludes something also matches data
//! 5. Bucket binds divide by the bucket count and guard an empty range

use std::collections::BTreeSet;

use proptest::prelude::*;
use rulegraph_adapters::rules::{
    ClassRule, DatatypeRule, FilterRule, FlexibleTerm, GroupCombinator, Rule, RuleGroup,
};
use rulegraph_adapters::widgets::AxisKind;
use rulegraph_common::types::Variable;
use rulegraph_core::query::{Combinator, Conjunction, Fragment};
use rulegraph_engine::compile_where;
use rulegraph_engine::query::discretize;

// ============================================================================
// Strategies
// ============================================================================

/// Terms that never fail to resolve.
fn term_strategy() -> impl Strategy<Value = FlexibleTerm> {
    prop_oneof![
        "[a-z]{1,3}".prop_map(FlexibleTerm::variable),
        prop::collection::vec("[a-z]{1,4}", 1..3).prop_map(|locals| {
            let iris: Vec<String> = locals.iter().map(|l| format!("<http://ex.org/{l}>")).collect();
            FlexibleTerm::manual(iris.join(", "))
        }),
        Just(FlexibleTerm::Any),
    ]
}

fn rule_strategy() -> impl Strategy<Value = Rule> {
    prop_oneof![
        (term_strategy(), term_strategy(), any::<bool>()).prop_map(|(predicate, input, reverse)| {
            Rule::Filter(FilterRule {
                predicate: Some(predicate),
                input: Some(input),
                reverse,
            })
        }),
        prop_oneof![Just("non_null"), Just("integer"), Just("iri"), Just("datetime")]
            .prop_map(|tag| Rule::Datatype(DatatypeRule { value: Some(tag.into()) })),
        term_strategy().prop_map(|input| Rule::SubclassOf(ClassRule { input: Some(input) })),
    ]
}

fn group(rules: Vec<Rule>, children: Vec<RuleGroup>, or: bool, not: bool) -> RuleGroup {
    let combinator = if or { GroupCombinator::Or } else { GroupCombinator::And };
    let group = RuleGroup::new("main").with_combinator(combinator).with_not(not);
    let group = rules.into_iter().fold(group, RuleGroup::with_rule);
    children.into_iter().fold(group, RuleGroup::with_group)
}

/// Arbitrary nested trees.
fn tree_strategy() -> impl Strategy<Value = RuleGroup> {
    let leaf = (prop::collection::vec(rule_strategy(), 0..4), any::<bool>(), any::<bool>())
        .prop_map(|(rules, or, not)| group(rules, Vec::new(), or, not));
    leaf.prop_recursive(3, 32, 4, |inner| {
        (
            prop::collection::vec(rule_strategy(), 0..3),
            prop::collection::vec(inner, 0..3),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(rules, children, or, not)| group(rules, children, or, not))
    })
}

/// Trees whose groups are all un-negated ANDs of filter rules.
fn and_tree_strategy() -> impl Strategy<Value = RuleGroup> {
    let filter = (term_strategy(), term_strategy()).prop_map(|(predicate, input)| {
        Rule::Filter(FilterRule {
            predicate: Some(predicate),
            input: Some(input),
            reverse: false,
        })
    })
    .boxed();
    let leaf = prop::collection::vec(filter.clone(), 0..4)
        .prop_map(|rules| group(rules, Vec::new(), false, false));
    leaf.prop_recursive(3, 32, 4, move |inner| {
        (prop::collection::vec(filter.clone(), 0..3), prop::collection::vec(inner, 0..3))
            .prop_map(|(rules, children)| group(rules, children, false, false))
    })
}

fn temp_indices(text: &str) -> BTreeSet<usize> {
    text.split(|c: char| !c.is_ascii_alphanumeric() && c != '?')
        .filter_map(|token| token.strip_prefix("?tmp"))
        .filter_map(|n| n.parse().ok())
        .collect()
}

/// Checks an AND scope: an exclusion needs a data-matching sibling to
/// test. The body of an exclusion sees the outer solution, so it is not
/// descended into.
fn and_scope_is_anchored(terms: &[Fragment]) -> bool {
    let excludes = terms
        .iter()
        .filter_map(Fragment::as_conjunction)
        .any(Conjunction::is_exclusion);
    (!excludes || terms.iter().any(Fragment::matches_data)) && terms.iter().all(nested_is_anchored)
}

fn nested_is_anchored(fragment: &Fragment) -> bool {
    match fragment {
        Fragment::Conjunction(c) if c.negated => true,
        Fragment::Conjunction(c) if c.combinator == Combinator::Or => {
            c.terms.iter().all(|alternative| match alternative {
                Fragment::Group(inner) => and_scope_is_anchored(inner),
                other => nested_is_anchored(other),
            })
        }
        Fragment::Conjunction(c) => and_scope_is_anchored(&c.terms),
        Fragment::Group(inner) => and_scope_is_anchored(inner),
        _ => true,
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn compile_is_deterministic(tree in tree_strategy()) {
        let first = compile_where(&tree, false).unwrap().render();
        let second = compile_where(&tree, false).unwrap().render();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn temp_vars_are_dense(tree in tree_strategy()) {
        let body = compile_where(&tree, false).unwrap();
        let seen = temp_indices(&body.render());
        let expected: BTreeSet<usize> = (0..body.temp_vars).collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn and_trees_flatten(tree in and_tree_strategy()) {
        let body = compile_where(&tree, false).unwrap();
        for term in &body.root.terms {
            prop_assert!(
                !matches!(term, Fragment::Group(_) | Fragment::Conjunction(_)),
                "unexpected scope in flattened body: {}",
                term
            );
        }
        prop_assert!(body.global_bounds.is_empty());
    }

    #[test]
    fn exclusions_are_anchored(tree in tree_strategy()) {
        let body = compile_where(&tree, false).unwrap();
        prop_assert!(!body.root.is_exclusion());
        prop_assert!(
            nested_is_anchored(&Fragment::Conjunction(body.root.clone())),
            "exclusion without data to test:\n{}",
            body.render()
        );
        prop_assert!(!body.render().contains("MINUS"));
    }

    #[test]
    fn bucket_binds_follow_bins(name in "[a-z][a-zA-Z0-9]{0,6}", bins in 0usize..200) {
        let result = discretize(&[Variable::new(name.as_str())], AxisKind::Numeric, &[], bins);
        let text: Vec<String> = result.bounds.iter().map(ToString::to_string).collect();
        prop_assert_eq!(
            &text[1],
            &format!("BIND((?{name}Max - ?{name}Min) / {} AS ?{name}Step)", bins.max(1))
        );
        prop_assert_eq!(
            &text[3],
            &format!(
                "BIND(IF(?{name}Step = 0, ?{name}Min, (FLOOR(0.5 + ((?{name}Continue - ?{name}Min) / ?{name}Step)) * ?{name}Step) + ?{name}Min) AS ?{name}Discrete)"
            )
        );
        prop_assert_eq!(result.outputs, vec![Variable::new(format!("{name}Bucket"))]);
    }
}
