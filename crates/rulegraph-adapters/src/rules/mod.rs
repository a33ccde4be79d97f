//! Rule tree input model.
//!
//! [`RuleGroup`] is the root of every query the editor produces. Leaf
//! [`Rule`]s are dispatched on their `operator` tag and term slots hold a
//! [`FlexibleTerm`].

mod ast;
mod de;

pub use ast::{
    Choice, ClassRule, CompareOp, ComparisonRule, DatatypeCheck, DatatypeRule, FilterRule,
    FlexibleTerm, FunctionKind, FunctionRule, GroupCombinator, Rule, RuleGroup, RuleNode,
    SearchTerm, SearchTermKind, ValueType, VariableRef,
};

use indexmap::IndexSet;

impl RuleGroup {
    /// Every variable name the tree mentions, in first-seen order: group
    /// pivots, named inputs and predicates, and function outputs.
    pub fn variables(&self) -> Vec<String> {
        let mut seen = IndexSet::new();
        self.collect_variables(&mut seen);
        seen.into_iter().collect()
    }

    /// Names of variables that stand for reified statements.
    pub fn statement_variables(&self) -> IndexSet<String> {
        let mut seen = IndexSet::new();
        self.visit_terms(&mut |term| {
            if let FlexibleTerm::Statement(Some(name)) = term
                && !name.is_empty()
            {
                seen.insert(name.clone());
            }
        });
        seen
    }

    /// Number of leaf rules in the tree.
    pub fn rule_count(&self) -> usize {
        self.rules
            .iter()
            .map(|node| match node {
                RuleNode::Group(group) => group.rule_count(),
                RuleNode::Rule(_) => 1,
            })
            .sum()
    }

    fn collect_variables(&self, seen: &mut IndexSet<String>) {
        if let Some(pivot) = self.pivot() {
            seen.insert(pivot.to_string());
        }
        for node in &self.rules {
            match node {
                RuleNode::Group(group) => group.collect_variables(seen),
                RuleNode::Rule(rule) => {
                    for term in rule.terms() {
                        if let Some(name) = term.variable_name() {
                            seen.insert(name.to_string());
                        }
                    }
                    if let Rule::Function(func) = rule
                        && let Some(name) = func.output.as_ref().and_then(VariableRef::name)
                    {
                        seen.insert(name.to_string());
                    }
                }
            }
        }
    }

    fn visit_terms(&self, visit: &mut impl FnMut(&FlexibleTerm)) {
        for node in &self.rules {
            match node {
                RuleNode::Group(group) => group.visit_terms(visit),
                RuleNode::Rule(rule) => rule.terms().into_iter().for_each(&mut *visit),
            }
        }
    }
}

impl Rule {
    /// The flexible terms held in this rule's payload.
    pub fn terms(&self) -> Vec<&FlexibleTerm> {
        match self {
            Rule::Filter(f) | Rule::FilterPath(f) => {
                f.predicate.iter().chain(f.input.iter()).collect()
            }
            Rule::SubclassOf(c) | Rule::InstanceOf(c) => c.input.iter().collect(),
            Rule::Datatype(_) | Rule::Operator(_) | Rule::Function(_) | Rule::Unknown(_) => {
                Vec::new()
            }
        }
    }
}
