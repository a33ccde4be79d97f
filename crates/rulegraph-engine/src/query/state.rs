//! Per-compile state.

use hashbrown::HashSet;
use rulegraph_adapters::rules::RuleGroup;
use rulegraph_common::types::{Term, Variable};
use rulegraph_core::query::Fragment;

/// Mutable context threaded through one compile call.
///
/// A state is created right before compiling and dropped right after, so
/// temp variable numbering always restarts at `tmp0`.
#[derive(Debug, Default)]
pub struct QueryState {
    /// Next temp variable index.
    temp_var_counter: usize,
    /// Fragments hoisted to the outermost scope.
    global_bounds: Vec<Fragment>,
    /// Variables standing for reified statements.
    statements: HashSet<String>,
    /// Whether statement rewriting is active.
    statement_mode: bool,
}

impl QueryState {
    /// Creates an empty state.
    pub fn new(statement_mode: bool) -> Self {
        Self {
            statement_mode,
            ..Self::default()
        }
    }

    /// Creates a state for compiling `tree`, collecting its statement
    /// variables when statement mode is on.
    pub fn for_tree(tree: &RuleGroup, statement_mode: bool) -> Self {
        let mut state = Self::new(statement_mode);
        if statement_mode {
            state.statements = tree.statement_variables().into_iter().collect();
        }
        state
    }

    /// Allocates the next `tmpN` variable.
    pub fn fresh_var(&mut self) -> Variable {
        self.fresh_named("tmp")
    }

    /// Allocates `<prefix>N` from the shared counter.
    pub fn fresh_named(&mut self, prefix: &str) -> Variable {
        let n = self.temp_var_counter;
        self.temp_var_counter += 1;
        Variable::new(format!("{prefix}{n}"))
    }

    /// Number of variables allocated so far.
    pub fn temp_count(&self) -> usize {
        self.temp_var_counter
    }

    /// Hoists a fragment to the outermost scope.
    pub fn push_global(&mut self, fragment: Fragment) {
        self.global_bounds.push(fragment);
    }

    /// Hoisted fragments, in the order they were added.
    pub fn global_bounds(&self) -> &[Fragment] {
        &self.global_bounds
    }

    /// Removes and returns the hoisted fragments.
    pub fn take_global_bounds(&mut self) -> Vec<Fragment> {
        std::mem::take(&mut self.global_bounds)
    }

    /// Whether statement rewriting is active.
    pub fn statement_mode(&self) -> bool {
        self.statement_mode
    }

    /// Returns true if `term` is a statement variable.
    pub fn is_statement(&self, term: &Term) -> bool {
        self.statement_mode
            && term
                .as_variable()
                .is_some_and(|v| self.statements.contains(v.name()))
    }
}

#[cfg(test)]
mod tests {
    use rulegraph_adapters::rules::{FilterRule, FlexibleTerm, Rule};

    use super::*;

    #[test]
    fn test_fresh_vars_are_sequential() {
        let mut state = QueryState::new(false);
        assert_eq!(state.fresh_var().name(), "tmp0");
        assert_eq!(state.fresh_var().name(), "tmp1");
        assert_eq!(state.fresh_named("p").name(), "p2");
        assert_eq!(state.temp_count(), 3);
    }

    #[test]
    fn test_statement_detection() {
        let tree = RuleGroup::new("main").with_rule(Rule::Filter(FilterRule {
            predicate: Some(FlexibleTerm::manual("<http://p>")),
            input: Some(FlexibleTerm::Statement(Some("stmt".into()))),
            reverse: false,
        }));
        let stmt = Term::Variable(Variable::new("stmt"));

        let state = QueryState::for_tree(&tree, true);
        assert!(state.is_statement(&stmt));
        assert!(!state.is_statement(&Term::Variable(Variable::new("main"))));

        let plain = QueryState::for_tree(&tree, false);
        assert!(!plain.is_statement(&stmt));
    }
}
