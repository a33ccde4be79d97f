//! Graph pattern fragments.
//!
//! A [`Fragment`] is one piece of a WHERE body. Conjunction records keep
//! their combinator and negation flag until rendering so an enclosing
//! group can decide whether to splice them or keep them scoped.

use std::fmt;

use rulegraph_common::types::{Iri, Term, Variable};

use super::expression::Expression;
use super::select::SelectQuery;

/// How the terms of a conjunction are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// All terms must match.
    And,
    /// At least one term must match (union of alternatives).
    Or,
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::And => f.write_str("AND"),
            Combinator::Or => f.write_str("OR"),
        }
    }
}

/// A property path in predicate position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyPath {
    /// A single predicate IRI.
    Iri(Iri),
    /// `a/b/c`
    Sequence(Vec<PropertyPath>),
    /// `a*`
    ZeroOrMore(Box<PropertyPath>),
}

impl PropertyPath {
    /// `first/then`
    pub fn sequence(first: PropertyPath, then: PropertyPath) -> Self {
        PropertyPath::Sequence(vec![first, then])
    }

    /// `path*`
    pub fn zero_or_more(path: PropertyPath) -> Self {
        PropertyPath::ZeroOrMore(Box::new(path))
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyPath::Iri(iri) => write!(f, "{iri}"),
            PropertyPath::Sequence(steps) => {
                for (i, step) in steps.iter().enumerate() {
                    if i > 0 {
                        f.write_str("/")?;
                    }
                    write!(f, "{step}")?;
                }
                Ok(())
            }
            PropertyPath::ZeroOrMore(inner) => match inner.as_ref() {
                PropertyPath::Iri(_) => write!(f, "{inner}*"),
                _ => write!(f, "({inner})*"),
            },
        }
    }
}

/// The predicate slot of a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// A plain term (usually a variable bound by VALUES).
    Term(Term),
    /// A property path.
    Path(PropertyPath),
}

impl From<Term> for Predicate {
    fn from(term: Term) -> Self {
        Predicate::Term(term)
    }
}

impl From<Variable> for Predicate {
    fn from(v: Variable) -> Self {
        Predicate::Term(Term::Variable(v))
    }
}

impl From<Iri> for Predicate {
    fn from(iri: Iri) -> Self {
        Predicate::Term(Term::Iri(iri))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Term(term) => write!(f, "{term}"),
            Predicate::Path(path) => write!(f, "{path}"),
        }
    }
}

/// A triple pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    /// Subject.
    pub subject: Term,
    /// Predicate or property path.
    pub predicate: Predicate,
    /// Object.
    pub object: Term,
}

impl TriplePattern {
    /// Creates a triple pattern.
    pub fn new(
        subject: impl Into<Term>,
        predicate: impl Into<Predicate>,
        object: impl Into<Term>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// A combinator record produced by compiling one rule group.
#[derive(Debug, Clone, PartialEq)]
pub struct Conjunction {
    /// How the terms are joined.
    pub combinator: Combinator,
    /// Whether the whole record is an exclusion.
    pub negated: bool,
    /// The joined terms. For OR each term is one alternative.
    pub terms: Vec<Fragment>,
}

impl Conjunction {
    /// Creates an empty record.
    pub fn new(combinator: Combinator, negated: bool) -> Self {
        Self {
            combinator,
            negated,
            terms: Vec::new(),
        }
    }

    /// Returns true if the record has no terms and therefore renders to
    /// nothing.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns true for a negated record that renders to something.
    pub fn is_exclusion(&self) -> bool {
        self.negated && !self.terms.iter().all(Fragment::is_empty)
    }
}

/// One piece of a WHERE body.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// `s p o .`
    Triple(TriplePattern),

    /// `VALUES ?v { t1 t2 }`
    Values {
        /// The bound variable.
        variable: Variable,
        /// Allowed values, in order.
        terms: Vec<Term>,
    },

    /// `FILTER(expr)`
    Filter(Expression),

    /// `BIND(expr AS ?v)`
    Bind {
        /// The computed expression.
        expression: Expression,
        /// The target variable.
        variable: Variable,
    },

    /// `OPTIONAL { ... }`
    Optional(Vec<Fragment>),

    /// An explicit nested scope `{ ... }`.
    Group(Vec<Fragment>),

    /// A combinator record (see [`Conjunction`]).
    Conjunction(Conjunction),

    /// A nested `{ SELECT ... }` block.
    SubSelect(Box<SelectQuery>),
}

impl Fragment {
    /// A triple pattern fragment.
    pub fn triple(
        subject: impl Into<Term>,
        predicate: impl Into<Predicate>,
        object: impl Into<Term>,
    ) -> Self {
        Fragment::Triple(TriplePattern::new(subject, predicate, object))
    }

    /// A VALUES binding.
    pub fn values(variable: Variable, terms: Vec<Term>) -> Self {
        Fragment::Values { variable, terms }
    }

    /// A BIND clause.
    pub fn bind(expression: Expression, variable: Variable) -> Self {
        Fragment::Bind {
            expression,
            variable,
        }
    }

    /// Returns true if this fragment renders to no text.
    pub fn is_empty(&self) -> bool {
        match self {
            Fragment::Conjunction(c) => c.terms.iter().all(Fragment::is_empty),
            Fragment::Group(inner) => inner.iter().all(Fragment::is_empty),
            _ => false,
        }
    }

    /// Returns true if the fragment matches graph data by itself. Filters,
    /// binds, VALUES rows, OPTIONAL blocks and exclusions only narrow or
    /// extend solutions produced elsewhere.
    pub fn matches_data(&self) -> bool {
        match self {
            Fragment::Triple(_) | Fragment::SubSelect(_) => true,
            Fragment::Group(inner) => inner.iter().any(Fragment::matches_data),
            Fragment::Conjunction(c) => !c.negated && c.terms.iter().any(Fragment::matches_data),
            Fragment::Values { .. }
            | Fragment::Filter(_)
            | Fragment::Bind { .. }
            | Fragment::Optional(_) => false,
        }
    }

    /// Returns the conjunction record if this is one.
    pub fn as_conjunction(&self) -> Option<&Conjunction> {
        match self {
            Fragment::Conjunction(c) => Some(c),
            _ => None,
        }
    }
}

impl From<TriplePattern> for Fragment {
    fn from(triple: TriplePattern) -> Self {
        Fragment::Triple(triple)
    }
}

impl From<Conjunction> for Fragment {
    fn from(c: Conjunction) -> Self {
        Fragment::Conjunction(c)
    }
}
