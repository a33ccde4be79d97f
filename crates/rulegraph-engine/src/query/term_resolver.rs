//! Term resolution.
//!
//! Turns one [`FlexibleTerm`] into the term that goes into a triple slot,
//! plus any VALUES clauses that constrain it.

use rulegraph_adapters::rules::{FlexibleTerm, SearchTerm, SearchTermKind};
use rulegraph_common::types::{Iri, Literal, Term, Variable};
use rulegraph_common::utils::error::{Error, Result};
use rulegraph_core::query::Fragment;

use super::state::QueryState;

/// A resolved term and the clauses that bind it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// The variable or constant placed in the pattern.
    pub term: Term,
    /// Clauses to emit before the pattern.
    pub bindings: Vec<Fragment>,
}

impl Resolved {
    fn bare(term: Term) -> Self {
        Self {
            term,
            bindings: Vec::new(),
        }
    }

    /// The values of the leading VALUES clause, if any.
    pub fn values_mut(&mut self) -> Option<&mut Vec<Term>> {
        match self.bindings.first_mut() {
            Some(Fragment::Values { terms, .. }) => Some(terms),
            _ => None,
        }
    }
}

/// Resolves a flexible term.
///
/// Manual and search terms allocate one temp variable each, bound by a
/// single VALUES clause. Wildcards allocate an unbound temp variable.
///
/// # Errors
///
/// Returns `MissingValue` when the term lacks the data its type requires
/// and `UnknownTermType` for an unrecognized type tag.
pub fn resolve(state: &mut QueryState, term: &FlexibleTerm) -> Result<Resolved> {
    match term {
        FlexibleTerm::Variable(name) => match name.as_deref() {
            Some(name) if !name.is_empty() => Ok(Resolved::bare(Term::Variable(Variable::new(name)))),
            _ => Err(Error::MissingValue("variable term has no name".into())),
        },
        FlexibleTerm::Manual(text) => {
            let tokens: Vec<Term> = text
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(classify_token)
                .collect();
            if tokens.is_empty() {
                return Err(Error::MissingValue("manual term is empty".into()));
            }
            Ok(bind_values(state, tokens))
        }
        FlexibleTerm::Search(hits) => {
            if hits.is_empty() {
                return Err(Error::MissingValue("search term has no results selected".into()));
            }
            Ok(bind_values(state, hits.iter().map(search_term).collect()))
        }
        FlexibleTerm::Statement(Some(name)) if !name.is_empty() => {
            Ok(Resolved::bare(Term::Variable(Variable::new(name.as_str()))))
        }
        FlexibleTerm::Statement(_) | FlexibleTerm::Any => {
            Ok(Resolved::bare(Term::Variable(state.fresh_var())))
        }
        FlexibleTerm::Unknown(tag) => Err(Error::UnknownTermType(tag.clone())),
    }
}

fn bind_values(state: &mut QueryState, terms: Vec<Term>) -> Resolved {
    let var = state.fresh_var();
    Resolved {
        term: Term::Variable(var.clone()),
        bindings: vec![Fragment::values(var, terms)],
    }
}

/// Classifies one manual token: `<...>` is an IRI, `?x` a variable, and
/// anything else a plain literal.
pub fn classify_token(token: &str) -> Term {
    if token.starts_with('?') {
        Term::Variable(Variable::new(token))
    } else if let Some(iri) = token.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        Term::Iri(Iri::new(iri))
    } else {
        Term::Literal(Literal::simple(token))
    }
}

fn search_term(hit: &SearchTerm) -> Term {
    match hit.kind {
        SearchTermKind::Uri => Term::Iri(Iri::new(hit.value.as_str())),
        SearchTermKind::Literal => match hit.lang.as_deref().filter(|l| !l.is_empty()) {
            Some(lang) => Term::Literal(Literal::with_language(hit.value.as_str(), lang)),
            None => Term::Literal(Literal::simple(hit.value.as_str())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_resolves_directly() {
        let mut state = QueryState::new(false);
        let resolved = resolve(&mut state, &FlexibleTerm::variable("main2")).unwrap();
        assert_eq!(resolved.term.to_string(), "?main2");
        assert!(resolved.bindings.is_empty());
        assert_eq!(state.temp_count(), 0);
    }

    #[test]
    fn test_variable_without_name_is_missing() {
        let mut state = QueryState::new(false);
        assert!(matches!(
            resolve(&mut state, &FlexibleTerm::Variable(None)),
            Err(Error::MissingValue(_))
        ));
    }

    #[test]
    fn test_manual_tokens() {
        let mut state = QueryState::new(false);
        let resolved =
            resolve(&mut state, &FlexibleTerm::manual("<http://ex.org/a>, Paris ,?x")).unwrap();
        assert_eq!(resolved.term.to_string(), "?tmp0");
        assert_eq!(
            resolved.bindings[0].to_string(),
            "VALUES ?tmp0 { <http://ex.org/a> \"Paris\" ?x }"
        );
    }

    #[test]
    fn test_manual_empty_is_missing() {
        let mut state = QueryState::new(false);
        for text in ["", " , "] {
            assert!(matches!(
                resolve(&mut state, &FlexibleTerm::manual(text)),
                Err(Error::MissingValue(_))
            ));
        }
        assert_eq!(state.temp_count(), 0);
    }

    #[test]
    fn test_search_terms() {
        let mut state = QueryState::new(false);
        let term = FlexibleTerm::Search(vec![
            SearchTerm::iri("http://ex.org/a"),
            SearchTerm::literal("Paris", Some("fr")),
        ]);
        let resolved = resolve(&mut state, &term).unwrap();
        assert_eq!(
            resolved.bindings[0].to_string(),
            "VALUES ?tmp0 { <http://ex.org/a> \"Paris\"@fr }"
        );
        assert!(matches!(
            resolve(&mut state, &FlexibleTerm::Search(vec![])),
            Err(Error::MissingValue(_))
        ));
    }

    #[test]
    fn test_wildcards_allocate_unbound_temps() {
        let mut state = QueryState::new(false);
        let any = resolve(&mut state, &FlexibleTerm::Any).unwrap();
        let stmt = resolve(&mut state, &FlexibleTerm::Statement(None)).unwrap();
        let named = resolve(&mut state, &FlexibleTerm::Statement(Some("s".into()))).unwrap();
        assert_eq!(any.term.to_string(), "?tmp0");
        assert_eq!(stmt.term.to_string(), "?tmp1");
        assert_eq!(named.term.to_string(), "?s");
        assert!(any.bindings.is_empty() && stmt.bindings.is_empty());
    }

    #[test]
    fn test_unknown_type() {
        let mut state = QueryState::new(false);
        assert_eq!(
            resolve(&mut state, &FlexibleTerm::Unknown("regex".into())),
            Err(Error::UnknownTermType("regex".into()))
        );
    }
}
