//! Renders fragment trees to SPARQL text.
//!
//! Output uses two-space indentation and full IRIs (no PREFIX lines), one
//! clause per line. Empty conjunctions render to nothing, so a group with
//! no rules leaves the enclosing body unchanged.

use std::fmt::{self, Write};

use super::fragment::{Combinator, Conjunction, Fragment, TriplePattern};
use super::select::{ConstructQuery, OrderKey, Projection, SelectQuery};

const INDENT: &str = "  ";

/// Renders a WHERE body (without the surrounding braces).
pub fn render_fragments(fragments: &[Fragment]) -> String {
    let mut renderer = Renderer::new();
    renderer.fragments(fragments, 0);
    renderer.finish()
}

struct Renderer {
    out: String,
}

impl Renderer {
    fn new() -> Self {
        Self { out: String::new() }
    }

    fn finish(mut self) -> String {
        while self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn fragments(&mut self, fragments: &[Fragment], depth: usize) {
        for fragment in fragments {
            self.fragment(fragment, depth);
        }
    }

    fn fragment(&mut self, fragment: &Fragment, depth: usize) {
        match fragment {
            Fragment::Triple(triple) => self.line(depth, &triple_text(triple)),
            Fragment::Values { variable, terms } => {
                let mut text = format!("VALUES {variable} {{");
                for term in terms {
                    // write! into a String cannot fail
                    let _ = write!(text, " {term}");
                }
                text.push_str(" }");
                self.line(depth, &text);
            }
            Fragment::Filter(expression) => self.line(depth, &format!("FILTER({expression})")),
            Fragment::Bind {
                expression,
                variable,
            } => self.line(depth, &format!("BIND({expression} AS {variable})")),
            Fragment::Optional(inner) => self.block(depth, "OPTIONAL {", inner),
            Fragment::Group(inner) => {
                if !fragment.is_empty() {
                    self.block(depth, "{", inner);
                }
            }
            Fragment::Conjunction(conjunction) => self.conjunction(conjunction, depth),
            Fragment::SubSelect(query) => {
                self.line(depth, "{");
                self.select(query, depth + 1);
                self.line(depth, "}");
            }
        }
    }

    fn block(&mut self, depth: usize, open: &str, inner: &[Fragment]) {
        self.line(depth, open);
        self.fragments(inner, depth + 1);
        self.line(depth, "}");
    }

    fn conjunction(&mut self, conjunction: &Conjunction, depth: usize) {
        if conjunction.terms.iter().all(Fragment::is_empty) {
            return;
        }
        let body_depth = if conjunction.negated {
            self.line(depth, "FILTER NOT EXISTS {");
            depth + 1
        } else {
            depth
        };
        match conjunction.combinator {
            Combinator::And => self.fragments(&conjunction.terms, body_depth),
            Combinator::Or => {
                let alternatives = conjunction.terms.iter().filter(|t| !t.is_empty());
                for (i, alternative) in alternatives.enumerate() {
                    if i > 0 {
                        self.line(body_depth, "UNION");
                    }
                    self.line(body_depth, "{");
                    match alternative {
                        Fragment::Group(inner) => self.fragments(inner, body_depth + 1),
                        other => self.fragment(other, body_depth + 1),
                    }
                    self.line(body_depth, "}");
                }
            }
        }
        if conjunction.negated {
            self.line(depth, "}");
        }
    }

    fn select(&mut self, query: &SelectQuery, depth: usize) {
        let mut head = String::from("SELECT");
        if query.distinct {
            head.push_str(" DISTINCT");
        }
        if query.projection.is_empty() {
            head.push_str(" *");
        }
        for projection in &query.projection {
            let _ = match projection {
                Projection::Variable(v) => write!(head, " {v}"),
                Projection::Expression { expression, alias } => {
                    write!(head, " ({expression} AS {alias})")
                }
            };
        }
        head.push_str(" WHERE {");
        self.block(depth, &head, &query.where_clause);

        if !query.group_by.is_empty() {
            let mut text = String::from("GROUP BY");
            for v in &query.group_by {
                let _ = write!(text, " {v}");
            }
            self.line(depth, &text);
        }
        if !query.order_by.is_empty() {
            let mut text = String::from("ORDER BY");
            for key in &query.order_by {
                let _ = write!(text, " {}", order_key_text(key));
            }
            self.line(depth, &text);
        }
        if let Some(limit) = query.limit {
            self.line(depth, &format!("LIMIT {limit}"));
        }
    }

    fn construct(&mut self, query: &ConstructQuery) {
        self.line(0, "CONSTRUCT {");
        for triple in &query.template {
            self.line(1, &triple_text(triple));
        }
        self.line(0, "} WHERE {");
        self.fragments(&query.where_clause, 1);
        self.line(0, "}");
        if let Some(limit) = query.limit {
            self.line(0, &format!("LIMIT {limit}"));
        }
    }
}

fn triple_text(triple: &TriplePattern) -> String {
    format!("{} {} {} .", triple.subject, triple.predicate, triple.object)
}

fn order_key_text(key: &OrderKey) -> String {
    if key.descending {
        format!("DESC({})", key.expression)
    } else {
        format!("ASC({})", key.expression)
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut renderer = Renderer::new();
        renderer.fragment(self, 0);
        f.write_str(&renderer.finish())
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut renderer = Renderer::new();
        renderer.select(self, 0);
        f.write_str(&renderer.finish())
    }
}

impl fmt::Display for ConstructQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut renderer = Renderer::new();
        renderer.construct(self);
        f.write_str(&renderer.finish())
    }
}

#[cfg(test)]
mod tests {
    use rulegraph_common::types::{Iri, Literal, Term, Variable};

    use super::*;
    use crate::query::expression::{AggregateFunction, Expression};

    fn triple(s: &str, o: &str) -> Fragment {
        Fragment::triple(Variable::new(s), Iri::new("http://ex.org/p"), Variable::new(o))
    }

    #[test]
    fn test_values_and_triple() {
        let frags = vec![
            Fragment::values(
                Variable::new("tmp0"),
                vec![
                    Term::Iri(Iri::new("http://ex.org/p")),
                    Term::Literal(Literal::with_language("Paris", "en")),
                ],
            ),
            Fragment::triple(Variable::new("main"), Variable::new("tmp0"), Variable::new("main2")),
        ];
        assert_eq!(
            render_fragments(&frags),
            "VALUES ?tmp0 { <http://ex.org/p> \"Paris\"@en }\n?main ?tmp0 ?main2 ."
        );
    }

    #[test]
    fn test_and_conjunction_inline() {
        let mut c = Conjunction::new(Combinator::And, false);
        c.terms = vec![triple("a", "b"), triple("b", "c")];
        assert_eq!(
            Fragment::Conjunction(c).to_string(),
            "?a <http://ex.org/p> ?b .\n?b <http://ex.org/p> ?c ."
        );
    }

    #[test]
    fn test_negated_conjunction_is_not_exists() {
        let mut c = Conjunction::new(Combinator::And, true);
        c.terms = vec![triple("a", "b")];
        assert_eq!(
            Fragment::Conjunction(c).to_string(),
            "FILTER NOT EXISTS {\n  ?a <http://ex.org/p> ?b .\n}"
        );

        let mut or = Conjunction::new(Combinator::Or, true);
        or.terms = vec![triple("a", "b"), triple("a", "c")];
        assert_eq!(
            Fragment::Conjunction(or).to_string(),
            "FILTER NOT EXISTS {\n  {\n    ?a <http://ex.org/p> ?b .\n  }\n  UNION\n  {\n    ?a <http://ex.org/p> ?c .\n  }\n}"
        );
    }

    #[test]
    fn test_or_conjunction_unions_alternatives() {
        let mut c = Conjunction::new(Combinator::Or, false);
        c.terms = vec![
            triple("a", "b"),
            Fragment::Group(vec![triple("a", "c"), triple("c", "d")]),
        ];
        assert_eq!(
            Fragment::Conjunction(c).to_string(),
            "{\n  ?a <http://ex.org/p> ?b .\n}\nUNION\n{\n  ?a <http://ex.org/p> ?c .\n  ?c <http://ex.org/p> ?d .\n}"
        );
    }

    #[test]
    fn test_empty_conjunction_renders_nothing() {
        for combinator in [Combinator::And, Combinator::Or] {
            for negated in [false, true] {
                let c = Conjunction::new(combinator, negated);
                assert_eq!(Fragment::Conjunction(c).to_string(), "");
            }
        }
    }

    #[test]
    fn test_optional_and_filter() {
        let x = Variable::new("x");
        let frag = Fragment::Optional(vec![
            Fragment::triple(x.clone(), Iri::new("http://label"), x.suffixed("Label")),
            Fragment::Filter(Expression::bound(&x.suffixed("Label"))),
        ]);
        assert_eq!(
            frag.to_string(),
            "OPTIONAL {\n  ?x <http://label> ?xLabel .\n  FILTER(BOUND(?xLabel))\n}"
        );
    }

    #[test]
    fn test_select_query() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let count = Expression::aggregate(AggregateFunction::Count, Expression::var(&y));
        let query = SelectQuery::new(vec![triple("x", "y")])
            .project(x.clone())
            .project_as(count.clone(), Variable::new("yResult"))
            .group(x)
            .order(OrderKey::desc(count))
            .with_limit(20);
        assert_eq!(
            query.to_string(),
            "SELECT ?x (COUNT(?y) AS ?yResult) WHERE {\n  ?x <http://ex.org/p> ?y .\n}\nGROUP BY ?x\nORDER BY DESC(COUNT(?y))\nLIMIT 20"
        );
    }

    #[test]
    fn test_sub_select_indented() {
        let inner = SelectQuery::new(vec![triple("a", "b")]).project(Variable::new("a"));
        let frag = Fragment::SubSelect(Box::new(inner));
        assert_eq!(
            frag.to_string(),
            "{\n  SELECT ?a WHERE {\n    ?a <http://ex.org/p> ?b .\n  }\n}"
        );
    }

    #[test]
    fn test_construct_query() {
        let t = TriplePattern::new(Variable::new("s"), Variable::new("p"), Variable::new("o"));
        let query = ConstructQuery::new(vec![t.clone()], vec![Fragment::Triple(t)]).with_limit(30);
        assert_eq!(
            query.to_string(),
            "CONSTRUCT {\n  ?s ?p ?o .\n} WHERE {\n  ?s ?p ?o .\n}\nLIMIT 30"
        );
    }
}
