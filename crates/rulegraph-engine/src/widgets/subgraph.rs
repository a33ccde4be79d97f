//! Depth-limited neighbourhood of an entity.

use rulegraph_adapters::widgets::SubgraphRequest;
use rulegraph_common::types::{Iri, Term, Variable, vocab};
use rulegraph_common::utils::error::{Error, Result};
use rulegraph_core::query::{ConstructQuery, Expression, Fragment, TriplePattern};

use super::QueryBundle;
use crate::config::CompilerConfig;
use crate::query::{QueryState, label_binding, resolve};

/// Builds a CONSTRUCT query returning the labelled neighbourhood of the
/// entity, `depth` hops out.
///
/// Every node gets one outward and one inward edge per hop. Each edge is
/// an OPTIONAL block holding the next hop, so a node with no edges still
/// yields its ancestors. Neighbours are never literals.
///
/// # Errors
///
/// Returns `MissingValue` when no entity is given, or when predicates are
/// restricted but none are listed.
pub fn build(request: &SubgraphRequest, config: &CompilerConfig) -> Result<QueryBundle> {
    let entity = request
        .entity
        .as_ref()
        .ok_or_else(|| Error::MissingValue("subgraph widget has no entity".into()))?;

    let mut state = QueryState::new(config.statement_mode);
    let centre = resolve(&mut state, entity)?;
    let centre_var = centre
        .term
        .as_variable()
        .cloned()
        .ok_or_else(|| Error::Internal("resolved entity is not a variable".into()))?;

    let allowed = if request.any_predicate {
        None
    } else {
        let predicates = request
            .predicates
            .as_ref()
            .ok_or_else(|| Error::MissingValue("subgraph predicates are not set".into()))?;
        let mut resolved = resolve(&mut state, predicates)?;
        let values = resolved
            .values_mut()
            .map(std::mem::take)
            .ok_or_else(|| Error::MissingValue("subgraph predicates list no values".into()))?;
        Some(values)
    };

    let mut walk = Walk {
        state,
        allowed,
        language: &config.label_language,
        template: Vec::new(),
    };

    let centre_label = label_binding(&centre_var, walk.language, false);
    walk.template.push(TriplePattern::new(
        centre_var.clone(),
        Iri::new(vocab::RDFS_LABEL),
        centre_label.label,
    ));

    let mut where_clause = centre.bindings;
    where_clause.push(centre_label.fragment);
    where_clause.extend(walk.expand(&centre_var, request.depth.unwrap_or(1)));

    tracing::debug!(
        edges = walk.template.len().saturating_sub(1) / 3,
        temp_vars = walk.state.temp_count(),
        "built subgraph query"
    );

    let limit = request
        .limit
        .unwrap_or(config.default_limit)
        .saturating_mul(3);
    let query = ConstructQuery::new(walk.template, where_clause).with_limit(limit);
    Ok(QueryBundle::primary(query.to_string()))
}

struct Walk<'a> {
    state: QueryState,
    allowed: Option<Vec<Term>>,
    language: &'a str,
    template: Vec<TriplePattern>,
}

impl Walk<'_> {
    fn expand(&mut self, node: &Variable, depth: usize) -> Vec<Fragment> {
        if depth == 0 {
            return Vec::new();
        }
        vec![
            self.edge(node, false, depth - 1),
            self.edge(node, true, depth - 1),
        ]
    }

    fn edge(&mut self, node: &Variable, inward: bool, remaining: usize) -> Fragment {
        let p = self.state.fresh_named("p");
        let mut block = Vec::new();
        if let Some(values) = &self.allowed {
            block.push(Fragment::values(p.clone(), values.clone()));
        }

        // labels hang off the property entity, not the direct predicate
        let labelled = if self.state.statement_mode() {
            let claim = self.state.fresh_var();
            block.push(Fragment::triple(
                claim.clone(),
                Iri::new(vocab::WIKIBASE_DIRECT_CLAIM),
                p.clone(),
            ));
            claim
        } else {
            p.clone()
        };
        let p_label = label_binding(&labelled, self.language, false);

        let o = self.state.fresh_named("o");
        let o_label = label_binding(&o, self.language, false);

        let (subject, object) = if inward {
            (o.clone(), node.clone())
        } else {
            (node.clone(), o.clone())
        };
        block.insert(0, Fragment::triple(subject.clone(), p.clone(), object.clone()));
        block.push(Fragment::Filter(Expression::not(Expression::call(
            "isLiteral",
            [Expression::var(&o)],
        ))));
        block.push(p_label.fragment);
        block.push(o_label.fragment);

        let label = Iri::new(vocab::RDFS_LABEL);
        self.template.push(TriplePattern::new(subject, p.clone(), object));
        self.template
            .push(TriplePattern::new(o.clone(), label.clone(), o_label.label));
        self.template.push(TriplePattern::new(p, label, p_label.label));

        block.extend(self.expand(&o, remaining));
        Fragment::Optional(block)
    }
}

#[cfg(test)]
mod tests {
    use rulegraph_adapters::rules::FlexibleTerm;

    use super::*;

    const LABEL: &str = "<http://www.w3.org/2000/01/rdf-schema#label>";

    fn request(depth: usize) -> SubgraphRequest {
        SubgraphRequest {
            entity: Some(FlexibleTerm::manual("<http://ex.org/alice>")),
            predicates: None,
            any_predicate: true,
            depth: Some(depth),
            limit: None,
        }
    }

    fn build_text(request: &SubgraphRequest, config: &CompilerConfig) -> String {
        build(request, config).unwrap().primary
    }

    #[test]
    fn test_one_hop() {
        let text = build_text(&request(1), &CompilerConfig::default());
        assert!(text.starts_with(&format!(
            "CONSTRUCT {{\n  ?tmp0 {LABEL} ?tmp0Label .\n  ?tmp0 ?p1 ?o2 .\n  ?o2 {LABEL} ?o2Label .\n  ?p1 {LABEL} ?p1Label .\n  ?o4 ?p3 ?tmp0 .\n"
        )));
        assert!(text.contains("} WHERE {\n  VALUES ?tmp0 { <http://ex.org/alice> }\n"));
        assert!(text.contains("  OPTIONAL {\n    ?tmp0 ?p1 ?o2 .\n    FILTER(!isLiteral(?o2))\n"));
        assert!(text.contains("  OPTIONAL {\n    ?o4 ?p3 ?tmp0 .\n    FILTER(!isLiteral(?o4))\n"));
        assert!(text.ends_with("}\nLIMIT 60"));
    }

    #[test]
    fn test_two_hops_nest() {
        let text = build_text(&request(2), &CompilerConfig::default());
        // 2 edges at the first hop, 4 at the second
        let edges = text
            .lines()
            .filter(|l| l.trim_start().starts_with("OPTIONAL {"))
            .count();
        // each edge carries two label lookups of its own
        assert_eq!(edges, 1 + 6 * 3);
        assert!(text.contains("      ?o2 ?p3 ?o4 .\n"));
    }

    #[test]
    fn test_zero_depth() {
        let text = build_text(&request(0), &CompilerConfig::default());
        assert_eq!(
            text,
            format!(
                "CONSTRUCT {{\n  ?tmp0 {LABEL} ?tmp0Label .\n}} WHERE {{\n  VALUES ?tmp0 {{ <http://ex.org/alice> }}\n  OPTIONAL {{\n    ?tmp0 {LABEL} ?tmp0Label .\n    FILTER(BOUND(?tmp0Label) && (LANG(?tmp0Label) = \"en\"))\n  }}\n}}\nLIMIT 60"
            )
        );
    }

    #[test]
    fn test_restricted_predicates() {
        let mut req = request(1);
        req.any_predicate = false;
        req.predicates = Some(FlexibleTerm::manual("<http://ex.org/knows>, <http://ex.org/likes>"));
        req.limit = Some(10);
        let text = build_text(&req, &CompilerConfig::default());
        assert!(text.contains(
            "    ?tmp0 ?p2 ?o3 .\n    VALUES ?p2 { <http://ex.org/knows> <http://ex.org/likes> }\n"
        ));
        assert!(text.ends_with("LIMIT 30"));

        req.predicates = Some(FlexibleTerm::variable("p"));
        assert!(matches!(
            build(&req, &CompilerConfig::default()),
            Err(Error::MissingValue(_))
        ));
    }

    #[test]
    fn test_statement_mode_labels_claim() {
        let config = CompilerConfig::default().with_statement_mode(true);
        let text = build_text(&request(1), &config);
        assert!(text.contains("    ?tmp2 <http://wikiba.se/ontology#directClaim> ?p1 .\n"));
        assert!(text.contains(&format!("  ?p1 {LABEL} ?tmp2Label .\n")));
    }

    #[test]
    fn test_missing_entity() {
        let mut req = request(1);
        req.entity = None;
        assert!(matches!(
            build(&req, &CompilerConfig::default()),
            Err(Error::MissingValue(_))
        ));
    }
}
