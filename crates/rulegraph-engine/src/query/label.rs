//! Optional label lookups.

use rulegraph_common::types::vocab;
use rulegraph_common::types::{Iri, Literal, Variable};
use rulegraph_core::query::{BinaryOp, Combinator, Conjunction, Expression, Fragment};

/// A label lookup and the variable it binds.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelBinding {
    /// `OPTIONAL { ... }` fragment.
    pub fragment: Fragment,
    /// `?<var>Label`
    pub label: Variable,
}

/// Binds `?<var>Label` to a label in `language` when one exists.
///
/// The lookup is optional, so rows without a label are kept. With
/// `statement_mode` the label may also come from the property entity
/// linked to `var` through `wikibase:directClaim`.
pub fn label_binding(var: &Variable, language: &str, statement_mode: bool) -> LabelBinding {
    let label = var.suffixed("Label");
    let rdfs_label = Iri::new(vocab::RDFS_LABEL);
    let direct = Fragment::triple(var.clone(), rdfs_label.clone(), label.clone());

    let lookup = if statement_mode {
        let claim = var.suffixed("Claim");
        let mut either = Conjunction::new(Combinator::Or, false);
        either.terms = vec![
            Fragment::Group(vec![
                Fragment::triple(
                    claim.clone(),
                    Iri::new(vocab::WIKIBASE_DIRECT_CLAIM),
                    var.clone(),
                ),
                Fragment::triple(claim, rdfs_label, label.clone()),
            ]),
            direct,
        ];
        Fragment::Conjunction(either)
    } else {
        direct
    };

    let filter = Expression::and(
        Expression::bound(&label),
        Expression::binary(
            Expression::call("LANG", [Expression::var(&label)]),
            BinaryOp::Eq,
            Expression::literal(Literal::simple(language)),
        ),
    );

    LabelBinding {
        fragment: Fragment::Optional(vec![lookup, Fragment::Filter(filter)]),
        label,
    }
}

/// Label lookups for several variables, in order.
pub fn label_bindings(vars: &[Variable], language: &str, statement_mode: bool) -> Vec<LabelBinding> {
    vars.iter()
        .map(|v| label_binding(v, language, statement_mode))
        .collect()
}
