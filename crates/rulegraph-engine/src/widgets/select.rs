//! Variable listing.

use indexmap::IndexSet;
use rulegraph_adapters::rules::VariableRef;
use rulegraph_adapters::widgets::SelectRequest;
use rulegraph_common::types::Variable;
use rulegraph_common::utils::error::{Error, Result};

use super::QueryBundle;
use crate::config::CompilerConfig;
use crate::query::{QueryAssembler, compile_where, label_bindings};

/// Lists the selected variables and their labels over the rule tree.
///
/// # Errors
///
/// Returns `NoProjection` when no variable is selected, and any error
/// raised while compiling the tree.
pub fn build(request: &SelectRequest, config: &CompilerConfig) -> Result<QueryBundle> {
    let vars: IndexSet<Variable> = request
        .select
        .iter()
        .filter_map(VariableRef::name)
        .map(Variable::new)
        .collect();
    let vars: Vec<Variable> = vars.into_iter().collect();
    if vars.is_empty() {
        return Err(Error::NoProjection("select widget has no variables selected".into()));
    }

    let body = compile_where(&request.tree, config.statement_mode)?;
    let labels = label_bindings(&vars, &config.label_language, config.statement_mode);

    let mut assembler = QueryAssembler::new(body.fragments());
    for v in &vars {
        assembler = assembler.project(v.clone());
    }
    for label in &labels {
        assembler = assembler.project(label.label.clone());
    }
    let query = assembler
        .with_labels(labels)
        .with_limit(request.limit.unwrap_or(config.default_limit))
        .assemble()?;

    Ok(QueryBundle::primary(query))
}
