//! Request check command.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Color};
use rulegraph_adapters::Widget;
use rulegraph_engine::QueryCompiler;
use serde::Serialize;

use super::read_request;
use crate::OutputFormat;
use crate::output::{self, Format};

/// Check result output.
#[derive(Serialize, Debug)]
pub struct CheckOutput {
    widget: Option<String>,
    compiles: bool,
    rule_count: usize,
    variables: Vec<String>,
    statements: Vec<String>,
    auxiliary_queries: usize,
    error: Option<ErrorOutput>,
}

/// Error output.
#[derive(Serialize, Debug)]
struct ErrorOutput {
    kind: String,
    message: String,
    /// False only for compiler defects.
    user_error: bool,
}

impl ErrorOutput {
    fn from_error(e: &rulegraph_common::utils::error::Error) -> Self {
        Self {
            kind: e.kind().to_string(),
            message: e.to_string(),
            user_error: e.is_user_error(),
        }
    }
}

/// Inspect a request without printing anything.
pub fn inspect(text: &str, compiler: &QueryCompiler) -> CheckOutput {
    let widget = match Widget::from_json(text) {
        Ok(widget) => widget,
        Err(e) => {
            return CheckOutput {
                widget: None,
                compiles: false,
                rule_count: 0,
                variables: Vec::new(),
                statements: Vec::new(),
                auxiliary_queries: 0,
                error: Some(ErrorOutput::from_error(&e)),
            };
        }
    };

    let (rule_count, variables, statements) = match widget.tree() {
        Some(tree) => {
            let statements = if compiler.config().statement_mode {
                tree.statement_variables().into_iter().collect()
            } else {
                Vec::new()
            };
            (tree.rule_count(), tree.variables(), statements)
        }
        None => (0, Vec::new(), Vec::new()),
    };

    let compiled = compiler.compile(&widget);
    CheckOutput {
        widget: Some(widget.kind().to_string()),
        compiles: compiled.is_ok(),
        rule_count,
        variables,
        statements,
        auxiliary_queries: compiled.as_ref().map_or(0, |b| b.auxiliary.len()),
        error: compiled.err().as_ref().map(ErrorOutput::from_error),
    }
}

/// Run the check command.
pub fn run(path: &Path, compiler: &QueryCompiler, format: OutputFormat, quiet: bool) -> Result<()> {
    let text = read_request(path)?;
    let output = inspect(&text, compiler);

    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(&output, quiet)?,
        Format::Text => {
            if !quiet {
                print_table(&output);
            }
        }
    }

    if let Some(error) = &output.error {
        output::error(&format!("{}: {}", error.kind, error.message));
        std::process::exit(1);
    }
    output::success("Request compiles", quiet);
    Ok(())
}

fn print_table(output: &CheckOutput) {
    let items = vec![
        (
            "Widget",
            output.widget.clone().unwrap_or_else(|| "-".to_string()),
        ),
        ("Compiles", output.compiles.to_string()),
        ("Rules", output.rule_count.to_string()),
        ("Auxiliary queries", output.auxiliary_queries.to_string()),
    ];
    output::print_key_value_table(&items);

    if !output.variables.is_empty() {
        let mut table = output::create_table();
        output::add_header(&mut table, &["Variable", "Statement"]);
        for name in &output.variables {
            let statement = output.statements.contains(name);
            table.add_row(vec![
                Cell::new(format!("?{name}")).fg(Color::Green),
                Cell::new(if statement { "yes" } else { "-" }),
            ]);
        }
        println!("\n{table}");
    }
}

#[cfg(test)]
mod tests {
    use rulegraph_engine::CompilerConfig;

    use super::*;
    use crate::commands::test_support::{NOTHING_SELECTED, SELECT};

    #[test]
    fn test_inspect_compiling_request() {
        let output = inspect(SELECT, &QueryCompiler::new());
        assert!(output.compiles);
        assert_eq!(output.widget.as_deref(), Some("select"));
        assert_eq!(output.rule_count, 1);
        assert_eq!(output.variables, vec!["main".to_string(), "year".to_string()]);
        assert!(output.statements.is_empty());
        assert!(output.error.is_none());
    }

    #[test]
    fn test_inspect_failing_request() {
        let output = inspect(NOTHING_SELECTED, &QueryCompiler::new());
        assert!(!output.compiles);
        assert_eq!(output.variables, vec!["main".to_string()]);
        let error = output.error.unwrap();
        assert_eq!(error.kind, "NoProjection");
        assert!(error.user_error);
    }

    #[test]
    fn test_error_output_flags_internal_errors() {
        use rulegraph_common::utils::error::Error;

        let internal = ErrorOutput::from_error(&Error::Internal("bad flatten".into()));
        assert_eq!(internal.kind, "Internal");
        assert!(!internal.user_error);

        let json = serde_json::to_value(&internal).unwrap();
        assert_eq!(json["user_error"], false);
    }

    #[test]
    fn test_inspect_malformed() {
        let output = inspect("[1, 2", &QueryCompiler::new());
        assert!(!output.compiles);
        assert!(output.widget.is_none());
        assert_eq!(output.error.unwrap().kind, "Serialization");
    }

    #[test]
    fn test_inspect_statements() {
        let request = r#"{
            "widget": "select",
            "tree": {
                "variable": { "value": "main" },
                "rules": [
                    { "operator": "filter", "value": {
                        "predicate": { "type": "manual", "manual": "<http://www.wikidata.org/prop/direct/P69>" },
                        "input": { "type": "statement", "variable": { "value": "edu" } }
                    } }
                ]
            },
            "select": [{ "value": "main" }]
        }"#;
        let compiler =
            QueryCompiler::with_config(CompilerConfig::default().with_statement_mode(true));
        let output = inspect(request, &compiler);
        assert_eq!(output.statements, vec!["edu".to_string()]);
        assert!(output.variables.contains(&"edu".to_string()));

        let plain = inspect(request, &QueryCompiler::new());
        assert!(plain.statements.is_empty());
    }

    #[test]
    fn test_inspect_json_shape() {
        let output = inspect(SELECT, &QueryCompiler::new());
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["widget"], "select");
        assert_eq!(json["compiles"], true);
        assert!(json["error"].is_null());
    }
}
