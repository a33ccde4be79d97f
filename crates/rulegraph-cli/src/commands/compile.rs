//! Compile command.

use std::path::Path;

use anyhow::{Context, Result};
use rulegraph_engine::{QueryBundle, QueryCompiler};

use super::load_widget;
use crate::OutputFormat;
use crate::output;

/// Compile the request at `path`, failing on the first error.
pub fn compile_file(path: &Path, compiler: &QueryCompiler) -> Result<QueryBundle> {
    let widget = load_widget(path)?;
    compiler
        .compile(&widget)
        .with_context(|| format!("{} widget does not compile", widget.kind()))
}

/// Run the compile command.
pub fn run(path: &Path, compiler: &QueryCompiler, format: OutputFormat, quiet: bool) -> Result<()> {
    let bundle = compile_file(path, compiler)?;
    output::print_bundle(&bundle, format.into(), quiet)
}

#[cfg(test)]
mod tests {
    use rulegraph_engine::CompilerConfig;

    use super::*;
    use crate::commands::test_support::{NOTHING_SELECTED, SELECT, request_file};

    #[test]
    fn test_compile_file() {
        let file = request_file(SELECT);
        let bundle = compile_file(file.path(), &QueryCompiler::new()).unwrap();
        assert!(bundle.primary.starts_with("SELECT ?main ?year ?mainLabel ?yearLabel WHERE {"));
        assert!(bundle.primary.ends_with("LIMIT 10"));
    }

    #[test]
    fn test_compile_file_uses_language() {
        let file = request_file(SELECT);
        let compiler =
            QueryCompiler::with_config(CompilerConfig::default().with_label_language("de"));
        let bundle = compile_file(file.path(), &compiler).unwrap();
        assert!(bundle.primary.contains("\"de\""));
    }

    #[test]
    fn test_compile_error_has_context() {
        let file = request_file(NOTHING_SELECTED);
        let err = compile_file(file.path(), &QueryCompiler::new()).unwrap_err();
        assert_eq!(err.to_string(), "select widget does not compile");
        assert!(format!("{err:#}").contains("no variables selected"));
    }
}
