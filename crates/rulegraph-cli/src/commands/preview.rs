//! Preview command.

use std::path::Path;

use anyhow::Result;
use rulegraph_engine::{QueryBundle, QueryCompiler};

use super::read_request;
use crate::OutputFormat;
use crate::output;

/// Preview the request at `path`. Only an unreadable file is an error.
pub fn preview_file(path: &Path, compiler: &QueryCompiler) -> Result<QueryBundle> {
    let text = read_request(path)?;
    Ok(compiler.preview_json(&text))
}

/// Run the preview command.
pub fn run(path: &Path, compiler: &QueryCompiler, format: OutputFormat, quiet: bool) -> Result<()> {
    let bundle = preview_file(path, compiler)?;
    if bundle.is_empty() {
        output::status("No preview available", quiet);
    }
    output::print_bundle(&bundle, format.into(), quiet)
}
