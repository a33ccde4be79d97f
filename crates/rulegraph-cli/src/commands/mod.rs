//! CLI command implementations.

pub mod check;
pub mod compile;
pub mod preview;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rulegraph_adapters::Widget;

/// Read a request file into memory.
pub fn read_request(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

/// Read and decode a widget request.
pub fn load_widget(path: &Path) -> Result<Widget> {
    let text = read_request(path)?;
    let widget =
        Widget::from_json(&text).with_context(|| format!("invalid request in {}", path.display()))?;
    tracing::debug!(widget = widget.kind(), path = %path.display(), "loaded request");
    Ok(widget)
}


#[cfg(test)]
mod tests {
    use super::test_support::{SELECT, request_file};
    use super::*;

    #[test]
    fn test_load_widget() {
        let file = request_file(SELECT);
        let widget = load_widget(file.path()).unwrap();
        assert_eq!(widget.kind(), "select");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_widget(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().starts_with("cannot read"));
    }

    #[test]
    fn test_load_malformed() {
        let file = request_file("{ \"widget\": ");
        let err = load_widget(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("invalid request in"));
    }
}
