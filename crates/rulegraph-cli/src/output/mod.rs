//! Output formatting for CLI commands.

use comfy_table::{Cell, Color, ContentArrangement, Table};
use rulegraph_engine::QueryBundle;
use serde::Serialize;

/// Output format selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl From<crate::OutputFormat> for Format {
    fn from(f: crate::OutputFormat) -> Self {
        match f {
            crate::OutputFormat::Text => Format::Text,
            crate::OutputFormat::Json => Format::Json,
        }
    }
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize>(data: &T, quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("{}", serde_json::to_string_pretty(data)?);
    }
    Ok(())
}

/// Render a bundle as plain query text. Auxiliary queries follow the
/// primary one, each under a numbered comment line.
pub fn bundle_text(bundle: &QueryBundle) -> String {
    let mut text = bundle.primary.clone();
    for (i, query) in bundle.auxiliary.iter().enumerate() {
        text.push_str(&format!("\n\n# auxiliary {}\n{query}", i + 1));
    }
    text
}

/// Print a bundle in the selected format.
pub fn print_bundle(bundle: &QueryBundle, format: Format, quiet: bool) -> anyhow::Result<()> {
    match format {
        Format::Json => print_json(bundle, quiet),
        Format::Text => {
            if !quiet {
                println!("{}", bundle_text(bundle));
            }
            Ok(())
        }
    }
}

/// Create a styled table with consistent formatting.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    table
}

/// Add a header row to a table.
pub fn add_header(table: &mut Table, headers: &[&str]) {
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
}

/// Print a key-value table.
pub fn print_key_value_table(items: &[(&str, String)]) {
    let mut table = create_table();
    add_header(&mut table, &["Property", "Value"]);
    for (key, value) in items {
        table.add_row(vec![Cell::new(key).fg(Color::Green), Cell::new(value)]);
    }
    println!("{table}");
}

/// Print a status message (respects quiet mode).
pub fn status(msg: &str, quiet: bool) {
    if !quiet {
        eprintln!("{msg}");
    }
}

/// Print a success message.
pub fn success(msg: &str, quiet: bool) {
    if !quiet {
        println!("✓ {msg}");
    }
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("✗ {msg}");
}
