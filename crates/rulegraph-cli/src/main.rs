//! Rulegraph CLI - compile visual-editor widget requests to SPARQL.
//!
//! A small developer tool around the compiler: feed it the JSON the editor
//! sends and it prints the queries that would run.

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use rulegraph_engine::{CompilerConfig, QueryCompiler};
use std::path::PathBuf;

/// Rulegraph query compiler.
///
/// Reads a widget request (JSON) and prints the SPARQL it compiles to.
#[derive(Parser)]
#[command(name = "rulegraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress progress and info messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Compile against Wikidata-style reified statements
    #[arg(long, global = true)]
    statement_mode: bool,

    /// Language tag for label bindings
    #[arg(long, global = true, default_value = "en")]
    language: String,
}

impl Cli {
    fn compiler(&self) -> QueryCompiler {
        QueryCompiler::with_config(
            CompilerConfig::default()
                .with_statement_mode(self.statement_mode)
                .with_label_language(self.language.clone()),
        )
    }
}

/// Output format options.
#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Query text, one query after another (default)
    #[default]
    Text,
    /// Machine-readable JSON format
    Json,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Compile a widget request; fails on the first error
    Compile {
        /// Path to the widget request
        path: PathBuf,
    },

    /// Compile a widget request, printing nothing if it does not compile
    Preview {
        /// Path to the widget request
        path: PathBuf,
    },

    /// Report the variables a request uses and whether it compiles
    Check {
        /// Path to the widget request
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    } else if !cli.quiet {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .init();
    }

    let compiler = cli.compiler();
    let result = match &cli.command {
        Commands::Compile { path } => commands::compile::run(path, &compiler, cli.format, cli.quiet),
        Commands::Preview { path } => commands::preview::run(path, &compiler, cli.format, cli.quiet),
        Commands::Check { path } => commands::check::run(path, &compiler, cli.format, cli.quiet),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
