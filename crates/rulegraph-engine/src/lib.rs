//! # rulegraph-engine
//!
//! The Rulegraph compiler: turns rule trees built in the visual query
//! editor into SPARQL text.
//!
//! ## Modules
//!
//! - [`config`] - Compiler settings
//! - [`query`] - Rule tree compilation: terms, operators, groups, labels,
//!   aggregation, discretization, SELECT assembly
//! - [`widgets`] - Per-widget query builders
//! - [`compiler`] - The [`QueryCompiler`] entry point
//!
//! Compilation is a pure function of its input. Nothing is cached between
//! calls and no call blocks.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod compiler;
pub mod config;
pub mod query;
pub mod widgets;

pub use compiler::QueryCompiler;
pub use config::CompilerConfig;
pub use query::{CompiledBody, QueryState, compile_where};
pub use widgets::QueryBundle;
