//! # rulegraph-core
//!
//! Core layer for Rulegraph: the query fragment IR and its text rendering.
//!
//! Compiler passes build [`Fragment`] trees and only turn them into text
//! at the very end, so structural rewrites (such as flattening nested
//! conjunctions) can be inspected without parsing query strings.
//!
//! ## Modules
//!
//! - [`query`] - Expressions, fragments, SELECT/CONSTRUCT queries, renderer

pub mod query;

// Re-export commonly used types
pub use query::{
    AggregateFunction, BinaryOp, Combinator, Conjunction, ConstructQuery, Expression, Fragment,
    OrderKey, Predicate, Projection, PropertyPath, SelectQuery, TriplePattern, UnaryOp,
    render_fragments,
};
