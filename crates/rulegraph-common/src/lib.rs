//! # rulegraph-common
//!
//! Foundation layer for Rulegraph: RDF term types, well-known namespaces,
//! and the crate-wide error type.
//!
//! This crate has no internal dependencies and should be kept minimal.
//!
//! ## Modules
//!
//! - [`types`] - Term types (Iri, Literal, Variable, Term) and namespaces
//! - [`utils`] - Utility functions and helpers (errors)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use types::{Iri, Literal, Namespace, Term, Variable};
pub use utils::error::{Error, Result};
