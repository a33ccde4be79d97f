//! Core type definitions for Rulegraph.
//!
//! - Term types ([`Iri`], [`Literal`], [`Variable`], [`Term`])
//! - Namespaces ([`Namespace`]) and the vocabularies the compiler emits

mod namespace;
mod term;

pub use namespace::{Namespace, vocab};
pub use term::{Iri, Literal, Term, Variable};
