//! Query IR.
//!
//! - [`expression`] - FILTER/BIND/projection expressions
//! - [`fragment`] - WHERE body fragments and conjunction records
//! - [`select`] - SELECT and CONSTRUCT query forms
//! - [`render`] - Text rendering

pub mod expression;
pub mod fragment;
pub mod render;
pub mod select;

pub use expression::{AggregateFunction, Args, BinaryOp, Expression, UnaryOp};
pub use fragment::{Combinator, Conjunction, Fragment, Predicate, PropertyPath, TriplePattern};
pub use render::render_fragments;
pub use select::{ConstructQuery, OrderKey, Projection, SelectQuery};
