//! # Rulegraph
//!
//! Compiles rule trees built in a visual query editor into SPARQL.
//!
//! Start with [`QueryCompiler`]. Hand it a [`Widget`] request (usually
//! decoded straight from the editor's JSON) and you get back a
//! [`QueryBundle`] holding the query text to run.
//!
//! ## Widgets
//!
//! | Widget | Produces |
//! | ------ | -------- |
//! | `select` | The chosen variables and their labels |
//! | `plot` | Grouped, aggregated and optionally binned chart data |
//! | `properties` | Every property of one subject |
//! | `subgraph` | The neighbourhood of an entity, hop by hop |
//!
//! ## Quick Start
//!
//! ```rust
//! use rulegraph::{QueryCompiler, Widget};
//!
//! let widget = Widget::from_json(r#"{
//!     "widget": "select",
//!     "tree": {
//!         "combinator": "AND",
//!         "variable": { "value": "main" },
//!         "rules": [
//!             { "operator": "filter", "value": {
//!                 "predicate": { "type": "manual", "manual": "<http://ex.org/born>" },
//!                 "input": { "type": "variable", "variable": { "value": "year" } }
//!             } }
//!         ]
//!     },
//!     "select": [{ "value": "main" }, { "value": "year" }]
//! }"#)?;
//!
//! let bundle = QueryCompiler::new().compile(&widget)?;
//! assert!(bundle.primary.contains("?main ?tmp0 ?year ."));
//! # Ok::<(), rulegraph::Error>(())
//! ```
//!
//! For Wikidata endpoints, turn on statement mode so statement terms and
//! labels follow the `p:`/`ps:`/`pq:` reification scheme:
//!
//! ```rust
//! use rulegraph::{CompilerConfig, QueryCompiler};
//!
//! let compiler = QueryCompiler::with_config(CompilerConfig::default().with_statement_mode(true));
//! assert!(compiler.config().statement_mode);
//! ```

// The compiler and its settings
pub use rulegraph_engine::{CompiledBody, CompilerConfig, QueryBundle, QueryCompiler, compile_where};

// Input models
pub use rulegraph_adapters::rules::{FlexibleTerm, Rule, RuleGroup, RuleNode};
pub use rulegraph_adapters::widgets::Widget;

// Terms and errors
pub use rulegraph_common::types::{Iri, Literal, Term, Variable};
pub use rulegraph_common::utils::error::{Error, Result};

// Fragment IR, for callers that post-process compiled bodies
pub use rulegraph_core::query::{Fragment, SelectQuery};
