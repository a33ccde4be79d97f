//! # rulegraph-adapters
//!
//! Input models for Rulegraph: the rule tree produced by the visual query
//! editor and the widget requests that wrap it.
//!
//! ## Modules
//!
//! - [`rules`] - Rule groups, leaf rules, flexible terms
//! - [`widgets`] - Select, plot, properties and subgraph requests

/// Declares a closed set of string tags parsed with [`std::str::FromStr`].
/// Unrecognized tags become the given error variant.
macro_rules! tag_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $err:ident, {
            $($(#[$vmeta:meta])* $variant:ident => $($tag:literal)|+),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl ::std::str::FromStr for $name {
            type Err = ::rulegraph_common::utils::error::Error;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $($($tag)|+ => Ok($name::$variant),)+
                    other => Err(::rulegraph_common::utils::error::Error::$err(other.to_string())),
                }
            }
        }
    };
}

pub mod rules;
pub mod widgets;

pub use rules::{FlexibleTerm, Rule, RuleGroup, RuleNode};
pub use widgets::Widget;
