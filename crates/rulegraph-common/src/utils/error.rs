//! Error types for Rulegraph.
//!
//! Every error except [`Error::Internal`] describes an incompletely
//! specified rule tree or widget request. Compilation stops at the first
//! one; nothing is retried.

use thiserror::Error;

/// Result alias used throughout Rulegraph.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A term description lacks the data its type requires.
    #[error("missing value: {0}")]
    MissingValue(String),

    /// A flexible term carries a type tag the compiler does not know.
    #[error("unknown term type: {0}")]
    UnknownTermType(String),

    /// A rule carries an operator tag the compiler does not know.
    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    /// A datatype tag (type filter or comparison value type) is unknown.
    #[error("unknown datatype: {0}")]
    UnknownDatatype(String),

    /// An aggregate function tag is unknown.
    #[error("unknown aggregate: {0}")]
    UnknownAggregate(String),

    /// No variables were selected for output.
    #[error("no projection: {0}")]
    NoProjection(String),

    /// The request could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A compiler defect. Never caused by user data.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true if the error describes bad caller input rather than a
    /// compiler defect.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Error::Internal(_))
    }

    /// Short, stable name of the error kind, used in diagnostics output.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingValue(_) => "MissingValue",
            Error::UnknownTermType(_) => "UnknownTermType",
            Error::UnknownOperator(_) => "UnknownOperator",
            Error::UnknownDatatype(_) => "UnknownDatatype",
            Error::UnknownAggregate(_) => "UnknownAggregate",
            Error::NoProjection(_) => "NoProjection",
            Error::Serialization(_) => "Serialization",
            Error::Internal(_) => "Internal",
        }
    }
}
