//! RDF terms as they appear in generated query text.

use std::fmt;

/// A query variable such as `?main`.
///
/// The stored name never carries the leading `?`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(String);

impl Variable {
    /// Creates a variable, stripping a leading `?` or `$` if present.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.strip_prefix('?').or_else(|| name.strip_prefix('$')) {
            Some(stripped) => Self(stripped.to_string()),
            None => Self(name),
        }
    }

    /// Returns the bare name (without `?`).
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns a new variable named `<self><suffix>`, e.g. `?xLabel`.
    pub fn suffixed(&self, suffix: &str) -> Self {
        Self(format!("{}{}", self.0, suffix))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// An absolute IRI, rendered in angle brackets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(String);

impl Iri {
    /// Creates an IRI from its string form (without angle brackets).
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Returns the IRI string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum LiteralKind {
    /// A plain string literal.
    Simple,
    /// A literal with a language tag, e.g. `"Paris"@en`.
    LanguageTagged(String),
    /// A literal with an explicit datatype, e.g. `"1"^^xsd:integer`.
    Typed(Iri),
}

/// An RDF literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    value: String,
    kind: LiteralKind,
}

impl Literal {
    /// Creates a plain literal.
    pub fn simple(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: LiteralKind::Simple,
        }
    }

    /// Creates a language-tagged literal.
    pub fn with_language(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: LiteralKind::LanguageTagged(language.into()),
        }
    }

    /// Creates a typed literal.
    pub fn typed(value: impl Into<String>, datatype: Iri) -> Self {
        Self {
            value: value.into(),
            kind: LiteralKind::Typed(datatype),
        }
    }

    /// Returns the lexical value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.value.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                c => write!(f, "{c}")?,
            }
        }
        f.write_str("\"")?;
        match &self.kind {
            LiteralKind::Simple => Ok(()),
            LiteralKind::LanguageTagged(lang) => write!(f, "@{lang}"),
            LiteralKind::Typed(datatype) => write!(f, "^^{datatype}"),
        }
    }
}

/// Any term that can occupy a triple position or a `VALUES` row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A named node.
    Iri(Iri),
    /// A literal value.
    Literal(Literal),
    /// A variable.
    Variable(Variable),
}

impl Term {
    /// Returns the variable if this term is one.
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the IRI if this term is one.
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }
}

impl From<Variable> for Term {
    fn from(v: Variable) -> Self {
        Term::Variable(v)
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => iri.fmt(f),
            Term::Literal(lit) => lit.fmt(f),
            Term::Variable(v) => v.fmt(f),
        }
    }
}
