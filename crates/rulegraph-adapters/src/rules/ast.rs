//! Rule tree model.
//!
//! Rule trees are authored by an external editor and arrive as JSON. The
//! decoder is strict about structure but lenient about content: a missing
//! payload field or an unrecognized tag is kept in the model and reported
//! by the compiler as a typed error, so the caller learns *which* part of
//! the tree is incomplete.

use rulegraph_common::utils::error::{Error, Result};
use serde::Deserialize;

/// How a group joins its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum GroupCombinator {
    /// All children must match.
    #[default]
    #[serde(rename = "AND", alias = "and", alias = "And")]
    And,
    /// At least one child must match.
    #[serde(rename = "OR", alias = "or", alias = "Or")]
    Or,
}

/// A reference to a named variable, as produced by the variable picker.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct VariableRef {
    /// Variable name, without `?`.
    #[serde(default)]
    pub value: Option<String>,
    /// Display label.
    #[serde(default)]
    pub label: Option<String>,
}

impl VariableRef {
    /// Creates a reference to `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            value: Some(name.into()),
            label: None,
        }
    }

    /// Returns the name if it is set and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }
}

/// A group of rules sharing a pivot variable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RuleGroup {
    /// Join mode for the children.
    #[serde(default)]
    pub combinator: GroupCombinator,
    /// Negates the whole group.
    #[serde(default)]
    pub not: bool,
    /// The pivot variable leaf rules are anchored to.
    #[serde(default)]
    pub variable: Option<VariableRef>,
    /// Children, in order.
    pub rules: Vec<RuleNode>,
}

impl RuleGroup {
    /// Creates an empty AND group pivoting on `variable`.
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            combinator: GroupCombinator::And,
            not: false,
            variable: Some(VariableRef::named(variable)),
            rules: Vec::new(),
        }
    }

    /// Sets the combinator.
    pub fn with_combinator(mut self, combinator: GroupCombinator) -> Self {
        self.combinator = combinator;
        self
    }

    /// Sets the negation flag.
    pub fn with_not(mut self, not: bool) -> Self {
        self.not = not;
        self
    }

    /// Appends a child rule.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(RuleNode::Rule(rule));
        self
    }

    /// Appends a nested group.
    pub fn with_group(mut self, group: RuleGroup) -> Self {
        self.rules.push(RuleNode::Group(group));
        self
    }

    /// The pivot variable name, if set.
    pub fn pivot(&self) -> Option<&str> {
        self.variable.as_ref().and_then(VariableRef::name)
    }
}

/// A child of a rule group.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleNode {
    /// A nested group.
    Group(RuleGroup),
    /// A leaf condition.
    Rule(Rule),
}

/// A leaf condition, dispatched on its `operator` tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Single-hop relation match.
    Filter(FilterRule),
    /// Relation match over a path. Currently wired like [`Rule::Filter`].
    FilterPath(FilterRule),
    /// Type/shape check on the pivot.
    Datatype(DatatypeRule),
    /// Typed comparison against the pivot.
    Operator(ComparisonRule),
    /// Computed binding.
    Function(FunctionRule),
    /// `pivot rdf:type/rdfs:subClassOf* input`
    SubclassOf(ClassRule),
    /// `pivot rdf:type input`
    InstanceOf(ClassRule),
    /// An operator tag the compiler does not know.
    Unknown(String),
}

impl Rule {
    /// The operator tag as it appears in JSON.
    pub fn operator(&self) -> &str {
        match self {
            Rule::Filter(_) => "filter",
            Rule::FilterPath(_) => "filter_path",
            Rule::Datatype(_) => "datatype",
            Rule::Operator(_) => "operator",
            Rule::Function(_) => "function",
            Rule::SubclassOf(_) => "subclass_of",
            Rule::InstanceOf(_) => "instance_of",
            Rule::Unknown(tag) => tag,
        }
    }
}

/// Payload of `filter` and `filter_path`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FilterRule {
    /// The predicate term.
    #[serde(default)]
    pub predicate: Option<FlexibleTerm>,
    /// The other end of the edge.
    #[serde(default)]
    pub input: Option<FlexibleTerm>,
    /// If true the pivot is the object instead of the subject.
    #[serde(default)]
    pub reverse: bool,
}

/// Payload of `datatype`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DatatypeRule {
    /// The requested type tag.
    #[serde(default)]
    pub value: Option<Choice>,
}

impl DatatypeRule {
    /// Parses the type tag.
    ///
    /// # Errors
    ///
    /// Returns `MissingValue` if no tag is set and `UnknownDatatype` for an
    /// unrecognized tag.
    pub fn check(&self) -> Result<DatatypeCheck> {
        match &self.value {
            Some(choice) => choice.as_str().parse(),
            None => Err(Error::MissingValue("datatype rule has no type".into())),
        }
    }
}

/// Payload of the logical `operator` rule.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ComparisonRule {
    /// Comparison operator, `eq` when absent.
    #[serde(default)]
    pub op: Option<Choice>,
    /// How `p1` is interpreted, `term` when absent.
    #[serde(default)]
    pub dtype: Option<Choice>,
    /// The operand.
    #[serde(default)]
    pub p1: serde_json::Value,
}

impl ComparisonRule {
    /// Parses the comparison operator.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOperator` for an unrecognized tag.
    pub fn op(&self) -> Result<CompareOp> {
        self.op
            .as_ref()
            .map_or(Ok(CompareOp::Eq), |c| c.as_str().parse())
    }

    /// Parses the operand type.
    ///
    /// # Errors
    ///
    /// Returns `UnknownDatatype` for an unrecognized tag.
    pub fn dtype(&self) -> Result<ValueType> {
        self.dtype
            .as_ref()
            .map_or(Ok(ValueType::Term), |c| c.as_str().parse())
    }

    /// The operand as literal text. Strings are taken as-is; numbers and
    /// booleans use their JSON spelling.
    pub fn operand_text(&self) -> Option<String> {
        match &self.p1 {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// The operand as a flexible term.
    ///
    /// # Errors
    ///
    /// Returns `MissingValue` when no operand is set and `Serialization`
    /// when it is not a term object.
    pub fn operand_term(&self) -> Result<FlexibleTerm> {
        if self.p1.is_null() {
            return Err(Error::MissingValue("comparison has no operand".into()));
        }
        FlexibleTerm::deserialize(&self.p1).map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Payload of `function`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FunctionRule {
    /// Function kind, `raw` when absent.
    #[serde(default)]
    pub func: Option<Choice>,
    /// Input variable.
    #[serde(default)]
    pub input: Option<VariableRef>,
    /// Output variable. Defaults to the group's pivot.
    #[serde(default)]
    pub output: Option<VariableRef>,
    /// Expression text for `raw`.
    #[serde(default, rename = "rawFn", alias = "raw_fn")]
    pub raw_fn: Option<String>,
}

impl FunctionRule {
    /// Parses the function kind.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOperator` for an unrecognized function.
    pub fn kind(&self) -> Result<FunctionKind> {
        self.func
            .as_ref()
            .map_or(Ok(FunctionKind::Raw), |c| c.as_str().parse())
    }
}

/// Payload of `subclass_of` and `instance_of`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ClassRule {
    /// The class term.
    #[serde(default)]
    pub input: Option<FlexibleTerm>,
}

/// A select-box value: either the bare tag or `{ "value": tag }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Choice {
    /// `"tag"`
    Bare(String),
    /// `{ "value": "tag", "label": ... }`
    Option {
        /// The tag.
        value: String,
    },
}

impl Choice {
    /// The tag.
    pub fn as_str(&self) -> &str {
        match self {
            Choice::Bare(s) | Choice::Option { value: s } => s,
        }
    }
}

impl From<&str> for Choice {
    fn from(s: &str) -> Self {
        Choice::Bare(s.to_string())
    }
}

/// A resolved search hit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchTerm {
    /// IRI or literal.
    #[serde(rename = "type")]
    pub kind: SearchTermKind,
    /// IRI string or literal lexical form.
    pub value: String,
    /// Language tag for literals.
    #[serde(default)]
    pub lang: Option<String>,
    /// Display label.
    #[serde(default)]
    pub label: Option<String>,
}

impl SearchTerm {
    /// An IRI hit.
    pub fn iri(value: impl Into<String>) -> Self {
        Self {
            kind: SearchTermKind::Uri,
            value: value.into(),
            lang: None,
            label: None,
        }
    }

    /// A literal hit.
    pub fn literal(value: impl Into<String>, lang: Option<&str>) -> Self {
        Self {
            kind: SearchTermKind::Literal,
            value: value.into(),
            lang: lang.map(str::to_string),
            label: None,
        }
    }
}

/// Kind of a search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchTermKind {
    /// A named node.
    #[serde(alias = "iri")]
    Uri,
    /// A literal.
    Literal,
}

/// A term specification that resolves to concrete terms, a variable, or a
/// wildcard.
#[derive(Debug, Clone, PartialEq)]
pub enum FlexibleTerm {
    /// Resolved search hits.
    Search(Vec<SearchTerm>),
    /// Free text, comma separated.
    Manual(String),
    /// A named variable. `None` when the picker is still empty.
    Variable(Option<String>),
    /// A reified statement. Optionally named.
    Statement(Option<String>),
    /// Matches anything.
    Any,
    /// A type tag the compiler does not know.
    Unknown(String),
}

impl FlexibleTerm {
    /// A variable reference.
    pub fn variable(name: impl Into<String>) -> Self {
        FlexibleTerm::Variable(Some(name.into()))
    }

    /// Free text.
    pub fn manual(text: impl Into<String>) -> Self {
        FlexibleTerm::Manual(text.into())
    }

    /// The variable name this term refers to, if any.
    pub fn variable_name(&self) -> Option<&str> {
        match self {
            FlexibleTerm::Variable(Some(name)) | FlexibleTerm::Statement(Some(name))
                if !name.is_empty() =>
            {
                Some(name)
            }
            _ => None,
        }
    }
}

tag_enum! {
    /// Requested shape of the pivot in a `datatype` rule.
    DatatypeCheck, UnknownDatatype, {
        /// Unbound or blank.
        Null => "null",
        /// Bound.
        NonNull => "non_null" | "not_null",
        /// An IRI.
        Iri => "iri",
        /// A URI.
        Url => "url" | "uri",
        /// A literal.
        Literal => "literal",
        /// A numeric literal.
        Number => "number",
        /// `xsd:string`
        String => "string",
        /// `xsd:integer`
        Integer => "integer",
        /// `xsd:boolean`
        Boolean => "boolean",
        /// `xsd:date` or `xsd:dateTime`
        Datetime => "datetime",
        /// `xsd:float`, `xsd:double` or `xsd:decimal`
        Float => "float",
    }
}

tag_enum! {
    /// Comparison operator of the logical `operator` rule.
    CompareOp, UnknownOperator, {
        /// `=`
        Eq => "eq",
        /// `!=`
        Neq => "neq",
        /// `>`
        Gt => "gt",
        /// `>=`
        Gte => "gte",
        /// `<`
        Lt => "lt",
        /// `<=`
        Lte => "lte",
        /// Pivot is unbound.
        Null => "null",
        /// Pivot is bound.
        NotNull => "not_null",
        /// Operand is a verbatim filter expression.
        Raw => "raw",
    }
}

tag_enum! {
    /// How a comparison operand is interpreted.
    ValueType, UnknownDatatype, {
        /// Plain string literal.
        String => "string",
        /// `xsd:boolean` literal.
        Boolean => "boolean",
        /// `xsd:integer` literal.
        Integer => "integer",
        /// `xsd:decimal` literal.
        Decimal => "decimal",
        /// `xsd:dateTime` literal.
        Datetime => "datetime",
        /// `xsd:anyURI` literal.
        Url => "url",
        /// A flexible term.
        Term => "term",
    }
}

tag_enum! {
    /// Kind of a `function` rule.
    FunctionKind, UnknownOperator, {
        /// Verbatim expression.
        Raw => "raw",
    }
}
