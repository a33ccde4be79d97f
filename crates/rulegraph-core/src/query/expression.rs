//! Expressions used inside FILTER, BIND, projections, and ordering.

use std::fmt;

use rulegraph_common::types::{Iri, Literal, Term, Variable};
use smallvec::SmallVec;

/// Argument list for function calls. Almost every call takes one or two.
/// Arguments are boxed since `Expression` cannot hold itself inline.
pub type Args = SmallVec<[Box<Expression>; 2]>;

/// A query expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A term: variable, IRI, or literal.
    Term(Term),

    /// A numeric constant written verbatim (e.g. `20`, `0.5`).
    Number(String),

    /// Binary operation.
    Binary {
        /// Left operand.
        left: Box<Expression>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expression>,
    },

    /// Unary operation.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expression>,
    },

    /// Built-in function call such as `BOUND(?x)` or `YEAR(?d)`.
    FunctionCall {
        /// Function name as written in the query.
        name: &'static str,
        /// Arguments.
        args: Args,
    },

    /// Datatype cast written as a function call on the datatype IRI.
    Cast {
        /// Target datatype.
        datatype: Iri,
        /// Value to cast.
        expression: Box<Expression>,
    },

    /// `expr IN (a, b, ...)`
    In {
        /// The tested expression.
        expression: Box<Expression>,
        /// Candidate values.
        list: Vec<Expression>,
    },

    /// Aggregate function application.
    Aggregate {
        /// Aggregate function.
        function: AggregateFunction,
        /// Aggregated expression.
        expression: Box<Expression>,
        /// Whether to use DISTINCT.
        distinct: bool,
    },

    /// User-written expression text, inserted verbatim inside parentheses.
    Raw(String),
}

/// Binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl BinaryOp {
    /// The operator token.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

/// Unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical NOT.
    Not,
    /// Numeric negation.
    Neg,
}

/// Aggregate function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    /// Count bound values.
    Count,
    /// Sum values.
    Sum,
    /// Average values.
    Avg,
    /// Minimum value.
    Min,
    /// Maximum value.
    Max,
    /// Any one value from the group.
    Sample,
}

impl AggregateFunction {
    /// All aggregate functions, in declaration order.
    pub const ALL: [AggregateFunction; 6] = [
        AggregateFunction::Count,
        AggregateFunction::Sum,
        AggregateFunction::Avg,
        AggregateFunction::Min,
        AggregateFunction::Max,
        AggregateFunction::Sample,
    ];

    /// The keyword as written in the query.
    pub fn as_str(self) -> &'static str {
        match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
            AggregateFunction::Sample => "SAMPLE",
        }
    }

    /// Parses a keyword, case-insensitively.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(keyword))
    }
}

impl Expression {
    /// A variable reference.
    pub fn var(v: &Variable) -> Self {
        Expression::Term(Term::Variable(v.clone()))
    }

    /// An IRI constant.
    pub fn iri(iri: Iri) -> Self {
        Expression::Term(Term::Iri(iri))
    }

    /// A literal constant.
    pub fn literal(lit: Literal) -> Self {
        Expression::Term(Term::Literal(lit))
    }

    /// An integer constant.
    pub fn integer(n: i64) -> Self {
        Expression::Number(n.to_string())
    }

    /// A numeric constant written exactly as given.
    pub fn number(text: impl Into<String>) -> Self {
        Expression::Number(text.into())
    }

    /// A binary operation.
    pub fn binary(left: Expression, op: BinaryOp, right: Expression) -> Self {
        Expression::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// `left && right`
    pub fn and(left: Expression, right: Expression) -> Self {
        Self::binary(left, BinaryOp::And, right)
    }

    /// A built-in function call.
    pub fn call<I>(name: &'static str, args: I) -> Self
    where
        I: IntoIterator<Item = Expression>,
    {
        Expression::FunctionCall {
            name,
            args: args.into_iter().map(Box::new).collect(),
        }
    }

    /// `!expr`
    pub fn not(operand: Expression) -> Self {
        Expression::Unary {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        }
    }

    /// `BOUND(?v)`
    pub fn bound(v: &Variable) -> Self {
        Self::call("BOUND", [Self::var(v)])
    }

    /// Casts to the given datatype.
    pub fn cast(datatype: Iri, expression: Expression) -> Self {
        Expression::Cast {
            datatype,
            expression: Box::new(expression),
        }
    }

    /// Applies an aggregate function.
    pub fn aggregate(function: AggregateFunction, expression: Expression) -> Self {
        Expression::Aggregate {
            function,
            expression: Box::new(expression),
            distinct: false,
        }
    }

    /// Returns true for expressions that need parentheses when nested
    /// inside an operator.
    fn is_compound(&self) -> bool {
        matches!(self, Expression::Binary { .. } | Expression::In { .. })
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_compound() {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl From<Variable> for Expression {
    fn from(v: Variable) -> Self {
        Expression::Term(Term::Variable(v))
    }
}

impl From<Term> for Expression {
    fn from(t: Term) -> Self {
        Expression::Term(t)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Term(term) => write!(f, "{term}"),
            Expression::Number(text) => f.write_str(text),
            Expression::Binary { left, op, right } => {
                left.fmt_operand(f)?;
                write!(f, " {} ", op.as_str())?;
                right.fmt_operand(f)
            }
            Expression::Unary { op, operand } => {
                match op {
                    UnaryOp::Not => f.write_str("!")?,
                    UnaryOp::Neg => f.write_str("-")?,
                }
                operand.fmt_operand(f)
            }
            Expression::FunctionCall { name, args } => {
                write!(f, "{name}(")?;
                write_list(f, args.as_slice())?;
                f.write_str(")")
            }
            Expression::Cast {
                datatype,
                expression,
            } => write!(f, "{datatype}({expression})"),
            Expression::In { expression, list } => {
                expression.fmt_operand(f)?;
                f.write_str(" IN (")?;
                write_list(f, list.as_slice())?;
                f.write_str(")")
            }
            Expression::Aggregate {
                function,
                expression,
                distinct,
            } => {
                let distinct = if *distinct { "DISTINCT " } else { "" };
                write!(f, "{}({distinct}{expression})", function.as_str())
            }
            Expression::Raw(text) => write!(f, "({text})"),
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_nesting_parenthesized() {
        let x = Variable::new("x");
        let expr = Expression::binary(
            Expression::binary(
                Expression::var(&x.suffixed("Max")),
                BinaryOp::Sub,
                Expression::var(&x.suffixed("Min")),
            ),
            BinaryOp::Div,
            Expression::integer(4),
        );
        assert_eq!(expr.to_string(), "(?xMax - ?xMin) / 4");
    }

    #[test]
    fn test_bound_and_function() {
        let x = Variable::new("x");
        let expr = Expression::and(
            Expression::bound(&x),
            Expression::call("isIRI", [Expression::var(&x)]),
        );
        assert_eq!(expr.to_string(), "BOUND(?x) && isIRI(?x)");
    }

    #[test]
    fn test_nested_calls() {
        let x = Variable::new("x");
        let expr = Expression::call(
            "COALESCE",
            [
                Expression::call("FLOOR", [Expression::call("ABS", [Expression::var(&x)])]),
                Expression::integer(0),
            ],
        );
        assert_eq!(expr.to_string(), "COALESCE(FLOOR(ABS(?x)), 0)");

        let Expression::FunctionCall { args, .. } = &expr else {
            panic!("expected a call");
        };
        assert_eq!(args.len(), 2);
        assert!(!args.spilled());
    }

    #[test]
    fn test_in_list() {
        let x = Variable::new("x");
        let expr = Expression::In {
            expression: Box::new(Expression::call("DATATYPE", [Expression::var(&x)])),
            list: vec![
                Expression::iri(Iri::new("http://a")),
                Expression::iri(Iri::new("http://b")),
            ],
        };
        assert_eq!(expr.to_string(), "DATATYPE(?x) IN (<http://a>, <http://b>)");

        let guarded = Expression::and(Expression::bound(&x), expr);
        assert_eq!(
            guarded.to_string(),
            "BOUND(?x) && (DATATYPE(?x) IN (<http://a>, <http://b>))"
        );
    }

    #[test]
    fn test_aggregate_and_cast() {
        let y = Variable::new("y");
        let agg = Expression::aggregate(AggregateFunction::Avg, Expression::var(&y));
        assert_eq!(agg.to_string(), "AVG(?y)");

        let cast = Expression::cast(Iri::new("http://int"), Expression::var(&y));
        assert_eq!(cast.to_string(), "<http://int>(?y)");
    }

    #[test]
    fn test_not_and_raw() {
        let x = Variable::new("x");
        assert_eq!(Expression::not(Expression::bound(&x)).to_string(), "!BOUND(?x)");
        assert_eq!(Expression::Raw("?a > 3".into()).to_string(), "(?a > 3)");
    }

    #[test]
    fn test_aggregate_keyword_parsing() {
        assert_eq!(AggregateFunction::from_keyword("count"), Some(AggregateFunction::Count));
        assert_eq!(AggregateFunction::from_keyword("SAMPLE"), Some(AggregateFunction::Sample));
        assert_eq!(AggregateFunction::from_keyword("MEDIAN"), None);
    }
}
