//! Abstract Syntax Tree types for TICKscript chains.
//!
//! A TICKscript pipeline is a chain of method calls hanging off a root:
//!
//! ```text
//! stream
//!     |alert()
//!         .id('cpu:{{ .Group }}')
//!         .crit(lambda: "usage_idle" < 10)
//! ```
//!
//! The tree is built tip-last: every link is a [`ChainNode`] whose `left`
//! holds everything written before it. Walking `left` pointers from the tip
//! reaches the root [`Node::Identifier`].
//!
//! # Arguments and literals
//!
//! Callers hand runtime values to the chain builder as [`Arg`]s. An `Arg` is
//! encoded into a [`Literal`] with [`Arg::to_literal`], which is the only
//! place an encoding failure can originate.
//!
//! ```rust
//! use tickgen::ast::{Arg, IntBase, Literal, NumberLiteral};
//!
//! let mode = Arg::from(NumberLiteral::octal(0o644));
//! assert_eq!(
//!     mode.to_literal().unwrap(),
//!     Literal::Number(NumberLiteral::Int { value: 420, base: IntBase::Octal })
//! );
//! ```

use crate::error::LiteralError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ============================================================================
// Nodes
// ============================================================================

/// A node in a TICKscript chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Chain root: `stream`, `batch`, or a variable holding a pipeline.
    Identifier(String),

    /// A method call appended to the node on its left.
    Chain(ChainNode),
}

impl Node {
    /// Create a chain root.
    pub fn identifier(name: impl Into<String>) -> Self {
        Node::Identifier(name.into())
    }

    /// Name of the identifier the chain hangs off.
    pub fn root(&self) -> &str {
        let mut node = self;
        loop {
            match node {
                Node::Identifier(name) => return name,
                Node::Chain(chain) => node = &chain.left,
            }
        }
    }

    /// Every link from the root to this node, in source order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tickgen::ast::Node;
    /// use tickgen::builder::ChainBuilder;
    ///
    /// let mut b = ChainBuilder::new(Node::identifier("stream"));
    /// b.pipe("alert", []).dot("topic", ["cpu".into()]);
    /// let node = b.finish().unwrap();
    ///
    /// let links = node.links();
    /// assert_eq!(links.len(), 2);
    /// assert_eq!(links[0].call.name, "alert");
    /// assert_eq!(links[1].call.name, "topic");
    /// ```
    pub fn links(&self) -> Vec<&ChainNode> {
        let mut links = Vec::new();
        let mut node = self;
        while let Node::Chain(chain) = node {
            links.push(chain);
            node = &chain.left;
        }
        links.reverse();
        links
    }

    /// Names of every call in the chain, in source order.
    pub fn call_names(&self) -> Vec<&str> {
        self.links()
            .into_iter()
            .map(|link| link.call.name.as_str())
            .collect()
    }
}

/// One link of a chain: `left` followed by `operator` and `call`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainNode {
    /// Everything written before this call.
    pub left: Box<Node>,
    pub operator: ChainOperator,
    pub call: FunctionNode,
}

/// How a call attaches to its left-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainOperator {
    /// Chaining method creating a new pipeline node: `|alert()`.
    Pipe,
    /// Property method configuring the current pipeline node: `.topic('x')`.
    Dot,
}

impl ChainOperator {
    /// The operator character as written in source.
    pub fn token(self) -> char {
        match self {
            ChainOperator::Pipe => '|',
            ChainOperator::Dot => '.',
        }
    }
}

/// A named call with literal arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionNode {
    pub name: String,
    pub args: Vec<Literal>,
}

// ============================================================================
// Literals
// ============================================================================

/// A constant argument value.
///
/// | Variant | Rendered as |
/// |---------|-------------|
/// | `String` | `'text'` |
/// | `Number` | `42`, `0644`, `0x1F`, `0.5` |
/// | `Bool` | `TRUE`, `FALSE` |
/// | `Duration` | `10s`, `5m`, `1w` |
/// | `Lambda` | `lambda: "value" > 10` |
/// | `List` | spread into the argument list |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    String(String),
    Number(NumberLiteral),
    Bool(bool),
    /// Duration in nanoseconds.
    Duration(i64),
    /// Lambda expression source, without the `lambda:` keyword.
    Lambda(String),
    List(Vec<Literal>),
}

/// Numeric literal. Integers keep the base they are written in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NumberLiteral {
    Int { value: i64, base: IntBase },
    Float(f64),
}

impl NumberLiteral {
    /// Base-10 integer.
    pub fn int(value: i64) -> Self {
        NumberLiteral::Int {
            value,
            base: IntBase::Decimal,
        }
    }

    /// Base-8 integer, as used for file modes.
    pub fn octal(value: i64) -> Self {
        NumberLiteral::Int {
            value,
            base: IntBase::Octal,
        }
    }
}

/// Numeric base of an integer literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntBase {
    #[default]
    Decimal,
    Octal,
    Hex,
}

impl IntBase {
    pub fn radix(self) -> u32 {
        match self {
            IntBase::Decimal => 10,
            IntBase::Octal => 8,
            IntBase::Hex => 16,
        }
    }
}

impl fmt::Display for IntBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.radix())
    }
}

/// A lambda expression kept as TICKscript source text.
///
/// Expressions are produced upstream; this crate only embeds them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lambda(String);

impl Lambda {
    pub fn new(expression: impl Into<String>) -> Self {
        Lambda(expression.into())
    }

    pub fn expression(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Arguments
// ============================================================================

/// A runtime value passed to a chain call before literal encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Str(String),
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Duration(Duration),
    List(Vec<String>),
    Lambda(Lambda),
    Number(NumberLiteral),
    /// An unset optional value.
    Absent,
}

impl Arg {
    /// Whether this value is the zero value of its type.
    ///
    /// Property calls carrying a zero argument are omitted by
    /// [`ChainBuilder::dot`](crate::builder::ChainBuilder::dot). Integers
    /// written in a non-decimal base are never zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Arg::Str(s) => s.is_empty(),
            Arg::Bool(b) => !b,
            Arg::Int(i) => *i == 0,
            Arg::UInt(u) => *u == 0,
            Arg::Float(f) => *f == 0.0,
            Arg::Duration(d) => d.is_zero(),
            Arg::List(items) => items.is_empty(),
            Arg::Lambda(l) => l.expression().is_empty(),
            Arg::Number(NumberLiteral::Int { value, base }) => {
                *base == IntBase::Decimal && *value == 0
            }
            Arg::Number(NumberLiteral::Float(f)) => *f == 0.0,
            Arg::Absent => true,
        }
    }

    /// Encode this value as a literal.
    pub fn to_literal(&self) -> Result<Literal, LiteralError> {
        let literal = match self {
            Arg::Str(s) => Literal::String(s.clone()),
            Arg::Bool(b) => Literal::Bool(*b),
            Arg::Int(i) => Literal::Number(NumberLiteral::int(*i)),
            Arg::UInt(u) => {
                let value =
                    i64::try_from(*u).map_err(|_| LiteralError::IntegerOverflow { value: *u })?;
                Literal::Number(NumberLiteral::int(value))
            }
            Arg::Float(f) => Literal::Number(float_literal(*f)?),
            Arg::Duration(d) => {
                let nanos = i64::try_from(d.as_nanos())
                    .map_err(|_| LiteralError::DurationOverflow { secs: d.as_secs() })?;
                Literal::Duration(nanos)
            }
            Arg::List(items) => Literal::List(items.iter().cloned().map(Literal::String).collect()),
            Arg::Lambda(l) => Literal::Lambda(l.expression().to_string()),
            Arg::Number(NumberLiteral::Int { value, base }) => {
                if *base != IntBase::Decimal && *value < 0 {
                    return Err(LiteralError::NegativeBasedInteger {
                        value: *value,
                        base: *base,
                    });
                }
                Literal::Number(NumberLiteral::Int {
                    value: *value,
                    base: *base,
                })
            }
            Arg::Number(NumberLiteral::Float(f)) => Literal::Number(float_literal(*f)?),
            Arg::Absent => return Err(LiteralError::Absent),
        };
        Ok(literal)
    }
}

fn float_literal(value: f64) -> Result<NumberLiteral, LiteralError> {
    if value.is_finite() {
        Ok(NumberLiteral::Float(value))
    } else {
        Err(LiteralError::NonFiniteFloat { value })
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::Str(s.clone())
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Bool(b)
    }
}

impl From<i64> for Arg {
    fn from(i: i64) -> Self {
        Arg::Int(i)
    }
}

impl From<u64> for Arg {
    fn from(u: u64) -> Self {
        Arg::UInt(u)
    }
}

impl From<u8> for Arg {
    fn from(u: u8) -> Self {
        Arg::Int(i64::from(u))
    }
}

impl From<f64> for Arg {
    fn from(f: f64) -> Self {
        Arg::Float(f)
    }
}

impl From<Duration> for Arg {
    fn from(d: Duration) -> Self {
        Arg::Duration(d)
    }
}

impl From<&[String]> for Arg {
    fn from(items: &[String]) -> Self {
        Arg::List(items.to_vec())
    }
}

impl From<&Vec<String>> for Arg {
    fn from(items: &Vec<String>) -> Self {
        Arg::List(items.clone())
    }
}

impl From<&Lambda> for Arg {
    fn from(l: &Lambda) -> Self {
        Arg::Lambda(l.clone())
    }
}

impl From<NumberLiteral> for Arg {
    fn from(n: NumberLiteral) -> Self {
        Arg::Number(n)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Arg::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values() {
        assert!(Arg::from("").is_zero());
        assert!(Arg::from(false).is_zero());
        assert!(Arg::from(0i64).is_zero());
        assert!(Arg::from(0.0).is_zero());
        assert!(Arg::from(Duration::ZERO).is_zero());
        assert!(Arg::from(&Vec::<String>::new()).is_zero());
        assert!(Arg::from(None::<&Lambda>).is_zero());

        assert!(!Arg::from("x").is_zero());
        assert!(!Arg::from(true).is_zero());
        assert!(!Arg::from(Duration::from_secs(1)).is_zero());
    }

    #[test]
    fn test_based_integer_is_never_zero() {
        assert!(!Arg::from(NumberLiteral::octal(0)).is_zero());
        assert!(Arg::from(NumberLiteral::int(0)).is_zero());
    }

    #[test]
    fn test_unsigned_overflow() {
        let err = Arg::from(u64::MAX).to_literal().unwrap_err();
        assert_eq!(err, LiteralError::IntegerOverflow { value: u64::MAX });

        let ok = Arg::from(i64::MAX as u64).to_literal().unwrap();
        assert_eq!(ok, Literal::Number(NumberLiteral::int(i64::MAX)));
    }

    #[test]
    fn test_non_finite_float() {
        assert!(matches!(
            Arg::from(f64::NAN).to_literal(),
            Err(LiteralError::NonFiniteFloat { .. })
        ));
        assert!(Arg::from(f64::INFINITY).to_literal().is_err());
        assert!(Arg::from(NumberLiteral::Float(f64::NEG_INFINITY))
            .to_literal()
            .is_err());
    }

    #[test]
    fn test_duration_overflow() {
        let huge = Duration::from_secs(u64::MAX);
        assert_eq!(
            Arg::from(huge).to_literal(),
            Err(LiteralError::DurationOverflow { secs: u64::MAX })
        );
        assert_eq!(
            Arg::from(Duration::from_millis(1500)).to_literal(),
            Ok(Literal::Duration(1_500_000_000))
        );
    }

    #[test]
    fn test_negative_octal_rejected() {
        assert_eq!(
            Arg::from(NumberLiteral::octal(-1)).to_literal(),
            Err(LiteralError::NegativeBasedInteger {
                value: -1,
                base: IntBase::Octal
            })
        );
        assert!(Arg::from(NumberLiteral::int(-1)).to_literal().is_ok());
    }

    #[test]
    fn test_list_keeps_order() {
        let command = vec!["echo".to_string(), "hi".to_string()];
        assert_eq!(
            Arg::from(&command).to_literal().unwrap(),
            Literal::List(vec![
                Literal::String("echo".into()),
                Literal::String("hi".into())
            ])
        );
    }

    #[test]
    fn test_absent_cannot_encode() {
        assert_eq!(Arg::Absent.to_literal(), Err(LiteralError::Absent));
        let lambda = Lambda::new("\"value\" > 10");
        assert_eq!(
            Arg::from(Some(&lambda)).to_literal(),
            Ok(Literal::Lambda("\"value\" > 10".into()))
        );
    }
}
