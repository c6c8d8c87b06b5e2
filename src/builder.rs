//! Fluent builder for TICKscript call chains.
//!
//! [`ChainBuilder`] owns the tip of a chain and appends one link per call.
//! Omission policy lives here so converters can stay a flat list of calls:
//!
//! | Method | Emitted when |
//! |--------|--------------|
//! | [`pipe`](ChainBuilder::pipe) | always |
//! | [`dot`](ChainBuilder::dot) | no argument is a zero value |
//! | [`dot_if`](ChainBuilder::dot_if) | the condition holds and `dot` would emit |
//! | [`dot_zero_value_ok`](ChainBuilder::dot_zero_value_ok) | always |
//!
//! The first argument that fails literal encoding is recorded and turns
//! every later call into a no-op. Callers keep issuing calls and check the
//! outcome once with [`finish`](ChainBuilder::finish).
//!
//! # Example
//!
//! ```rust
//! use tickgen::ast::Node;
//! use tickgen::builder::ChainBuilder;
//!
//! let mut b = ChainBuilder::new(Node::identifier("stream"));
//! b.pipe("alert", [])
//!     .dot("topic", ["".into()])
//!     .dot_if("all", true, [])
//!     .dot_zero_value_ok("flapping", [0.0.into(), 0.5.into()]);
//!
//! let node = b.finish().unwrap();
//! assert_eq!(node.call_names(), ["alert", "all", "flapping"]);
//! ```

use crate::ast::{Arg, ChainNode, ChainOperator, FunctionNode, Node};
use crate::error::BuildError;

/// Accumulates a chain of calls and the first encoding error.
///
/// One builder serves one conversion; it is consumed by [`finish`](Self::finish).
#[derive(Debug)]
pub struct ChainBuilder {
    prev: Node,
    err: Option<BuildError>,
}

impl ChainBuilder {
    /// Start a chain on top of `parent`.
    pub fn new(parent: Node) -> Self {
        Self {
            prev: parent,
            err: None,
        }
    }

    /// Append a chaining method (`|name(args)`).
    pub fn pipe<const N: usize>(&mut self, name: &str, args: [Arg; N]) -> &mut Self {
        self.link(ChainOperator::Pipe, name, &args)
    }

    /// Append a property method (`.name(args)`), unless any argument is a
    /// zero value.
    pub fn dot<const N: usize>(&mut self, name: &str, args: [Arg; N]) -> &mut Self {
        if args.iter().any(Arg::is_zero) {
            return self;
        }
        self.link(ChainOperator::Dot, name, &args)
    }

    /// Like [`dot`](Self::dot), but skipped entirely when `condition` is false.
    pub fn dot_if<const N: usize>(
        &mut self,
        name: &str,
        condition: bool,
        args: [Arg; N],
    ) -> &mut Self {
        if !condition {
            return self;
        }
        self.dot(name, args)
    }

    /// Append a property method even when its arguments are zero values.
    pub fn dot_zero_value_ok<const N: usize>(&mut self, name: &str, args: [Arg; N]) -> &mut Self {
        self.link(ChainOperator::Dot, name, &args)
    }

    /// The tip of the chain built so far.
    pub fn current(&self) -> &Node {
        &self.prev
    }

    /// The first recorded error, if any.
    pub fn error(&self) -> Option<&BuildError> {
        self.err.as_ref()
    }

    /// Consume the builder. A recorded error discards the partial chain.
    pub fn finish(self) -> Result<Node, BuildError> {
        match self.err {
            Some(err) => Err(err),
            None => Ok(self.prev),
        }
    }

    fn link(&mut self, operator: ChainOperator, name: &str, args: &[Arg]) -> &mut Self {
        if self.err.is_some() {
            tracing::trace!(property = name, "chain already failed, skipping call");
            return self;
        }

        let literals = match args.iter().map(Arg::to_literal).collect::<Result<Vec<_>, _>>() {
            Ok(literals) => literals,
            Err(source) => {
                tracing::warn!(property = name, error = %source, "cannot encode argument");
                self.err = Some(BuildError {
                    property: name.to_string(),
                    source,
                });
                return self;
            }
        };

        let left = std::mem::replace(&mut self.prev, Node::Identifier(String::new()));
        self.prev = Node::Chain(ChainNode {
            left: Box::new(left),
            operator,
            call: FunctionNode {
                name: name.to_string(),
                args: literals,
            },
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Literal, NumberLiteral};
    use crate::error::LiteralError;
    use std::time::Duration;

    fn stream() -> ChainBuilder {
        ChainBuilder::new(Node::identifier("stream"))
    }

    #[test]
    fn test_links_keep_call_order() {
        let mut b = stream();
        b.pipe("alert", [])
            .dot("id", ["a".into()])
            .dot("message", ["b".into()]);

        let node = b.finish().unwrap();
        assert_eq!(node.root(), "stream");
        assert_eq!(node.call_names(), ["alert", "id", "message"]);

        let links = node.links();
        assert_eq!(links[0].operator, ChainOperator::Pipe);
        assert_eq!(links[1].operator, ChainOperator::Dot);
        assert_eq!(links[2].call.args, vec![Literal::String("b".into())]);
    }

    #[test]
    fn test_dot_omits_zero_arguments() {
        let mut b = stream();
        b.pipe("alert", [])
            .dot("topic", ["".into()])
            .dot("history", [0u64.into()])
            .dot("header", ["k".into(), "".into()])
            .dot("tcp", []);

        assert_eq!(b.finish().unwrap().call_names(), ["alert", "tcp"]);
    }

    #[test]
    fn test_pipe_is_never_omitted() {
        let mut b = stream();
        b.pipe("log", ["".into()]);
        assert_eq!(b.finish().unwrap().call_names(), ["log"]);
    }

    #[test]
    fn test_dot_if() {
        let mut b = stream();
        b.dot_if("all", false, [])
            .dot_if("noRecoveries", true, [])
            .dot_if("stateChangesOnly", true, [Duration::ZERO.into()]);

        assert_eq!(b.finish().unwrap().call_names(), ["noRecoveries"]);
    }

    #[test]
    fn test_dot_if_false_never_encodes() {
        let mut b = stream();
        b.dot_if("flapping", false, [f64::NAN.into()])
            .dot_if("history", false, [u64::MAX.into()]);

        assert!(b.error().is_none());
        assert_eq!(b.finish().unwrap().call_names(), Vec::<&str>::new());
    }

    #[test]
    fn test_dot_zero_value_ok_keeps_zero() {
        let mut b = stream();
        b.dot_zero_value_ok("flapping", [0.0.into(), 0.0.into()]);

        let node = b.finish().unwrap();
        let links = node.links();
        assert_eq!(links.len(), 1);
        assert_eq!(
            links[0].call.args,
            vec![
                Literal::Number(NumberLiteral::Float(0.0)),
                Literal::Number(NumberLiteral::Float(0.0)),
            ]
        );
    }

    #[test]
    fn test_first_error_wins() {
        let mut b = stream();
        b.pipe("alert", [])
            .dot("history", [u64::MAX.into()])
            .dot("id", ["kept out".into()])
            .dot_zero_value_ok("flapping", [f64::NAN.into(), 1.0.into()]);

        assert_eq!(b.current().call_names(), ["alert"]);
        assert_eq!(b.error().map(|e| e.property.as_str()), Some("history"));

        let err = b.finish().unwrap_err();
        assert_eq!(err.property, "history");
        assert_eq!(err.source, LiteralError::IntegerOverflow { value: u64::MAX });
    }

    #[test]
    fn test_failed_call_leaves_tip_unchanged() {
        let mut b = stream();
        b.pipe("alert", []).dot("value", [1.0.into(), f64::INFINITY.into()]);

        assert_eq!(b.current().call_names(), ["alert"]);
        assert!(b.finish().is_err());
    }
}
