//! # tickgen
//!
//! Generate TICKscript ASTs from pipeline node configuration.
//!
//! A converter walks a typed node configuration and drives a
//! [`ChainBuilder`], which emits one call per populated property in a fixed
//! order. The resulting [`Node`] renders back to TICKscript with
//! [`serialize`].
//!
//! ## Quick Start
//!
//! ```rust
//! use tickgen::{convert_alert, serialize, AlertNode, Lambda, Node};
//! use tickgen::pipeline::SlackHandler;
//!
//! let alert = AlertNode {
//!     id: "cpu:{{ .Group }}".into(),
//!     crit: Some(Lambda::new("\"usage_idle\" < 10")),
//!     slack_handlers: vec![SlackHandler {
//!         channel: "#alerts".into(),
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//!
//! let node = convert_alert(Node::identifier("stream"), &alert).unwrap();
//! assert_eq!(
//!     serialize(&node),
//!     "stream\n    |alert()\n        .id('cpu:{{ .Group }}')\n        \
//!      .crit(lambda: \"usage_idle\" < 10)\n        .slack()\n        .channel('#alerts')\n"
//! );
//! ```
//!
//! ## Module Overview
//!
//! - [`ast`] - Chain nodes, literals, and argument encoding
//! - [`builder`] - Fluent chain builder with first-error-wins accumulation
//! - [`pipeline`] - Alert node configuration and handler types
//! - [`alert`] - Alert node to TICKscript conversion
//! - [`serializer`] - TICKscript rendering
//! - [`error`] - Error types

pub mod alert;
pub mod ast;
pub mod builder;
pub mod error;
pub mod pipeline;
pub mod serializer;

// Re-export commonly used types
pub use alert::{convert_alert, AlertConverter};
pub use ast::{Arg, Lambda, Literal, Node};
pub use builder::ChainBuilder;
pub use error::{BuildError, LiteralError};
pub use pipeline::{AlertNode, Handler};
pub use serializer::serialize;
