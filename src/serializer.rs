//! AST Serializer - Convert a TICKscript chain back to source text.
//!
//! # Example
//!
//! ```rust
//! use tickgen::alert::convert_alert;
//! use tickgen::ast::Node;
//! use tickgen::pipeline::AlertNode;
//! use tickgen::serialize;
//!
//! let alert = AlertNode { topic: "cpu".into(), ..Default::default() };
//! let node = convert_alert(Node::identifier("stream"), &alert).unwrap();
//!
//! assert_eq!(serialize(&node), "stream\n    |alert()\n        .topic('cpu')\n");
//! ```
//!
//! # Formatting
//!
//! The serializer produces idiomatic TICKscript with:
//! - 4-space indentation for chaining methods, 8 for property methods
//! - Single-quoted strings
//! - Durations in the largest exact unit (`90s`, `5m`, `1w`)
//! - Octal integers with a leading `0` and hex integers with `0x`

use crate::ast::*;

/// Serialize a chain to TICKscript source code, one call per line.
pub fn serialize(node: &Node) -> String {
    let mut w = Writer::new();
    w.write_chain(node);
    w.finish()
}

/// Internal writer for building output.
struct Writer {
    output: String,
}

impl Writer {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn finish(self) -> String {
        self.output
    }

    /// Write a line indented by `level` steps of 4 spaces.
    fn writeln(&mut self, level: usize, text: &str) {
        for _ in 0..level {
            self.output.push_str("    ");
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn write_chain(&mut self, node: &Node) {
        self.writeln(0, node.root());

        // Property methods sit one level below the chaining method they configure.
        let mut in_pipe = false;
        for link in node.links() {
            let level = match link.operator {
                ChainOperator::Pipe => {
                    in_pipe = true;
                    1
                }
                ChainOperator::Dot if in_pipe => 2,
                ChainOperator::Dot => 1,
            };
            let call = format!("{}{}", link.operator.token(), call_to_string(&link.call));
            self.writeln(level, &call);
        }
    }
}

/// Render `name(arg, ...)`, spreading list arguments.
pub fn call_to_string(call: &FunctionNode) -> String {
    let args: Vec<String> = call.args.iter().map(literal_to_string).collect();
    format!("{}({})", call.name, args.join(", "))
}

/// Render a single literal.
pub fn literal_to_string(literal: &Literal) -> String {
    match literal {
        Literal::String(s) => format!("'{}'", escape_string(s)),
        Literal::Number(n) => number_to_string(n),
        Literal::Bool(true) => "TRUE".to_string(),
        Literal::Bool(false) => "FALSE".to_string(),
        Literal::Duration(nanos) => format_duration(*nanos),
        Literal::Lambda(expr) => format!("lambda: {}", expr),
        Literal::List(items) => items
            .iter()
            .map(literal_to_string)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn number_to_string(n: &NumberLiteral) -> String {
    match *n {
        NumberLiteral::Int {
            value,
            base: IntBase::Decimal,
        } => value.to_string(),
        NumberLiteral::Int {
            value,
            base: IntBase::Octal,
        } => format!("{}0{:o}", sign(value), value.unsigned_abs()),
        NumberLiteral::Int {
            value,
            base: IntBase::Hex,
        } => format!("{}0x{:x}", sign(value), value.unsigned_abs()),
        NumberLiteral::Float(f) => {
            let s = f.to_string();
            if s.contains('.') {
                s
            } else {
                format!("{}.0", s)
            }
        }
    }
}

fn sign(value: i64) -> &'static str {
    if value < 0 {
        "-"
    } else {
        ""
    }
}

const DURATION_UNITS: [(&str, i64); 7] = [
    ("w", 7 * 24 * 60 * 60 * 1_000_000_000),
    ("d", 24 * 60 * 60 * 1_000_000_000),
    ("h", 60 * 60 * 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("s", 1_000_000_000),
    ("ms", 1_000_000),
    ("u", 1_000),
];

/// Render a nanosecond count in the largest unit that divides it exactly.
///
/// ```rust
/// use tickgen::serializer::format_duration;
///
/// assert_eq!(format_duration(0), "0s");
/// assert_eq!(format_duration(90_000_000_000), "90s");
/// assert_eq!(format_duration(300_000_000_000), "5m");
/// ```
pub fn format_duration(nanos: i64) -> String {
    if nanos == 0 {
        return "0s".to_string();
    }
    for (unit, size) in DURATION_UNITS {
        if nanos % size == 0 {
            return format!("{}{}", nanos / size, unit);
        }
    }
    format!("{}ns", nanos)
}

/// Escape a string for use in a single-quoted literal.
fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}
