//! Error types for literal encoding and chain building.
//!
//! Only one thing can go wrong while generating a TICKscript tree: an
//! argument value that has no literal form. [`LiteralError`] describes why a
//! single value was rejected, and [`BuildError`] ties it to the property call
//! that carried it.

use crate::ast::IntBase;
use thiserror::Error;

/// A runtime argument value that cannot be encoded as a TICKscript literal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LiteralError {
    /// Unsigned value larger than the signed 64-bit integer literal range.
    #[error("integer {value} overflows a 64-bit integer literal")]
    IntegerOverflow { value: u64 },

    /// NaN and infinities have no float literal.
    #[error("float {value} has no literal form")]
    NonFiniteFloat { value: f64 },

    /// Duration longer than the nanosecond range of a duration literal.
    #[error("duration of {secs}s overflows a duration literal")]
    DurationOverflow { secs: u64 },

    /// Octal and hex literals are written without a sign.
    #[error("negative value {value} cannot be written in base {base}")]
    NegativeBasedInteger { value: i64, base: IntBase },

    /// An unset optional value was forced into a call.
    #[error("absent value has no literal form")]
    Absent,
}

/// The first literal failure recorded while building a chain.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot encode argument of .{property}(): {source}")]
pub struct BuildError {
    /// Name of the property or chaining method whose argument failed.
    pub property: String,
    #[source]
    pub source: LiteralError,
}

/// Result type for chain building.
pub type Result<T> = std::result::Result<T, BuildError>;
