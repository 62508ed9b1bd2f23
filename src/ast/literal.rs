//! Literal value types

use serde::{Deserialize, Serialize};

/// Literal values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// The null literal
    Null,
    /// Boolean literal `true` or `false`
    Bool(bool),
    /// Integer literal `42`
    Int(i64),
    /// Double literal `3.14`, stored as raw bits for exact equality
    Double(FloatBits),
    /// String literal without interpolation `"hello"`
    Str(String),
}

/// Double represented as bits so literal equality (and re-encoding) is exact
/// even for NaN payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FloatBits(pub u64);

impl FloatBits {
    /// Create from f64
    pub fn from_f64(v: f64) -> Self {
        Self(v.to_bits())
    }

    /// Convert to f64
    pub fn to_f64(self) -> f64 {
        f64::from_bits(self.0)
    }
}

impl Literal {
    /// Create an integer literal
    pub const fn int(v: i64) -> Self {
        Self::Int(v)
    }

    /// Create a double literal
    pub fn double(v: f64) -> Self {
        Self::Double(FloatBits::from_f64(v))
    }

    /// Create a string literal
    pub fn string(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// Get the discriminant for binary encoding
    pub const fn discriminant(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::Double(_) => 3,
            Self::Str(_) => 4,
        }
    }

    /// Is this a numeric literal?
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Double(_))
    }
}

impl Default for Literal {
    fn default() -> Self {
        Self::Null
    }
}
