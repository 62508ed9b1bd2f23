//! Operator types

use serde::{Deserialize, Serialize};

/// Binary operators, including the integer-division and unsigned-shift
/// operators of the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BinaryOp {
    // Arithmetic
    /// Addition `+`
    Add = 0,
    /// Subtraction `-`
    Sub = 1,
    /// Multiplication `*`
    Mul = 2,
    /// Division `/`
    Div = 3,
    /// Integer division `~/`
    IntDiv = 4,
    /// Modulo `%`
    Mod = 5,

    // Comparison
    /// Equality `==`
    Eq = 6,
    /// Not equal `!=`
    Ne = 7,
    /// Less than `<`
    Lt = 8,
    /// Less or equal `<=`
    Le = 9,
    /// Greater than `>`
    Gt = 10,
    /// Greater or equal `>=`
    Ge = 11,

    // Logical
    /// Logical and `&&`
    And = 12,
    /// Logical or `||`
    Or = 13,

    // Bitwise
    /// Bitwise and `&`
    BitAnd = 14,
    /// Bitwise or `|`
    BitOr = 15,
    /// Bitwise xor `^`
    BitXor = 16,
    /// Shift left `<<`
    Shl = 17,
    /// Shift right `>>`
    Shr = 18,
    /// Unsigned shift right `>>>`
    UShr = 19,
}

impl BinaryOp {
    /// Parse from the operator's source symbol
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            "~/" => Some(Self::IntDiv),
            "%" => Some(Self::Mod),
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "&&" => Some(Self::And),
            "||" => Some(Self::Or),
            "&" => Some(Self::BitAnd),
            "|" => Some(Self::BitOr),
            "^" => Some(Self::BitXor),
            "<<" => Some(Self::Shl),
            ">>" => Some(Self::Shr),
            ">>>" => Some(Self::UShr),
            _ => None,
        }
    }

    /// Format as the source symbol
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::IntDiv => "~/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UShr => ">>>",
        }
    }

    /// Is this a comparison operator?
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge
        )
    }
}

/// Unary operators. `Inc`/`Dec` pair with the prefix flag on the
/// expression node to distinguish `++x` from `x++`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum UnaryOp {
    /// Arithmetic negation `-x`
    Neg = 0,
    /// Logical not `!x`
    Not = 1,
    /// Bitwise not `~x`
    BitNot = 2,
    /// Increment `++`
    Inc = 3,
    /// Decrement `--`
    Dec = 4,
}

impl UnaryOp {
    /// Format as the source symbol
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
            Self::BitNot => "~",
            Self::Inc => "++",
            Self::Dec => "--",
        }
    }
}
