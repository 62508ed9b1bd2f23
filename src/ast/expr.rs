//! Expression nodes (26 variant kinds)
//!
//! Every expression carries the type the pipeline inferred for it and a
//! source location. Composite variants own their children outright; the
//! tree has no shared ownership and no cycles.

use serde::{Deserialize, Serialize};

use super::decl::ParameterDecl;
use super::literal::Literal;
use super::location::SourceLocation;
use super::operators::{BinaryOp, UnaryOp};
use super::stmt::Stmt;
use super::types::TypeNode;

/// An expression node: kind, inferred result type, and location.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    /// Result type attached by the inference stage
    pub ty: TypeNode,
    pub loc: SourceLocation,
}

impl Expr {
    /// Create an expression with a synthetic location
    pub fn new(kind: ExprKind, ty: TypeNode) -> Self {
        Self {
            kind,
            ty,
            loc: SourceLocation::SYNTHETIC,
        }
    }

    /// Attach a location
    pub fn at(mut self, loc: SourceLocation) -> Self {
        self.loc = loc;
        self
    }
}

/// A named argument in a call or instance creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedArg {
    pub name: String,
    pub value: Expr,
}

/// One segment of an interpolated string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InterpolationPart {
    /// Literal text between interpolations
    Text(String),
    /// An embedded `${...}` expression
    Expr(Expr),
}

/// A function/lambda body: either `=> expr` or a block of statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FunctionBody {
    /// Expression body `=> e`
    Expression(Box<Expr>),
    /// Block body `{ ... }`
    Block(Vec<Stmt>),
}

impl FunctionBody {
    /// Get the discriminant for binary encoding
    pub const fn discriminant(&self) -> u8 {
        match self {
            Self::Expression(_) => 0,
            Self::Block(_) => 1,
        }
    }
}

/// Expression grammar of the source language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Literal value `42`, `"hello"`, `true`, `null`
    Literal(Literal),
    /// Identifier reference `x`
    Identifier(String),
    /// Binary operation `a + b`
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Unary operation `-x`, `!x`, `++x`, `x--`
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        /// Prefix vs postfix, meaningful for `++`/`--`
        prefix: bool,
    },
    /// Assignment `x = e`
    Assignment { target: Box<Expr>, value: Box<Expr> },
    /// Compound assignment `x += e`
    CompoundAssignment {
        op: BinaryOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// Conditional `c ? t : f`
    Conditional {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    /// Index access `a[i]`
    Index { target: Box<Expr>, index: Box<Expr> },
    /// Property access `obj.field` / null-aware `obj?.field`
    PropertyAccess {
        target: Box<Expr>,
        name: String,
        null_aware: bool,
    },
    /// Method call `obj.m(a, b: c)`; no target for implicit-this calls
    MethodCall {
        target: Option<Box<Expr>>,
        name: String,
        args: Vec<Expr>,
        named_args: Vec<NamedArg>,
    },
    /// Free-function call `f(a, b: c)`
    FunctionCall {
        name: String,
        args: Vec<Expr>,
        named_args: Vec<NamedArg>,
    },
    /// Instance creation `Text('hi')`, `const EdgeInsets.all(8)`
    InstanceCreation {
        ty: TypeNode,
        /// Named constructor, e.g. `all` in `EdgeInsets.all`
        constructor: Option<String>,
        is_const: bool,
        args: Vec<Expr>,
        named_args: Vec<NamedArg>,
    },
    /// Cascade `target..a()..b()`
    Cascade {
        target: Box<Expr>,
        sections: Vec<Expr>,
    },
    /// Type cast `e as T`
    Cast { operand: Box<Expr>, ty: TypeNode },
    /// Type check `e is T` / `e is! T`
    TypeCheck {
        operand: Box<Expr>,
        ty: TypeNode,
        negated: bool,
    },
    /// Await `await e`
    Await(Box<Expr>),
    /// Throw `throw e`
    Throw(Box<Expr>),
    /// Null coalescing `a ?? b`
    NullCoalesce { left: Box<Expr>, right: Box<Expr> },
    /// Lambda `(x) => e`, `(x) { ... }`
    Lambda {
        params: Vec<ParameterDecl>,
        body: FunctionBody,
    },
    /// String interpolation `"count: $n"`
    StringInterpolation(Vec<InterpolationPart>),
    /// `this`
    This,
    /// `super`
    Super,
    /// Parenthesized `(e)`
    Parenthesized(Box<Expr>),
    /// List literal `[a, b]`
    ListLiteral { is_const: bool, elements: Vec<Expr> },
    /// Map literal `{k: v}`
    MapLiteral {
        is_const: bool,
        entries: Vec<(Expr, Expr)>,
    },
    /// Set literal `{a, b}`
    SetLiteral { is_const: bool, elements: Vec<Expr> },
}

impl ExprKind {
    /// Get the discriminant for binary encoding
    pub const fn discriminant(&self) -> u8 {
        match self {
            Self::Literal(_) => 0,
            Self::Identifier(_) => 1,
            Self::Binary { .. } => 2,
            Self::Unary { .. } => 3,
            Self::Assignment { .. } => 4,
            Self::CompoundAssignment { .. } => 5,
            Self::Conditional { .. } => 6,
            Self::Index { .. } => 7,
            Self::PropertyAccess { .. } => 8,
            Self::MethodCall { .. } => 9,
            Self::FunctionCall { .. } => 10,
            Self::InstanceCreation { .. } => 11,
            Self::Cascade { .. } => 12,
            Self::Cast { .. } => 13,
            Self::TypeCheck { .. } => 14,
            Self::Await(_) => 15,
            Self::Throw(_) => 16,
            Self::NullCoalesce { .. } => 17,
            Self::Lambda { .. } => 18,
            Self::StringInterpolation(_) => 19,
            Self::This => 20,
            Self::Super => 21,
            Self::Parenthesized(_) => 22,
            Self::ListLiteral { .. } => 23,
            Self::MapLiteral { .. } => 24,
            Self::SetLiteral { .. } => 25,
        }
    }

    /// Is this a leaf expression (no sub-expressions)?
    pub const fn is_leaf(&self) -> bool {
        matches!(
            self,
            Self::Literal(_) | Self::Identifier(_) | Self::This | Self::Super
        )
    }
}

impl Default for ExprKind {
    fn default() -> Self {
        Self::Literal(Literal::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_classification() {
        assert!(ExprKind::This.is_leaf());
        assert!(ExprKind::Identifier("x".into()).is_leaf());
        assert!(!ExprKind::Await(Box::new(Expr::default())).is_leaf());
    }

    #[test]
    fn test_discriminants_dense() {
        // First and last tags of the closed set
        assert_eq!(ExprKind::Literal(Literal::Null).discriminant(), 0);
        assert_eq!(
            ExprKind::SetLiteral {
                is_const: false,
                elements: Vec::new()
            }
            .discriminant(),
            25
        );
    }
}
