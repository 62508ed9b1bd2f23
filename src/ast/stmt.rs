//! Statement nodes (19 variant kinds)
//!
//! Blocks and loop bodies own their statement sequences; together with
//! expressions this forms a strict tree.

use serde::{Deserialize, Serialize};

use super::decl::{FunctionDecl, VariableDecl};
use super::expr::Expr;
use super::location::SourceLocation;
use super::types::TypeNode;

/// A statement node with its location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub loc: SourceLocation,
}

impl Stmt {
    /// Create a statement with a synthetic location
    pub fn new(kind: StmtKind) -> Self {
        Self {
            kind,
            loc: SourceLocation::SYNTHETIC,
        }
    }

    /// Attach a location
    pub fn at(mut self, loc: SourceLocation) -> Self {
        self.loc = loc;
        self
    }
}

/// One `case` group of a switch statement. An empty `matches` list never
/// occurs; the default group is carried separately on the switch itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    /// The expressions after `case` (sharing one body)
    pub matches: Vec<Expr>,
    pub body: Vec<Stmt>,
}

/// One `catch` / `on T catch` clause of a try statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    /// The `on T` type filter, if any
    pub exception_type: Option<TypeNode>,
    /// The bound exception variable, if any
    pub exception_var: Option<String>,
    /// The bound stack-trace variable, if any
    pub stack_var: Option<String>,
    pub body: Vec<Stmt>,
}

/// Statement grammar of the source language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    /// Expression statement `e;`
    Expression(Expr),
    /// Local variable declaration `final x = e;`
    VariableDecl(VariableDecl),
    /// Return `return;` / `return e;`
    Return(Option<Expr>),
    /// Break `break;` / `break label;`
    Break(Option<String>),
    /// Continue `continue;` / `continue label;`
    Continue(Option<String>),
    /// Throw statement `throw e;`
    Throw(Expr),
    /// Assert `assert(c)` / `assert(c, msg)`
    Assert {
        condition: Expr,
        message: Option<Expr>,
    },
    /// Empty statement `;`
    Empty,
    /// Block `{ ... }`
    Block(Vec<Stmt>),
    /// If `if (c) s` / `if (c) s else s`
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    /// C-style for `for (init; cond; updates) body`
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        updates: Vec<Expr>,
        body: Box<Stmt>,
    },
    /// For-each `for (final x in e) body` / `await for`
    ForEach {
        variable: String,
        variable_type: Option<TypeNode>,
        is_await: bool,
        iterable: Expr,
        body: Box<Stmt>,
    },
    /// While `while (c) body`
    While { condition: Expr, body: Box<Stmt> },
    /// Do-while `do body while (c);`
    DoWhile { body: Box<Stmt>, condition: Expr },
    /// Switch with case groups and an optional default group
    Switch {
        subject: Expr,
        cases: Vec<SwitchCase>,
        default: Option<Vec<Stmt>>,
    },
    /// Try / catch / finally
    Try {
        body: Vec<Stmt>,
        catches: Vec<CatchClause>,
        finally: Option<Vec<Stmt>>,
    },
    /// Labeled statement `label: s`
    Labeled { label: String, body: Box<Stmt> },
    /// Yield `yield e;` / `yield* e;`
    Yield { expr: Expr, each: bool },
    /// Nested function declaration
    FunctionDecl(FunctionDecl),
}

impl StmtKind {
    /// Get the discriminant for binary encoding
    pub const fn discriminant(&self) -> u8 {
        match self {
            Self::Expression(_) => 0,
            Self::VariableDecl(_) => 1,
            Self::Return(_) => 2,
            Self::Break(_) => 3,
            Self::Continue(_) => 4,
            Self::Throw(_) => 5,
            Self::Assert { .. } => 6,
            Self::Empty => 7,
            Self::Block(_) => 8,
            Self::If { .. } => 9,
            Self::For { .. } => 10,
            Self::ForEach { .. } => 11,
            Self::While { .. } => 12,
            Self::DoWhile { .. } => 13,
            Self::Switch { .. } => 14,
            Self::Try { .. } => 15,
            Self::Labeled { .. } => 16,
            Self::Yield { .. } => 17,
            Self::FunctionDecl(_) => 18,
        }
    }

    /// Is this a loop statement?
    pub const fn is_loop(&self) -> bool {
        matches!(
            self,
            Self::For { .. } | Self::ForEach { .. } | Self::While { .. } | Self::DoWhile { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_classification() {
        let body = Box::new(Stmt::new(StmtKind::Empty));
        let w = StmtKind::While {
            condition: Expr::default(),
            body,
        };
        assert!(w.is_loop());
        assert!(!StmtKind::Empty.is_loop());
    }

    #[test]
    fn test_discriminants_dense() {
        assert_eq!(StmtKind::Expression(Expr::default()).discriminant(), 0);
        assert_eq!(
            StmtKind::FunctionDecl(FunctionDecl::default()).discriminant(),
            18
        );
    }
}
