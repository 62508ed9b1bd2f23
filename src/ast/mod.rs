//! Data model for the analyzed-unit IR
//!
//! Types, expressions, statements, and declarations as produced by the
//! semantic pipeline. The codec in [`crate::codec`] serializes exactly this
//! shape; it performs no semantic validation of it.

mod decl;
mod expr;
mod literal;
mod location;
mod operators;
mod stmt;
mod types;
mod unit;

pub use decl::{
    ClassDecl, ConstructorCall, ConstructorDecl, ExportDecl, FieldInitializer, FunctionDecl,
    ImportDecl, MethodDecl, ParameterDecl, VariableDecl,
};
pub use expr::{Expr, ExprKind, FunctionBody, InterpolationPart, NamedArg};
pub use literal::{FloatBits, Literal};
pub use location::SourceLocation;
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{CatchClause, Stmt, StmtKind, SwitchCase};
pub use types::TypeNode;
pub use unit::{Issue, Severity, SourceUnit};
