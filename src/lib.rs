//! .flick Representation Engine
//!
//! Serialization/deserialization for the Flick compiler's analyzed-unit IR
//! into the compact binary `.flick` container format.
//!
//! The format is schema-less and position-dependent: every field is read in
//! exactly the order it was written, with a one-byte discriminant in front of
//! every node. All names, identifiers, and URIs go through a per-file string
//! table and are stored as `u32` indices.
//!
//! # Format Overview
//! - Header: magic `FLCK`, format version, flag word
//! - String table: count-prefixed, length-prefixed UTF-8
//! - Relationship section: optional subsections gated by a 16-bit flag word
//! - Tree section: imports, exports, variables, functions, classes, issues
//! - Optional trailer: SHA-256 over all preceding bytes

pub mod ast;
pub mod codec;
mod api;
mod error;
mod registry;

#[cfg(test)]
mod tests;

pub use api::{decode, decode_file, encode, encode_file, encode_with_options, EncodeOptions};
pub use ast::{
    BinaryOp, CatchClause, ClassDecl, ConstructorCall, ConstructorDecl, ExportDecl, Expr,
    ExprKind, FieldInitializer, FloatBits, FunctionBody, FunctionDecl, ImportDecl,
    InterpolationPart, Issue, Literal, MethodDecl, NamedArg, ParameterDecl, Severity,
    SourceLocation, SourceUnit, Stmt, StmtKind, SwitchCase, TypeNode, UnaryOp, VariableDecl,
};
pub use error::{CodecError, CodecResult};
pub use registry::{
    BuildMethodBinding, BuildOutput, CallGraphEntry, FieldAccessEntry, HierarchyEdge,
    InterfaceImplEntry, LifecycleEntry, LifecycleKind, LifecycleMethod, RelationshipRegistry,
    WidgetStateBinding,
};
