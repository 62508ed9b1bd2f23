//! Declaration nodes
//!
//! Imports, exports, variables/fields, parameters, functions, methods,
//! constructors, and classes as the semantic pipeline emits them.

use serde::{Deserialize, Serialize};

use super::expr::{Expr, FunctionBody, NamedArg};
use super::location::SourceLocation;
use super::types::TypeNode;

/// An import directive `import 'uri' deferred as p show a hide b;`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImportDecl {
    pub uri: String,
    pub prefix: Option<String>,
    pub deferred: bool,
    pub show: Vec<String>,
    pub hide: Vec<String>,
    pub loc: SourceLocation,
}

/// An export directive `export 'uri' show a hide b;`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExportDecl {
    pub uri: String,
    pub show: Vec<String>,
    pub hide: Vec<String>,
    pub loc: SourceLocation,
}

/// A variable declaration; also used for class fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VariableDecl {
    pub name: String,
    pub ty: TypeNode,
    pub is_final: bool,
    pub is_const: bool,
    pub is_static: bool,
    pub is_late: bool,
    pub is_private: bool,
    pub initializer: Option<Expr>,
    pub loc: SourceLocation,
}

impl VariableDecl {
    /// Create a plain (non-final, no initializer) variable
    pub fn new(name: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            name: name.into(),
            ty,
            ..Self::default()
        }
    }
}

/// A function/method/constructor parameter.
///
/// `is_field_init` marks initializing formals (`this.x`); their type is the
/// resolved field type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    pub ty: TypeNode,
    pub is_required: bool,
    /// Named parameter; positional when false
    pub is_named: bool,
    /// Initializing formal `this.x`
    pub is_field_init: bool,
    pub default_value: Option<Expr>,
    pub loc: SourceLocation,
}

impl ParameterDecl {
    /// Create a required positional parameter
    pub fn positional(name: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            name: name.into(),
            ty,
            is_required: true,
            ..Self::default()
        }
    }
}

/// A top-level or nested function declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: TypeNode,
    pub is_async: bool,
    pub params: Vec<ParameterDecl>,
    /// None for external/abstract signatures
    pub body: Option<FunctionBody>,
    pub loc: SourceLocation,
}

/// A method declaration inside a class.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub return_type: TypeNode,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_getter: bool,
    pub is_setter: bool,
    pub is_async: bool,
    pub params: Vec<ParameterDecl>,
    /// None for abstract methods
    pub body: Option<FunctionBody>,
    pub loc: SourceLocation,
}

/// A `: field = value` entry in a constructor initializer list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInitializer {
    pub field: String,
    pub value: Expr,
}

/// A `super(...)` or `this(...)` call in a constructor's initializer list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstructorCall {
    /// Named target, e.g. `fromJson` in `super.fromJson(...)`
    pub name: Option<String>,
    pub args: Vec<Expr>,
    pub named_args: Vec<NamedArg>,
}

/// A constructor declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstructorDecl {
    /// Named constructor; None for the unnamed constructor
    pub name: Option<String>,
    pub is_const: bool,
    pub is_factory: bool,
    pub params: Vec<ParameterDecl>,
    pub field_initializers: Vec<FieldInitializer>,
    pub super_call: Option<ConstructorCall>,
    pub redirect_call: Option<ConstructorCall>,
    pub body: Option<FunctionBody>,
    pub loc: SourceLocation,
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub is_abstract: bool,
    pub is_final: bool,
    pub superclass: Option<TypeNode>,
    pub interfaces: Vec<TypeNode>,
    pub mixins: Vec<TypeNode>,
    pub fields: Vec<VariableDecl>,
    pub constructors: Vec<ConstructorDecl>,
    pub methods: Vec<MethodDecl>,
    pub loc: SourceLocation,
}

impl ClassDecl {
    /// Create an empty concrete class
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Find a method by name
    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.name == name)
    }
}
