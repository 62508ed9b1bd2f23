//! Type annotations
//!
//! The closed set of type nodes the pipeline attaches to every expression.
//! Adding a variant requires a new format version, not an in-place extension.

use serde::{Deserialize, Serialize};

/// A resolved type annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeNode {
    /// A named (possibly nullable) type: `int`, `Widget?`, `List<int>`
    /// carried as its display name
    Named { name: String, nullable: bool },
    /// The dynamic type
    Dynamic,
    /// The void type
    Void,
    /// The bottom type
    Never,
}

impl TypeNode {
    /// Create a non-nullable named type
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            nullable: false,
        }
    }

    /// Create a nullable named type
    pub fn nullable(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            nullable: true,
        }
    }

    /// Get the discriminant for binary encoding
    pub const fn discriminant(&self) -> u8 {
        match self {
            Self::Named { .. } => 0,
            Self::Dynamic => 1,
            Self::Void => 2,
            Self::Never => 3,
        }
    }

    /// Display name of the type
    pub fn display_name(&self) -> &str {
        match self {
            Self::Named { name, .. } => name,
            Self::Dynamic => "dynamic",
            Self::Void => "void",
            Self::Never => "Never",
        }
    }
}

impl Default for TypeNode {
    fn default() -> Self {
        Self::Dynamic
    }
}
