//! The analyzed unit: root of the tree section

use serde::{Deserialize, Serialize};

use super::decl::{ClassDecl, ExportDecl, FunctionDecl, ImportDecl, VariableDecl};
use super::location::SourceLocation;

/// Severity of a diagnostic issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Severity {
    Info = 0,
    Warning = 1,
    Error = 2,
}

impl Severity {
    /// Decode from the wire byte
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Info),
            1 => Some(Self::Warning),
            2 => Some(Self::Error),
            _ => None,
        }
    }
}

/// A diagnostic issue the pipeline attached to the unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    /// Stable diagnostic code, e.g. `unused_field`
    pub code: String,
    pub message: String,
    pub loc: SourceLocation,
}

/// One fully analyzed source file: the root the container serializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceUnit {
    /// Path of the source file this unit was analyzed from
    pub file_path: String,
    /// Hash of the source text at analysis time (hex), used by the
    /// incremental layer to detect staleness
    pub content_hash: String,
    /// Declared library name ("" when undeclared)
    pub library_name: String,
    /// Unix timestamp (seconds) of the analysis run
    pub analyzed_at: u64,
    pub imports: Vec<ImportDecl>,
    pub exports: Vec<ExportDecl>,
    /// Top-level variables
    pub variables: Vec<VariableDecl>,
    /// Top-level functions
    pub functions: Vec<FunctionDecl>,
    pub classes: Vec<ClassDecl>,
    pub issues: Vec<Issue>,
}

impl SourceUnit {
    /// Create an empty unit for a file
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            content_hash: String::new(),
            library_name: String::new(),
            analyzed_at: 0,
            imports: Vec::new(),
            exports: Vec::new(),
            variables: Vec::new(),
            functions: Vec::new(),
            classes: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Find a class by name
    pub fn class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Does the unit carry any error-severity issue?
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }
}

impl Default for SourceUnit {
    fn default() -> Self {
        Self::new("")
    }
}
