//! Source location tracking
//!
//! Every tree node carries a location. Locations are diagnostic-only and
//! never participate in node identity.

use serde::{Deserialize, Serialize};

/// Source location: file, line/column, and byte extent.
///
/// The file is stored as its path; on the wire it becomes a string-table
/// reference like every other string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Source file path ("" for synthetic nodes)
    pub file: String,
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed)
    pub column: u32,
    /// Byte offset of the node start
    pub offset: u32,
    /// Byte length of the node
    pub length: u32,
}

impl SourceLocation {
    /// Synthetic/unknown location
    pub const SYNTHETIC: Self = Self {
        file: String::new(),
        line: 0,
        column: 0,
        offset: 0,
        length: 0,
    };

    /// Create a new location
    pub fn new(file: impl Into<String>, line: u32, column: u32, offset: u32, length: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            offset,
            length,
        }
    }

    /// Is this a synthetic (unknown) location?
    pub fn is_synthetic(&self) -> bool {
        self.file.is_empty()
    }

    /// Format as `file:line:col`
    pub fn format(&self) -> String {
        if self.is_synthetic() {
            "<synthetic>".to_string()
        } else {
            format!("{}:{}:{}", self.file, self.line, self.column)
        }
    }
}
