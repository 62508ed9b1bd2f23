//! Public entry points
//!
//! Thin wrappers over [`crate::codec`]: byte-level encode/decode plus the
//! file convenience pair. Everything else in the crate is reachable from
//! here.

use std::fs;
use std::path::Path;

use crate::ast::SourceUnit;
use crate::codec::{decode_container, encode_container};
use crate::error::CodecResult;
use crate::registry::RelationshipRegistry;

/// Knobs for [`encode_with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Append a SHA-256 trailer and set the header flag
    pub checksum: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self { checksum: true }
    }
}

/// Encode a unit and registry with the default options (checksum on).
pub fn encode(unit: &SourceUnit, registry: &RelationshipRegistry) -> CodecResult<Vec<u8>> {
    encode_container(unit, registry, &EncodeOptions::default())
}

/// Encode with explicit options.
pub fn encode_with_options(
    unit: &SourceUnit,
    registry: &RelationshipRegistry,
    options: &EncodeOptions,
) -> CodecResult<Vec<u8>> {
    encode_container(unit, registry, options)
}

/// Decode a container from bytes.
pub fn decode(bytes: &[u8]) -> CodecResult<(SourceUnit, RelationshipRegistry)> {
    decode_container(bytes)
}

/// Encode and write to a file.
pub fn encode_file(
    path: impl AsRef<Path>,
    unit: &SourceUnit,
    registry: &RelationshipRegistry,
) -> CodecResult<()> {
    let bytes = encode(unit, registry)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Read a file and decode it.
pub fn decode_file(path: impl AsRef<Path>) -> CodecResult<(SourceUnit, RelationshipRegistry)> {
    let bytes = fs::read(path)?;
    decode(&bytes)
}
