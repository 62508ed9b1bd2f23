//! String interning table
//!
//! Every name, identifier, URI, and message in the container is stored once
//! here and referenced elsewhere by a dense `u32` index. The table is
//! per-encode-session state, never globally cached; decode reconstructs it as
//! a plain dense array.

use rustc_hash::FxHashMap;

use crate::error::{CodecError, CodecResult};

use super::cursor::{Reader, Writer};
use super::MAX_STRING_COUNT;

/// Append-only interning table built while encoding.
#[derive(Debug, Default)]
pub struct StringTable {
    strings: Vec<String>,
    index: FxHashMap<String, u32>,
}

impl StringTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its dense index. Repeated text returns the
    /// same index for the lifetime of this table.
    pub fn intern(&mut self, s: &str) -> u32 {
        if let Some(&idx) = self.index.get(s) {
            return idx;
        }
        let idx = self.strings.len() as u32;
        self.strings.push(s.to_string());
        self.index.insert(s.to_string(), idx);
        idx
    }

    /// Number of distinct strings interned
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Is the table empty?
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Write the table section: count, then each string in intern order.
    pub fn write(&self, w: &mut Writer) -> CodecResult<()> {
        w.write_u32(self.strings.len() as u32);
        for s in &self.strings {
            w.write_string(s)?;
        }
        Ok(())
    }

    /// Read the table section into a dense array.
    pub fn read(r: &mut Reader<'_>) -> CodecResult<Vec<String>> {
        let count_offset = r.offset();
        let count = r.read_u32()? as usize;
        if count > MAX_STRING_COUNT {
            return Err(CodecError::StringTableTooLarge {
                count,
                max: MAX_STRING_COUNT,
                offset: count_offset,
            });
        }
        let mut strings = Vec::with_capacity(count.min(4096));
        for _ in 0..count {
            strings.push(r.read_string()?);
        }
        Ok(strings)
    }
}
