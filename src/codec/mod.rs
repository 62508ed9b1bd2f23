//! Binary container codec (.flick)
//!
//! Schema-less positional encoding: a one-byte discriminant in front of every
//! node, fields in a fixed order, no names or lengths to allow skipping. The
//! write and read path for each node kind live side by side in the same file
//! so field-order drift is visible in review and caught by the round-trip
//! tests.
//!
//! Layering, leaves first: [`cursor`] (primitives and the only bounds
//! checks), [`strings`] (interning table), then the type / expression /
//! statement / declaration / registry codecs, and [`container`] on top.

pub mod cursor;
pub mod strings;

mod container;
mod decl;
mod expr;
mod registry;
mod stmt;
mod ty;

pub use container::{decode_container, encode_container};

use crate::ast::SourceLocation;
use crate::error::{CodecError, CodecResult};

use cursor::{Reader, Writer};
use strings::StringTable;

/// Magic number, "FLCK" read as a little-endian u32
pub const MAGIC: u32 = u32::from_le_bytes(*b"FLCK");

/// Current (and only supported) format version
pub const VERSION: u16 = 1;

/// Header flag: SHA-256 trailer present
pub const FLAG_CHECKSUM: u16 = 1 << 0;

/// Header flag: payload compressed (reserved, decoding fails when set)
pub const FLAG_COMPRESSED: u16 = 1 << 1;

/// Fixed header size: magic + version + flags
pub const HEADER_LEN: usize = 8;

/// SHA-256 digest size
pub const CHECKSUM_LEN: usize = 32;

/// Maximum byte length of a single string (u16 length prefix)
pub const MAX_STRING_LEN: usize = u16::MAX as usize;

/// Defensive cap on the declared string-table count
pub const MAX_STRING_COUNT: usize = 1 << 20;

/// Defensive cap on any count-prefixed sequence
pub const MAX_SEQ_LEN: usize = 1_000_000;

/// Defensive cap on top-level declaration counts
pub const MAX_CLASS_COUNT: usize = 16_384;

/// Maximum node nesting the decoder will follow. Sized so the worst-case
/// decode frames at the cap fit a default 2 MiB thread stack even in
/// unoptimized builds; the counter must trip before the stack does.
pub const MAX_DEPTH: usize = 64;

/// Mutable state threaded through every encode function: the section buffer
/// being written and the interning table it populates.
pub(crate) struct EncodeContext {
    pub w: Writer,
    pub strings: StringTable,
}

impl EncodeContext {
    pub fn new() -> Self {
        Self {
            w: Writer::new(),
            strings: StringTable::new(),
        }
    }

    /// Intern a string and write its table index
    pub fn write_str_ref(&mut self, s: &str) {
        let idx = self.strings.intern(s);
        self.w.write_u32(idx);
    }

    /// Presence byte followed by a string ref
    pub fn write_opt_str_ref(&mut self, s: Option<&str>) {
        match s {
            Some(s) => {
                self.w.write_u8(1);
                self.write_str_ref(s);
            }
            None => self.w.write_u8(0),
        }
    }

    /// Write a sequence length as u32, enforcing a ceiling
    pub fn write_seq_len(&mut self, what: &'static str, len: usize, max: usize) -> CodecResult<()> {
        if len > max {
            return Err(CodecError::CountTooLarge {
                what,
                count: len,
                max,
                offset: self.w.len(),
            });
        }
        self.w.write_u32(len as u32);
        Ok(())
    }

    /// Location: file ref then four fixed-width fields
    pub fn write_location(&mut self, loc: &SourceLocation) {
        self.write_str_ref(&loc.file);
        self.w.write_u32(loc.line);
        self.w.write_u32(loc.column);
        self.w.write_u32(loc.offset);
        self.w.write_u32(loc.length);
    }
}

/// Mutable state threaded through every decode function: the cursor, the
/// decoded string table, and the recursion depth counter. One instance per
/// decode call; nothing here is shared or process-wide.
pub(crate) struct DecodeContext<'a> {
    pub r: Reader<'a>,
    strings: Vec<String>,
    depth: usize,
}

impl<'a> DecodeContext<'a> {
    pub fn new(r: Reader<'a>, strings: Vec<String>) -> Self {
        Self {
            r,
            strings,
            depth: 0,
        }
    }

    /// Read a u32 table index and resolve it
    pub fn read_str_ref(&mut self) -> CodecResult<String> {
        let offset = self.r.offset();
        let index = self.r.read_u32()?;
        self.strings
            .get(index as usize)
            .cloned()
            .ok_or(CodecError::InvalidStringRef {
                index,
                table_size: self.strings.len(),
                offset,
            })
    }

    /// Presence byte followed by a string ref
    pub fn read_opt_str_ref(&mut self) -> CodecResult<Option<String>> {
        if self.r.read_bool()? {
            Ok(Some(self.read_str_ref()?))
        } else {
            Ok(None)
        }
    }

    /// Read a u32 sequence length, rejecting implausible counts before any
    /// allocation happens downstream
    pub fn read_seq_len(&mut self, what: &'static str, max: usize) -> CodecResult<usize> {
        let offset = self.r.offset();
        let count = self.r.read_u32()? as usize;
        if count > max {
            return Err(CodecError::CountTooLarge {
                what,
                count,
                max,
                offset,
            });
        }
        Ok(count)
    }

    /// Run a nested decode one level deeper, enforcing the depth ceiling.
    pub fn descend<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> CodecResult<T>,
    ) -> CodecResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(CodecError::DepthExceeded {
                max: MAX_DEPTH,
                offset: self.r.offset(),
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    pub fn read_location(&mut self) -> CodecResult<SourceLocation> {
        let file = self.read_str_ref()?;
        let line = self.r.read_u32()?;
        let column = self.r.read_u32()?;
        let offset = self.r.read_u32()?;
        let length = self.r.read_u32()?;
        Ok(SourceLocation {
            file,
            line,
            column,
            offset,
            length,
        })
    }
}
