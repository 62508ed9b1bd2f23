//! Primitive byte-level codec
//!
//! All integers are little-endian and fixed-width. [`Reader`] owns the cursor
//! and every bounds check; no other component touches the raw buffer. A
//! failed read reports the offset and the bytes remaining, never reads past
//! the end, and leaves the cursor where the failure was detected.

use crate::error::{CodecError, CodecResult};

use super::MAX_STRING_LEN;

/// Append-only byte sink for encoding.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Has anything been written?
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Take the finished buffer
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Borrow the bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(v as u8);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_bits().to_le_bytes());
    }

    /// Append raw bytes (section assembly and checksum trailer only)
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write a u16-length-prefixed UTF-8 string
    pub fn write_string(&mut self, s: &str) -> CodecResult<()> {
        let bytes = s.as_bytes();
        if bytes.len() > MAX_STRING_LEN {
            return Err(CodecError::StringTooLong {
                len: bytes.len(),
                max: MAX_STRING_LEN,
                offset: self.buf.len(),
            });
        }
        self.write_u16(bytes.len() as u16);
        self.buf.extend_from_slice(bytes);
        Ok(())
    }
}

/// Cursor over an immutable buffer for decoding.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader at the start of the buffer
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current byte offset
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Bytes left before the end of the buffer
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Has the cursor reached the end?
    pub fn is_at_end(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// The single choke point: fail unless `n` more bytes are available.
    fn bounds_check(&self, n: usize) -> CodecResult<()> {
        if self.remaining() < n {
            return Err(CodecError::UnexpectedEof {
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    fn take(&mut self, n: usize) -> CodecResult<&'a [u8]> {
        self.bounds_check(n)?;
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> CodecResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> CodecResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> CodecResult<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> CodecResult<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u64(&mut self) -> CodecResult<u64> {
        let bytes = self.take(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(arr))
    }

    pub fn read_i64(&mut self) -> CodecResult<i64> {
        let bytes = self.take(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok(i64::from_le_bytes(arr))
    }

    pub fn read_f64(&mut self) -> CodecResult<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Read a u16-length-prefixed UTF-8 string
    pub fn read_string(&mut self) -> CodecResult<String> {
        let len_offset = self.pos;
        let len = self.read_u16()? as usize;
        if len > MAX_STRING_LEN {
            return Err(CodecError::StringTooLong {
                len,
                max: MAX_STRING_LEN,
                offset: len_offset,
            });
        }
        let str_offset = self.pos;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| CodecError::InvalidUtf8 { offset: str_offset })
    }
}
