//! Container assembly and the top-level decode state machine
//!
//! Layout: fixed header, string table, relationship section, tree section,
//! then an optional SHA-256 trailer over every preceding byte. Sections are
//! encoded into a scratch buffer first so the string table (populated as a
//! side effect of interning) can be written ahead of the bytes that
//! reference it.

use sha2::{Digest, Sha256};

use crate::api::EncodeOptions;
use crate::ast::SourceUnit;
use crate::error::{CodecError, CodecResult};
use crate::registry::RelationshipRegistry;

use super::cursor::{Reader, Writer};
use super::registry::{decode_registry, encode_registry};
use super::strings::StringTable;
use super::{
    decl, DecodeContext, EncodeContext, CHECKSUM_LEN, FLAG_CHECKSUM, FLAG_COMPRESSED, HEADER_LEN,
    MAGIC, MAX_CLASS_COUNT, MAX_SEQ_LEN, VERSION,
};

/// Encode a unit and its relationship registry into a complete container.
pub fn encode_container(
    unit: &SourceUnit,
    registry: &RelationshipRegistry,
    options: &EncodeOptions,
) -> CodecResult<Vec<u8>> {
    // Pass one: sections into scratch, interning every string on the way.
    let mut ctx = EncodeContext::new();
    encode_registry(&mut ctx, registry)?;
    encode_tree(&mut ctx, unit)?;

    // Pass two: assemble in wire order.
    let flags = if options.checksum { FLAG_CHECKSUM } else { 0 };
    let mut out = Writer::new();
    out.write_u32(MAGIC);
    out.write_u16(VERSION);
    out.write_u16(flags);
    ctx.strings.write(&mut out)?;
    out.write_bytes(ctx.w.as_bytes());

    let mut bytes = out.into_bytes();
    if options.checksum {
        let digest = Sha256::digest(&bytes);
        bytes.extend_from_slice(&digest);
    }
    Ok(bytes)
}

/// Decode a complete container back into a unit and registry.
///
/// When the checksum flag is set the digest is verified before any section
/// is parsed, so corruption surfaces as [`CodecError::ChecksumMismatch`]
/// rather than as whatever parse error the damaged bytes happen to produce.
pub fn decode_container(bytes: &[u8]) -> CodecResult<(SourceUnit, RelationshipRegistry)> {
    let flags = read_header(&mut Reader::new(bytes))?;
    if flags & FLAG_COMPRESSED != 0 {
        return Err(CodecError::CompressionUnsupported);
    }

    let body = if flags & FLAG_CHECKSUM != 0 {
        if bytes.len() < HEADER_LEN + CHECKSUM_LEN {
            return Err(CodecError::UnexpectedEof {
                offset: bytes.len(),
                needed: HEADER_LEN + CHECKSUM_LEN - bytes.len(),
                remaining: 0,
            });
        }
        let (body, trailer) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
        if Sha256::digest(body).as_slice() != trailer {
            return Err(CodecError::ChecksumMismatch);
        }
        body
    } else {
        bytes
    };

    let mut r = Reader::new(body);
    read_header(&mut r)?;
    let strings = StringTable::read(&mut r)?;
    let mut ctx = DecodeContext::new(r, strings);
    let registry = decode_registry(&mut ctx)?;
    let unit = decode_tree(&mut ctx)?;
    Ok((unit, registry))
}

/// Validate magic and version, returning the flag word.
fn read_header(r: &mut Reader<'_>) -> CodecResult<u16> {
    let magic = r.read_u32()?;
    if magic != MAGIC {
        return Err(CodecError::InvalidMagic {
            found: magic,
            expected: MAGIC,
        });
    }
    let version = r.read_u16()?;
    if version != VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: version,
            expected: VERSION,
        });
    }
    r.read_u16()
}

fn encode_tree(ctx: &mut EncodeContext, unit: &SourceUnit) -> CodecResult<()> {
    ctx.write_str_ref(&unit.file_path);
    ctx.write_str_ref(&unit.content_hash);
    ctx.write_str_ref(&unit.library_name);
    ctx.w.write_u64(unit.analyzed_at);

    ctx.write_seq_len("import", unit.imports.len(), MAX_SEQ_LEN)?;
    for decl in &unit.imports {
        decl::encode_import(ctx, decl)?;
    }
    ctx.write_seq_len("export", unit.exports.len(), MAX_SEQ_LEN)?;
    for decl in &unit.exports {
        decl::encode_export(ctx, decl)?;
    }
    ctx.write_seq_len("top-level variable", unit.variables.len(), MAX_SEQ_LEN)?;
    for decl in &unit.variables {
        decl::encode_variable_decl(ctx, decl)?;
    }
    ctx.write_seq_len("top-level function", unit.functions.len(), MAX_SEQ_LEN)?;
    for decl in &unit.functions {
        decl::encode_function_decl(ctx, decl)?;
    }
    ctx.write_seq_len("class", unit.classes.len(), MAX_CLASS_COUNT)?;
    for decl in &unit.classes {
        decl::encode_class_decl(ctx, decl)?;
    }
    ctx.write_seq_len("issue", unit.issues.len(), MAX_SEQ_LEN)?;
    for issue in &unit.issues {
        decl::encode_issue(ctx, issue)?;
    }
    Ok(())
}

fn decode_tree(ctx: &mut DecodeContext<'_>) -> CodecResult<SourceUnit> {
    let file_path = ctx.read_str_ref()?;
    let content_hash = ctx.read_str_ref()?;
    let library_name = ctx.read_str_ref()?;
    let analyzed_at = ctx.r.read_u64()?;

    let import_count = ctx.read_seq_len("import", MAX_SEQ_LEN)?;
    let mut imports = Vec::with_capacity(import_count.min(4096));
    for _ in 0..import_count {
        imports.push(decl::decode_import(ctx)?);
    }
    let export_count = ctx.read_seq_len("export", MAX_SEQ_LEN)?;
    let mut exports = Vec::with_capacity(export_count.min(4096));
    for _ in 0..export_count {
        exports.push(decl::decode_export(ctx)?);
    }
    let variable_count = ctx.read_seq_len("top-level variable", MAX_SEQ_LEN)?;
    let mut variables = Vec::with_capacity(variable_count.min(4096));
    for _ in 0..variable_count {
        variables.push(decl::decode_variable_decl(ctx)?);
    }
    let function_count = ctx.read_seq_len("top-level function", MAX_SEQ_LEN)?;
    let mut functions = Vec::with_capacity(function_count.min(4096));
    for _ in 0..function_count {
        functions.push(decl::decode_function_decl(ctx)?);
    }
    let class_count = ctx.read_seq_len("class", MAX_CLASS_COUNT)?;
    let mut classes = Vec::with_capacity(class_count.min(4096));
    for _ in 0..class_count {
        classes.push(decl::decode_class_decl(ctx)?);
    }
    let issue_count = ctx.read_seq_len("issue", MAX_SEQ_LEN)?;
    let mut issues = Vec::with_capacity(issue_count.min(4096));
    for _ in 0..issue_count {
        issues.push(decl::decode_issue(ctx)?);
    }

    Ok(SourceUnit {
        file_path,
        content_hash,
        library_name,
        analyzed_at,
        imports,
        exports,
        variables,
        functions,
        classes,
        issues,
    })
}
