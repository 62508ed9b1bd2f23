//! Type-node codec

use crate::ast::TypeNode;
use crate::error::{CodecError, CodecResult};

use super::{DecodeContext, EncodeContext};

pub(crate) fn encode_type(ctx: &mut EncodeContext, ty: &TypeNode) {
    ctx.w.write_u8(ty.discriminant());
    if let TypeNode::Named { name, nullable } = ty {
        ctx.write_str_ref(name);
        ctx.w.write_bool(*nullable);
    }
}

pub(crate) fn decode_type(ctx: &mut DecodeContext<'_>) -> CodecResult<TypeNode> {
    let tag_offset = ctx.r.offset();
    let tag = ctx.r.read_u8()?;
    match tag {
        0 => {
            let name = ctx.read_str_ref()?;
            let nullable = ctx.r.read_bool()?;
            Ok(TypeNode::Named { name, nullable })
        }
        1 => Ok(TypeNode::Dynamic),
        2 => Ok(TypeNode::Void),
        3 => Ok(TypeNode::Never),
        _ => Err(CodecError::unknown_tag("type", tag, tag_offset)),
    }
}

pub(crate) fn encode_opt_type(ctx: &mut EncodeContext, ty: Option<&TypeNode>) {
    match ty {
        Some(ty) => {
            ctx.w.write_u8(1);
            encode_type(ctx, ty);
        }
        None => ctx.w.write_u8(0),
    }
}

pub(crate) fn decode_opt_type(ctx: &mut DecodeContext<'_>) -> CodecResult<Option<TypeNode>> {
    if ctx.r.read_bool()? {
        Ok(Some(decode_type(ctx)?))
    } else {
        Ok(None)
    }
}
