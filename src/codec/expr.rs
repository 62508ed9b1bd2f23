//! Expression codec
//!
//! Every node: one tag byte, then the result type, then the location, then
//! the variant payload. Decode reads the same fields in the same order;
//! there is nothing on the wire that would let a reader skip or reorder.

use crate::ast::{BinaryOp, Expr, ExprKind, FloatBits, InterpolationPart, Literal, NamedArg, UnaryOp};
use crate::error::{CodecError, CodecResult};

use super::decl::{decode_param, encode_param};
use super::stmt::{decode_function_body, encode_function_body};
use super::ty::{decode_type, encode_type};
use super::{DecodeContext, EncodeContext, MAX_SEQ_LEN};

// ============================================================================
// Literals and operators
// ============================================================================

fn encode_literal(ctx: &mut EncodeContext, lit: &Literal) {
    ctx.w.write_u8(lit.discriminant());
    match lit {
        Literal::Null => {}
        Literal::Bool(b) => ctx.w.write_bool(*b),
        Literal::Int(v) => ctx.w.write_i64(*v),
        Literal::Double(bits) => ctx.w.write_u64(bits.0),
        Literal::Str(s) => ctx.write_str_ref(s),
    }
}

fn decode_literal(ctx: &mut DecodeContext<'_>) -> CodecResult<Literal> {
    let tag_offset = ctx.r.offset();
    let tag = ctx.r.read_u8()?;
    match tag {
        0 => Ok(Literal::Null),
        1 => Ok(Literal::Bool(ctx.r.read_bool()?)),
        2 => Ok(Literal::Int(ctx.r.read_i64()?)),
        3 => Ok(Literal::Double(FloatBits(ctx.r.read_u64()?))),
        4 => Ok(Literal::Str(ctx.read_str_ref()?)),
        _ => Err(CodecError::unknown_tag("literal", tag, tag_offset)),
    }
}

fn encode_binary_op(ctx: &mut EncodeContext, op: BinaryOp) {
    ctx.w.write_u8(op as u8);
}

fn decode_binary_op(ctx: &mut DecodeContext<'_>) -> CodecResult<BinaryOp> {
    let tag_offset = ctx.r.offset();
    let v = ctx.r.read_u8()?;
    let op = match v {
        0 => BinaryOp::Add,
        1 => BinaryOp::Sub,
        2 => BinaryOp::Mul,
        3 => BinaryOp::Div,
        4 => BinaryOp::IntDiv,
        5 => BinaryOp::Mod,
        6 => BinaryOp::Eq,
        7 => BinaryOp::Ne,
        8 => BinaryOp::Lt,
        9 => BinaryOp::Le,
        10 => BinaryOp::Gt,
        11 => BinaryOp::Ge,
        12 => BinaryOp::And,
        13 => BinaryOp::Or,
        14 => BinaryOp::BitAnd,
        15 => BinaryOp::BitOr,
        16 => BinaryOp::BitXor,
        17 => BinaryOp::Shl,
        18 => BinaryOp::Shr,
        19 => BinaryOp::UShr,
        _ => return Err(CodecError::unknown_tag("binary operator", v, tag_offset)),
    };
    Ok(op)
}

fn decode_unary_op(ctx: &mut DecodeContext<'_>) -> CodecResult<UnaryOp> {
    let tag_offset = ctx.r.offset();
    let v = ctx.r.read_u8()?;
    let op = match v {
        0 => UnaryOp::Neg,
        1 => UnaryOp::Not,
        2 => UnaryOp::BitNot,
        3 => UnaryOp::Inc,
        4 => UnaryOp::Dec,
        _ => return Err(CodecError::unknown_tag("unary operator", v, tag_offset)),
    };
    Ok(op)
}

// ============================================================================
// Shared sequences
// ============================================================================

pub(crate) fn encode_expr_list(ctx: &mut EncodeContext, exprs: &[Expr]) -> CodecResult<()> {
    ctx.write_seq_len("expression", exprs.len(), MAX_SEQ_LEN)?;
    for e in exprs {
        encode_expr(ctx, e)?;
    }
    Ok(())
}

pub(crate) fn decode_expr_list(ctx: &mut DecodeContext<'_>) -> CodecResult<Vec<Expr>> {
    let count = ctx.read_seq_len("expression", MAX_SEQ_LEN)?;
    let mut exprs = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        exprs.push(decode_expr(ctx)?);
    }
    Ok(exprs)
}

pub(crate) fn encode_opt_expr(ctx: &mut EncodeContext, e: Option<&Expr>) -> CodecResult<()> {
    match e {
        Some(e) => {
            ctx.w.write_u8(1);
            encode_expr(ctx, e)?;
        }
        None => ctx.w.write_u8(0),
    }
    Ok(())
}

pub(crate) fn decode_opt_expr(ctx: &mut DecodeContext<'_>) -> CodecResult<Option<Expr>> {
    if ctx.r.read_bool()? {
        Ok(Some(decode_expr(ctx)?))
    } else {
        Ok(None)
    }
}

pub(crate) fn encode_named_args(ctx: &mut EncodeContext, args: &[NamedArg]) -> CodecResult<()> {
    ctx.write_seq_len("named argument", args.len(), MAX_SEQ_LEN)?;
    for arg in args {
        ctx.write_str_ref(&arg.name);
        encode_expr(ctx, &arg.value)?;
    }
    Ok(())
}

pub(crate) fn decode_named_args(ctx: &mut DecodeContext<'_>) -> CodecResult<Vec<NamedArg>> {
    let count = ctx.read_seq_len("named argument", MAX_SEQ_LEN)?;
    let mut args = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        let name = ctx.read_str_ref()?;
        let value = decode_expr(ctx)?;
        args.push(NamedArg { name, value });
    }
    Ok(args)
}

// ============================================================================
// Expression nodes
// ============================================================================

/// Encode an expression: tag, result type, location, payload.
pub(crate) fn encode_expr(ctx: &mut EncodeContext, expr: &Expr) -> CodecResult<()> {
    ctx.w.write_u8(expr.kind.discriminant());
    encode_type(ctx, &expr.ty);
    ctx.write_location(&expr.loc);

    match &expr.kind {
        ExprKind::Literal(lit) => encode_literal(ctx, lit),
        ExprKind::Identifier(name) => ctx.write_str_ref(name),
        ExprKind::Binary { op, left, right } => {
            encode_binary_op(ctx, *op);
            encode_expr(ctx, left)?;
            encode_expr(ctx, right)?;
        }
        ExprKind::Unary {
            op,
            operand,
            prefix,
        } => {
            ctx.w.write_u8(*op as u8);
            ctx.w.write_bool(*prefix);
            encode_expr(ctx, operand)?;
        }
        ExprKind::Assignment { target, value } => {
            encode_expr(ctx, target)?;
            encode_expr(ctx, value)?;
        }
        ExprKind::CompoundAssignment { op, target, value } => {
            encode_binary_op(ctx, *op);
            encode_expr(ctx, target)?;
            encode_expr(ctx, value)?;
        }
        ExprKind::Conditional {
            condition,
            then_branch,
            else_branch,
        } => {
            encode_expr(ctx, condition)?;
            encode_expr(ctx, then_branch)?;
            encode_expr(ctx, else_branch)?;
        }
        ExprKind::Index { target, index } => {
            encode_expr(ctx, target)?;
            encode_expr(ctx, index)?;
        }
        ExprKind::PropertyAccess {
            target,
            name,
            null_aware,
        } => {
            encode_expr(ctx, target)?;
            ctx.write_str_ref(name);
            ctx.w.write_bool(*null_aware);
        }
        ExprKind::MethodCall {
            target,
            name,
            args,
            named_args,
        } => {
            encode_opt_expr(ctx, target.as_deref())?;
            ctx.write_str_ref(name);
            encode_expr_list(ctx, args)?;
            encode_named_args(ctx, named_args)?;
        }
        ExprKind::FunctionCall {
            name,
            args,
            named_args,
        } => {
            ctx.write_str_ref(name);
            encode_expr_list(ctx, args)?;
            encode_named_args(ctx, named_args)?;
        }
        ExprKind::InstanceCreation {
            ty,
            constructor,
            is_const,
            args,
            named_args,
        } => {
            encode_type(ctx, ty);
            ctx.write_opt_str_ref(constructor.as_deref());
            ctx.w.write_bool(*is_const);
            encode_expr_list(ctx, args)?;
            encode_named_args(ctx, named_args)?;
        }
        ExprKind::Cascade { target, sections } => {
            encode_expr(ctx, target)?;
            encode_expr_list(ctx, sections)?;
        }
        ExprKind::Cast { operand, ty } => {
            encode_expr(ctx, operand)?;
            encode_type(ctx, ty);
        }
        ExprKind::TypeCheck {
            operand,
            ty,
            negated,
        } => {
            encode_expr(ctx, operand)?;
            encode_type(ctx, ty);
            ctx.w.write_bool(*negated);
        }
        ExprKind::Await(operand) | ExprKind::Throw(operand) | ExprKind::Parenthesized(operand) => {
            encode_expr(ctx, operand)?;
        }
        ExprKind::NullCoalesce { left, right } => {
            encode_expr(ctx, left)?;
            encode_expr(ctx, right)?;
        }
        ExprKind::Lambda { params, body } => {
            ctx.write_seq_len("parameter", params.len(), MAX_SEQ_LEN)?;
            for p in params {
                encode_param(ctx, p)?;
            }
            encode_function_body(ctx, body)?;
        }
        ExprKind::StringInterpolation(parts) => {
            ctx.write_seq_len("interpolation part", parts.len(), MAX_SEQ_LEN)?;
            for part in parts {
                match part {
                    InterpolationPart::Text(text) => {
                        ctx.w.write_u8(0);
                        ctx.write_str_ref(text);
                    }
                    InterpolationPart::Expr(e) => {
                        ctx.w.write_u8(1);
                        encode_expr(ctx, e)?;
                    }
                }
            }
        }
        ExprKind::This | ExprKind::Super => {}
        ExprKind::ListLiteral { is_const, elements } | ExprKind::SetLiteral { is_const, elements } => {
            ctx.w.write_bool(*is_const);
            encode_expr_list(ctx, elements)?;
        }
        ExprKind::MapLiteral { is_const, entries } => {
            ctx.w.write_bool(*is_const);
            ctx.write_seq_len("map entry", entries.len(), MAX_SEQ_LEN)?;
            for (k, v) in entries {
                encode_expr(ctx, k)?;
                encode_expr(ctx, v)?;
            }
        }
    }
    Ok(())
}

/// Decode an expression. Tracks nesting depth; a corrupted buffer cannot
/// push the decoder into unbounded recursion.
pub(crate) fn decode_expr(ctx: &mut DecodeContext<'_>) -> CodecResult<Expr> {
    ctx.descend(|ctx| {
        let tag_offset = ctx.r.offset();
        let tag = ctx.r.read_u8()?;
        let ty = decode_type(ctx)?;
        let loc = ctx.read_location()?;

        let kind = match tag {
            0 => ExprKind::Literal(decode_literal(ctx)?),
            1 => ExprKind::Identifier(ctx.read_str_ref()?),
            2 => {
                let op = decode_binary_op(ctx)?;
                let left = Box::new(decode_expr(ctx)?);
                let right = Box::new(decode_expr(ctx)?);
                ExprKind::Binary { op, left, right }
            }
            3 => {
                let op = decode_unary_op(ctx)?;
                let prefix = ctx.r.read_bool()?;
                let operand = Box::new(decode_expr(ctx)?);
                ExprKind::Unary {
                    op,
                    operand,
                    prefix,
                }
            }
            4 => {
                let target = Box::new(decode_expr(ctx)?);
                let value = Box::new(decode_expr(ctx)?);
                ExprKind::Assignment { target, value }
            }
            5 => {
                let op = decode_binary_op(ctx)?;
                let target = Box::new(decode_expr(ctx)?);
                let value = Box::new(decode_expr(ctx)?);
                ExprKind::CompoundAssignment { op, target, value }
            }
            6 => {
                let condition = Box::new(decode_expr(ctx)?);
                let then_branch = Box::new(decode_expr(ctx)?);
                let else_branch = Box::new(decode_expr(ctx)?);
                ExprKind::Conditional {
                    condition,
                    then_branch,
                    else_branch,
                }
            }
            7 => {
                let target = Box::new(decode_expr(ctx)?);
                let index = Box::new(decode_expr(ctx)?);
                ExprKind::Index { target, index }
            }
            8 => {
                let target = Box::new(decode_expr(ctx)?);
                let name = ctx.read_str_ref()?;
                let null_aware = ctx.r.read_bool()?;
                ExprKind::PropertyAccess {
                    target,
                    name,
                    null_aware,
                }
            }
            9 => {
                let target = decode_opt_expr(ctx)?.map(Box::new);
                let name = ctx.read_str_ref()?;
                let args = decode_expr_list(ctx)?;
                let named_args = decode_named_args(ctx)?;
                ExprKind::MethodCall {
                    target,
                    name,
                    args,
                    named_args,
                }
            }
            10 => {
                let name = ctx.read_str_ref()?;
                let args = decode_expr_list(ctx)?;
                let named_args = decode_named_args(ctx)?;
                ExprKind::FunctionCall {
                    name,
                    args,
                    named_args,
                }
            }
            11 => {
                let created = decode_type(ctx)?;
                let constructor = ctx.read_opt_str_ref()?;
                let is_const = ctx.r.read_bool()?;
                let args = decode_expr_list(ctx)?;
                let named_args = decode_named_args(ctx)?;
                ExprKind::InstanceCreation {
                    ty: created,
                    constructor,
                    is_const,
                    args,
                    named_args,
                }
            }
            12 => {
                let target = Box::new(decode_expr(ctx)?);
                let sections = decode_expr_list(ctx)?;
                ExprKind::Cascade { target, sections }
            }
            13 => {
                let operand = Box::new(decode_expr(ctx)?);
                let cast_ty = decode_type(ctx)?;
                ExprKind::Cast {
                    operand,
                    ty: cast_ty,
                }
            }
            14 => {
                let operand = Box::new(decode_expr(ctx)?);
                let check_ty = decode_type(ctx)?;
                let negated = ctx.r.read_bool()?;
                ExprKind::TypeCheck {
                    operand,
                    ty: check_ty,
                    negated,
                }
            }
            15 => ExprKind::Await(Box::new(decode_expr(ctx)?)),
            16 => ExprKind::Throw(Box::new(decode_expr(ctx)?)),
            17 => {
                let left = Box::new(decode_expr(ctx)?);
                let right = Box::new(decode_expr(ctx)?);
                ExprKind::NullCoalesce { left, right }
            }
            18 => {
                let count = ctx.read_seq_len("parameter", MAX_SEQ_LEN)?;
                let mut params = Vec::with_capacity(count.min(4096));
                for _ in 0..count {
                    params.push(decode_param(ctx)?);
                }
                let body = decode_function_body(ctx)?;
                ExprKind::Lambda { params, body }
            }
            19 => {
                let count = ctx.read_seq_len("interpolation part", MAX_SEQ_LEN)?;
                let mut parts = Vec::with_capacity(count.min(4096));
                for _ in 0..count {
                    let part_offset = ctx.r.offset();
                    let part_tag = ctx.r.read_u8()?;
                    let part = match part_tag {
                        0 => InterpolationPart::Text(ctx.read_str_ref()?),
                        1 => InterpolationPart::Expr(decode_expr(ctx)?),
                        _ => {
                            return Err(CodecError::unknown_tag(
                                "interpolation part",
                                part_tag,
                                part_offset,
                            ))
                        }
                    };
                    parts.push(part);
                }
                ExprKind::StringInterpolation(parts)
            }
            20 => ExprKind::This,
            21 => ExprKind::Super,
            22 => ExprKind::Parenthesized(Box::new(decode_expr(ctx)?)),
            23 => {
                let is_const = ctx.r.read_bool()?;
                let elements = decode_expr_list(ctx)?;
                ExprKind::ListLiteral { is_const, elements }
            }
            24 => {
                let is_const = ctx.r.read_bool()?;
                let count = ctx.read_seq_len("map entry", MAX_SEQ_LEN)?;
                let mut entries = Vec::with_capacity(count.min(4096));
                for _ in 0..count {
                    let k = decode_expr(ctx)?;
                    let v = decode_expr(ctx)?;
                    entries.push((k, v));
                }
                ExprKind::MapLiteral { is_const, entries }
            }
            25 => {
                let is_const = ctx.r.read_bool()?;
                let elements = decode_expr_list(ctx)?;
                ExprKind::SetLiteral { is_const, elements }
            }
            _ => return Err(CodecError::unknown_tag("expression", tag, tag_offset)),
        };

        Ok(Expr { kind, ty, loc })
    })
}

#[cfg(test)]
mod tests {
    use super::super::cursor::Reader;
    use super::super::tests::roundtrip_ctx;
    use super::*;
    use crate::ast::{SourceLocation, TypeNode};

    fn roundtrip(expr: Expr) -> Expr {
        let (bytes, strings) = roundtrip_ctx(|ctx| encode_expr(ctx, &expr).unwrap());
        let mut ctx = DecodeContext::new(Reader::new(&bytes), strings);
        let decoded = decode_expr(&mut ctx).unwrap();
        assert!(ctx.r.is_at_end(), "decoder left trailing bytes");
        decoded
    }

    fn ident(name: &str) -> Expr {
        Expr::new(ExprKind::Identifier(name.to_string()), TypeNode::Dynamic)
    }

    fn int(v: i64) -> Expr {
        Expr::new(ExprKind::Literal(Literal::Int(v)), TypeNode::named("int"))
    }

    #[test]
    fn test_roundtrip_literals() {
        for lit in [
            Literal::Null,
            Literal::Bool(true),
            Literal::Bool(false),
            Literal::Int(-123456789),
            Literal::double(2.71828),
            Literal::string("hello world"),
        ] {
            let expr = Expr::new(ExprKind::Literal(lit.clone()), TypeNode::Dynamic);
            assert_eq!(roundtrip(expr).kind, ExprKind::Literal(lit));
        }
    }

    #[test]
    fn test_roundtrip_binary_with_location() {
        let expr = Expr::new(
            ExprKind::Binary {
                op: BinaryOp::Add,
                left: Box::new(ident("x")),
                right: Box::new(int(1)),
            },
            TypeNode::named("int"),
        )
        .at(SourceLocation::new("lib/a.fl", 3, 12, 44, 5));

        let decoded = roundtrip(expr.clone());
        assert_eq!(decoded, expr);
        assert_eq!(decoded.loc.line, 3);
    }

    #[test]
    fn test_roundtrip_unary_prefix_flag() {
        for prefix in [true, false] {
            let expr = Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Inc,
                    operand: Box::new(ident("i")),
                    prefix,
                },
                TypeNode::named("int"),
            );
            assert_eq!(roundtrip(expr.clone()), expr);
        }
    }

    #[test]
    fn test_roundtrip_method_call_named_args() {
        let expr = Expr::new(
            ExprKind::MethodCall {
                target: Some(Box::new(ident("theme"))),
                name: "copyWith".to_string(),
                args: vec![int(1)],
                named_args: vec![NamedArg {
                    name: "color".to_string(),
                    value: ident("red"),
                }],
            },
            TypeNode::named("ThemeData"),
        );
        assert_eq!(roundtrip(expr.clone()), expr);
    }

    #[test]
    fn test_roundtrip_instance_creation() {
        let expr = Expr::new(
            ExprKind::InstanceCreation {
                ty: TypeNode::named("EdgeInsets"),
                constructor: Some("all".to_string()),
                is_const: true,
                args: vec![int(8)],
                named_args: Vec::new(),
            },
            TypeNode::named("EdgeInsets"),
        );
        assert_eq!(roundtrip(expr.clone()), expr);
    }

    #[test]
    fn test_roundtrip_interpolation() {
        let expr = Expr::new(
            ExprKind::StringInterpolation(vec![
                InterpolationPart::Text("count: ".to_string()),
                InterpolationPart::Expr(ident("n")),
            ]),
            TypeNode::named("String"),
        );
        assert_eq!(roundtrip(expr.clone()), expr);
    }

    #[test]
    fn test_roundtrip_collections() {
        let list = Expr::new(
            ExprKind::ListLiteral {
                is_const: false,
                elements: vec![int(1), int(2)],
            },
            TypeNode::named("List"),
        );
        assert_eq!(roundtrip(list.clone()), list);

        let map = Expr::new(
            ExprKind::MapLiteral {
                is_const: true,
                entries: vec![(
                    Expr::new(ExprKind::Literal(Literal::string("k")), TypeNode::named("String")),
                    int(3),
                )],
            },
            TypeNode::named("Map"),
        );
        assert_eq!(roundtrip(map.clone()), map);

        let set = Expr::new(
            ExprKind::SetLiteral {
                is_const: false,
                elements: vec![int(7)],
            },
            TypeNode::named("Set"),
        );
        assert_eq!(roundtrip(set.clone()), set);
    }

    #[test]
    fn test_roundtrip_null_aware_chain() {
        let expr = Expr::new(
            ExprKind::NullCoalesce {
                left: Box::new(Expr::new(
                    ExprKind::PropertyAccess {
                        target: Box::new(ident("widget")),
                        name: "title".to_string(),
                        null_aware: true,
                    },
                    TypeNode::nullable("String"),
                )),
                right: Box::new(Expr::new(
                    ExprKind::Literal(Literal::string("untitled")),
                    TypeNode::named("String"),
                )),
            },
            TypeNode::named("String"),
        );
        assert_eq!(roundtrip(expr.clone()), expr);
    }

    #[test]
    fn test_roundtrip_cascade_cast_typecheck() {
        let expr = Expr::new(
            ExprKind::Cascade {
                target: Box::new(ident("controller")),
                sections: vec![Expr::new(
                    ExprKind::MethodCall {
                        target: None,
                        name: "dispose".to_string(),
                        args: Vec::new(),
                        named_args: Vec::new(),
                    },
                    TypeNode::Void,
                )],
            },
            TypeNode::named("Controller"),
        );
        assert_eq!(roundtrip(expr.clone()), expr);

        let cast = Expr::new(
            ExprKind::Cast {
                operand: Box::new(ident("x")),
                ty: TypeNode::named("num"),
            },
            TypeNode::named("num"),
        );
        assert_eq!(roundtrip(cast.clone()), cast);

        let check = Expr::new(
            ExprKind::TypeCheck {
                operand: Box::new(ident("x")),
                ty: TypeNode::named("String"),
                negated: true,
            },
            TypeNode::named("bool"),
        );
        assert_eq!(roundtrip(check.clone()), check);
    }

    #[test]
    fn test_unknown_expression_tag() {
        let expr = ident("x");
        let (mut bytes, strings) = roundtrip_ctx(|ctx| encode_expr(ctx, &expr).unwrap());
        bytes[0] = 0xEE;
        let mut ctx = DecodeContext::new(Reader::new(&bytes), strings);
        assert!(matches!(
            decode_expr(&mut ctx),
            Err(CodecError::UnknownTag {
                kind: "expression",
                value: 0xEE,
                offset: 0,
            })
        ));
    }

    fn nested_parens(depth: usize) -> Expr {
        let mut expr = ident("x");
        for _ in 0..depth {
            expr = Expr::new(ExprKind::Parenthesized(Box::new(expr)), TypeNode::Dynamic);
        }
        expr
    }

    #[test]
    fn test_nesting_under_cap_decodes() {
        // A valid tree just below the ceiling must decode, not blow the
        // stack: the counter has to be the binding limit.
        let expr = nested_parens(super::super::MAX_DEPTH - 4);
        assert_eq!(roundtrip(expr.clone()), expr);
    }

    #[test]
    fn test_deep_nesting_is_capped() {
        let expr = nested_parens(super::super::MAX_DEPTH + 10);
        let (bytes, strings) = roundtrip_ctx(|ctx| encode_expr(ctx, &expr).unwrap());
        let mut ctx = DecodeContext::new(Reader::new(&bytes), strings);
        assert!(matches!(
            decode_expr(&mut ctx),
            Err(CodecError::DepthExceeded { .. })
        ));
    }
}
