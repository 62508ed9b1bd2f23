//! Statement codec
//!
//! Same discipline as the expression codec: tag byte, location, payload in
//! declaration order. Composite statements recurse through [`decode_stmt`],
//! which shares the depth counter with expression decoding.

use crate::ast::{CatchClause, FunctionBody, Stmt, StmtKind, SwitchCase};
use crate::error::{CodecError, CodecResult};

use super::decl::{
    decode_function_decl, decode_variable_decl, encode_function_decl, encode_variable_decl,
};
use super::expr::{
    decode_expr, decode_expr_list, decode_opt_expr, encode_expr, encode_expr_list, encode_opt_expr,
};
use super::ty::{decode_opt_type, encode_opt_type};
use super::{DecodeContext, EncodeContext, MAX_SEQ_LEN};

pub(crate) fn encode_stmt_list(ctx: &mut EncodeContext, stmts: &[Stmt]) -> CodecResult<()> {
    ctx.write_seq_len("statement", stmts.len(), MAX_SEQ_LEN)?;
    for s in stmts {
        encode_stmt(ctx, s)?;
    }
    Ok(())
}

pub(crate) fn decode_stmt_list(ctx: &mut DecodeContext<'_>) -> CodecResult<Vec<Stmt>> {
    let count = ctx.read_seq_len("statement", MAX_SEQ_LEN)?;
    let mut stmts = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        stmts.push(decode_stmt(ctx)?);
    }
    Ok(stmts)
}

fn encode_opt_stmt_list(ctx: &mut EncodeContext, stmts: Option<&[Stmt]>) -> CodecResult<()> {
    match stmts {
        Some(stmts) => {
            ctx.w.write_u8(1);
            encode_stmt_list(ctx, stmts)?;
        }
        None => ctx.w.write_u8(0),
    }
    Ok(())
}

fn decode_opt_stmt_list(ctx: &mut DecodeContext<'_>) -> CodecResult<Option<Vec<Stmt>>> {
    if ctx.r.read_bool()? {
        Ok(Some(decode_stmt_list(ctx)?))
    } else {
        Ok(None)
    }
}

/// Encode a function body: `=> expr` or a statement block.
pub(crate) fn encode_function_body(ctx: &mut EncodeContext, body: &FunctionBody) -> CodecResult<()> {
    ctx.w.write_u8(body.discriminant());
    match body {
        FunctionBody::Expression(e) => encode_expr(ctx, e),
        FunctionBody::Block(stmts) => encode_stmt_list(ctx, stmts),
    }
}

pub(crate) fn decode_function_body(ctx: &mut DecodeContext<'_>) -> CodecResult<FunctionBody> {
    let tag_offset = ctx.r.offset();
    let tag = ctx.r.read_u8()?;
    match tag {
        0 => Ok(FunctionBody::Expression(Box::new(decode_expr(ctx)?))),
        1 => Ok(FunctionBody::Block(decode_stmt_list(ctx)?)),
        _ => Err(CodecError::unknown_tag("function body", tag, tag_offset)),
    }
}

pub(crate) fn encode_opt_function_body(
    ctx: &mut EncodeContext,
    body: Option<&FunctionBody>,
) -> CodecResult<()> {
    match body {
        Some(body) => {
            ctx.w.write_u8(1);
            encode_function_body(ctx, body)?;
        }
        None => ctx.w.write_u8(0),
    }
    Ok(())
}

pub(crate) fn decode_opt_function_body(
    ctx: &mut DecodeContext<'_>,
) -> CodecResult<Option<FunctionBody>> {
    if ctx.r.read_bool()? {
        Ok(Some(decode_function_body(ctx)?))
    } else {
        Ok(None)
    }
}

/// Encode a statement: tag, location, payload.
pub(crate) fn encode_stmt(ctx: &mut EncodeContext, stmt: &Stmt) -> CodecResult<()> {
    ctx.w.write_u8(stmt.kind.discriminant());
    ctx.write_location(&stmt.loc);

    match &stmt.kind {
        StmtKind::Expression(e) => encode_expr(ctx, e)?,
        StmtKind::VariableDecl(decl) => encode_variable_decl(ctx, decl)?,
        StmtKind::Return(value) => encode_opt_expr(ctx, value.as_ref())?,
        StmtKind::Break(label) | StmtKind::Continue(label) => {
            ctx.write_opt_str_ref(label.as_deref())
        }
        StmtKind::Throw(e) => encode_expr(ctx, e)?,
        StmtKind::Assert { condition, message } => {
            encode_expr(ctx, condition)?;
            encode_opt_expr(ctx, message.as_ref())?;
        }
        StmtKind::Empty => {}
        StmtKind::Block(stmts) => encode_stmt_list(ctx, stmts)?,
        StmtKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            encode_expr(ctx, condition)?;
            encode_stmt(ctx, then_branch)?;
            match else_branch {
                Some(s) => {
                    ctx.w.write_u8(1);
                    encode_stmt(ctx, s)?;
                }
                None => ctx.w.write_u8(0),
            }
        }
        StmtKind::For {
            init,
            condition,
            updates,
            body,
        } => {
            match init {
                Some(s) => {
                    ctx.w.write_u8(1);
                    encode_stmt(ctx, s)?;
                }
                None => ctx.w.write_u8(0),
            }
            encode_opt_expr(ctx, condition.as_ref())?;
            encode_expr_list(ctx, updates)?;
            encode_stmt(ctx, body)?;
        }
        StmtKind::ForEach {
            variable,
            variable_type,
            is_await,
            iterable,
            body,
        } => {
            ctx.write_str_ref(variable);
            encode_opt_type(ctx, variable_type.as_ref());
            ctx.w.write_bool(*is_await);
            encode_expr(ctx, iterable)?;
            encode_stmt(ctx, body)?;
        }
        StmtKind::While { condition, body } => {
            encode_expr(ctx, condition)?;
            encode_stmt(ctx, body)?;
        }
        StmtKind::DoWhile { body, condition } => {
            encode_stmt(ctx, body)?;
            encode_expr(ctx, condition)?;
        }
        StmtKind::Switch {
            subject,
            cases,
            default,
        } => {
            encode_expr(ctx, subject)?;
            ctx.write_seq_len("switch case", cases.len(), MAX_SEQ_LEN)?;
            for case in cases {
                encode_expr_list(ctx, &case.matches)?;
                encode_stmt_list(ctx, &case.body)?;
            }
            encode_opt_stmt_list(ctx, default.as_deref())?;
        }
        StmtKind::Try {
            body,
            catches,
            finally,
        } => {
            encode_stmt_list(ctx, body)?;
            ctx.write_seq_len("catch clause", catches.len(), MAX_SEQ_LEN)?;
            for clause in catches {
                encode_opt_type(ctx, clause.exception_type.as_ref());
                ctx.write_opt_str_ref(clause.exception_var.as_deref());
                ctx.write_opt_str_ref(clause.stack_var.as_deref());
                encode_stmt_list(ctx, &clause.body)?;
            }
            encode_opt_stmt_list(ctx, finally.as_deref())?;
        }
        StmtKind::Labeled { label, body } => {
            ctx.write_str_ref(label);
            encode_stmt(ctx, body)?;
        }
        StmtKind::Yield { expr, each } => {
            encode_expr(ctx, expr)?;
            ctx.w.write_bool(*each);
        }
        StmtKind::FunctionDecl(decl) => encode_function_decl(ctx, decl)?,
    }
    Ok(())
}

/// Decode a statement, sharing the recursion-depth counter with expressions.
pub(crate) fn decode_stmt(ctx: &mut DecodeContext<'_>) -> CodecResult<Stmt> {
    ctx.descend(|ctx| {
        let tag_offset = ctx.r.offset();
        let tag = ctx.r.read_u8()?;
        let loc = ctx.read_location()?;

        let kind = match tag {
            0 => StmtKind::Expression(decode_expr(ctx)?),
            1 => StmtKind::VariableDecl(decode_variable_decl(ctx)?),
            2 => StmtKind::Return(decode_opt_expr(ctx)?),
            3 => StmtKind::Break(ctx.read_opt_str_ref()?),
            4 => StmtKind::Continue(ctx.read_opt_str_ref()?),
            5 => StmtKind::Throw(decode_expr(ctx)?),
            6 => {
                let condition = decode_expr(ctx)?;
                let message = decode_opt_expr(ctx)?;
                StmtKind::Assert { condition, message }
            }
            7 => StmtKind::Empty,
            8 => StmtKind::Block(decode_stmt_list(ctx)?),
            9 => {
                let condition = decode_expr(ctx)?;
                let then_branch = Box::new(decode_stmt(ctx)?);
                let else_branch = if ctx.r.read_bool()? {
                    Some(Box::new(decode_stmt(ctx)?))
                } else {
                    None
                };
                StmtKind::If {
                    condition,
                    then_branch,
                    else_branch,
                }
            }
            10 => {
                let init = if ctx.r.read_bool()? {
                    Some(Box::new(decode_stmt(ctx)?))
                } else {
                    None
                };
                let condition = decode_opt_expr(ctx)?;
                let updates = decode_expr_list(ctx)?;
                let body = Box::new(decode_stmt(ctx)?);
                StmtKind::For {
                    init,
                    condition,
                    updates,
                    body,
                }
            }
            11 => {
                let variable = ctx.read_str_ref()?;
                let variable_type = decode_opt_type(ctx)?;
                let is_await = ctx.r.read_bool()?;
                let iterable = decode_expr(ctx)?;
                let body = Box::new(decode_stmt(ctx)?);
                StmtKind::ForEach {
                    variable,
                    variable_type,
                    is_await,
                    iterable,
                    body,
                }
            }
            12 => {
                let condition = decode_expr(ctx)?;
                let body = Box::new(decode_stmt(ctx)?);
                StmtKind::While { condition, body }
            }
            13 => {
                let body = Box::new(decode_stmt(ctx)?);
                let condition = decode_expr(ctx)?;
                StmtKind::DoWhile { body, condition }
            }
            14 => {
                let subject = decode_expr(ctx)?;
                let case_count = ctx.read_seq_len("switch case", MAX_SEQ_LEN)?;
                let mut cases = Vec::with_capacity(case_count.min(4096));
                for _ in 0..case_count {
                    let matches = decode_expr_list(ctx)?;
                    let body = decode_stmt_list(ctx)?;
                    cases.push(SwitchCase { matches, body });
                }
                let default = decode_opt_stmt_list(ctx)?;
                StmtKind::Switch {
                    subject,
                    cases,
                    default,
                }
            }
            15 => {
                let body = decode_stmt_list(ctx)?;
                let catch_count = ctx.read_seq_len("catch clause", MAX_SEQ_LEN)?;
                let mut catches = Vec::with_capacity(catch_count.min(4096));
                for _ in 0..catch_count {
                    let exception_type = decode_opt_type(ctx)?;
                    let exception_var = ctx.read_opt_str_ref()?;
                    let stack_var = ctx.read_opt_str_ref()?;
                    let clause_body = decode_stmt_list(ctx)?;
                    catches.push(CatchClause {
                        exception_type,
                        exception_var,
                        stack_var,
                        body: clause_body,
                    });
                }
                let finally = decode_opt_stmt_list(ctx)?;
                StmtKind::Try {
                    body,
                    catches,
                    finally,
                }
            }
            16 => {
                let label = ctx.read_str_ref()?;
                let body = Box::new(decode_stmt(ctx)?);
                StmtKind::Labeled { label, body }
            }
            17 => {
                let expr = decode_expr(ctx)?;
                let each = ctx.r.read_bool()?;
                StmtKind::Yield { expr, each }
            }
            18 => StmtKind::FunctionDecl(decode_function_decl(ctx)?),
            _ => return Err(CodecError::unknown_tag("statement", tag, tag_offset)),
        };

        Ok(Stmt { kind, loc })
    })
}

#[cfg(test)]
mod tests {
    use super::super::cursor::Reader;
    use super::super::tests::roundtrip_ctx;
    use super::*;
    use crate::ast::{Expr, ExprKind, Literal, SourceLocation, TypeNode, VariableDecl};

    fn roundtrip(stmt: Stmt) -> Stmt {
        let (bytes, strings) = roundtrip_ctx(|ctx| encode_stmt(ctx, &stmt).unwrap());
        let mut ctx = DecodeContext::new(Reader::new(&bytes), strings);
        let decoded = decode_stmt(&mut ctx).unwrap();
        assert!(ctx.r.is_at_end(), "decoder left trailing bytes");
        decoded
    }

    fn ident(name: &str) -> Expr {
        Expr::new(ExprKind::Identifier(name.to_string()), TypeNode::Dynamic)
    }

    fn truth() -> Expr {
        Expr::new(ExprKind::Literal(Literal::Bool(true)), TypeNode::named("bool"))
    }

    #[test]
    fn test_roundtrip_simple_statements() {
        for stmt in [
            Stmt::new(StmtKind::Empty),
            Stmt::new(StmtKind::Expression(ident("x"))),
            Stmt::new(StmtKind::Return(None)),
            Stmt::new(StmtKind::Return(Some(ident("x")))),
            Stmt::new(StmtKind::Break(None)),
            Stmt::new(StmtKind::Break(Some("outer".to_string()))),
            Stmt::new(StmtKind::Continue(Some("outer".to_string()))),
            Stmt::new(StmtKind::Throw(ident("err"))),
            Stmt::new(StmtKind::Yield {
                expr: ident("v"),
                each: true,
            }),
        ] {
            assert_eq!(roundtrip(stmt.clone()), stmt);
        }
    }

    #[test]
    fn test_roundtrip_variable_decl_stmt() {
        let stmt = Stmt::new(StmtKind::VariableDecl(VariableDecl {
            name: "count".to_string(),
            ty: TypeNode::named("int"),
            is_final: true,
            initializer: Some(Expr::new(
                ExprKind::Literal(Literal::Int(0)),
                TypeNode::named("int"),
            )),
            ..VariableDecl::default()
        }))
        .at(SourceLocation::new("lib/a.fl", 8, 3, 90, 18));
        assert_eq!(roundtrip(stmt.clone()), stmt);
    }

    #[test]
    fn test_roundtrip_if_else() {
        let stmt = Stmt::new(StmtKind::If {
            condition: truth(),
            then_branch: Box::new(Stmt::new(StmtKind::Return(None))),
            else_branch: Some(Box::new(Stmt::new(StmtKind::Block(vec![Stmt::new(
                StmtKind::Expression(ident("y")),
            )])))),
        });
        assert_eq!(roundtrip(stmt.clone()), stmt);
    }

    #[test]
    fn test_roundtrip_loops() {
        let for_stmt = Stmt::new(StmtKind::For {
            init: Some(Box::new(Stmt::new(StmtKind::VariableDecl(
                VariableDecl::new("i", TypeNode::named("int")),
            )))),
            condition: Some(truth()),
            updates: vec![ident("i")],
            body: Box::new(Stmt::new(StmtKind::Empty)),
        });
        assert_eq!(roundtrip(for_stmt.clone()), for_stmt);

        let for_each = Stmt::new(StmtKind::ForEach {
            variable: "item".to_string(),
            variable_type: Some(TypeNode::named("Widget")),
            is_await: false,
            iterable: ident("children"),
            body: Box::new(Stmt::new(StmtKind::Expression(ident("item")))),
        });
        assert_eq!(roundtrip(for_each.clone()), for_each);

        let do_while = Stmt::new(StmtKind::DoWhile {
            body: Box::new(Stmt::new(StmtKind::Empty)),
            condition: truth(),
        });
        assert_eq!(roundtrip(do_while.clone()), do_while);
    }

    #[test]
    fn test_roundtrip_switch() {
        let stmt = Stmt::new(StmtKind::Switch {
            subject: ident("state"),
            cases: vec![
                SwitchCase {
                    matches: vec![ident("loading"), ident("refreshing")],
                    body: vec![Stmt::new(StmtKind::Break(None))],
                },
                SwitchCase {
                    matches: vec![ident("done")],
                    body: vec![Stmt::new(StmtKind::Return(None))],
                },
            ],
            default: Some(vec![Stmt::new(StmtKind::Throw(ident("err")))]),
        });
        assert_eq!(roundtrip(stmt.clone()), stmt);
    }

    #[test]
    fn test_roundtrip_try_catch_finally() {
        let stmt = Stmt::new(StmtKind::Try {
            body: vec![Stmt::new(StmtKind::Expression(ident("risky")))],
            catches: vec![
                CatchClause {
                    exception_type: Some(TypeNode::named("FormatException")),
                    exception_var: Some("e".to_string()),
                    stack_var: Some("st".to_string()),
                    body: vec![Stmt::new(StmtKind::Return(None))],
                },
                CatchClause {
                    exception_type: None,
                    exception_var: Some("e".to_string()),
                    stack_var: None,
                    body: Vec::new(),
                },
            ],
            finally: Some(vec![Stmt::new(StmtKind::Expression(ident("cleanup")))]),
        });
        assert_eq!(roundtrip(stmt.clone()), stmt);
    }

    #[test]
    fn test_roundtrip_labeled() {
        let stmt = Stmt::new(StmtKind::Labeled {
            label: "outer".to_string(),
            body: Box::new(Stmt::new(StmtKind::While {
                condition: truth(),
                body: Box::new(Stmt::new(StmtKind::Break(Some("outer".to_string())))),
            })),
        });
        assert_eq!(roundtrip(stmt.clone()), stmt);
    }

    #[test]
    fn test_unknown_statement_tag() {
        let stmt = Stmt::new(StmtKind::Empty);
        let (mut bytes, strings) = roundtrip_ctx(|ctx| encode_stmt(ctx, &stmt).unwrap());
        bytes[0] = 0x7F;
        let mut ctx = DecodeContext::new(Reader::new(&bytes), strings);
        assert!(matches!(
            decode_stmt(&mut ctx),
            Err(CodecError::UnknownTag {
                kind: "statement",
                value: 0x7F,
                offset: 0,
            })
        ));
    }
}
