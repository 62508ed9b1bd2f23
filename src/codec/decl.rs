//! Declaration codec
//!
//! Imports, exports, variables/fields, parameters, functions, methods,
//! constructors, classes, and diagnostic issues. Flag booleans are written
//! in struct-field order; that order is part of the format.

use crate::ast::{
    ClassDecl, ConstructorCall, ConstructorDecl, ExportDecl, FieldInitializer, FunctionDecl,
    ImportDecl, Issue, MethodDecl, ParameterDecl, Severity, VariableDecl,
};
use crate::error::{CodecError, CodecResult};

use super::expr::{
    decode_expr, decode_expr_list, decode_named_args, decode_opt_expr, encode_expr,
    encode_expr_list, encode_named_args, encode_opt_expr,
};
use super::stmt::{decode_opt_function_body, encode_opt_function_body};
use super::ty::{decode_opt_type, decode_type, encode_opt_type, encode_type};
use super::{DecodeContext, EncodeContext, MAX_SEQ_LEN};

fn encode_str_list(ctx: &mut EncodeContext, what: &'static str, items: &[String]) -> CodecResult<()> {
    ctx.write_seq_len(what, items.len(), MAX_SEQ_LEN)?;
    for item in items {
        ctx.write_str_ref(item);
    }
    Ok(())
}

fn decode_str_list(ctx: &mut DecodeContext<'_>, what: &'static str) -> CodecResult<Vec<String>> {
    let count = ctx.read_seq_len(what, MAX_SEQ_LEN)?;
    let mut items = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        items.push(ctx.read_str_ref()?);
    }
    Ok(items)
}

// ============================================================================
// Directives
// ============================================================================

pub(crate) fn encode_import(ctx: &mut EncodeContext, decl: &ImportDecl) -> CodecResult<()> {
    ctx.write_str_ref(&decl.uri);
    ctx.write_opt_str_ref(decl.prefix.as_deref());
    ctx.w.write_bool(decl.deferred);
    encode_str_list(ctx, "shown name", &decl.show)?;
    encode_str_list(ctx, "hidden name", &decl.hide)?;
    ctx.write_location(&decl.loc);
    Ok(())
}

pub(crate) fn decode_import(ctx: &mut DecodeContext<'_>) -> CodecResult<ImportDecl> {
    let uri = ctx.read_str_ref()?;
    let prefix = ctx.read_opt_str_ref()?;
    let deferred = ctx.r.read_bool()?;
    let show = decode_str_list(ctx, "shown name")?;
    let hide = decode_str_list(ctx, "hidden name")?;
    let loc = ctx.read_location()?;
    Ok(ImportDecl {
        uri,
        prefix,
        deferred,
        show,
        hide,
        loc,
    })
}

pub(crate) fn encode_export(ctx: &mut EncodeContext, decl: &ExportDecl) -> CodecResult<()> {
    ctx.write_str_ref(&decl.uri);
    encode_str_list(ctx, "shown name", &decl.show)?;
    encode_str_list(ctx, "hidden name", &decl.hide)?;
    ctx.write_location(&decl.loc);
    Ok(())
}

pub(crate) fn decode_export(ctx: &mut DecodeContext<'_>) -> CodecResult<ExportDecl> {
    let uri = ctx.read_str_ref()?;
    let show = decode_str_list(ctx, "shown name")?;
    let hide = decode_str_list(ctx, "hidden name")?;
    let loc = ctx.read_location()?;
    Ok(ExportDecl {
        uri,
        show,
        hide,
        loc,
    })
}

// ============================================================================
// Variables and parameters
// ============================================================================

pub(crate) fn encode_variable_decl(ctx: &mut EncodeContext, decl: &VariableDecl) -> CodecResult<()> {
    ctx.write_str_ref(&decl.name);
    encode_type(ctx, &decl.ty);
    ctx.w.write_bool(decl.is_final);
    ctx.w.write_bool(decl.is_const);
    ctx.w.write_bool(decl.is_static);
    ctx.w.write_bool(decl.is_late);
    ctx.w.write_bool(decl.is_private);
    encode_opt_expr(ctx, decl.initializer.as_ref())?;
    ctx.write_location(&decl.loc);
    Ok(())
}

pub(crate) fn decode_variable_decl(ctx: &mut DecodeContext<'_>) -> CodecResult<VariableDecl> {
    let name = ctx.read_str_ref()?;
    let ty = decode_type(ctx)?;
    let is_final = ctx.r.read_bool()?;
    let is_const = ctx.r.read_bool()?;
    let is_static = ctx.r.read_bool()?;
    let is_late = ctx.r.read_bool()?;
    let is_private = ctx.r.read_bool()?;
    let initializer = decode_opt_expr(ctx)?;
    let loc = ctx.read_location()?;
    Ok(VariableDecl {
        name,
        ty,
        is_final,
        is_const,
        is_static,
        is_late,
        is_private,
        initializer,
        loc,
    })
}

pub(crate) fn encode_param(ctx: &mut EncodeContext, param: &ParameterDecl) -> CodecResult<()> {
    ctx.write_str_ref(&param.name);
    encode_type(ctx, &param.ty);
    ctx.w.write_bool(param.is_required);
    ctx.w.write_bool(param.is_named);
    ctx.w.write_bool(param.is_field_init);
    encode_opt_expr(ctx, param.default_value.as_ref())?;
    ctx.write_location(&param.loc);
    Ok(())
}

pub(crate) fn decode_param(ctx: &mut DecodeContext<'_>) -> CodecResult<ParameterDecl> {
    let name = ctx.read_str_ref()?;
    let ty = decode_type(ctx)?;
    let is_required = ctx.r.read_bool()?;
    let is_named = ctx.r.read_bool()?;
    let is_field_init = ctx.r.read_bool()?;
    let default_value = decode_opt_expr(ctx)?;
    let loc = ctx.read_location()?;
    Ok(ParameterDecl {
        name,
        ty,
        is_required,
        is_named,
        is_field_init,
        default_value,
        loc,
    })
}

fn encode_params(ctx: &mut EncodeContext, params: &[ParameterDecl]) -> CodecResult<()> {
    ctx.write_seq_len("parameter", params.len(), MAX_SEQ_LEN)?;
    for p in params {
        encode_param(ctx, p)?;
    }
    Ok(())
}

fn decode_params(ctx: &mut DecodeContext<'_>) -> CodecResult<Vec<ParameterDecl>> {
    let count = ctx.read_seq_len("parameter", MAX_SEQ_LEN)?;
    let mut params = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        params.push(decode_param(ctx)?);
    }
    Ok(params)
}

// ============================================================================
// Functions, methods, constructors
// ============================================================================

pub(crate) fn encode_function_decl(ctx: &mut EncodeContext, decl: &FunctionDecl) -> CodecResult<()> {
    ctx.write_str_ref(&decl.name);
    encode_type(ctx, &decl.return_type);
    ctx.w.write_bool(decl.is_async);
    encode_params(ctx, &decl.params)?;
    encode_opt_function_body(ctx, decl.body.as_ref())?;
    ctx.write_location(&decl.loc);
    Ok(())
}

pub(crate) fn decode_function_decl(ctx: &mut DecodeContext<'_>) -> CodecResult<FunctionDecl> {
    let name = ctx.read_str_ref()?;
    let return_type = decode_type(ctx)?;
    let is_async = ctx.r.read_bool()?;
    let params = decode_params(ctx)?;
    let body = decode_opt_function_body(ctx)?;
    let loc = ctx.read_location()?;
    Ok(FunctionDecl {
        name,
        return_type,
        is_async,
        params,
        body,
        loc,
    })
}

pub(crate) fn encode_method_decl(ctx: &mut EncodeContext, decl: &MethodDecl) -> CodecResult<()> {
    ctx.write_str_ref(&decl.name);
    encode_type(ctx, &decl.return_type);
    ctx.w.write_bool(decl.is_static);
    ctx.w.write_bool(decl.is_abstract);
    ctx.w.write_bool(decl.is_getter);
    ctx.w.write_bool(decl.is_setter);
    ctx.w.write_bool(decl.is_async);
    encode_params(ctx, &decl.params)?;
    encode_opt_function_body(ctx, decl.body.as_ref())?;
    ctx.write_location(&decl.loc);
    Ok(())
}

pub(crate) fn decode_method_decl(ctx: &mut DecodeContext<'_>) -> CodecResult<MethodDecl> {
    let name = ctx.read_str_ref()?;
    let return_type = decode_type(ctx)?;
    let is_static = ctx.r.read_bool()?;
    let is_abstract = ctx.r.read_bool()?;
    let is_getter = ctx.r.read_bool()?;
    let is_setter = ctx.r.read_bool()?;
    let is_async = ctx.r.read_bool()?;
    let params = decode_params(ctx)?;
    let body = decode_opt_function_body(ctx)?;
    let loc = ctx.read_location()?;
    Ok(MethodDecl {
        name,
        return_type,
        is_static,
        is_abstract,
        is_getter,
        is_setter,
        is_async,
        params,
        body,
        loc,
    })
}

fn encode_ctor_call(ctx: &mut EncodeContext, call: &ConstructorCall) -> CodecResult<()> {
    ctx.write_opt_str_ref(call.name.as_deref());
    encode_expr_list(ctx, &call.args)?;
    encode_named_args(ctx, &call.named_args)?;
    Ok(())
}

fn decode_ctor_call(ctx: &mut DecodeContext<'_>) -> CodecResult<ConstructorCall> {
    let name = ctx.read_opt_str_ref()?;
    let args = decode_expr_list(ctx)?;
    let named_args = decode_named_args(ctx)?;
    Ok(ConstructorCall {
        name,
        args,
        named_args,
    })
}

fn encode_opt_ctor_call(ctx: &mut EncodeContext, call: Option<&ConstructorCall>) -> CodecResult<()> {
    match call {
        Some(call) => {
            ctx.w.write_u8(1);
            encode_ctor_call(ctx, call)?;
        }
        None => ctx.w.write_u8(0),
    }
    Ok(())
}

fn decode_opt_ctor_call(ctx: &mut DecodeContext<'_>) -> CodecResult<Option<ConstructorCall>> {
    if ctx.r.read_bool()? {
        Ok(Some(decode_ctor_call(ctx)?))
    } else {
        Ok(None)
    }
}

pub(crate) fn encode_constructor_decl(
    ctx: &mut EncodeContext,
    decl: &ConstructorDecl,
) -> CodecResult<()> {
    ctx.write_opt_str_ref(decl.name.as_deref());
    ctx.w.write_bool(decl.is_const);
    ctx.w.write_bool(decl.is_factory);
    encode_params(ctx, &decl.params)?;
    ctx.write_seq_len("field initializer", decl.field_initializers.len(), MAX_SEQ_LEN)?;
    for init in &decl.field_initializers {
        ctx.write_str_ref(&init.field);
        encode_expr(ctx, &init.value)?;
    }
    encode_opt_ctor_call(ctx, decl.super_call.as_ref())?;
    encode_opt_ctor_call(ctx, decl.redirect_call.as_ref())?;
    encode_opt_function_body(ctx, decl.body.as_ref())?;
    ctx.write_location(&decl.loc);
    Ok(())
}

pub(crate) fn decode_constructor_decl(ctx: &mut DecodeContext<'_>) -> CodecResult<ConstructorDecl> {
    let name = ctx.read_opt_str_ref()?;
    let is_const = ctx.r.read_bool()?;
    let is_factory = ctx.r.read_bool()?;
    let params = decode_params(ctx)?;
    let init_count = ctx.read_seq_len("field initializer", MAX_SEQ_LEN)?;
    let mut field_initializers = Vec::with_capacity(init_count.min(4096));
    for _ in 0..init_count {
        let field = ctx.read_str_ref()?;
        let value = decode_expr(ctx)?;
        field_initializers.push(FieldInitializer { field, value });
    }
    let super_call = decode_opt_ctor_call(ctx)?;
    let redirect_call = decode_opt_ctor_call(ctx)?;
    let body = decode_opt_function_body(ctx)?;
    let loc = ctx.read_location()?;
    Ok(ConstructorDecl {
        name,
        is_const,
        is_factory,
        params,
        field_initializers,
        super_call,
        redirect_call,
        body,
        loc,
    })
}

// ============================================================================
// Classes and issues
// ============================================================================

pub(crate) fn encode_class_decl(ctx: &mut EncodeContext, decl: &ClassDecl) -> CodecResult<()> {
    ctx.write_str_ref(&decl.name);
    ctx.w.write_bool(decl.is_abstract);
    ctx.w.write_bool(decl.is_final);
    encode_opt_type(ctx, decl.superclass.as_ref());
    ctx.write_seq_len("interface", decl.interfaces.len(), MAX_SEQ_LEN)?;
    for iface in &decl.interfaces {
        encode_type(ctx, iface);
    }
    ctx.write_seq_len("mixin", decl.mixins.len(), MAX_SEQ_LEN)?;
    for mixin in &decl.mixins {
        encode_type(ctx, mixin);
    }
    ctx.write_seq_len("field", decl.fields.len(), MAX_SEQ_LEN)?;
    for field in &decl.fields {
        encode_variable_decl(ctx, field)?;
    }
    ctx.write_seq_len("constructor", decl.constructors.len(), MAX_SEQ_LEN)?;
    for c in &decl.constructors {
        encode_constructor_decl(ctx, c)?;
    }
    ctx.write_seq_len("method", decl.methods.len(), MAX_SEQ_LEN)?;
    for m in &decl.methods {
        encode_method_decl(ctx, m)?;
    }
    ctx.write_location(&decl.loc);
    Ok(())
}

pub(crate) fn decode_class_decl(ctx: &mut DecodeContext<'_>) -> CodecResult<ClassDecl> {
    let name = ctx.read_str_ref()?;
    let is_abstract = ctx.r.read_bool()?;
    let is_final = ctx.r.read_bool()?;
    let superclass = decode_opt_type(ctx)?;

    let iface_count = ctx.read_seq_len("interface", MAX_SEQ_LEN)?;
    let mut interfaces = Vec::with_capacity(iface_count.min(4096));
    for _ in 0..iface_count {
        interfaces.push(decode_type(ctx)?);
    }

    let mixin_count = ctx.read_seq_len("mixin", MAX_SEQ_LEN)?;
    let mut mixins = Vec::with_capacity(mixin_count.min(4096));
    for _ in 0..mixin_count {
        mixins.push(decode_type(ctx)?);
    }

    let field_count = ctx.read_seq_len("field", MAX_SEQ_LEN)?;
    let mut fields = Vec::with_capacity(field_count.min(4096));
    for _ in 0..field_count {
        fields.push(decode_variable_decl(ctx)?);
    }

    let ctor_count = ctx.read_seq_len("constructor", MAX_SEQ_LEN)?;
    let mut constructors = Vec::with_capacity(ctor_count.min(4096));
    for _ in 0..ctor_count {
        constructors.push(decode_constructor_decl(ctx)?);
    }

    let method_count = ctx.read_seq_len("method", MAX_SEQ_LEN)?;
    let mut methods = Vec::with_capacity(method_count.min(4096));
    for _ in 0..method_count {
        methods.push(decode_method_decl(ctx)?);
    }

    let loc = ctx.read_location()?;
    Ok(ClassDecl {
        name,
        is_abstract,
        is_final,
        superclass,
        interfaces,
        mixins,
        fields,
        constructors,
        methods,
        loc,
    })
}

pub(crate) fn encode_issue(ctx: &mut EncodeContext, issue: &Issue) -> CodecResult<()> {
    ctx.w.write_u8(issue.severity as u8);
    ctx.write_str_ref(&issue.code);
    ctx.write_str_ref(&issue.message);
    ctx.write_location(&issue.loc);
    Ok(())
}

pub(crate) fn decode_issue(ctx: &mut DecodeContext<'_>) -> CodecResult<Issue> {
    let tag_offset = ctx.r.offset();
    let raw = ctx.r.read_u8()?;
    let severity = Severity::from_u8(raw)
        .ok_or_else(|| CodecError::unknown_tag("severity", raw, tag_offset))?;
    let code = ctx.read_str_ref()?;
    let message = ctx.read_str_ref()?;
    let loc = ctx.read_location()?;
    Ok(Issue {
        severity,
        code,
        message,
        loc,
    })
}

#[cfg(test)]
mod tests {
    use super::super::cursor::Reader;
    use super::super::tests::roundtrip_ctx;
    use super::*;
    use crate::ast::{Expr, ExprKind, FunctionBody, Literal, SourceLocation, Stmt, StmtKind, TypeNode};

    fn ident(name: &str) -> Expr {
        Expr::new(ExprKind::Identifier(name.to_string()), TypeNode::Dynamic)
    }

    #[test]
    fn test_roundtrip_import() {
        let decl = ImportDecl {
            uri: "package:flick/widgets.fl".to_string(),
            prefix: Some("w".to_string()),
            deferred: true,
            show: vec!["Text".to_string(), "Column".to_string()],
            hide: vec!["Legacy".to_string()],
            loc: SourceLocation::new("lib/main.fl", 1, 1, 0, 40),
        };
        let (bytes, strings) = roundtrip_ctx(|ctx| encode_import(ctx, &decl).unwrap());
        let mut ctx = DecodeContext::new(Reader::new(&bytes), strings);
        assert_eq!(decode_import(&mut ctx).unwrap(), decl);
    }

    #[test]
    fn test_roundtrip_export() {
        let decl = ExportDecl {
            uri: "src/theme.fl".to_string(),
            show: Vec::new(),
            hide: vec!["_private".to_string()],
            loc: SourceLocation::SYNTHETIC,
        };
        let (bytes, strings) = roundtrip_ctx(|ctx| encode_export(ctx, &decl).unwrap());
        let mut ctx = DecodeContext::new(Reader::new(&bytes), strings);
        assert_eq!(decode_export(&mut ctx).unwrap(), decl);
    }

    #[test]
    fn test_roundtrip_variable_flags() {
        let decl = VariableDecl {
            name: "_cache".to_string(),
            ty: TypeNode::nullable("Map"),
            is_final: false,
            is_const: false,
            is_static: true,
            is_late: true,
            is_private: true,
            initializer: None,
            loc: SourceLocation::SYNTHETIC,
        };
        let (bytes, strings) = roundtrip_ctx(|ctx| encode_variable_decl(ctx, &decl).unwrap());
        let mut ctx = DecodeContext::new(Reader::new(&bytes), strings);
        assert_eq!(decode_variable_decl(&mut ctx).unwrap(), decl);
    }

    #[test]
    fn test_roundtrip_method_getter() {
        let decl = MethodDecl {
            name: "title".to_string(),
            return_type: TypeNode::named("String"),
            is_getter: true,
            body: Some(FunctionBody::Expression(Box::new(ident("_title")))),
            ..MethodDecl::default()
        };
        let (bytes, strings) = roundtrip_ctx(|ctx| encode_method_decl(ctx, &decl).unwrap());
        let mut ctx = DecodeContext::new(Reader::new(&bytes), strings);
        assert_eq!(decode_method_decl(&mut ctx).unwrap(), decl);
    }

    #[test]
    fn test_roundtrip_constructor_full() {
        let decl = ConstructorDecl {
            name: Some("fromJson".to_string()),
            is_const: false,
            is_factory: true,
            params: vec![ParameterDecl::positional("json", TypeNode::named("Map"))],
            field_initializers: vec![FieldInitializer {
                field: "count".to_string(),
                value: Expr::new(ExprKind::Literal(Literal::Int(0)), TypeNode::named("int")),
            }],
            super_call: Some(ConstructorCall {
                name: None,
                args: vec![ident("key")],
                named_args: Vec::new(),
            }),
            redirect_call: None,
            body: Some(FunctionBody::Block(vec![Stmt::new(StmtKind::Return(None))])),
            loc: SourceLocation::SYNTHETIC,
        };
        let (bytes, strings) = roundtrip_ctx(|ctx| encode_constructor_decl(ctx, &decl).unwrap());
        let mut ctx = DecodeContext::new(Reader::new(&bytes), strings);
        assert_eq!(decode_constructor_decl(&mut ctx).unwrap(), decl);
    }

    #[test]
    fn test_roundtrip_class_with_members() {
        let decl = ClassDecl {
            name: "_CounterState".to_string(),
            is_abstract: false,
            is_final: true,
            superclass: Some(TypeNode::named("State")),
            interfaces: vec![TypeNode::named("TickerProvider")],
            mixins: vec![TypeNode::named("DiagnosticableTreeMixin")],
            fields: vec![VariableDecl::new("count", TypeNode::named("int"))],
            constructors: vec![ConstructorDecl::default()],
            methods: vec![MethodDecl {
                name: "build".to_string(),
                return_type: TypeNode::named("Widget"),
                ..MethodDecl::default()
            }],
            loc: SourceLocation::new("lib/counter.fl", 12, 1, 200, 600),
        };
        let (bytes, strings) = roundtrip_ctx(|ctx| encode_class_decl(ctx, &decl).unwrap());
        let mut ctx = DecodeContext::new(Reader::new(&bytes), strings);
        assert_eq!(decode_class_decl(&mut ctx).unwrap(), decl);
    }

    #[test]
    fn test_roundtrip_issue() {
        let issue = Issue {
            severity: Severity::Warning,
            code: "unused_field".to_string(),
            message: "the field '_old' is never read".to_string(),
            loc: SourceLocation::new("lib/a.fl", 30, 7, 512, 4),
        };
        let (bytes, strings) = roundtrip_ctx(|ctx| encode_issue(ctx, &issue).unwrap());
        let mut ctx = DecodeContext::new(Reader::new(&bytes), strings);
        assert_eq!(decode_issue(&mut ctx).unwrap(), issue);
    }

    #[test]
    fn test_invalid_severity() {
        let issue = Issue {
            severity: Severity::Info,
            code: "x".to_string(),
            message: "y".to_string(),
            loc: SourceLocation::SYNTHETIC,
        };
        let (mut bytes, strings) = roundtrip_ctx(|ctx| encode_issue(ctx, &issue).unwrap());
        bytes[0] = 9;
        let mut ctx = DecodeContext::new(Reader::new(&bytes), strings);
        assert!(matches!(
            decode_issue(&mut ctx),
            Err(CodecError::UnknownTag {
                kind: "severity",
                value: 9,
                ..
            })
        ));
    }
}
