//! End-to-end container tests over the public API.

use crate::ast::*;
use crate::codec::cursor::Reader;
use crate::codec::strings::StringTable;
use crate::codec::HEADER_LEN;
use crate::registry::{LifecycleKind, RelationshipRegistry};
use crate::{decode, decode_file, encode, encode_file, encode_with_options, CodecError, EncodeOptions};

fn int_lit(v: i64) -> Expr {
    Expr::new(ExprKind::Literal(Literal::Int(v)), TypeNode::named("int"))
}

fn ident(name: &str, ty: &str) -> Expr {
    Expr::new(ExprKind::Identifier(name.to_string()), TypeNode::named(ty))
}

/// `class A { int x; A(this.x); int y() => x + 1; }`
fn counter_class() -> ClassDecl {
    let mut class = ClassDecl::new("A");
    class
        .fields
        .push(VariableDecl::new("x", TypeNode::named("int")));
    class.constructors.push(ConstructorDecl {
        params: vec![ParameterDecl {
            name: "x".to_string(),
            ty: TypeNode::named("int"),
            is_required: true,
            is_field_init: true,
            ..ParameterDecl::default()
        }],
        ..ConstructorDecl::default()
    });
    class.methods.push(MethodDecl {
        name: "y".to_string(),
        return_type: TypeNode::named("int"),
        // `=> x + 1` lowers to a single return statement
        body: Some(FunctionBody::Block(vec![Stmt::new(StmtKind::Return(
            Some(Expr::new(
                ExprKind::Binary {
                    op: BinaryOp::Add,
                    left: Box::new(ident("x", "int")),
                    right: Box::new(int_lit(1)),
                },
                TypeNode::named("int"),
            )),
        ))])),
        ..MethodDecl::default()
    });
    class
}

fn rich_unit() -> SourceUnit {
    let mut unit = SourceUnit::new("lib/counter.fl");
    unit.content_hash = "9be4a1c07d".to_string();
    unit.library_name = "counter".to_string();
    unit.analyzed_at = 1_756_512_000;

    unit.imports.push(ImportDecl {
        uri: "flick:widgets".to_string(),
        prefix: Some("w".to_string()),
        show: vec!["Text".to_string(), "Column".to_string()],
        ..ImportDecl::default()
    });
    unit.exports.push(ExportDecl {
        uri: "src/model.fl".to_string(),
        hide: vec!["Internal".to_string()],
        ..ExportDecl::default()
    });
    unit.variables.push(VariableDecl {
        name: "kMaxCount".to_string(),
        ty: TypeNode::named("int"),
        is_const: true,
        initializer: Some(int_lit(99)),
        ..VariableDecl::default()
    });
    unit.functions.push(FunctionDecl {
        name: "main".to_string(),
        return_type: TypeNode::Void,
        body: Some(FunctionBody::Block(vec![Stmt::new(StmtKind::Expression(
            Expr::new(
                ExprKind::FunctionCall {
                    name: "runApp".to_string(),
                    args: vec![Expr::new(
                        ExprKind::InstanceCreation {
                            ty: TypeNode::named("A"),
                            constructor: None,
                            is_const: false,
                            args: vec![int_lit(0)],
                            named_args: Vec::new(),
                        },
                        TypeNode::named("A"),
                    )],
                    named_args: Vec::new(),
                },
                TypeNode::Void,
            ),
        ))])),
        ..FunctionDecl::default()
    });
    unit.classes.push(counter_class());
    unit.issues.push(Issue {
        severity: Severity::Warning,
        code: "unused_import".to_string(),
        message: "import of 'flick:widgets' is unused".to_string(),
        loc: SourceLocation {
            file: "lib/counter.fl".to_string(),
            line: 1,
            column: 1,
            offset: 0,
            length: 22,
        },
    });
    unit
}

fn rich_registry() -> RelationshipRegistry {
    let mut reg = RelationshipRegistry::new();
    reg.bind_widget_state("Counter", "_CounterState");
    reg.add_lifecycle_method("_CounterState", LifecycleKind::InitState, "initState");
    reg.add_lifecycle_method("_CounterState", LifecycleKind::Dispose, "dispose");
    reg.add_build_method("_CounterState", "_CounterState.build");
    reg.add_call("_CounterState.build", "Text");
    reg.add_call("A.y", "x");
    reg.add_field_access("A.y", "x");
    reg.add_superclass("Counter", "StatefulWidget");
    reg.add_interface_impl("Comparable", "A");
    reg.add_build_output("Counter", "flick-counter");
    reg
}

#[test]
fn test_rich_roundtrip() {
    let unit = rich_unit();
    let reg = rich_registry();
    let bytes = encode(&unit, &reg).unwrap();
    let (decoded_unit, decoded_reg) = decode(&bytes).unwrap();
    assert_eq!(decoded_unit, unit);
    assert_eq!(decoded_reg, reg);
}

#[test]
fn test_reencode_is_byte_identical() {
    let bytes = encode(&rich_unit(), &rich_registry()).unwrap();
    let (unit, reg) = decode(&bytes).unwrap();
    let again = encode(&unit, &reg).unwrap();
    assert_eq!(again, bytes);
}

#[test]
fn test_counter_scenario_shape() {
    let mut unit = SourceUnit::new("lib/a.fl");
    unit.classes.push(counter_class());
    let bytes = encode(&unit, &RelationshipRegistry::new()).unwrap();
    let (decoded, _) = decode(&bytes).unwrap();

    assert_eq!(decoded.classes.len(), 1);
    let class = decoded.class("A").unwrap();
    assert_eq!(class.fields.len(), 1);
    assert_eq!(class.fields[0].name, "x");
    assert_eq!(class.constructors.len(), 1);
    assert!(class.constructors[0].params[0].is_field_init);
    assert_eq!(class.methods.len(), 1);

    let method = class.method("y").unwrap();
    let body = match method.body.as_ref().unwrap() {
        FunctionBody::Block(stmts) => stmts,
        other => panic!("expected block body, got {other:?}"),
    };
    assert_eq!(body.len(), 1);
    match &body[0].kind {
        StmtKind::Return(Some(expr)) => match &expr.kind {
            ExprKind::Binary { op, left, right } => {
                assert_eq!(*op, BinaryOp::Add);
                assert_eq!(left.kind, ExprKind::Identifier("x".to_string()));
                assert_eq!(right.kind, ExprKind::Literal(Literal::Int(1)));
            }
            other => panic!("expected binary add, got {other:?}"),
        },
        other => panic!("expected return statement, got {other:?}"),
    }
}

#[test]
fn test_truncation_never_panics() {
    let bytes = encode_with_options(
        &rich_unit(),
        &rich_registry(),
        &EncodeOptions { checksum: false },
    )
    .unwrap();
    for n in 0..bytes.len() {
        assert!(decode(&bytes[..n]).is_err(), "prefix of {n} bytes decoded");
    }
    assert!(decode(&bytes).is_ok());
}

#[test]
fn test_corrupt_string_ref() {
    let unit = SourceUnit::new("lib/a.fl");
    let mut bytes = encode_with_options(
        &unit,
        &RelationshipRegistry::new(),
        &EncodeOptions { checksum: false },
    )
    .unwrap();

    // Walk past header and string table to the tree section's first string
    // ref (the registry section of an empty registry is just its flag word).
    let mut r = Reader::new(&bytes);
    r.read_u32().unwrap();
    r.read_u16().unwrap();
    r.read_u16().unwrap();
    StringTable::read(&mut r).unwrap();
    let ref_offset = r.offset() + 2;

    bytes[ref_offset..ref_offset + 4].copy_from_slice(&u32::MAX.to_le_bytes());
    assert!(matches!(
        decode(&bytes),
        Err(CodecError::InvalidStringRef {
            index: u32::MAX,
            ..
        })
    ));
}

#[test]
fn test_checksum_on_by_default() {
    let bytes = encode(&rich_unit(), &RelationshipRegistry::new()).unwrap();
    assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]) & 1, 1);
    assert!(bytes.len() > HEADER_LEN + 32);
}

#[test]
fn test_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counter.flick");
    let unit = rich_unit();
    let reg = rich_registry();

    encode_file(&path, &unit, &reg).unwrap();
    let (decoded_unit, decoded_reg) = decode_file(&path).unwrap();
    assert_eq!(decoded_unit, unit);
    assert_eq!(decoded_reg, reg);
}

#[test]
fn test_decode_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.flick");
    assert!(matches!(
        decode_file(&missing),
        Err(CodecError::Io(_))
    ));
}
