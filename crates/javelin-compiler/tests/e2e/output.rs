//! Output shape tests
//!
//! Class layout, Jasmin listings, verification, options and diagnostics.

use super::harness::*;
use javelin_bytecode::verify_class;
use javelin_compiler::ast::{
    ClassDecl, Expression, FieldDecl, FunctionDecl, Item, Parameter, Program, Statement,
};
use javelin_compiler::{Compiler, CompilerOptions, PrettyPrint};

fn point_program() -> Program {
    let set = FunctionDecl::new(
        "void",
        "set",
        vec![Parameter::new("int", "a"), Parameter::new("int", "b")],
        vec![
            Statement::expr(Expression::assign(
                Expression::member(Expression::this("Point"), "x", "int"),
                local("a"),
            )),
            Statement::expr(Expression::assign(
                Expression::member(Expression::this("Point"), "y", "int"),
                local("b"),
            )),
        ],
    );
    let main = FunctionDecl::new(
        "void",
        "main",
        vec![],
        vec![
            Statement::var("Point", "p", Some(Expression::new_object("Point", vec![]))),
            Statement::expr(Expression::call(
                Some(Expression::ident("p", "Point")),
                "set",
                vec![Expression::int(10), Expression::int(20)],
                "void",
            )),
        ],
    );
    Program::new(vec![
        Item::Class(ClassDecl::new(
            "Point",
            vec![FieldDecl::new("int", "x"), FieldDecl::new("int", "y")],
            vec![set],
        )),
        Item::Function(main),
    ])
}

#[test]
fn test_jasmin_listing() {
    let text = render(&compile(&point_program()).unwrap());

    assert!(text.contains(".class public Point"));
    assert!(text.contains(".super java/lang/Object"));
    assert!(text.contains(".field public x I"));
    assert!(text.contains(".method public <init>()V"));
    assert!(text.contains(".method public set(II)V"));
    assert!(text.contains("putfield Point/x I"));
    assert!(text.contains(".class public Main"));
    assert!(text.contains(".method public static main([Ljava/lang/String;)V"));
    assert!(text.contains("new Point"));
    assert!(text.contains("invokespecial Point/<init>()V"));
    assert!(text.contains("invokevirtual Point/set(II)V"));
}

#[test]
fn test_every_class_verifies() {
    let options = CompilerOptions::default().with_verify(false);
    for class in compile_with(&point_program(), options).unwrap() {
        verify_class(&class).unwrap();
        for method in &class.methods {
            assert!(method.max_locals >= method.descriptor.params.len() as u16);
        }
    }
}

#[test]
fn test_output_is_deterministic() {
    let first = render(&compile(&point_program()).unwrap());
    let second = render(&compile(&point_program()).unwrap());
    assert_eq!(first, second);
}

#[test]
fn test_tac_listing() {
    let compiler = Compiler::default();
    let listing = compiler.lower(&point_program()).unwrap().pretty_print();

    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines[0], "FIELD_DECL Point x I");
    assert_eq!(lines[1], "FIELD_DECL Point y I");
    assert!(lines[2].starts_with("FUNC_ENTRY Point.set 2 (II)V"));
    assert!(listing.contains("PARAM_DECL this LPoint;"));
    assert!(listing.contains("FUNC_ENTRY main 0 ()V"));
    assert!(listing.contains("NEW_ALLOC Point"));
    assert!(listing.trim_end().ends_with("FUNC_EXIT main"));
}

#[test]
fn test_options_from_json() {
    let options = CompilerOptions::from_json(r#"{ "main_class": "Program" }"#).unwrap();
    let classes = compile_with(&point_program(), options).unwrap();
    let names: Vec<&str> = classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Point", "Program"]);

    assert!(CompilerOptions::from_json("{ not json").is_err());
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn test_string_concatenation_rejected() {
    let f = FunctionDecl::new(
        "String",
        "greet",
        vec![Parameter::new("String", "name")],
        vec![Statement::ret(Some(Expression::binary(
            "+",
            Expression::string("hi "),
            Expression::ident("name", "String"),
            "String",
        )))],
    );
    expect_compile_error(&Program::new(vec![Item::Function(f)]), "string concatenation");
}

#[test]
fn test_field_initializer_rejected() {
    let mut field = FieldDecl::new("int", "x");
    field.initializer = Some(Expression::int(1));
    let class = ClassDecl::new("C", vec![field], vec![]);
    expect_compile_error(&Program::new(vec![Item::Class(class)]), "initializer on field C.x");
}

#[test]
fn test_unknown_type_names_method() {
    let f = FunctionDecl::new("float", "half", vec![], vec![]);
    expect_compile_error(&Program::new(vec![Item::Function(f)]), "In Main.half: Unsupported type: float");
}

#[test]
fn test_missing_static_type() {
    let mut literal = Expression::int(1);
    if let Expression::IntLiteral(lit) = &mut literal {
        lit.ty = None;
    }
    let f = FunctionDecl::new("int", "one", vec![], vec![ret(literal)]);
    expect_compile_error(&Program::new(vec![Item::Function(f)]), "Missing static type");
}

#[test]
fn test_local_slot_limit_reported() {
    // every `int v_i = 1;` needs a slot for the temp and one for v_i
    let mut body: Vec<Statement> = (0..33_000)
        .map(|i| Statement::var("int", format!("v{}", i), Some(Expression::int(1))))
        .collect();
    body.push(ret(Expression::int(0)));
    expect_compile_error(
        &single("f", &[], body),
        "In Main.f: Method needs more than 65535 local variable slots",
    );
}

#[test]
fn test_entry_point_parameters_rejected() {
    let main = FunctionDecl::new("void", "main", vec![Parameter::new("int", "n")], vec![]);
    expect_compile_error(
        &Program::new(vec![Item::Function(main)]),
        "In Main.main: Unsupported feature: entry point `main` with signature (I)V",
    );
}
