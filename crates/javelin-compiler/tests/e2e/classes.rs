//! Class tests
//!
//! Fields, constructors, instance methods and object references.

use super::harness::*;
use javelin_compiler::ast::{
    ClassDecl, Expression, FieldDecl, FunctionDecl, Item, Parameter, Program, Statement,
};

fn this_field(class: &str, field: &str, ty: &str) -> Expression {
    Expression::member(Expression::this(class), field, ty)
}

/// `class Point { int x; int y; void set(int a, int b) { ... } }`
fn point_class() -> Item {
    let set = FunctionDecl::new(
        "void",
        "set",
        vec![Parameter::new("int", "a"), Parameter::new("int", "b")],
        vec![
            Statement::expr(Expression::assign(this_field("Point", "x", "int"), local("a"))),
            Statement::expr(Expression::assign(this_field("Point", "y", "int"), local("b"))),
        ],
    );
    Item::Class(ClassDecl::new(
        "Point",
        vec![FieldDecl::new("int", "x"), FieldDecl::new("int", "y")],
        vec![set],
    ))
}

fn point_main() -> Item {
    Item::Function(FunctionDecl::new(
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
    ))
}

#[test]
fn test_point_set_through_harness() {
    let classes = compile(&Program::new(vec![point_class(), point_main()])).unwrap();
    let mut machine = Machine::new(&classes);

    let p = machine.construct("Point").unwrap();
    assert_eq!(int_field(&p, "x"), 0);
    machine
        .call_virtual(&p, "set", vec![Value::Int(10), Value::Int(20)])
        .unwrap();
    assert_eq!(int_field(&p, "x"), 10);
    assert_eq!(int_field(&p, "y"), 20);

    // main allocates and calls set without error
    let result = machine.call_static("Main", "main", vec![Value::Null]).unwrap();
    assert!(result.is_none());
}

#[test]
fn test_fields_read_back_in_compiled_code() {
    // Point p = new Point(); p.set(10, 20); return p.x + p.y;
    let sum = int_function(
        "sum",
        &[],
        vec![
            Statement::var("Point", "p", Some(Expression::new_object("Point", vec![]))),
            Statement::expr(Expression::call(
                Some(Expression::ident("p", "Point")),
                "set",
                vec![Expression::int(10), Expression::int(20)],
                "void",
            )),
            ret(arith(
                "+",
                Expression::member(Expression::ident("p", "Point"), "x", "int"),
                Expression::member(Expression::ident("p", "Point"), "y", "int"),
            )),
        ],
    );
    expect_i32(&Program::new(vec![point_class(), sum]), "sum", vec![], 30);
}

/// `class Counter { int count; Counter(int start) {...} int next() {...} int twice() {...} }`
fn counter_class() -> Item {
    let ctor = FunctionDecl::new(
        "void",
        "Counter",
        vec![Parameter::new("int", "start")],
        vec![Statement::expr(Expression::assign(
            this_field("Counter", "count", "int"),
            local("start"),
        ))],
    );
    let next = FunctionDecl::new(
        "int",
        "next",
        vec![],
        vec![ret(Expression::unary(
            "++",
            this_field("Counter", "count", "int"),
            "int",
        ))],
    );
    // unqualified call resolves to this.next()
    let twice = FunctionDecl::new(
        "int",
        "twice",
        vec![],
        vec![ret(arith(
            "+",
            Expression::call(None, "next", vec![], "int"),
            Expression::call(None, "next", vec![], "int"),
        ))],
    );
    Item::Class(ClassDecl::new(
        "Counter",
        vec![FieldDecl::new("int", "count")],
        vec![ctor, next, twice],
    ))
}

#[test]
fn test_explicit_constructor_and_postfix_field() {
    // Counter c = new Counter(5); c.next(); return c.twice() * 100 + c.count;
    let run = int_function(
        "run",
        &[],
        vec![
            Statement::var(
                "Counter",
                "c",
                Some(Expression::new_object("Counter", vec![Expression::int(5)])),
            ),
            Statement::expr(Expression::call(
                Some(Expression::ident("c", "Counter")),
                "next",
                vec![],
                "int",
            )),
            ret(arith(
                "+",
                arith(
                    "*",
                    Expression::call(Some(Expression::ident("c", "Counter")), "twice", vec![], "int"),
                    Expression::int(100),
                ),
                Expression::member(Expression::ident("c", "Counter"), "count", "int"),
            )),
        ],
    );
    // next() -> 5, then twice() -> 6 + 7 = 13, count ends at 8
    expect_i32(&Program::new(vec![counter_class(), run]), "run", vec![], 1308);
}

#[test]
fn test_constructor_is_not_duplicated() {
    let classes = compile(&Program::new(vec![counter_class()])).unwrap();
    let ctors: Vec<_> = classes[0].methods.iter().filter(|m| m.is_constructor()).collect();
    assert_eq!(ctors.len(), 1);
    assert_eq!(ctors[0].descriptor.to_string(), "(I)V");
}

#[test]
fn test_default_constructor_for_class_without_one() {
    let bare = Item::Class(ClassDecl::new("Bare", vec![FieldDecl::new("int", "x")], vec![]));
    let classes = compile(&Program::new(vec![bare])).unwrap();
    assert_eq!(classes.len(), 1);
    let ctor = classes[0].method("<init>").unwrap();
    assert_eq!(ctor.descriptor.to_string(), "()V");
    assert!(!ctor.is_static());

    let mut machine = Machine::new(&classes);
    let object = machine.construct("Bare").unwrap();
    assert_eq!(int_field(&object, "x"), 0);
}

#[test]
fn test_object_references_and_null() {
    // class Node { int value; Node next; }
    let node = Item::Class(ClassDecl::new(
        "Node",
        vec![FieldDecl::new("int", "value"), FieldDecl::new("Node", "next")],
        vec![],
    ));
    let node_ref = |name: &str| Expression::ident(name, "Node");
    // a.next = b; b.value = 3; return a.next.value + (b.next == null);
    let body = vec![
        Statement::var("Node", "a", Some(Expression::new_object("Node", vec![]))),
        Statement::var("Node", "b", Some(Expression::new_object("Node", vec![]))),
        Statement::expr(Expression::assign(
            Expression::member(node_ref("a"), "next", "Node"),
            node_ref("b"),
        )),
        Statement::expr(Expression::assign(
            Expression::member(node_ref("b"), "value", "int"),
            Expression::int(3),
        )),
        Statement::if_else(
            test("==", Expression::member(node_ref("b"), "next", "Node"), Expression::null()),
            ret(arith(
                "+",
                Expression::member(Expression::member(node_ref("a"), "next", "Node"), "value", "int"),
                Expression::int(100),
            )),
            None,
        ),
        ret(Expression::int(-1)),
    ];
    let program = Program::new(vec![node, int_function("walk", &[], body)]);
    expect_i32(&program, "walk", vec![], 103);
}

#[test]
fn test_method_returning_object() {
    // class Box { int v; Box copy() { Box b = new Box(); b.v = this.v; return b; } }
    let copy = FunctionDecl::new(
        "Box",
        "copy",
        vec![],
        vec![
            Statement::var("Box", "b", Some(Expression::new_object("Box", vec![]))),
            Statement::expr(Expression::assign(
                Expression::member(Expression::ident("b", "Box"), "v", "int"),
                this_field("Box", "v", "int"),
            )),
            Statement::ret(Some(Expression::ident("b", "Box"))),
        ],
    );
    let class = Item::Class(ClassDecl::new("Box", vec![FieldDecl::new("int", "v")], vec![copy]));
    let run = int_function(
        "run",
        &[],
        vec![
            Statement::var("Box", "a", Some(Expression::new_object("Box", vec![]))),
            Statement::expr(Expression::assign(
                Expression::member(Expression::ident("a", "Box"), "v", "int"),
                Expression::int(42),
            )),
            Statement::var(
                "Box",
                "c",
                Some(Expression::call(Some(Expression::ident("a", "Box")), "copy", vec![], "Box")),
            ),
            ret(Expression::member(Expression::ident("c", "Box"), "v", "int")),
        ],
    );
    expect_i32(&Program::new(vec![class, run]), "run", vec![], 42);
}
