//! Control flow tests

use super::harness::*;
use javelin_compiler::ast::{ClassDecl, Expression, FunctionDecl, Item, Parameter, Program, Statement};

// ============================================================================
// Conditionals
// ============================================================================

/// `class Helper { int abs(int n) { if (n < 0) return -n; else return n; } }`
fn helper() -> Program {
    let abs = FunctionDecl::new(
        "int",
        "abs",
        vec![Parameter::new("int", "n")],
        vec![Statement::if_else(
            test("<", local("n"), Expression::int(0)),
            ret(Expression::unary("-", local("n"), "int")),
            Some(ret(local("n"))),
        )],
    );
    Program::new(vec![Item::Class(ClassDecl::new("Helper", vec![], vec![abs]))])
}

#[test]
fn test_if_else() {
    let classes = compile(&helper()).unwrap();
    let mut machine = Machine::new(&classes);
    let h = machine.construct("Helper").unwrap();
    for (arg, expected) in [(-10, 10), (5, 5), (0, 0)] {
        let result = machine.call_virtual(&h, "abs", vec![Value::Int(arg)]).unwrap();
        assert_eq!(result.unwrap().as_int().unwrap(), expected, "abs({})", arg);
    }

    // instance method: `this` in slot 0, `n` in slot 1
    assert!(!classes[0].method("abs").unwrap().is_static());
}

#[test]
fn test_if_without_else_falls_through() {
    // int r = 1; if (x > 3) r = 2; return r;
    let program = single(
        "f",
        &["x"],
        vec![
            Statement::var("int", "r", Some(Expression::int(1))),
            Statement::if_else(
                test(">", local("x"), Expression::int(3)),
                set("r", Expression::int(2)),
                None,
            ),
            ret(local("r")),
        ],
    );
    expect_i32(&program, "f", vec![4], 2);
    expect_i32(&program, "f", vec![3], 1);
}

#[test]
fn test_else_if_chain() {
    // sign(x)
    let program = single(
        "sign",
        &["x"],
        vec![Statement::if_else(
            test("<", local("x"), Expression::int(0)),
            ret(Expression::int(-1)),
            Some(Statement::if_else(
                test("==", local("x"), Expression::int(0)),
                ret(Expression::int(0)),
                Some(ret(Expression::int(1))),
            )),
        )],
    );
    expect_i32(&program, "sign", vec![-9], -1);
    expect_i32(&program, "sign", vec![0], 0);
    expect_i32(&program, "sign", vec![9], 1);
}

// ============================================================================
// Loops
// ============================================================================

#[test]
fn test_while_loop() {
    // int i = 0; while (i < 10) i = i + 1; return i;
    let program = single(
        "count",
        &[],
        vec![
            Statement::var("int", "i", Some(Expression::int(0))),
            Statement::while_loop(
                test("<", local("i"), Expression::int(10)),
                set("i", arith("+", local("i"), Expression::int(1))),
            ),
            ret(local("i")),
        ],
    );
    expect_i32(&program, "count", vec![], 10);
}

#[test]
fn test_while_loop_never_entered() {
    let program = single(
        "f",
        &["n"],
        vec![
            Statement::while_loop(
                test(">", local("n"), Expression::int(100)),
                set("n", Expression::int(0)),
            ),
            ret(local("n")),
        ],
    );
    expect_i32(&program, "f", vec![7], 7);
}

#[test]
fn test_for_loop_sum() {
    // int sum = 0; for (int i = 1; i <= n; i++) sum = sum + i; return sum;
    let program = single(
        "sum",
        &["n"],
        vec![
            Statement::var("int", "sum", Some(Expression::int(0))),
            Statement::for_loop(
                Some(Statement::var("int", "i", Some(Expression::int(1)))),
                Some(test("<=", local("i"), local("n"))),
                Some(Expression::unary("++", local("i"), "int")),
                set("sum", arith("+", local("sum"), local("i"))),
            ),
            ret(local("sum")),
        ],
    );
    expect_i32(&program, "sum", vec![10], 55);
    expect_i32(&program, "sum", vec![0], 0);
}

#[test]
fn test_for_loop_without_init_or_update() {
    // for (; n > 0;) { acc = acc * 2; n = n - 1; }
    let program = single(
        "pow2",
        &["n"],
        vec![
            Statement::var("int", "acc", Some(Expression::int(1))),
            Statement::for_loop(
                None,
                Some(test(">", local("n"), Expression::int(0))),
                None,
                Statement::block(vec![
                    set("acc", arith("*", local("acc"), Expression::int(2))),
                    set("n", arith("-", local("n"), Expression::int(1))),
                ]),
            ),
            ret(local("acc")),
        ],
    );
    expect_i32(&program, "pow2", vec![10], 1024);
}

#[test]
fn test_nested_loops() {
    // count pairs i < j below n
    let inner = Statement::for_loop(
        Some(Statement::var(
            "int",
            "j",
            Some(arith("+", local("i"), Expression::int(1))),
        )),
        Some(test("<", local("j"), local("n"))),
        Some(Expression::unary("++", local("j"), "int")),
        Statement::expr(Expression::unary("++", local("pairs"), "int")),
    );
    let program = single(
        "pairs",
        &["n"],
        vec![
            Statement::var("int", "pairs", None),
            Statement::for_loop(
                Some(Statement::var("int", "i", Some(Expression::int(0)))),
                Some(test("<", local("i"), local("n"))),
                Some(Expression::unary("++", local("i"), "int")),
                inner,
            ),
            ret(local("pairs")),
        ],
    );
    expect_i32(&program, "pairs", vec![5], 10);
}

#[test]
fn test_return_from_inside_loop() {
    // first multiple of 7 at or above n
    let program = single(
        "next7",
        &["n"],
        vec![
            Statement::while_loop(
                Expression::boolean(true),
                Statement::block(vec![
                    Statement::if_else(
                        test(
                            "==",
                            arith("%", local("n"), Expression::int(7)),
                            Expression::int(0),
                        ),
                        ret(local("n")),
                        None,
                    ),
                    Statement::expr(Expression::unary("++", local("n"), "int")),
                ]),
            ),
            ret(Expression::int(-1)),
        ],
    );
    expect_i32(&program, "next7", vec![15], 21);
    expect_i32(&program, "next7", vec![14], 14);
}

#[test]
fn test_missing_return_yields_default() {
    // falls off the end of an int function
    let program = single(
        "f",
        &["x"],
        vec![Statement::if_else(
            test(">", local("x"), Expression::int(0)),
            ret(Expression::int(9)),
            None,
        )],
    );
    expect_i32(&program, "f", vec![1], 9);
    expect_i32(&program, "f", vec![-1], 0);
}
