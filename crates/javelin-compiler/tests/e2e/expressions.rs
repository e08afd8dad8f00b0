//! Expression evaluation tests

use super::harness::*;
use javelin_compiler::ast::{Expression, FunctionDecl, Item, Parameter, Program, Statement};

// ============================================================================
// Arithmetic
// ============================================================================

#[test]
fn test_precedence_is_encoded_by_the_tree() {
    // 3 + 4 * 2
    let program = single(
        "compute",
        &[],
        vec![ret(arith(
            "+",
            Expression::int(3),
            arith("*", Expression::int(4), Expression::int(2)),
        ))],
    );
    expect_i32(&program, "compute", vec![], 11);
}

#[test]
fn test_arithmetic_on_parameters() {
    // (a - b) / 2 % 7
    let program = single(
        "f",
        &["a", "b"],
        vec![ret(arith(
            "%",
            arith("/", arith("-", local("a"), local("b")), Expression::int(2)),
            Expression::int(7),
        ))],
    );
    expect_i32(&program, "f", vec![50, 10], 6);
    expect_i32(&program, "f", vec![10, 50], -6);
}

#[test]
fn test_unary_minus() {
    let program = single(
        "neg",
        &["x"],
        vec![ret(Expression::unary("-", local("x"), "int"))],
    );
    expect_i32(&program, "neg", vec![7], -7);
    expect_i32(&program, "neg", vec![-3], 3);
}

#[test]
fn test_constants_of_every_width() {
    for value in [-1, 5, -128, 127, 1000, -32768, 40_000, 2_000_000_000] {
        let program = single("k", &[], vec![ret(Expression::int(i64::from(value)))]);
        expect_i32(&program, "k", vec![], value);
    }
}

#[test]
fn test_division_by_zero_is_a_runtime_error() {
    let program = single("f", &["x"], vec![ret(arith("/", Expression::int(1), local("x")))]);
    let err = run_static(&program, "f", vec![Value::Int(0)]).unwrap_err();
    assert!(err.to_string().contains("ArithmeticException"));
}

// ============================================================================
// Comparisons and logic
// ============================================================================

fn predicate(op: &str) -> Program {
    Program::new(vec![Item::Function(FunctionDecl::new(
        "boolean",
        "check",
        vec![Parameter::new("int", "a"), Parameter::new("int", "b")],
        vec![ret(test(op, local("a"), local("b")))],
    ))])
}

#[test]
fn test_comparisons_yield_zero_or_one() {
    let cases = [
        ("<", 1, 2, 1),
        ("<", 2, 2, 0),
        ("<=", 2, 2, 1),
        (">", 3, 2, 1),
        (">=", 1, 2, 0),
        ("==", 4, 4, 1),
        ("!=", 4, 4, 0),
    ];
    for (op, a, b, expected) in cases {
        expect_i32(&predicate(op), "check", vec![a, b], expected);
    }
}

#[test]
fn test_logical_operators() {
    // !(a < b) && (a != 0) || false
    let body = vec![ret(test(
        "||",
        test(
            "&&",
            Expression::unary("!", test("<", local("a"), local("b")), "boolean"),
            test("!=", local("a"), Expression::int(0)),
        ),
        Expression::boolean(false),
    ))];
    let program = Program::new(vec![Item::Function(FunctionDecl::new(
        "boolean",
        "check",
        vec![Parameter::new("int", "a"), Parameter::new("int", "b")],
        body,
    ))]);
    expect_i32(&program, "check", vec![5, 2], 1);
    expect_i32(&program, "check", vec![1, 2], 0);
    expect_i32(&program, "check", vec![0, -1], 0);
}

// ============================================================================
// Locals
// ============================================================================

#[test]
fn test_postfix_yields_old_value() {
    // int x = 5; int y = x++; return x * 10 + y;
    let program = single(
        "f",
        &[],
        vec![
            Statement::var("int", "x", Some(Expression::int(5))),
            Statement::var(
                "int",
                "y",
                Some(Expression::unary("++", local("x"), "int")),
            ),
            ret(arith(
                "+",
                arith("*", local("x"), Expression::int(10)),
                local("y"),
            )),
        ],
    );
    expect_i32(&program, "f", vec![], 65);
}

#[test]
fn test_postfix_decrement() {
    let program = single(
        "f",
        &["x"],
        vec![
            Statement::expr(Expression::unary("--", local("x"), "int")),
            ret(local("x")),
        ],
    );
    expect_i32(&program, "f", vec![3], 2);
}

#[test]
fn test_uninitialized_local_reads_zero() {
    let program = single(
        "f",
        &[],
        vec![
            Statement::var("int", "x", None),
            ret(arith("+", local("x"), Expression::int(1))),
        ],
    );
    expect_i32(&program, "f", vec![], 1);
}

#[test]
fn test_assignment_is_an_expression() {
    // int a; int b = (a = 4) + 1; return a * b;
    let program = single(
        "f",
        &[],
        vec![
            Statement::var("int", "a", None),
            Statement::var(
                "int",
                "b",
                Some(arith(
                    "+",
                    Expression::assign(local("a"), Expression::int(4)),
                    Expression::int(1),
                )),
            ),
            ret(arith("*", local("a"), local("b"))),
        ],
    );
    expect_i32(&program, "f", vec![], 20);
}

#[test]
fn test_string_locals_and_reference_equality() {
    let body = vec![
        Statement::var("String", "s", Some(Expression::string("hi"))),
        Statement::var("String", "t", Some(Expression::null())),
        ret(test(
            "&&",
            test("==", Expression::ident("s", "String"), Expression::ident("s", "String")),
            test("==", Expression::ident("t", "String"), Expression::null()),
        )),
    ];
    let program = Program::new(vec![Item::Function(FunctionDecl::new(
        "boolean", "f", vec![], body,
    ))]);
    expect_i32(&program, "f", vec![], 1);
}

// ============================================================================
// Static calls
// ============================================================================

#[test]
fn test_static_calls_between_functions() {
    let square = int_function("square", &["x"], vec![ret(arith("*", local("x"), local("x")))]);
    let compute = int_function(
        "compute",
        &[],
        vec![ret(arith(
            "+",
            Expression::call(None, "square", vec![Expression::int(3)], "int"),
            Expression::call(None, "square", vec![Expression::int(4)], "int"),
        ))],
    );
    expect_i32(&Program::new(vec![square, compute]), "compute", vec![], 25);
}

#[test]
fn test_argument_order() {
    let sub = int_function("sub", &["a", "b"], vec![ret(arith("-", local("a"), local("b")))]);
    let f = int_function(
        "f",
        &[],
        vec![ret(Expression::call(
            None,
            "sub",
            vec![Expression::int(10), Expression::int(3)],
            "int",
        ))],
    );
    expect_i32(&Program::new(vec![sub, f]), "f", vec![], 7);
}

#[test]
fn test_recursion() {
    // fact(n) = n <= 1 ? 1 : n * fact(n - 1)
    let fact = int_function(
        "fact",
        &["n"],
        vec![
            Statement::if_else(
                test("<=", local("n"), Expression::int(1)),
                ret(Expression::int(1)),
                None,
            ),
            ret(arith(
                "*",
                local("n"),
                Expression::call(
                    None,
                    "fact",
                    vec![arith("-", local("n"), Expression::int(1))],
                    "int",
                ),
            )),
        ],
    );
    expect_i32(&Program::new(vec![fact]), "fact", vec![5], 120);
}
