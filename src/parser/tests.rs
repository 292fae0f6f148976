//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Variable declarations
//! - Function declarations
//! - Expressions and precedence
//! - Control flow statements

use std::rc::Rc;

use super::parser::parse;
use crate::{
    ast::{
        ast::{Expr, Program, Stmt},
        expressions::{BinaryOperator, PostfixOperator, UnaryOperator},
        types::{LiteralValue, NumType},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
};

fn parse_str(source: &str) -> Result<Program, Error> {
    let tokens = tokenize(source.to_string(), Some("test.lang".to_string())).unwrap();
    let (_, result) = parse(tokens, Rc::new("test.lang".to_string()));
    result
}

fn first_stmt(source: &str) -> Stmt {
    parse_str(source).unwrap().body.body.remove(0)
}

fn expr_of(source: &str) -> Expr {
    match first_stmt(source) {
        Stmt::Expression(stmt) => stmt.expression,
        Stmt::Let(decl) => decl.assigned_value.unwrap(),
        other => panic!("unexpected statement {:?}", other),
    }
}

#[test]
fn test_parse_variable_declaration() {
    match first_stmt("let x = 42;") {
        Stmt::Let(decl) => {
            assert_eq!(decl.identifier, "x");
            assert_eq!(decl.explicit_type, None);
            assert!(matches!(
                decl.assigned_value,
                Some(Expr::Literal(ref lit)) if lit.value == LiteralValue::Int(42)
            ));
        }
        other => panic!("expected let, got {:?}", other),
    }
}

#[test]
fn test_parse_typed_declaration_without_value() {
    match first_stmt("let total: f64;") {
        Stmt::Let(decl) => {
            assert_eq!(decl.explicit_type, Some(NumType::F64));
            assert!(decl.assigned_value.is_none());
        }
        other => panic!("expected let, got {:?}", other),
    }
}

#[test]
fn test_parse_unknown_type() {
    let error = parse_str("let x: string = 1;").unwrap_err();
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnknownType {
            type_: "string".to_string()
        }
    );
}

#[test]
fn test_parse_function_declaration() {
    let program = parse_str("fn add(a: i32, b) -> i64 { return a + b; }").unwrap();
    assert!(program.body.body.is_empty());
    assert_eq!(program.functions.len(), 1);

    let function = &program.functions[0];
    assert_eq!(function.identifier, "add");
    assert_eq!(function.parameters.len(), 2);
    assert_eq!(function.parameters[0].declared_type, Some(NumType::I32));
    assert_eq!(function.parameters[1].declared_type, None);
    assert_eq!(function.return_type, Some(NumType::I64));
    assert!(matches!(function.body.body[0], Stmt::Return(_)));
}

#[test]
fn test_functions_and_body_keep_source_order() {
    let program = parse_str("let a = 1; fn f() {} print a; fn g() {}").unwrap();
    let names: Vec<_> = program.functions.iter().map(|f| f.identifier.as_str()).collect();
    assert_eq!(names, vec!["f", "g"]);
    assert!(matches!(program.body.body[0], Stmt::Let(_)));
    assert!(matches!(program.body.body[1], Stmt::Print(_)));
}

#[test]
fn test_parse_if_else_statement() {
    match first_stmt("if x > 0 { print 1; } else { print 2; }") {
        Stmt::If(stmt) => {
            assert!(matches!(stmt.condition, Expr::Binary(ref b) if b.operator == BinaryOperator::Greater));
            assert!(matches!(*stmt.then_body, Stmt::Block(_)));
            assert!(stmt.else_body.is_some());
        }
        other => panic!("expected if, got {:?}", other),
    }
}

#[test]
fn test_parenthesized_condition_with_bare_body() {
    match first_stmt("while (x) x = x - 1;") {
        Stmt::While(stmt) => {
            assert!(matches!(stmt.condition, Expr::Variable(_)));
            assert!(matches!(*stmt.body, Stmt::Assignment(_)));
        }
        other => panic!("expected while, got {:?}", other),
    }
}

#[test]
fn test_parse_for_loop() {
    match first_stmt("for (let i = 0; i < 10; i++) { print i; }") {
        Stmt::For(stmt) => {
            assert!(matches!(stmt.init.as_deref(), Some(Stmt::Let(_))));
            assert!(stmt.condition.is_some());
            assert!(matches!(stmt.step, Some(Expr::Postfix(ref p)) if p.operator == PostfixOperator::Increment));
        }
        other => panic!("expected for, got {:?}", other),
    }
}

#[test]
fn test_parse_empty_for_header() {
    match first_stmt("for (;;) { break; }") {
        Stmt::For(stmt) => {
            assert!(stmt.init.is_none());
            assert!(stmt.condition.is_none());
            assert!(stmt.step.is_none());
        }
        other => panic!("expected for, got {:?}", other),
    }
}

#[test]
fn test_parse_break_continue_return() {
    let program = parse_str("break; continue; return; return 1;").unwrap();
    assert!(matches!(program.body.body[0], Stmt::Break(_)));
    assert!(matches!(program.body.body[1], Stmt::Continue(_)));
    assert!(matches!(program.body.body[2], Stmt::Return(ref r) if r.value.is_none()));
    assert!(matches!(program.body.body[3], Stmt::Return(ref r) if r.value.is_some()));
}

#[test]
fn test_expression_statement_kinds() {
    let program = parse_str("x = 1; f(1, 2); x + 1;").unwrap();
    assert!(matches!(program.body.body[0], Stmt::Assignment(_)));
    assert!(matches!(program.body.body[1], Stmt::Call(ref c) if c.arguments.len() == 2));
    assert!(matches!(program.body.body[2], Stmt::Expression(_)));
}

#[test]
fn test_operator_precedence() {
    match expr_of("let v = 1 + 2 * 3;") {
        Expr::Binary(add) => {
            assert_eq!(add.operator, BinaryOperator::Add);
            assert!(matches!(*add.right, Expr::Binary(ref mul) if mul.operator == BinaryOperator::Multiply));
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_logical_binds_looser_than_relational() {
    match expr_of("let v = a < b && c != d;") {
        Expr::Binary(and) => {
            assert_eq!(and.operator, BinaryOperator::And);
            assert!(matches!(*and.left, Expr::Binary(ref l) if l.operator == BinaryOperator::Less));
            assert!(matches!(*and.right, Expr::Binary(ref r) if r.operator == BinaryOperator::NotEquals));
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_prefix_binds_tighter_than_binary() {
    match expr_of("let v = -a + b;") {
        Expr::Binary(add) => {
            assert!(matches!(*add.left, Expr::Unary(ref u) if u.operator == UnaryOperator::Negate));
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_assignment_is_right_associative() {
    match first_stmt("a = b = 3;") {
        Stmt::Assignment(outer) => {
            assert!(matches!(*outer.assignee, Expr::Variable(ref s) if s.value == "a"));
            assert!(matches!(*outer.value, Expr::Assignment(_)));
        }
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_compound_assignment_is_desugared() {
    match first_stmt("x *= 2;") {
        Stmt::Assignment(assign) => match *assign.value {
            Expr::Binary(ref mul) => {
                assert_eq!(mul.operator, BinaryOperator::Multiply);
                assert!(matches!(*mul.left, Expr::Variable(ref s) if s.value == "x"));
            }
            ref other => panic!("expected binary, got {:?}", other),
        },
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_conversion_expression() {
    match expr_of("let v = a + b as f64;") {
        Expr::Binary(add) => match *add.right {
            Expr::Conversion(ref conv) => {
                assert_eq!(conv.to_type, NumType::F64);
                assert_eq!(conv.from_type, None);
            }
            ref other => panic!("expected conversion, got {:?}", other),
        },
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_boolean_and_float_literals() {
    assert!(matches!(expr_of("let t = true;"), Expr::Literal(ref l) if l.value == LiteralValue::Int(1)));
    assert!(matches!(expr_of("let f = false;"), Expr::Literal(ref l) if l.value == LiteralValue::Int(0)));
    assert!(matches!(expr_of("let h = 0.5;"), Expr::Literal(ref l) if l.value == LiteralValue::Float(0.5)));
}

#[test]
fn test_number_overflow() {
    let error = parse_str("let x = 99999999999999999999;").unwrap_err();
    assert!(matches!(error.get_impl(), ErrorImpl::NumberParseError { .. }));
}

#[test]
fn test_missing_semicolon() {
    let error = parse_str("let x = 1").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_unclosed_grouping() {
    let error = parse_str("let x = (1 + 2;").unwrap_err();
    assert!(matches!(error.get_impl(), ErrorImpl::UnexpectedToken { token } if token == ";"));
}

#[test]
fn test_unterminated_block() {
    assert!(parse_str("fn f() { let x = 1;").is_err());
}

#[test]
fn test_call_requires_named_callee() {
    assert!(parse_str("1(2);").is_err());
    assert!(parse_str("1++;").is_err());
}

#[test]
fn test_error_position_points_at_token() {
    let error = parse_str("let x = ;").unwrap_err();
    assert_eq!(error.get_position().0, 8);
}
