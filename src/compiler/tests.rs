//! Unit tests for the code generator.

use super::{
    compiler::{compile, normalize_name, Compiler},
    conversions::conversion_instruction,
    stdlib::resolve_alias,
};
use crate::{
    ast::types::NumType,
    compile_source,
    errors::errors::{ErrorImpl, ErrorKind},
    options::CompileOptions,
    parse_source,
    type_checker::{
        type_checker::type_check,
        typed_ast::{TypedBlock, TypedFunction, TypedProgram, TypedStmt},
    },
    Position, Span,
};

fn typed(source: &str) -> TypedProgram {
    let program = parse_source(source, "test.lang").unwrap();
    type_check(&program, &CompileOptions::default()).unwrap()
}

fn body_of(source: &str, name: &str) -> Vec<String> {
    let program = typed(source);
    let mut compiler = Compiler::new(&program);
    let function = program.find_function(name).unwrap();
    compiler.gen_function_body(function).unwrap()
}

fn entry_body(source: &str) -> Vec<String> {
    body_of(source, "_start")
}

fn count(lines: &[String], line: &str) -> usize {
    lines.iter().filter(|l| *l == line).count()
}

fn position(lines: &[String], line: &str) -> usize {
    lines
        .iter()
        .position(|l| l == line)
        .unwrap_or_else(|| panic!("`{}` not emitted in {:?}", line, lines))
}

#[test]
fn test_normalize_name() {
    assert_eq!(normalize_name("x"), "$x");
    assert_eq!(normalize_name("$x"), "$x");
    assert_eq!(normalize_name("$$x"), "$x");
    assert_eq!(normalize_name(&normalize_name("$$x")), "$x");
}

#[test]
fn test_alias_resolved_before_normalizing() {
    assert_eq!(normalize_name(resolve_alias("input")), "$read_i32");
    assert_eq!(normalize_name(resolve_alias("alloc")), "$bump_alloc");
    assert_eq!(normalize_name(resolve_alias("ask_model")), "$model_call");
    assert_eq!(normalize_name(resolve_alias("fact")), "$fact");
}

#[test]
fn test_recursive_call_emission() {
    let lines = body_of(
        "fn fact(n) { if n <= 1 { return 1; } return n * fact(n - 1); }",
        "fact",
    );

    let call = position(&lines, "call $fact");
    let argument = lines[..call]
        .iter()
        .rposition(|l| l == "i32.sub")
        .unwrap();
    assert_eq!(argument, call - 1);
    assert_eq!(lines[call - 3], "local.get $n");
    assert_eq!(lines[call + 1], "i32.mul");
    assert_eq!(lines.last().unwrap(), "return");
    assert_eq!(count(&lines, "unreachable"), 0);
}

#[test]
fn test_parameters_take_first_slots() {
    let program = typed("fn f(a, b: f64) { let c = a; return c; }");
    let mut compiler = Compiler::new(&program);
    compiler.gen_function_body(&program.functions[0]).unwrap();

    assert_eq!(compiler.slots.get("a").unwrap().index, 0);
    assert_eq!(compiler.slots.get("b").unwrap().index, 1);
    assert_eq!(compiler.slots.get("b").unwrap().ty, NumType::F64);
    assert_eq!(compiler.slots.get("c").unwrap().index, 2);
    let locals: Vec<_> = compiler.slots.locals().map(|(name, _)| name).collect();
    assert_eq!(locals, vec!["c"]);
}

#[test]
fn test_for_loop_with_break_and_continue() {
    let lines = entry_body(
        "let s = 0; \
         for (let i = 0; i < 10; i++) { \
             if i == 5 { break; } \
             if i % 2 { continue; } \
             s = s + i; \
         }",
    );

    assert_eq!(count(&lines, "br $break_0"), 1);
    assert_eq!(count(&lines, "br $continue_0"), 1);
    assert_eq!(count(&lines, "br_if $break_0"), 1);

    let step = [
        "local.get $i",
        "local.get $i",
        "i32.const 1",
        "i32.add",
        "local.set $i",
        "drop",
    ];
    let occurrences = lines
        .windows(step.len())
        .filter(|window| window.iter().zip(step.iter()).all(|(a, b)| a == b))
        .count();
    assert_eq!(occurrences, 1);

    // The step sits between the end of the continue block and the back edge.
    let back_edge = position(&lines, "br $loop_0");
    assert_eq!(lines[back_edge - step.len() - 1], "end");
    assert!(position(&lines, "block $continue_0") < position(&lines, "br $continue_0"));
    assert!(position(&lines, "br $continue_0") < back_edge - step.len());
    assert_eq!(&lines[back_edge + 1..], ["end", "end"]);
}

#[test]
fn test_loop_header_layout() {
    let lines = entry_body("let i = 0; while i < 3 { i = i + 1; }");
    let start = position(&lines, "block $break_0");

    assert_eq!(
        &lines[start..start + 8],
        [
            "block $break_0",
            "loop $loop_0",
            "local.get $i",
            "i32.const 3",
            "i32.lt_s",
            "i32.eqz",
            "br_if $break_0",
            "block $continue_0",
        ]
    );
}

#[test]
fn test_loop_without_condition_has_no_exit_test() {
    let lines = entry_body("for (;;) { break; }");
    assert_eq!(count(&lines, "br_if $break_0"), 0);
    assert_eq!(count(&lines, "br $break_0"), 1);
}

#[test]
fn test_nested_loops_use_innermost_labels() {
    let lines = entry_body("while 1 { while 1 { break; } continue; }");
    assert_eq!(count(&lines, "br $break_1"), 1);
    assert_eq!(count(&lines, "br $continue_0"), 1);
    assert_eq!(count(&lines, "br $break_0"), 0);
}

#[test]
fn test_empty_else_is_omitted() {
    let lines = entry_body("let x = 1; if x { x = 2; } else { }");
    assert_eq!(count(&lines, "else"), 0);
    assert_eq!(count(&lines, "if"), 1);
    assert_eq!(count(&lines, "end"), 1);

    let lines = entry_body("let x = 1; if x { x = 2; } else { x = 3; }");
    assert_eq!(count(&lines, "else"), 1);
}

#[test]
fn test_postfix_increment_sequence() {
    let lines = entry_body("let a = 1; let b = a++;");
    assert_eq!(
        lines,
        [
            "i32.const 1",
            "local.set $a",
            "local.get $a",
            "local.get $a",
            "i32.const 1",
            "i32.add",
            "local.set $a",
            "local.set $b",
        ]
    );
}

#[test]
fn test_postfix_decrement_on_float() {
    let lines = entry_body("let f = 2.5; f--;");
    assert_eq!(
        &lines[2..],
        [
            "local.get $f",
            "local.get $f",
            "f32.const 1.0",
            "f32.sub",
            "local.set $f",
            "drop",
        ]
    );
}

#[test]
fn test_assignment_expression_reloads() {
    let lines = entry_body("let a = 0; let b = (a = 5);");
    assert_eq!(
        &lines[2..],
        ["i32.const 5", "local.set $a", "local.get $a", "local.set $b"]
    );
}

#[test]
fn test_assignment_statement_does_not_reload() {
    let lines = entry_body("let a = 0; a = 5;");
    assert_eq!(lines, ["i32.const 0", "local.set $a", "i32.const 5", "local.set $a"]);
}

#[test]
fn test_widened_storage_coerces_earlier_stores() {
    let lines = entry_body("let x = 5; x = x + 1.5;");
    assert_eq!(
        lines,
        [
            "i32.const 5",
            "f32.convert_i32_s",
            "local.set $x",
            "local.get $x",
            "f32.const 1.5",
            "f32.add",
            "local.set $x",
        ]
    );

    let program = typed("let x = 5; x = x + 1.5;");
    let mut compiler = Compiler::new(&program);
    compiler.gen_function_body(&program.entry).unwrap();
    assert_eq!(compiler.slots.get("x").unwrap().ty, NumType::F32);
}

#[test]
fn test_mixed_arithmetic_converts_operands() {
    let lines = entry_body("let a: i64 = 4; let b = a * 2.0;");
    assert_eq!(
        &lines[2..],
        [
            "local.get $a",
            "f32.convert_i64_s",
            "f32.const 2.0",
            "f32.mul",
            "local.set $b",
        ]
    );
}

#[test]
fn test_literals_render_exactly() {
    let lines = entry_body("let a = 0.0; let b: f64 = 2; let c = 3000000000; let d: f64;");
    assert_eq!(lines[0], "f32.const 0.0");
    assert_eq!(lines[2], "i32.const 2");
    assert_eq!(lines[3], "f64.convert_i32_s");
    assert_eq!(lines[5], "i64.const 3000000000");
    assert_eq!(lines[7], "f64.const 0.0");
}

#[test]
fn test_unary_operators() {
    let lines = entry_body("let a = 3; let b = -a; let c = !a; let d = +a; let e = !1.5;");
    assert_eq!(&lines[2..5], ["local.get $a", "i32.const -1", "i32.mul"]);
    assert_eq!(&lines[6..8], ["local.get $a", "i32.eqz"]);
    assert_eq!(&lines[9..11], ["local.get $a", "local.set $d"]);
    assert_eq!(&lines[11..14], ["f32.const 1.5", "f32.const 0.0", "f32.eq"]);
}

#[test]
fn test_logical_operators_short_circuit() {
    let lines = entry_body("let a = 1 && 2.5;");
    assert_eq!(
        lines,
        [
            "i32.const 1",
            "if (result i32)",
            "f32.const 2.5",
            "f32.const 0.0",
            "f32.ne",
            "else",
            "i32.const 0",
            "end",
            "local.set $a",
        ]
    );

    let lines = entry_body("let b = 0 || 2;");
    assert_eq!(
        &lines[..7],
        [
            "i32.const 0",
            "if (result i32)",
            "i32.const 1",
            "else",
            "i32.const 2",
            "i32.const 0",
            "i32.ne",
        ]
    );
}

#[test]
fn test_float_condition_compares_with_zero() {
    let lines = entry_body("let f = 1.5; if f { print 1; }");
    assert_eq!(
        &lines[2..6],
        ["local.get $f", "f32.const 0.0", "f32.ne", "if"]
    );
}

#[test]
fn test_comparisons_pick_signed_or_float_forms() {
    let lines = entry_body("let a = 1 < 2; let b = 1.5 >= 2; let c = 7 / 2; let d = 7.0 / 2;");
    assert!(lines.contains(&"i32.lt_s".to_string()));
    assert!(lines.contains(&"f32.ge".to_string()));
    assert!(lines.contains(&"i32.div_s".to_string()));
    assert!(lines.contains(&"f32.div".to_string()));
}

#[test]
fn test_expression_and_call_statements() {
    let lines = entry_body("1 + 2;");
    assert_eq!(lines.last().unwrap(), "drop");

    let lines = entry_body("fn f() { return 1; } fn g() {} f(); g();");
    assert_eq!(lines, ["call $f", "drop", "call $g"]);
}

#[test]
fn test_call_arguments_are_converted() {
    let lines = entry_body("fn wide(x: f64) { return x; } let r = wide(3);");
    assert_eq!(
        lines,
        ["i32.const 3", "f64.convert_i32_s", "call $wide", "local.set $r"]
    );
}

#[test]
fn test_return_is_converted_to_result() {
    let lines = body_of("fn f() -> i64 { return 1; }", "f");
    assert_eq!(lines, ["i64.const 1", "return"]);

    let lines = body_of("fn g(x: i32) -> f64 { return x; }", "g");
    assert_eq!(lines, ["local.get $x", "f64.convert_i32_s", "return"]);
}

#[test]
fn test_missing_final_return_is_unreachable() {
    let lines = body_of(
        "fn f(x) -> i32 { if x { return 1; } else { return 2; } }",
        "f",
    );
    assert_eq!(lines.last().unwrap(), "unreachable");

    let lines = body_of("fn g() { print 1; }", "g");
    assert_eq!(count(&lines, "unreachable"), 0);
}

#[test]
fn test_print_calls_typed_host_function() {
    let lines = entry_body("print 1; print 2.5; print input_f64();");
    assert_eq!(
        lines,
        [
            "i32.const 1",
            "call $print_i32",
            "f32.const 2.5",
            "call $print_f32",
            "call $read_f64",
            "call $print_f64",
        ]
    );
}

#[test]
fn test_conversion_table_round_trips() {
    let here = Position::null();

    assert_eq!(
        conversion_instruction(NumType::F32, NumType::F64, &here).unwrap(),
        Some("f64.promote_f32")
    );
    assert_eq!(
        conversion_instruction(NumType::F64, NumType::F32, &here).unwrap(),
        Some("f32.demote_f64")
    );
    assert_eq!(
        conversion_instruction(NumType::I32, NumType::I64, &here).unwrap(),
        Some("i64.extend_i32_s")
    );
    assert_eq!(
        conversion_instruction(NumType::I64, NumType::I32, &here).unwrap(),
        Some("i32.wrap_i64")
    );

    let lines = entry_body("let a = 1.5; let b = a as f64; let c = b as f32;");
    assert_eq!(count(&lines, "f64.promote_f32"), 1);
    assert_eq!(count(&lines, "f32.demote_f64"), 1);
}

#[test]
fn test_conversion_table_is_closed() {
    let here = Position::null();

    for from in NumType::ALL {
        for to in NumType::ALL {
            let result = conversion_instruction(from, to, &here);
            if from == to {
                assert_eq!(result.unwrap(), None);
            } else if from.is_float() && to.is_integer() {
                let error = result.unwrap_err();
                assert_eq!(error.get_impl(), &ErrorImpl::UnsupportedConversion { from, to });
            } else {
                let instruction = result.unwrap().unwrap();
                assert!(instruction.starts_with(to.wat()), "{}", instruction);
                assert!(!instruction.contains(' '));
            }
        }
    }
}

#[test]
fn test_float_to_int_conversion_is_fatal() {
    let error = compile_source(
        "let f = 1.5; let i = f as i32;",
        "test.lang",
        &CompileOptions::default(),
    )
    .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::UnsupportedConversion);
    assert_eq!(error.get_position().0, 21);
}

#[test]
fn test_break_without_loop_is_malformed() {
    let span = Span::null();
    let program = TypedProgram {
        functions: vec![],
        entry: TypedFunction {
            name: "_start".to_string(),
            parameters: vec![],
            result: None,
            body: TypedBlock {
                body: vec![TypedStmt::Break(span.clone())],
                span: span.clone(),
            },
            storage: Default::default(),
            span,
        },
    };

    let error = compile(&program, &CompileOptions::default()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::MalformedNode);
}

#[test]
fn test_module_layout() {
    let wat = compile_source(
        "fn add(a: i32, b: i32) -> i32 { return a + b; } print add(1, 2);",
        "test.lang",
        &CompileOptions::default(),
    )
    .unwrap();

    let expected = "\
(module
  (import \"env\" \"print_i32\" (func $print_i32 (param i32)))
  (func $add (export \"add\") (param $a i32) (param $b i32) (result i32)
    local.get $a
    local.get $b
    i32.add
    return
  )
  (func $_start (export \"_start\")
    i32.const 1
    i32.const 2
    call $add
    call $print_i32
  )
)
";
    assert_eq!(wat, expected);
}

#[test]
fn test_prologue_and_nested_indentation() {
    let wat = compile_source(
        "let i = 0; while i < 2 { if i { print i; } i++; }",
        "test.lang",
        &CompileOptions::default(),
    )
    .unwrap();

    assert!(wat.contains("  (func $_start (export \"_start\")\n    (local $i i32)\n"));
    assert!(wat.contains("\n    block $break_0\n      loop $loop_0\n"));
    assert!(wat.contains("\n          if\n            local.get $i\n            call $print_i32\n          end\n"));
}

#[test]
fn test_host_imports_only_when_used() {
    let wat = compile_source(
        "let p = alloc(8); let n = input(); let r = ask_model(p, n);",
        "test.lang",
        &CompileOptions::default(),
    )
    .unwrap();

    assert!(wat.contains("(import \"env\" \"read_i32\" (func $read_i32 (result i32)))"));
    assert!(wat.contains("(import \"env\" \"bump_alloc\" (func $bump_alloc (param i32) (result i32)))"));
    assert!(wat.contains(
        "(import \"env\" \"model_call\" (func $model_call (param i32) (param i32) (result i32)))"
    ));
    assert!(!wat.contains("print_i32"));
    assert!(wat.find("bump_alloc").unwrap() < wat.find("model_call").unwrap());
}

#[test]
fn test_export_and_entry_options() {
    let options = CompileOptions::new()
        .with_export_functions(false)
        .with_entry_name("main");
    let wat = compile_source("fn f() {} f();", "test.lang", &options).unwrap();

    assert!(wat.contains("(func $f\n"));
    assert!(wat.contains("(func $main (export \"main\")"));
    assert!(!wat.contains("_start"));
}

#[test]
fn test_shadowing_let_uses_its_own_local() {
    let wat = compile_source(
        "let x = 1; { let x = 2.5; } print x;",
        "test.lang",
        &CompileOptions::default(),
    )
    .unwrap();

    assert!(wat.contains("(local $x i32)"), "{}", wat);
    assert!(wat.contains("(local $x.1 f32)"), "{}", wat);
    assert!(wat.contains("local.set $x.1"), "{}", wat);
    assert!(wat.contains("call $print_i32"), "{}", wat);
    assert!(!wat.contains("call $print_f32"), "{}", wat);
    assert!(!wat.contains("f32.convert_i32_s"), "{}", wat);
}

#[test]
fn test_float_constant_takes_wider_operand_width() {
    let lines = entry_body("let d: f64 = 2.0; let y = 0.1 * d;");
    assert_eq!(count(&lines, "f64.const 0.1"), 1);
    assert_eq!(count(&lines, "f64.promote_f32"), 0);
    assert_eq!(count(&lines, "f64.mul"), 1);

    let lines = entry_body("let d: f64 = 2.0; let c = 0.1 < d;");
    assert_eq!(count(&lines, "f64.const 0.1"), 1);
    assert_eq!(count(&lines, "f64.promote_f32"), 0);
    assert_eq!(count(&lines, "f64.lt"), 1);

    let lines = entry_body("let n: i64 = 5; let m = 1 + n;");
    assert_eq!(count(&lines, "i64.const 1"), 1);
    assert_eq!(count(&lines, "i64.extend_i32_s"), 0);
}

#[test]
fn test_pinned_void_function_is_rejected_before_emission() {
    let error = compile_source(
        "fn g() { let x = f(); print x; } fn f() { print 1; } g();",
        "test.lang",
        &CompileOptions::default(),
    )
    .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::TypeIncompatibility);
}
