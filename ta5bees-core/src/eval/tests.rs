use std::rc::Rc;

use crate::{
    environment::prelude::Value,
    eval::prelude::{run_program, RuntimeError, RuntimeErrorType},
    parser::prelude::parse_module,
    stdlib::prelude::create_global_scope,
    utils::prelude::{Output, VectorOutputIO}
};

fn run(input: &str) -> Result<Vec<String>, RuntimeError> {
    run_with_lines(input).map(|(lines, _)| lines)
}

fn run_with_lines(input: &str) -> Result<(Vec<String>, Value), RuntimeError> {
    let lines = VectorOutputIO::new();
    let scope = create_global_scope(Output::new(Rc::new(lines.clone())));
    let module = parse_module(input).unwrap();

    let value = run_program(&module.program, &scope)?;

    Ok((lines.take(), value))
}

/// Runs a program expected to fail, returning its error and what it printed
/// before failing.
fn run_failing(input: &str) -> (RuntimeError, Vec<String>) {
    let lines = VectorOutputIO::new();
    let scope = create_global_scope(Output::new(Rc::new(lines.clone())));
    let module = parse_module(input).unwrap();

    match run_program(&module.program, &scope) {
        Ok(value) => panic!("expected {input} to fail, got {value:?}"),
        Err(err) => (err, lines.take())
    }
}

#[test]
fn test_scenario_declaration_and_print() -> Result<(), RuntimeError> {
    assert_eq!(run("khalli x = 1 + 2; gool(x);")?, vec!["3"]);

    Ok(())
}

#[test]
fn test_scenario_function_call() -> Result<(), RuntimeError> {
    assert_eq!(run("arrifli add(a, b) { raje3li a + b; } gool(add(2,3));")?, vec!["5"]);

    Ok(())
}

#[test]
fn test_scenario_if_else() -> Result<(), RuntimeError> {
    assert_eq!(run(r#"iza (1 > 2) { gool("a"); } willa { gool("b"); }"#)?, vec!["b"]);

    Ok(())
}

#[test]
fn test_division_by_zero() {
    let (err, printed) = run_failing("gool(10 / 0);");

    assert_eq!(err.error, RuntimeErrorType::DivisionByZero);
    assert_eq!(err.location.map(|location| (location.line, location.column)), Some((1, 6)));
    assert!(printed.is_empty());

    let (err, _) = run_failing("khalli r = 5 % 0;");
    assert_eq!(err.error, RuntimeErrorType::ModuloByZero);
}

#[test]
fn test_program_value_is_last_statement() -> Result<(), RuntimeError> {
    let (_, value) = run_with_lines("khalli a = 2; a * 21;")?;

    assert_eq!(value, Value::number(42.0));

    Ok(())
}

#[test]
fn test_arithmetic_and_coercion() -> Result<(), RuntimeError> {
    let input = r#"
        gool(7 % 3, 2 * 3 - 4 / 2, (1 + 2) * 3);
        gool("n=" + 1 + [1, 2], 1 + "2", "x" + null);
        gool(1 == 1, 1 != 1, 2 >= 2, 3 <= 2);
        gool("a" < 1, "a" == "a");
    "#;

    assert_eq!(run(input)?, vec![
        "1 4 9",
        "n=11,2 12 xnull",
        "true false true false",
        "null null",
    ]);

    let (err, _) = run_failing(r#"khalli bad = 1 - "a";"#);

    assert_eq!(err.error, RuntimeErrorType::OperandMismatch {
        operator: "-".into(),
        left: "number",
        right: "string"
    });

    Ok(())
}

#[test]
fn test_short_circuit() -> Result<(), RuntimeError> {
    let input = r#"
        khalli hits = 0;
        arrifli hit() { hits = hits + 1; raje3li 1; }
        khalli a = 0 && hit();
        khalli b = 1 || hit();
        gool(a, b, hits);
        gool(1 && 2, 0 || "", 1 && hit(), hits);
    "#;

    assert_eq!(run(input)?, vec!["false true 0", "true false true 1"]);

    Ok(())
}

#[test]
fn test_scope_shadowing() -> Result<(), RuntimeError> {
    let input = r#"
        khalli x = "outer";
        iza (1) { khalli x = "inner"; gool(x); }
        gool(x);
        arrifli f(x) { raje3li x + "!"; }
        gool(f("param"), x);
    "#;

    assert_eq!(run(input)?, vec!["inner", "outer", "param! outer"]);

    Ok(())
}

#[test]
fn test_declaration_rules() {
    let (err, _) = run_failing("khalli a = 1; khalli a = 2;");
    assert_eq!(err.error, RuntimeErrorType::DuplicateDeclaration { name: "a".into() });

    let (err, _) = run_failing("thabit c = 1; c = 2;");
    assert_eq!(err.error, RuntimeErrorType::ConstantReassignment { name: "c".into() });

    let (err, _) = run_failing("arrifli f() { } f = 1;");
    assert_eq!(err.error, RuntimeErrorType::ConstantReassignment { name: "f".into() });

    let (err, _) = run_failing("missing = 1;");
    assert_eq!(err.error, RuntimeErrorType::UnresolvedIdentifier { name: "missing".into() });
}

#[test]
fn test_functions_and_closures() -> Result<(), RuntimeError> {
    let input = r#"
        arrifli fib(n) { iza (n < 2) { raje3li n; } raje3li fib(n - 1) + fib(n - 2); }
        arrifli second(a, b) { raje3li b; }
        arrifli counter() {
            khalli count = 0;
            raje3li () => { count = count + 1; raje3li count; };
        }
        khalli next = counter();
        next();
        next();
        gool(fib(10), second(1), next());
        khalli square = x => x * x;
        gool(square(9), [a, b] => a + b);
    "#;

    assert_eq!(run(input)?, vec!["55 null 3", "81 [function anonymous]"]);

    Ok(())
}

#[test]
fn test_closures_capture_each_loop_iteration() -> Result<(), RuntimeError> {
    let input = r#"
        khalli fns = [];
        la (khalli i = 0; i < 3; i = i + 1) { fns.push(() => i); }
        gool(fns[0](), fns[1](), fns[2]());

        khalli total = 0;
        la (khalli j = 0; j < 3; j = j + 1) { total = total + j; }
        gool(total);
    "#;

    assert_eq!(run(input)?, vec!["0 1 2", "3"]);

    Ok(())
}

#[test]
fn test_loop_body_updates_loop_variable() -> Result<(), RuntimeError> {
    let input = r#"
        la (khalli i = 0; i < 10; i = i + 1) {
            iza (i == 2) { i = 8; }
            gool(i);
        }
    "#;

    assert_eq!(run(input)?, vec!["0", "1", "8", "9"]);

    Ok(())
}

#[test]
fn test_break_and_continue() -> Result<(), RuntimeError> {
    let input = r#"
        la (khalli i = 0; i < 10; i = i + 1) {
            iza (i == 1) { kammil; }
            iza (i == 3) { iksir; }
            gool(i);
        }
        khalli n = 0;
        la (;;) { n = n + 1; iza (n == 4) { iksir; } }
        gool(n);
    "#;

    assert_eq!(run(input)?, vec!["0", "2", "4"]);

    Ok(())
}

#[test]
fn test_loop_control_does_not_cross_functions() {
    let (err, _) = run_failing("arrifli f() { iksir; } la (;;) { f(); }");
    assert_eq!(err.error, RuntimeErrorType::StrayLoopControl { keyword: "iksir" });

    let (err, _) = run_failing("kammil;");
    assert_eq!(err.error, RuntimeErrorType::StrayLoopControl { keyword: "kammil" });
}

#[test]
fn test_return_inside_loop() -> Result<(), RuntimeError> {
    let input = r#"
        arrifli firstOver(xs, limit) {
            la (khalli i = 0; i < xs.length(); i = i + 1) {
                iza (xs[i] > limit) { raje3li xs[i]; }
            }
            raje3li null;
        }
        gool(firstOver([1, 5, 9], 4), firstOver([1], 4));
    "#;

    assert_eq!(run(input)?, vec!["5 null"]);

    Ok(())
}

#[test]
fn test_try_catch() -> Result<(), RuntimeError> {
    let input = r#"
        hawel { irmi "boom"; } law_sar_ma_sar { gool("caught " + error); }
        hawel { khalli z = 1 / 0; } law_sar_ma_sar (e) { gool(e); }
        hawel { undefinedThing(); } law_sar_ma_sar (e) { gool(e); }
        hawel { irmi { code: 42 }; } law_sar_ma_sar (e) { gool(e.code); }
        hawel { gool("fine"); } law_sar_ma_sar (e) { gool("unreachable"); }
        la (khalli i = 0; i < 5; i = i + 1) {
            hawel { iza (i == 1) { iksir; } } law_sar_ma_sar (e) { gool("caught break"); }
            gool(i);
        }
    "#;

    assert_eq!(run(input)?, vec![
        "caught boom",
        "division by zero",
        "`undefinedThing` is not defined",
        "42",
        "fine",
        "0",
    ]);

    Ok(())
}

#[test]
fn test_try_body_shares_enclosing_scope() {
    let input = r#"
        hawel { khalli seen = "inside"; } law_sar_ma_sar { gool("unreachable"); }
        gool(seen);
        hawel { irmi 1; } law_sar_ma_sar { khalli hidden = 2; }
        gool(hidden);
    "#;

    let (err, printed) = run_failing(input);

    assert_eq!(printed, vec!["inside"]);
    assert_eq!(err.error, RuntimeErrorType::UnresolvedIdentifier { name: "hidden".into() });
}

#[test]
fn test_uncaught_throw() {
    let (err, printed) = run_failing(r#"gool("before"); irmi "oops"; gool("after");"#);

    assert_eq!(err.error, RuntimeErrorType::UncaughtThrow { value: "oops".into() });
    assert_eq!(printed, vec!["before"]);
}

#[test]
fn test_members() -> Result<(), RuntimeError> {
    let input = r#"
        khalli arr = [1, 2, 3];
        gool(arr.length(), arr[1], arr.map(x => x * x), "Hello".toUpperCase(), "abc".length());
        arr[0] = 10;
        gool(arr, arr.slice(1, 0 - 1), arr.reduce((a, b) => a + b), "abc"[1]);
        gool([3, 1, 2].sort(), [3, 1, 2].sort((a, b) => b - a), ["b", "a"].sort());
        khalli o = { a: 1 };
        o.b = 2;
        o["c"] = 3;
        gool(o, o.missing, o["a"], "  hi ".trim().length());
    "#;

    assert_eq!(run(input)?, vec![
        "3 2 [1, 4, 9] HELLO 3",
        "[10, 2, 3] [2] 15 b",
        r#"[1, 2, 3] [3, 2, 1] ["a", "b"]"#,
        "{ a: 1, b: 2, c: 3 } null 1 2",
    ]);

    Ok(())
}

#[test]
fn test_member_errors() {
    let (err, _) = run_failing("khalli arr = [1, 2, 3]; arr[5];");
    assert_eq!(err.error, RuntimeErrorType::IndexOutOfBounds { index: "5".into(), length: 3 });

    let (err, _) = run_failing("[1].nope();");
    assert_eq!(err.error, RuntimeErrorType::UnknownMethod { kind: "array", name: "nope".into() });

    let (err, _) = run_failing("1 = 2;");
    assert_eq!(err.error, RuntimeErrorType::InvalidAssignmentTarget);

    let (err, _) = run_failing("khalli n = 1; n();");
    assert_eq!(err.error, RuntimeErrorType::NotCallable { kind: "number" });
}

#[test]
fn test_async_ordering() -> Result<(), RuntimeError> {
    let input = r#"
        tazamonan arrifli step(name) { gool("start " + name); raje3li name; }
        tazamonan arrifli main() {
            khalli a = stanna step("a");
            gool("got " + a);
            khalli b = stanna step("b");
            gool("got " + b);
            raje3li a + b;
        }
        khalli result = main();
        gool("after main", result);
    "#;

    assert_eq!(run(input)?, vec![
        "start a",
        "got a",
        "start b",
        "got b",
        "after main ab",
    ]);

    Ok(())
}

#[test]
fn test_pending_values_forward() -> Result<(), RuntimeError> {
    let input = r#"
        tazamonan arrifli five() { raje3li 5; }
        tazamonan arrifli user() { raje3li { name: "Sara", greet: x => "hi " + x }; }
        arrifli plusOne() { raje3li five() + 1; }
        arrifli name() { raje3li user().name; }
        gool(plusOne(), name(), user().greet("you"));
        khalli double = tazamonan (x) => x * 2;
        gool(stanna double(21));
        khalli wrapped = tazamonan 7;
        gool(wrapped);
    "#;

    assert_eq!(run(input)?, vec!["6 Sara hi you", "42", "7"]);

    Ok(())
}

#[test]
fn test_unawaited_work_still_completes() -> Result<(), RuntimeError> {
    let input = r#"
        tazamonan arrifli later() { gool("later"); }
        arrifli fire() { later(); raje3li 1; }
        fire();
        gool("first");
    "#;

    assert_eq!(run(input)?, vec!["first", "later"]);

    Ok(())
}

#[test]
fn test_async_rejection_is_catchable() -> Result<(), RuntimeError> {
    let input = r#"
        tazamonan arrifli fail() { irmi "bad"; }
        tazamonan arrifli main() {
            hawel { stanna fail(); } law_sar_ma_sar (e) { gool("handled " + e); }
        }
        main();
    "#;

    assert_eq!(run(input)?, vec!["handled bad"]);

    let (err, _) = run_failing("tazamonan arrifli fail() { irmi \"late\"; } fail();");
    assert_eq!(err.error, RuntimeErrorType::UncaughtThrow { value: "late".into() });

    Ok(())
}

#[test]
fn test_unawaited_failure_is_reported() {
    let input = r#"
        tazamonan arrifli fail() { irmi "lost"; }
        arrifli f() { fail(); raje3li 1; }
        f();
        gool("done");
    "#;

    let (err, printed) = run_failing(input);

    assert_eq!(printed, vec!["done"]);
    assert_eq!(err.error, RuntimeErrorType::UncaughtThrow { value: "lost".into() });
}

#[test]
fn test_failure_awaited_later_is_not_reported_twice() -> Result<(), RuntimeError> {
    let input = r#"
        tazamonan arrifli fail() { irmi "kept"; }
        tazamonan arrifli main() {
            khalli tasks = [fail()];
            gool("started");
            hawel { stanna tasks[0]; } law_sar_ma_sar (e) { gool("handled " + e); }
        }
        main();
    "#;

    assert_eq!(run(input)?, vec!["started", "handled kept"]);

    Ok(())
}

#[test]
fn test_printing_self_containing_array() -> Result<(), RuntimeError> {
    let input = r#"
        khalli a = [1];
        a.push(a);
        gool(a);
        gool("joined " + a);
    "#;

    assert_eq!(run(input)?, vec!["[1, [Circular]]", "joined 1,"]);

    Ok(())
}
