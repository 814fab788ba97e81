use pl0::{run_ast, run_ir, Error, ErrorKind};
use virtual_machine::interpreter::{memval, MemoryValue};

fn memvals(values: &[i64]) -> Vec<MemoryValue> {
    values.iter().cloned().map(memval).collect()
}

/// Run through both engines and require identical observable behaviour.
fn run_both(code: &str, input: &[i64]) -> (Vec<MemoryValue>, Option<ErrorKind>) {
    let (ast_output, ast_result) = run_ast(code, memvals(input));
    let (ir_output, ir_result) = run_ir(code, memvals(input));

    let ast_kind = ast_result.map_err(|e| e.kind()).err();
    let ir_kind = ir_result.map_err(|e| e.kind()).err();

    assert_eq!(ast_output, ir_output, "engines disagree on output of {:?}", code);
    assert_eq!(ast_kind, ir_kind, "engines disagree on failure of {:?}", code);

    (ast_output, ast_kind)
}

fn compile_error(code: &str) -> parser::Error {
    match pl0::compile(code) {
        Err(Error::Compile(error)) => error,
        other => panic!("expected a compile error, got {:?}", other),
    }
}

#[test]
fn constant_arithmetic() {
    let code = "const a=5; var b; begin b:=a+1; !b end.";
    assert_eq!(run_both(code, &[]), (memvals(&[6]), None));
}

#[test]
fn countdown_from_input() {
    let code = "var x; begin ?x; while x#0 do begin !x; x:=x-1 end end.";
    assert_eq!(run_both(code, &[3]), (memvals(&[3, 2, 1]), None));
}

#[test]
fn inner_variable_shadows_outer() {
    let code = "var x; procedure p; var x; begin x:=1; !x end; begin x:=9; call p; !x end.";
    assert_eq!(run_both(code, &[]), (memvals(&[1, 9]), None));
}

#[test]
fn division_by_zero_produces_no_output() {
    let code = "var a; begin a:=1/0 end.";
    assert_eq!(run_both(code, &[]), (vec![], Some(ErrorKind::DivisionByZero)));
}

#[test]
fn missing_final_period() {
    let code = "var x; begin x := 1 end";

    match compile_error(code) {
        parser::Error::Syntax { expected, found, position } => {
            assert_eq!(expected, "`.`");
            assert_eq!(found, "end of input");
            assert_eq!(position.offset, code.len());
        },
        other => panic!("expected a syntax error, got {:?}", other),
    }
    assert_eq!(run_both(code, &[]), (vec![], Some(ErrorKind::Syntax)));
}

#[test]
fn outer_variable_is_mutable_from_nested_procedure() {
    let code = "
        var x;
        procedure p;
            procedure q;
                x := x * 10;
            begin x := x + 1; call q end;
        begin x := 4; call p; !x end.";

    assert_eq!(run_both(code, &[]), (memvals(&[50]), None));
}

#[test]
fn procedure_locals_are_not_visible_outside() {
    let code = "procedure p; var y; y := 1; begin call p; !y end.";

    match compile_error(code) {
        parser::Error::UndeclaredName { name, .. } => assert_eq!(name, "y"),
        other => panic!("expected an undeclared name, got {:?}", other),
    }
    assert_eq!(run_both(code, &[]).1, Some(ErrorKind::UndeclaredName));
}

#[test]
fn duplicate_declaration() {
    assert_eq!(run_both("const a = 1; var a; .", &[]).1, Some(ErrorKind::DuplicateDeclaration));
    assert_eq!(run_both("var p; procedure p; ; .", &[]).1, Some(ErrorKind::DuplicateDeclaration));
}

#[test]
fn recursion_through_static_links() {
    let code = "
        var n, acc;
        procedure sum;
            var k;
        begin
            k := n;
            if k > 0 then
            begin
                n := n - 1;
                call sum;
                acc := acc + k
            end
        end;
        begin ?n; acc := 0; call sum; !acc end.";

    assert_eq!(run_both(code, &[10]), (memvals(&[55]), None));
}

#[test]
fn input_is_consumed_across_the_whole_run() {
    let code = "var a; procedure r; ?a; begin call r; !a; call r; !a; ?a; !a end.";
    assert_eq!(run_both(code, &[7, 8, 9]), (memvals(&[7, 8, 9]), None));
    assert_eq!(run_both(code, &[7]), (memvals(&[7]), Some(ErrorKind::InputExhausted)));
}

#[test]
fn empty_statements() {
    assert_eq!(run_both("begin end.", &[]), (vec![], None));
    assert_eq!(run_both("begin !1; ; !2; end.", &[]), (memvals(&[1, 2]), None));
}

#[test]
fn keywords_ignore_case() {
    let code = "VAR x; Begin X := 2; !x END.";
    assert_eq!(run_both(code, &[]).1, Some(ErrorKind::UndeclaredName));
    assert_eq!(run_both("VAR x; Begin x := 2; !x END.", &[]), (memvals(&[2]), None));
}

#[test]
fn determinism() {
    let code = "var x, y; begin ?x; ?y; while x > 0 do begin !x * y; x := x - 1 end end.";

    let first = run_both(code, &[4, -3]);
    let second = run_both(code, &[4, -3]);
    assert_eq!(first, second);
    assert_eq!(first.0, memvals(&[-12, -9, -6, -3]));
}

#[test]
fn reparse_is_identical() {
    let code = "const k = 3; var a; procedure p; var b; begin b := a * k; a := b end; begin a := 2; call p; !a end.";

    let first = parser::parse_ast(code);
    let second = parser::parse_ast(code);
    assert!(first.is_ok());
    assert_eq!(first, second);
    assert_eq!(pl0::compile(code), pl0::compile(code));
}

#[test]
fn error_messages_carry_positions() {
    let error = pl0::compile("var x;\nbegin x := 1;\n  y := 2 end.").err().map(|e| e.to_string());
    assert_eq!(error.as_deref(), Some("compile error: 3:3: undeclared identifier `y`"));
}

#[test]
fn deep_recursion_matches_across_engines() {
    let code = "var n; procedure p; begin n := n - 1; if n > 0 then call p end; begin ?n; call p; !n end.";
    assert_eq!(run_both(code, &[100_000]), (memvals(&[0]), None));
}
