use std::cell::RefCell;
use std::rc::Rc;
use virtual_machine::interpreter::world::{self, MemoryWorld};
use virtual_machine::value::{memval, MemoryValue};
use crate::evaluator::{run, run_collecting, Error, Evaluator};

fn memvals(values: &[i64]) -> Vec<MemoryValue> {
    values.iter().cloned().map(memval).collect()
}

fn evaluate(text: &str, input: &[i64]) -> (Vec<MemoryValue>, Result<u64, Error>) {
    let program = parser::parse_ast(text).expect("program should parse");
    run_collecting(&program, memvals(input))
}

fn outputs(text: &str, input: &[i64]) -> Vec<MemoryValue> {
    let (output, result) = evaluate(text, input);
    assert!(result.is_ok(), "unexpected failure: {:?}", result);
    output
}

#[test]
fn arithmetic() {
    assert_eq!(outputs("!(7 - 2) * 3 + 10 / 4.", &[]), memvals(&[17]));
    assert_eq!(outputs("begin !(0 - 7) / 2; !7 / (0 - 2); !(0 - 7) / (0 - 2) end.", &[]), memvals(&[-4, -4, 3]));
}

#[test]
fn leading_sign_applies_to_first_term() {
    assert_eq!(outputs("!-2 * 3 + 10.", &[]), memvals(&[4]));
    assert_eq!(outputs("!-7 / 2.", &[]), memvals(&[-3]));
}

#[test]
fn input_and_conditions() {
    let text = "var x; begin ?x; if odd x then !1; if x # 4 then !2; if x >= 3 then !3 end.";
    assert_eq!(outputs(text, &[3]), memvals(&[1, 2, 3]));
    assert_eq!(outputs(text, &[4]), memvals(&[3]));
}

#[test]
fn while_loop() {
    let text = "var i; begin i := 0; while i < 3 do begin !i; i := i + 1 end end.";
    assert_eq!(outputs(text, &[]), memvals(&[0, 1, 2]));
}

#[test]
fn variables_start_at_zero() {
    assert_eq!(outputs("var a, b; begin !a; !b end.", &[]), memvals(&[0, 0]));
}

#[test]
fn outer_variable_through_static_link() {
    let text = "
        var x;
        procedure outer;
            var y;
            procedure inner;
                begin x := x + y; y := y + 1 end;
            begin y := 10; call inner; call inner end;
        begin x := 1; call outer; !x end.";

    assert_eq!(outputs(text, &[]), memvals(&[22]));
}

#[test]
fn shadowed_names_are_separate() {
    let text = "
        var x;
        procedure p;
            var x;
            begin x := 5; !x end;
        begin x := 1; call p; !x end.";

    assert_eq!(outputs(text, &[]), memvals(&[5, 1]));
}

#[test]
fn recursion_gets_fresh_locals() {
    let text = "
        var n, f;
        procedure fact;
            var m;
            begin
                m := n;
                if m > 1 then begin n := n - 1; call fact end;
                f := f * m
            end;
        begin ?n; f := 1; call fact; !f end.";

    assert_eq!(outputs(text, &[5]), memvals(&[120]));
}

#[test]
fn division_by_zero_keeps_earlier_output() {
    let (output, result) = evaluate("var z; begin !1; !1 / z; !2 end.", &[]);

    assert_eq!(result, Err(Error::DivisionByZero));
    assert_eq!(output, memvals(&[1]));
}

#[test]
fn input_exhausted() {
    let (output, result) = evaluate("var x; begin ?x; !x; ?x end.", &[9]);

    assert_eq!(result, Err(Error::WorldError(world::Error::InputExhausted)));
    assert_eq!(output, memvals(&[9]));
}

#[test]
fn counts_statements() {
    let program = parser::parse_ast("begin !1; !2 end.").expect("program should parse");
    assert_eq!(run(&program, vec![]), Ok((3, memvals(&[1, 2]))));
}

#[test]
fn logs_statements() {
    let program = parser::parse_ast("var x; begin x := 1; !x end.").expect("program should parse");
    let world = Rc::new(RefCell::new(MemoryWorld::with_logs(vec![])));
    let mut evaluator = Evaluator::new(world::upcast(Rc::clone(&world)));

    assert!(evaluator.execute(&program).is_ok());
    let logs: Vec<String> = world.borrow().logs().map(str::to_owned).collect();
    assert_eq!(logs, vec!["assign x [frames 1]", "output [frames 1]"]);
}

#[test]
fn deep_recursion_uses_heap_frames() {
    let text = "var n; procedure p; begin n := n - 1; if n > 0 then call p end; begin ?n; call p; !n end.";
    assert_eq!(outputs(text, &[200_000]), memvals(&[0]));
}
