use pl0::{run_ast, run_ir};
use virtual_machine::interpreter::{self, MemoryValue};
use test_data::TEST_DATA;

use std::fmt::{self, Write as _};

fn memval_vec<'a, I: IntoIterator<Item=&'a i64>>(iter: I) -> Vec<MemoryValue> {
    iter.into_iter().map(|v| interpreter::memval(*v)).collect()
}

fn print_readable_error(label: &str, output: &[MemoryValue], expected: &[MemoryValue]) -> ! {
    let len = output.len().max(expected.len());
    let readable_message: Result<_, fmt::Error> = (0..len)
        .fold(Ok(String::with_capacity(len * 23)), |buf, i| {
            let mut buf = buf?;
            match output.get(i) {
                Some(out) => write!(buf, "{:-8}", out)?,
                None => write!(buf, "  None  ")?,
            }

            write!(buf, " <=> ")?;

            match expected.get(i) {
                Some(exp) => write!(buf, "{}", exp)?,
                None => write!(buf, "  None  ")?,
            }

            writeln!(buf)?;

            Ok(buf)
        });

    panic!("{}: assertion failed: `(output == expected)`:\n{}", label, readable_message.expect("writing to String failed"));
}

fn check_success(code: &str, input: Vec<MemoryValue>, expected: &[MemoryValue]) {
    let (ast_output, ast_result) = run_ast(code, input.clone());
    let (ir_output, ir_result) = run_ir(code, input);

    assert!(ast_result.is_ok(), "tree interpreter failed: {:?}", ast_result);
    assert!(ir_result.is_ok(), "virtual machine failed: {:?}", ir_result);

    if ast_output != expected {
        print_readable_error("tree interpreter", &ast_output, expected);
    }
    if ir_output != expected {
        print_readable_error("virtual machine", &ir_output, expected);
    }
}

macro_rules! make_test {
    ($test_name:ident) => {
        #[test]
        fn $test_name() {
            let data = &TEST_DATA[stringify!($test_name)];

            for (input, expected) in data.valid_io.iter() {
                check_success(
                    data.text,
                    memval_vec(input),
                    memval_vec(expected).as_slice()
                );
            }
        }
    }
}

make_test!(factorial);
make_test!(fib);
make_test!(gcd);
make_test!(primes);
make_test!(bitstring);
make_test!(div_mod);
make_test!(numbers);
make_test!(nesting);
make_test!(collatz);
make_test!(power_mod);
make_test!(average);

fn check_same_failure(code: &str, input: &[i64]) {
    let (ast_output, ast_result) = run_ast(code, memval_vec(input));
    let (ir_output, ir_result) = run_ir(code, memval_vec(input));

    let ast_kind = ast_result.map_err(|e| e.kind()).err();
    let ir_kind = ir_result.map_err(|e| e.kind()).err();

    assert!(ast_kind.is_some(), "expected a failure for {:?}", code);
    assert_eq!(ast_kind, ir_kind);
    assert_eq!(ast_output, ir_output);
}

#[test]
fn failures_agree() {
    check_same_failure("var a; begin a := 1 / 0 end.", &[]);
    check_same_failure("var a, z; begin ?a; !a; !a / z; !a end.", &[3]);
    check_same_failure("var a; begin ?a; !a; ?a end.", &[1]);
    check_same_failure("var a; while 1 = 1 do begin ?a; !a * a end.", &[1, 2, 3]);
    check_same_failure("var n; procedure p; begin n := n - 1; if n > 0 then call p; !10 / n end; begin ?n; call p end.", &[3]);
    check_same_failure("var a; a := b.", &[]);
    check_same_failure("begin !1 end", &[]);
}

#[test]
fn every_corpus_program_compiles_to_returning_code() {
    use virtual_machine::instruction::{Instruction, Operation};

    for (name, data) in TEST_DATA.iter() {
        let code = pl0::compile(data.text).unwrap_or_else(|e| panic!("{} failed to compile: {}", name, e));
        assert_eq!(code.last(), Some(&Instruction::Opr(Operation::Return)), "{}", name);
    }
}
