use pl0::{code_generator, evaluator, Error};
use std::env;
use std::process;
use virtual_machine::instruction::Listing;
use virtual_machine::interpreter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Ast,
    Ir,
    Listing,
}

fn run_file(path: &str, mode: Mode, verbose: bool) -> Result<(), Error> {
    let program = parser::parse_file(path)?;

    let steps = match mode {
        Mode::Ast => evaluator::run_interactive(&program, verbose)?,
        Mode::Ir => {
            let instructions = code_generator::generate(&program)?;
            interpreter::run_interactive(instructions, verbose)?
        },
        Mode::Listing => {
            let instructions = code_generator::generate(&program)?;
            print!("{}", Listing(&instructions));
            return Ok(());
        },
    };

    if verbose {
        eprintln!("halted after {} steps", steps);
    }

    Ok(())
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} [-v] [--ast | --ir | --listing] <filename>", program);
    process::exit(2)
}

fn main() {
    let args: Vec<_> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("pl0");

    let mut mode = Mode::Ir;
    let mut verbose = false;
    let mut path = None;

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "-v" => verbose = true,
            "--ast" => mode = Mode::Ast,
            "--ir" => mode = Mode::Ir,
            "--listing" => mode = Mode::Listing,
            flag if flag.starts_with('-') => usage(program),
            file if path.is_none() => path = Some(file),
            _ => usage(program),
        }
    }

    let path = path.unwrap_or_else(|| usage(program));

    if let Err(error) = run_file(path, mode, verbose) {
        eprintln!("error[{:?}]: {}", error.kind(), error);
        process::exit(1);
    }
}
