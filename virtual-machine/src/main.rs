use std::env;
use std::fs;
use std::process;

use virtual_machine::{interpreter, parser};

fn run_listing(path: &str, verbose: bool) -> Result<u64, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path, e))?;
    let program = parser::create_program(&text).map_err(|e| format!("assembler error: {}", e))?;

    interpreter::run_interactive(program, verbose).map_err(|e| format!("runtime error: {}", e))
}

fn main() {
    let args: Vec<_> = env::args().collect();

    let result = match args.len() {
        2 => run_listing(&args[1], false),
        3 if args[1] == "-v" => run_listing(&args[2], true),
        _ => {
            eprintln!("Usage: {} [-v] <listing>", args[0]);
            process::exit(2);
        },
    };

    match result {
        Ok(steps) => eprintln!("halted after {} steps", steps),
        Err(message) => {
            eprintln!("{}", message);
            process::exit(1);
        },
    }
}
