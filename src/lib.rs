pub mod code_generator;
mod error;
pub mod evaluator;

pub use crate::error::{Error, ErrorKind};

use virtual_machine::instruction::Instruction;
use virtual_machine::interpreter::{self, MemoryValue};

/// Parse, resolve and translate PL/0 source into p-code.
pub fn compile(text: &str) -> Result<Vec<Instruction>, Error> {
    let program = parser::parse_ast(text)?;
    Ok(code_generator::generate(&program)?)
}

/// Interpret the source tree directly. Output written before a failure is
/// returned alongside it.
pub fn run_ast(text: &str, input: Vec<MemoryValue>) -> (Vec<MemoryValue>, Result<u64, Error>) {
    let program = match parser::parse_ast(text) {
        Ok(program) => program,
        Err(error) => return (vec![], Err(error.into())),
    };

    let (output, result) = evaluator::run_collecting(&program, input);
    (output, result.map_err(Error::from))
}

/// Compile to p-code and run it on the virtual machine.
pub fn run_ir(text: &str, input: Vec<MemoryValue>) -> (Vec<MemoryValue>, Result<u64, Error>) {
    let program = match compile(text) {
        Ok(program) => program,
        Err(error) => return (vec![], Err(error)),
    };

    let (output, result) = interpreter::run_collecting(program, input);
    (output, result.map_err(Error::from))
}
