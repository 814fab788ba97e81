use crate::instruction::Instruction;
use crate::interpreter::{MemoryValue, world, Interpreter, Error};
use std::rc::Rc;
use std::cell::RefCell;

pub fn run(instructions: Vec<Instruction>, input: Vec<MemoryValue>) -> Result<(u64, Vec<MemoryValue>), Error> {
    let (output, result) = run_collecting(instructions, input);
    result.map(|steps| (steps, output))
}

/// Like `run`, but keeps whatever was written before a fault.
pub fn run_collecting(instructions: Vec<Instruction>, input: Vec<MemoryValue>) -> (Vec<MemoryValue>, Result<u64, Error>) {
    let world = Rc::new(RefCell::new(world::MemoryWorld::new(input)));
    let mut interpreter = Interpreter::new(world::upcast(Rc::clone(&world)), instructions);
    let result = interpreter.interpret();
    let output = world.borrow().output().to_vec();

    (output, result)
}

pub fn run_interactive(instructions: Vec<Instruction>, verbose: bool) -> Result<u64, Error> {
    let world = Rc::new(RefCell::new(world::ConsoleWorld::new(verbose)));
    let mut interpreter = Interpreter::new(world::upcast(world), instructions);
    interpreter.interpret()
}

pub fn run_debug(instructions: Vec<Instruction>, input: Vec<MemoryValue>) -> (Result<(u64, Vec<MemoryValue>), Error>, Vec<String>) {
    let world = Rc::new(RefCell::new(world::MemoryWorld::with_logs(input)));
    let mut interpreter = Interpreter::new(world::upcast(Rc::clone(&world)), instructions);
    let result = interpreter.interpret();
    let logs = world.borrow().logs().map(str::to_owned).collect();

    let result = result.map(|steps| {
        let output = world.borrow().output().to_vec();
        (steps, output)
    });

    (result, logs)
}
