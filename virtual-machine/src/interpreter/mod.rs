use std::cell::RefCell;
use std::fmt::{self, Debug, Formatter};
use std::rc::Rc;
use thiserror::Error;

use crate::instruction::{Instruction, Operation};
use crate::interpreter::world::World;
use crate::value;

pub use crate::value::{memval, MemoryValue};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("division by zero")]
    DivisionByZero,
    #[error("operand stack underflow")]
    StackUnderflow,
    #[error("instruction pointer {0} out of bounds")]
    InstructionPointerOutOfBound(usize),
    #[error("invalid frame slot {address} at level {level}")]
    InvalidAddress { level: usize, address: usize },
    #[error(transparent)]
    WorldError(#[from] world::Error),
}

type IResult = Result<(), Error>;

pub mod run;
pub mod world;

pub use run::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    Running,
    Halted,
    Faulted(Error),
}

/// Runtime frame of one block activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationRecord {
    /// Index of the record of the lexically enclosing block.
    pub static_link: usize,
    /// Index of the caller's record.
    pub dynamic_link: usize,
    pub return_address: usize,
    pub locals: Vec<MemoryValue>,
}

impl ActivationRecord {
    fn base() -> Self {
        ActivationRecord {
            static_link: 0,
            dynamic_link: 0,
            return_address: 0,
            locals: vec![],
        }
    }
}

pub struct Interpreter {
    world: Rc<RefCell<dyn World<MemoryValue>>>,
    steps: u64,
    instr_ptr: usize,
    program: Vec<Instruction>,
    stack: Vec<MemoryValue>,
    frames: Vec<ActivationRecord>,
    state: State,
}

impl Debug for Interpreter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Interpreter {{")?;
        writeln!(f, "    state: {:?}", self.state)?;
        writeln!(f, "    stack: {:?}", self.stack)?;
        writeln!(f, "    frames: {:?}", self.frames)?;
        writeln!(f, "    {}: {:?}", self.instr_ptr, self.program.get(self.instr_ptr))?;
        writeln!(f, "}}")
    }
}

impl Interpreter {
    pub fn new(world: Rc<RefCell<dyn World<MemoryValue>>>, program: Vec<Instruction>) -> Interpreter {
        Interpreter {
            world,
            steps: 0,
            instr_ptr: 0,
            program,
            stack: vec![],
            frames: vec![ActivationRecord::base()],
            state: State::Running,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn log(&self, args: fmt::Arguments) {
        self.world.borrow_mut().log(args);
    }

    fn pop(&mut self) -> Result<MemoryValue, Error> {
        self.stack.pop().ok_or(Error::StackUnderflow)
    }

    fn pop_pair(&mut self) -> Result<(MemoryValue, MemoryValue), Error> {
        let right = self.pop()?;
        let left = self.pop()?;
        Ok((left, right))
    }

    /// Follow `level` static links from the current record.
    fn frame_at(&self, level: usize) -> Result<usize, Error> {
        let mut frame = self.frames.len().checked_sub(1).ok_or(Error::StackUnderflow)?;
        for _ in 0..level {
            frame = self.frames[frame].static_link;
        }

        Ok(frame)
    }

    fn slot(&mut self, level: usize, address: usize) -> Result<&mut MemoryValue, Error> {
        let frame = self.frame_at(level)?;
        self.frames[frame]
            .locals
            .get_mut(address)
            .ok_or(Error::InvalidAddress { level, address })
    }

    fn binary<F: Fn(&MemoryValue, &MemoryValue) -> MemoryValue>(&mut self, f: F) -> IResult {
        let (left, right) = self.pop_pair()?;
        self.stack.push(f(&left, &right));
        Ok(())
    }

    fn compare<F: Fn(&MemoryValue, &MemoryValue) -> bool>(&mut self, f: F) -> IResult {
        self.binary(|a, b| value::from_bool(f(a, b)))
    }

    fn operate(&mut self, op: Operation) -> Result<bool, Error> {
        match op {
            Operation::Return => {
                let record = self.frames.pop().ok_or(Error::StackUnderflow)?;
                if self.frames.is_empty() {
                    return Ok(false);
                }
                self.frames.truncate(record.dynamic_link + 1);
                self.instr_ptr = record.return_address;
            },
            Operation::Neg => {
                let value = self.pop()?;
                self.stack.push(value::neg(&value));
            },
            Operation::Add => self.binary(value::add)?,
            Operation::Sub => self.binary(value::sub)?,
            Operation::Mul => self.binary(value::mul)?,
            Operation::Div => {
                let (left, right) = self.pop_pair()?;
                let quotient = value::div(&left, &right).ok_or(Error::DivisionByZero)?;
                self.stack.push(quotient);
            },
            Operation::Odd => {
                let value = self.pop()?;
                self.stack.push(value::from_bool(value::is_odd(&value)));
            },
            Operation::Eq => self.compare(|a, b| a == b)?,
            Operation::Neq => self.compare(|a, b| a != b)?,
            Operation::Lt => self.compare(|a, b| a < b)?,
            Operation::Geq => self.compare(|a, b| a >= b)?,
            Operation::Gt => self.compare(|a, b| a > b)?,
            Operation::Leq => self.compare(|a, b| a <= b)?,
            Operation::Write => {
                let value = self.pop()?;
                self.world.borrow_mut().put(&value)?;
            },
            Operation::Read => {
                let value = self.world.borrow_mut().get()?;
                self.log(format_args!("read: {}", value));
                self.stack.push(value);
            },
        }

        Ok(true)
    }

    pub fn interpret(&mut self) -> Result<u64, Error> {
        loop {
            match self.interpret_single() {
                Ok(true) => {},
                Ok(false) => return Ok(self.steps),
                Err(error) => return Err(error),
            }
        }
    }

    /// Execute one instruction; `Ok(false)` once the base record has returned.
    pub fn interpret_single(&mut self) -> Result<bool, Error> {
        match &self.state {
            State::Running => {},
            State::Halted => return Ok(false),
            State::Faulted(error) => return Err(error.clone()),
        }

        let result = self.execute();
        match &result {
            Ok(true) => {},
            Ok(false) => self.state = State::Halted,
            Err(error) => {
                self.log(format_args!("fault at {}: {}", self.instr_ptr, error));
                self.state = State::Faulted(error.clone());
            },
        }

        result
    }

    fn execute(&mut self) -> Result<bool, Error> {
        let instr = *self.program
            .get(self.instr_ptr)
            .ok_or(Error::InstructionPointerOutOfBound(self.instr_ptr))?;

        self.log(format_args!("{}: {} [depth {}, frames {}]", self.instr_ptr, instr, self.stack.len(), self.frames.len()));
        self.steps += 1;
        self.instr_ptr += 1;

        match instr {
            Instruction::Lit(value) => self.stack.push(memval(value)),
            Instruction::Opr(op) => return self.operate(op),
            Instruction::Lod { level, address } => {
                let value = self.slot(level, address)?.clone();
                self.stack.push(value);
            },
            Instruction::Sto { level, address } => {
                let value = self.pop()?;
                *self.slot(level, address)? = value;
            },
            Instruction::Cal { level, address } => {
                let static_link = self.frame_at(level)?;
                let record = ActivationRecord {
                    static_link,
                    dynamic_link: self.frames.len() - 1,
                    return_address: self.instr_ptr,
                    locals: vec![],
                };
                self.frames.push(record);
                self.instr_ptr = address;
            },
            Instruction::Int(size) => {
                let frame = self.frame_at(0)?;
                let locals = &mut self.frames[frame].locals;
                locals.resize(locals.len() + size, memval(0));
            },
            Instruction::Jmp(target) => self.instr_ptr = target,
            Instruction::Jpc(target) => {
                let condition = self.pop()?;
                if !value::is_true(&condition) {
                    self.instr_ptr = target;
                }
            },
        }

        Ok(true)
    }

    pub fn iter(self) -> InterpreterIter {
        InterpreterIter::new(self)
    }
}

pub struct InterpreterIter {
    interpreter: Interpreter,
}

impl InterpreterIter {
    fn new(interpreter: Interpreter) -> InterpreterIter {
        InterpreterIter {
            interpreter,
        }
    }
}

impl Iterator for InterpreterIter {
    type Item = IResult;

    fn next(&mut self) -> Option<Self::Item> {
        match self.interpreter.state() {
            State::Running => {},
            _ => return None,
        }

        match self.interpreter.interpret_single() {
            Ok(true) => Some(Ok(())),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

impl IntoIterator for Interpreter {
    type Item = <InterpreterIter as Iterator>::Item;
    type IntoIter = InterpreterIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
