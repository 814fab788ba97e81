use parser::ast::{AddOp, Block, Condition, Expression, Factor, MulOp, ProcedureId, ProcedureRef, Program, RelOp, Statement, Term, Variable};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;
use virtual_machine::interpreter::world::{self, World};
use virtual_machine::value::{self, memval, MemoryValue};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("division by zero")]
    DivisionByZero,
    #[error("call to undefined procedure `{0}`")]
    UndefinedProcedure(String),
    #[error("invalid access to `{name}` ({level} levels up, slot {address})")]
    InvalidAddress { name: String, level: usize, address: usize },
    #[error(transparent)]
    WorldError(#[from] world::Error),
}

type EResult<T> = Result<T, Error>;

/// Storage of one block activation.
#[derive(Debug)]
struct Frame {
    static_link: usize,
    slots: Vec<MemoryValue>,
}

impl Frame {
    fn new(static_link: usize, block: &Block) -> Self {
        Frame {
            static_link,
            slots: vec![memval(0); block.variables.len()],
        }
    }
}

/// Pending work of the evaluator.
#[derive(Debug, Clone, Copy)]
enum Task<'a> {
    Execute(&'a Statement),
    /// Test `condition` and, while it holds, run `body` again.
    Loop { condition: &'a Condition, body: &'a Statement },
    /// Leave the current procedure frame.
    Return,
}

/// Tree-walking interpreter. Runs a resolved program directly, with the same
/// observable behaviour as the compiled p-code.
pub struct Evaluator<'a> {
    world: Rc<RefCell<dyn World<MemoryValue>>>,
    procedures: BTreeMap<ProcedureId, &'a Block>,
    frames: Vec<Frame>,
    steps: u64,
}

impl<'a> Evaluator<'a> {
    pub fn new(world: Rc<RefCell<dyn World<MemoryValue>>>) -> Self {
        Evaluator {
            world,
            procedures: BTreeMap::new(),
            frames: vec![],
            steps: 0,
        }
    }

    /// Run `program` to completion and return the number of executed statements.
    pub fn execute(&mut self, program: &'a Program) -> EResult<u64> {
        self.collect(&program.block);

        self.frames.push(Frame::new(0, &program.block));
        let result = self.run(&program.block.body);
        self.frames.clear();

        if let Err(error) = &result {
            self.log(format_args!("fault: {}", error));
        }

        result.map(|_| self.steps)
    }

    fn collect(&mut self, block: &'a Block) {
        for procedure in &block.procedures {
            self.procedures.insert(procedure.id, &procedure.block);
            self.collect(&procedure.block);
        }
    }

    fn log(&self, args: fmt::Arguments) {
        self.world.borrow_mut().log(args);
    }

    fn frame_at(&self, level: usize) -> usize {
        let mut frame = self.frames.len() - 1;
        for _ in 0..level {
            frame = self.frames[frame].static_link;
        }

        frame
    }

    fn invalid(variable: &Variable) -> Error {
        Error::InvalidAddress {
            name: variable.name.clone(),
            level: variable.level,
            address: variable.address,
        }
    }

    fn load(&self, variable: &Variable) -> EResult<MemoryValue> {
        let frame = self.frame_at(variable.level);
        self.frames[frame]
            .slots
            .get(variable.address)
            .cloned()
            .ok_or_else(|| Self::invalid(variable))
    }

    fn store(&mut self, variable: &Variable, value: MemoryValue) -> EResult<()> {
        let frame = self.frame_at(variable.level);
        let slot = self.frames[frame]
            .slots
            .get_mut(variable.address)
            .ok_or_else(|| Self::invalid(variable))?;
        *slot = value;

        Ok(())
    }

    fn call(&mut self, procedure: &ProcedureRef) -> EResult<&'a Block> {
        let block = *self.procedures
            .get(&procedure.id)
            .ok_or_else(|| Error::UndefinedProcedure(procedure.name.clone()))?;

        let static_link = self.frame_at(procedure.level);
        self.frames.push(Frame::new(static_link, block));

        Ok(block)
    }

    /// Execute `body` in the current frame. Calls push work instead of
    /// recursing, so PL/0 recursion depth only grows heap-allocated stacks.
    fn run(&mut self, body: &'a Statement) -> EResult<()> {
        let mut tasks = vec![Task::Execute(body)];

        while let Some(task) = tasks.pop() {
            match task {
                Task::Execute(statement) => self.statement(statement, &mut tasks)?,
                Task::Loop { condition, body } => {
                    if self.condition(condition)? {
                        tasks.push(Task::Loop { condition, body });
                        tasks.push(Task::Execute(body));
                    }
                },
                Task::Return => {
                    self.frames.pop();
                },
            }
        }

        Ok(())
    }

    fn statement(&mut self, statement: &'a Statement, tasks: &mut Vec<Task<'a>>) -> EResult<()> {
        self.steps += 1;

        match statement {
            Statement::Assign { target, expr } => {
                self.log(format_args!("assign {} [frames {}]", target.name, self.frames.len()));
                let value = self.expression(expr)?;
                self.store(target, value)?;
            },
            Statement::Call { procedure } => {
                self.log(format_args!("call {} [frames {}]", procedure.name, self.frames.len()));
                let block = self.call(procedure)?;
                tasks.push(Task::Return);
                tasks.push(Task::Execute(&block.body));
            },
            Statement::Input { target } => {
                self.log(format_args!("input {} [frames {}]", target.name, self.frames.len()));
                let value = self.world.borrow_mut().get()?;
                self.log(format_args!("read: {}", value));
                self.store(target, value)?;
            },
            Statement::Output { expr } => {
                self.log(format_args!("output [frames {}]", self.frames.len()));
                let value = self.expression(expr)?;
                self.world.borrow_mut().put(&value)?;
            },
            Statement::Compound { statements } => {
                tasks.extend(statements.iter().rev().map(Task::Execute));
            },
            Statement::If { condition, then } => {
                if self.condition(condition)? {
                    tasks.push(Task::Execute(then));
                }
            },
            Statement::While { condition, body } => {
                tasks.push(Task::Loop { condition, body });
            },
            Statement::Empty => {},
        }

        Ok(())
    }

    fn condition(&self, condition: &Condition) -> EResult<bool> {
        match condition {
            Condition::Odd { expr } => Ok(value::is_odd(&self.expression(expr)?)),
            Condition::Compare { op, left, right } => {
                let left = self.expression(left)?;
                let right = self.expression(right)?;

                Ok(match op {
                    RelOp::Eq => left == right,
                    RelOp::Neq => left != right,
                    RelOp::Lt => left < right,
                    RelOp::Leq => left <= right,
                    RelOp::Gt => left > right,
                    RelOp::Geq => left >= right,
                })
            },
        }
    }

    fn expression(&self, expr: &Expression) -> EResult<MemoryValue> {
        let mut result = self.term(&expr.first)?;
        if expr.sign == Some(AddOp::Minus) {
            result = value::neg(&result);
        }

        for (op, term) in &expr.rest {
            let right = self.term(term)?;
            result = match op {
                AddOp::Plus => value::add(&result, &right),
                AddOp::Minus => value::sub(&result, &right),
            };
        }

        Ok(result)
    }

    fn term(&self, term: &Term) -> EResult<MemoryValue> {
        let mut result = self.factor(&term.first)?;

        for (op, factor) in &term.rest {
            let right = self.factor(factor)?;
            result = match op {
                MulOp::Times => value::mul(&result, &right),
                MulOp::Div => value::div(&result, &right).ok_or(Error::DivisionByZero)?,
            };
        }

        Ok(result)
    }

    fn factor(&self, factor: &Factor) -> EResult<MemoryValue> {
        match factor {
            Factor::Variable(variable) => self.load(variable),
            Factor::Constant { value, .. } => Ok(memval(*value)),
            Factor::Number(value) => Ok(memval(*value)),
            Factor::Paren(expr) => self.expression(expr),
        }
    }
}

/// Evaluate `program` against in-memory input, keeping whatever was written
/// before a fault.
pub fn run_collecting(program: &Program, input: Vec<MemoryValue>) -> (Vec<MemoryValue>, EResult<u64>) {
    let world = Rc::new(RefCell::new(world::MemoryWorld::new(input)));
    let mut evaluator = Evaluator::new(world::upcast(Rc::clone(&world)));
    let result = evaluator.execute(program);
    let output = world.borrow().output().to_vec();

    (output, result)
}

pub fn run(program: &Program, input: Vec<MemoryValue>) -> EResult<(u64, Vec<MemoryValue>)> {
    let (output, result) = run_collecting(program, input);
    result.map(|steps| (steps, output))
}

pub fn run_interactive(program: &Program, verbose: bool) -> EResult<u64> {
    let world = Rc::new(RefCell::new(world::ConsoleWorld::new(verbose)));
    let mut evaluator = Evaluator::new(world::upcast(world));
    evaluator.execute(program)
}
