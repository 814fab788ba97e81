use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::{self, Display};
use std::io::{self, BufRead, BufReader, Write};
use std::marker::PhantomData;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("input exhausted")]
    InputExhausted,
    #[error("invalid input {0:?}")]
    InvalidInput(String),
    #[error("cannot write output: {0}")]
    Output(String),
}

/// The external streams a program runs against.
pub trait World<T> {
    fn get(&mut self) -> Result<T, Error>;
    fn put(&mut self, val: &T) -> Result<(), Error>;
    fn log(&mut self, message: fmt::Arguments);
}

pub fn upcast<T, W: World<T> + 'static>(world: Rc<RefCell<W>>) -> Rc<RefCell<dyn World<T>>> {
    world
}

/// Whitespace-separated integers from a reader, one per line to a writer.
/// Input is not line-scoped: values are consumed in order across lines.
#[derive(Debug)]
pub struct StreamWorld<R, W, T> {
    reader: R,
    writer: W,
    pending: VecDeque<String>,
    verbose: bool,
    phantom: PhantomData<T>,
}

pub type ConsoleWorld<T> = StreamWorld<BufReader<io::Stdin>, io::Stdout, T>;

impl<R: BufRead, W: Write, T> StreamWorld<R, W, T> {
    pub fn with_streams(reader: R, writer: W, verbose: bool) -> Self {
        StreamWorld {
            reader,
            writer,
            pending: VecDeque::new(),
            verbose,
            phantom: PhantomData,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn next_word(&mut self) -> Result<String, Error> {
        while self.pending.is_empty() {
            let mut buf = String::new();
            let read = self.reader
                .read_line(&mut buf)
                .map_err(|e| Error::InvalidInput(e.to_string()))?;
            if read == 0 {
                return Err(Error::InputExhausted);
            }
            self.pending.extend(buf.split_whitespace().map(str::to_owned));
        }

        self.pending.pop_front().ok_or(Error::InputExhausted)
    }
}

impl<T> ConsoleWorld<T> {
    pub fn new(verbose: bool) -> ConsoleWorld<T> {
        StreamWorld::with_streams(BufReader::new(io::stdin()), io::stdout(), verbose)
    }
}

impl<R: BufRead, W: Write, T: FromStr + Display> World<T> for StreamWorld<R, W, T> {
    fn get(&mut self) -> Result<T, Error> {
        let word = self.next_word()?;
        word.parse().map_err(|_| Error::InvalidInput(word))
    }

    fn put(&mut self, val: &T) -> Result<(), Error> {
        writeln!(self.writer, "{}", val)
            .and_then(|_| self.writer.flush())
            .map_err(|e| Error::Output(e.to_string()))
    }

    fn log(&mut self, message: fmt::Arguments) {
        if self.verbose {
            eprintln!("{}", message);
        }
    }
}

/// In-memory streams. Log lines are only kept when built with `with_logs`.
#[derive(Debug)]
pub struct MemoryWorld<T> {
    inputs: Vec<T>,
    outputs: Vec<T>,
    logs: Option<Vec<String>>,
}

impl<T> MemoryWorld<T> {
    pub fn new(mut inputs: Vec<T>) -> MemoryWorld<T> {
        inputs.reverse();
        MemoryWorld {
            inputs,
            outputs: vec![],
            logs: None,
        }
    }

    pub fn with_logs(inputs: Vec<T>) -> MemoryWorld<T> {
        MemoryWorld {
            logs: Some(vec![]),
            ..MemoryWorld::new(inputs)
        }
    }

    pub fn output(&self) -> &[T] {
        &self.outputs
    }

    pub fn logs(&self) -> impl Iterator<Item = &str> {
        self.logs.iter().flatten().map(|s| s.as_str())
    }
}

impl<T: Clone> World<T> for MemoryWorld<T> {
    fn get(&mut self) -> Result<T, Error> {
        self.inputs.pop().ok_or(Error::InputExhausted)
    }

    fn put(&mut self, val: &T) -> Result<(), Error> {
        self.outputs.push(val.clone());
        Ok(())
    }

    fn log(&mut self, message: fmt::Arguments) {
        if let Some(logs) = &mut self.logs {
            logs.push(message.to_string());
        }
    }
}
