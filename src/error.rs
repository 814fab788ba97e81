use thiserror::Error;
use virtual_machine::interpreter::{self, world};
use crate::{code_generator, evaluator};

/// Flat classification of everything that can go wrong between source text
/// and a halted program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lex,
    Syntax,
    UndeclaredName,
    DuplicateDeclaration,
    IllegalReference,
    DivisionByZero,
    InputExhausted,
    InvalidInput,
    StackUnderflow,
    Io,
    InvalidProgram,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("compile error: {0}")]
    Compile(#[from] parser::Error),
    #[error("code generation failed: {0}")]
    Generate(#[from] code_generator::Error),
    #[error("runtime error: {0}")]
    Evaluate(#[from] evaluator::Error),
    #[error("runtime error: {0}")]
    Interpret(#[from] interpreter::Error),
}

fn world_kind(error: &world::Error) -> ErrorKind {
    match error {
        world::Error::InputExhausted => ErrorKind::InputExhausted,
        world::Error::InvalidInput(_) => ErrorKind::InvalidInput,
        world::Error::Output(_) => ErrorKind::Io,
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Compile(error) => match error {
                parser::Error::Lex { .. } | parser::Error::InvalidNumber { .. } => ErrorKind::Lex,
                parser::Error::Syntax { .. } => ErrorKind::Syntax,
                parser::Error::UndeclaredName { .. } => ErrorKind::UndeclaredName,
                parser::Error::DuplicateDeclaration { .. } => ErrorKind::DuplicateDeclaration,
                parser::Error::IllegalReference { .. } => ErrorKind::IllegalReference,
                parser::Error::Io(_) => ErrorKind::Io,
            },
            Error::Generate(_) => ErrorKind::InvalidProgram,
            Error::Evaluate(error) => match error {
                evaluator::Error::DivisionByZero => ErrorKind::DivisionByZero,
                evaluator::Error::UndefinedProcedure(_)
                | evaluator::Error::InvalidAddress { .. } => ErrorKind::InvalidProgram,
                evaluator::Error::WorldError(error) => world_kind(error),
            },
            Error::Interpret(error) => match error {
                interpreter::Error::DivisionByZero => ErrorKind::DivisionByZero,
                interpreter::Error::StackUnderflow => ErrorKind::StackUnderflow,
                interpreter::Error::InstructionPointerOutOfBound(_)
                | interpreter::Error::InvalidAddress { .. } => ErrorKind::InvalidProgram,
                interpreter::Error::WorldError(error) => world_kind(error),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_kinds_agree_across_engines() {
        let exhausted = world::Error::InputExhausted;

        assert_eq!(
            Error::from(evaluator::Error::WorldError(exhausted.clone())).kind(),
            Error::from(interpreter::Error::WorldError(exhausted)).kind(),
        );
        assert_eq!(
            Error::from(evaluator::Error::DivisionByZero).kind(),
            Error::from(interpreter::Error::DivisionByZero).kind(),
        );
    }

    #[test]
    fn compile_kinds() {
        let kind = |text: &str| parser::parse_ast(text).map_err(|e| Error::from(e).kind()).err();

        assert_eq!(kind("var x; x := 1"), Some(ErrorKind::Syntax));
        assert_eq!(kind("y := 1."), Some(ErrorKind::UndeclaredName));
        assert_eq!(kind("var x, x; ."), Some(ErrorKind::DuplicateDeclaration));
        assert_eq!(kind("const c = 1; c := 2."), Some(ErrorKind::IllegalReference));
        assert_eq!(kind("var x; x := 1 $ 2."), Some(ErrorKind::Lex));
        assert_eq!(kind("!99999999999999999999."), Some(ErrorKind::Lex));
    }
}
