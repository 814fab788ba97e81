use thiserror::Error;

use crate::lexer::Position;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{position}: unrecognized character {found:?}")]
    Lex { found: char, position: Position },
    #[error("{position}: number literal `{literal}` is out of range")]
    InvalidNumber { literal: String, position: Position },
    #[error("{position}: expected {expected}, found {found}")]
    Syntax { expected: String, found: String, position: Position },
    #[error("{position}: undeclared identifier `{name}`")]
    UndeclaredName { name: String, position: Position },
    #[error("{position}: `{name}` is already declared in this block")]
    DuplicateDeclaration { name: String, position: Position },
    #[error("{position}: `{name}` is a {found}, expected a {expected}")]
    IllegalReference {
        name: String,
        expected: &'static str,
        found: &'static str,
        position: Position,
    },
    #[error("cannot read source: {0}")]
    Io(String),
}

impl Error {
    pub fn position(&self) -> Option<Position> {
        use Error::*;
        match self {
            Lex { position, .. }
            | InvalidNumber { position, .. }
            | Syntax { position, .. }
            | UndeclaredName { position, .. }
            | DuplicateDeclaration { position, .. }
            | IllegalReference { position, .. } => Some(*position),
            Io(_) => None,
        }
    }
}
