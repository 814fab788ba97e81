use crate::error::Error;
use crate::lexer::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Constant(i64),
    Variable,
    Procedure,
}

impl EntryKind {
    pub fn describe(&self) -> &'static str {
        match self {
            EntryKind::Constant(_) => "constant",
            EntryKind::Variable => "variable",
            EntryKind::Procedure => "procedure",
        }
    }
}

/// A declared name.
///
/// `address` is the frame slot for variables and the program-wide procedure
/// id for procedures; constants occupy no slot and always have address 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    pub level: usize,
    pub address: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub entry: Entry,
    pub level_difference: usize,
}

#[derive(Debug, Default)]
struct Scope {
    entries: Vec<Entry>,
    slots: usize,
}

/// A stack of block scopes, innermost last.
#[derive(Debug, Default)]
pub struct Stack {
    scopes: Vec<Scope>,
    procedures: usize,
}

impl Stack {
    pub fn new() -> Self {
        Stack::default()
    }

    /// Enter a new empty block.
    pub fn enter(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Exit the current block, returning its entries in declaration order.
    /// Panics if the stack is empty.
    pub fn exit(&mut self) -> Vec<Entry> {
        self.scopes
            .pop()
            .expect("attempt to exit empty scope stack")
            .entries
    }

    /// Nesting level of the current block, 0 being the outermost.
    /// Panics if the stack is empty.
    pub fn level(&self) -> usize {
        self.scopes
            .len()
            .checked_sub(1)
            .expect("empty scope stack")
    }

    /// Number of variable slots declared so far in the current block.
    pub fn slots(&self) -> usize {
        self.scopes.last().map_or(0, |scope| scope.slots)
    }

    pub fn declare(&mut self, name: &str, kind: EntryKind, position: Position) -> Result<Entry, Error> {
        let level = self.level();
        let next_procedure = self.procedures;
        let scope = self.scopes.last_mut().expect("empty scope stack");

        if scope.entries.iter().any(|entry| entry.name == name) {
            return Err(Error::DuplicateDeclaration {
                name: name.to_owned(),
                position,
            });
        }

        let address = match kind {
            EntryKind::Constant(_) => 0,
            EntryKind::Variable => {
                scope.slots += 1;
                scope.slots - 1
            },
            EntryKind::Procedure => {
                self.procedures += 1;
                next_procedure
            },
        };

        let entry = Entry {
            name: name.to_owned(),
            kind,
            level,
            address,
        };
        scope.entries.push(entry.clone());

        Ok(entry)
    }

    /// Find the nearest enclosing declaration of `name`.
    pub fn resolve(&self, name: &str, position: Position) -> Result<Resolution, Error> {
        let current = self.level();

        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.entries.iter().find(|entry| entry.name == name))
            .map(|entry| Resolution {
                entry: entry.clone(),
                level_difference: current - entry.level,
            })
            .ok_or_else(|| Error::UndeclaredName {
                name: name.to_owned(),
                position,
            })
    }
}
