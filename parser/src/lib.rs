extern crate pest;
#[macro_use]
extern crate pest_derive;

pub mod ast;
mod error;
pub mod lexer;
pub mod scope;

pub use crate::error::Error;

use std::fmt::Display;
use std::fs;
use std::path::Path;
use crate::ast::*;
use crate::lexer::{Keyword, Lexer, Operator, Position, Punctuation, Token, TokenKind};
use crate::scope::EntryKind;

type AstResult = Result<ast::Program, Error>;
type PResult<T> = Result<T, Error>;

/// Deepest allowed nesting of procedures, statements and parenthesized expressions.
pub const MAX_NESTING: usize = 256;

pub fn parse_file<P: AsRef<Path>>(path: P) -> AstResult {
    let program_text = fs::read_to_string(path).map_err(|e| Error::Io(e.to_string()))?;
    parse_ast(&program_text)
}

pub fn parse_ast(text: &str) -> AstResult {
    Parser::new(text)?.parse_program()
}

/// Recursive-descent parser, one method per grammar rule. Names are resolved
/// while parsing, so the produced tree carries level/address pairs.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    scopes: scope::Stack,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str) -> PResult<Self> {
        let mut lexer = Lexer::new(text);
        let current = lexer.next_token()?;

        Ok(Parser {
            lexer,
            current,
            scopes: scope::Stack::new(),
            depth: 0,
        })
    }

    fn advance(&mut self) -> PResult<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn unexpected<T, E: Display>(&self, expected: E) -> PResult<T> {
        Err(Error::Syntax {
            expected: expected.to_string(),
            found: self.current.kind.to_string(),
            position: self.current.position,
        })
    }

    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= MAX_NESTING {
            return self.unexpected(format!("at most {} levels of nesting", MAX_NESTING));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;

        result
    }

    fn check(&mut self, kind: &TokenKind) -> PResult<bool> {
        if &self.current.kind == kind {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> PResult<()> {
        if self.check(&kind)? {
            Ok(())
        } else {
            self.unexpected(kind)
        }
    }

    fn check_keyword(&mut self, keyword: Keyword) -> PResult<bool> {
        self.check(&TokenKind::Keyword(keyword))
    }

    fn check_punctuation(&mut self, punctuation: Punctuation) -> PResult<bool> {
        self.check(&TokenKind::Punctuation(punctuation))
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> PResult<()> {
        self.expect(TokenKind::Keyword(keyword))
    }

    fn expect_operator(&mut self, op: Operator) -> PResult<()> {
        self.expect(TokenKind::Operator(op))
    }

    fn expect_punctuation(&mut self, punctuation: Punctuation) -> PResult<()> {
        self.expect(TokenKind::Punctuation(punctuation))
    }

    fn expect_identifier(&mut self) -> PResult<(String, Position)> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            let position = self.advance()?.position;
            Ok((name, position))
        } else {
            self.unexpected("identifier")
        }
    }

    fn expect_number(&mut self) -> PResult<i64> {
        if let TokenKind::Number(value) = self.current.kind {
            self.advance()?;
            Ok(value)
        } else {
            self.unexpected("number")
        }
    }

    fn illegal_reference<T>(name: String, expected: &'static str, found: EntryKind, position: Position) -> PResult<T> {
        Err(Error::IllegalReference {
            name,
            expected,
            found: found.describe(),
            position,
        })
    }

    fn resolve_variable(&self, name: String, position: Position) -> PResult<Variable> {
        let resolution = self.scopes.resolve(&name, position)?;
        match resolution.entry.kind {
            EntryKind::Variable => Ok(Variable {
                name,
                level: resolution.level_difference,
                address: resolution.entry.address,
            }),
            kind => Self::illegal_reference(name, "variable", kind, position),
        }
    }

    fn resolve_procedure(&self, name: String, position: Position) -> PResult<ProcedureRef> {
        let resolution = self.scopes.resolve(&name, position)?;
        match resolution.entry.kind {
            EntryKind::Procedure => Ok(ProcedureRef {
                name,
                level: resolution.level_difference,
                id: resolution.entry.address,
            }),
            kind => Self::illegal_reference(name, "procedure", kind, position),
        }
    }

    /// program = block "." ;
    pub fn parse_program(mut self) -> AstResult {
        self.scopes.enter();
        let block = self.parse_block()?;
        self.scopes.exit();

        self.expect_punctuation(Punctuation::Period)?;
        if !self.current.is_end() {
            return self.unexpected(TokenKind::EndOfInput);
        }

        Ok(Program { block })
    }

    /// block = [ "const" ident "=" number {"," ident "=" number} ";" ]
    ///         [ "var" ident {"," ident} ";" ]
    ///         { "procedure" ident ";" block ";" } statement ;
    fn parse_block(&mut self) -> PResult<Block> {
        let mut constants = vec![];
        if self.check_keyword(Keyword::Const)? {
            loop {
                let (name, position) = self.expect_identifier()?;
                self.expect_operator(Operator::Equal)?;
                let value = self.expect_number()?;
                self.scopes.declare(&name, EntryKind::Constant(value), position)?;
                constants.push(ConstDecl { name, value });

                if !self.check_punctuation(Punctuation::Comma)? {
                    break;
                }
            }
            self.expect_punctuation(Punctuation::Semicolon)?;
        }

        let mut variables = vec![];
        if self.check_keyword(Keyword::Var)? {
            loop {
                let (name, position) = self.expect_identifier()?;
                self.scopes.declare(&name, EntryKind::Variable, position)?;
                variables.push(name);

                if !self.check_punctuation(Punctuation::Comma)? {
                    break;
                }
            }
            self.expect_punctuation(Punctuation::Semicolon)?;
        }

        let mut procedures = vec![];
        while self.check_keyword(Keyword::Procedure)? {
            procedures.push(self.parse_procedure()?);
        }

        let body = self.parse_statement()?;

        Ok(Block {
            constants,
            variables,
            procedures,
            body,
        })
    }

    fn parse_procedure(&mut self) -> PResult<ProcDecl> {
        let (name, position) = self.expect_identifier()?;
        // declared before the body so the procedure can call itself
        let entry = self.scopes.declare(&name, EntryKind::Procedure, position)?;
        self.expect_punctuation(Punctuation::Semicolon)?;

        self.scopes.enter();
        let block = self.nested(Self::parse_block)?;
        self.scopes.exit();

        self.expect_punctuation(Punctuation::Semicolon)?;

        Ok(ProcDecl {
            name,
            id: entry.address,
            block,
        })
    }

    /// statement = [ ident ":=" expression | "call" ident | "?" ident | "!" expression
    ///             | "begin" statement {";" statement } "end"
    ///             | "if" condition "then" statement
    ///             | "while" condition "do" statement ] ;
    fn parse_statement(&mut self) -> PResult<Statement> {
        match self.current.kind.clone() {
            TokenKind::Identifier(_) => {
                let (name, position) = self.expect_identifier()?;
                let target = self.resolve_variable(name, position)?;
                self.expect_operator(Operator::Assign)?;
                let expr = self.parse_expression()?;
                Ok(Statement::Assign { target, expr })
            },
            TokenKind::Keyword(Keyword::Call) => {
                self.advance()?;
                let (name, position) = self.expect_identifier()?;
                let procedure = self.resolve_procedure(name, position)?;
                Ok(Statement::Call { procedure })
            },
            TokenKind::Operator(Operator::Question) => {
                self.advance()?;
                let (name, position) = self.expect_identifier()?;
                let target = self.resolve_variable(name, position)?;
                Ok(Statement::Input { target })
            },
            TokenKind::Operator(Operator::Bang) => {
                self.advance()?;
                let expr = self.parse_expression()?;
                Ok(Statement::Output { expr })
            },
            TokenKind::Keyword(Keyword::Begin) => {
                self.advance()?;
                let mut statements = vec![self.nested(Self::parse_statement)?];
                while self.check_punctuation(Punctuation::Semicolon)? {
                    statements.push(self.nested(Self::parse_statement)?);
                }
                if !self.check_keyword(Keyword::End)? {
                    return self.unexpected("`;` or `end`");
                }
                Ok(Statement::Compound { statements })
            },
            TokenKind::Keyword(Keyword::If) => {
                self.advance()?;
                let condition = self.parse_condition()?;
                self.expect_keyword(Keyword::Then)?;
                let then = Box::new(self.nested(Self::parse_statement)?);
                Ok(Statement::If { condition, then })
            },
            TokenKind::Keyword(Keyword::While) => {
                self.advance()?;
                let condition = self.parse_condition()?;
                self.expect_keyword(Keyword::Do)?;
                let body = Box::new(self.nested(Self::parse_statement)?);
                Ok(Statement::While { condition, body })
            },
            _ => Ok(Statement::Empty),
        }
    }

    /// condition = "odd" expression | expression ("="|"#"|"<"|"<="|">"|">=") expression ;
    fn parse_condition(&mut self) -> PResult<Condition> {
        if self.check_keyword(Keyword::Odd)? {
            let expr = self.parse_expression()?;
            return Ok(Condition::Odd { expr });
        }

        let left = self.parse_expression()?;
        let op = match self.current.kind {
            TokenKind::Operator(Operator::Equal) => RelOp::Eq,
            TokenKind::Operator(Operator::Hash) => RelOp::Neq,
            TokenKind::Operator(Operator::Less) => RelOp::Lt,
            TokenKind::Operator(Operator::LessEqual) => RelOp::Leq,
            TokenKind::Operator(Operator::Greater) => RelOp::Gt,
            TokenKind::Operator(Operator::GreaterEqual) => RelOp::Geq,
            _ => return self.unexpected("comparison operator"),
        };
        self.advance()?;
        let right = self.parse_expression()?;

        Ok(Condition::Compare { op, left, right })
    }

    fn add_op(&self) -> Option<AddOp> {
        match self.current.kind {
            TokenKind::Operator(Operator::Plus) => Some(AddOp::Plus),
            TokenKind::Operator(Operator::Minus) => Some(AddOp::Minus),
            _ => None,
        }
    }

    fn mul_op(&self) -> Option<MulOp> {
        match self.current.kind {
            TokenKind::Operator(Operator::Times) => Some(MulOp::Times),
            TokenKind::Operator(Operator::Slash) => Some(MulOp::Div),
            _ => None,
        }
    }

    /// expression = [ "+"|"-"] term { ("+"|"-") term } ;
    fn parse_expression(&mut self) -> PResult<Expression> {
        let sign = self.add_op();
        if sign.is_some() {
            self.advance()?;
        }

        let first = self.parse_term()?;
        let mut rest = vec![];
        while let Some(op) = self.add_op() {
            self.advance()?;
            rest.push((op, self.parse_term()?));
        }

        Ok(Expression { sign, first, rest })
    }

    /// term = factor {("*"|"/") factor} ;
    fn parse_term(&mut self) -> PResult<Term> {
        let first = self.parse_factor()?;
        let mut rest = vec![];
        while let Some(op) = self.mul_op() {
            self.advance()?;
            rest.push((op, self.parse_factor()?));
        }

        Ok(Term { first, rest })
    }

    /// factor = ident | number | "(" expression ")" ;
    fn parse_factor(&mut self) -> PResult<Factor> {
        match self.current.kind.clone() {
            TokenKind::Identifier(_) => {
                let (name, position) = self.expect_identifier()?;
                let resolution = self.scopes.resolve(&name, position)?;
                match resolution.entry.kind {
                    EntryKind::Constant(value) => Ok(Factor::Constant { name, value }),
                    EntryKind::Variable => Ok(Factor::Variable(Variable {
                        name,
                        level: resolution.level_difference,
                        address: resolution.entry.address,
                    })),
                    kind => Self::illegal_reference(name, "constant or variable", kind, position),
                }
            },
            TokenKind::Number(value) => {
                self.advance()?;
                Ok(Factor::Number(value))
            },
            TokenKind::Punctuation(Punctuation::LeftParen) => {
                self.advance()?;
                let expr = self.nested(Self::parse_expression)?;
                self.expect_punctuation(Punctuation::RightParen)?;
                Ok(Factor::Paren(Box::new(expr)))
            },
            _ => self.unexpected("identifier, number or `(`"),
        }
    }
}
