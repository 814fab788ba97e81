use pest::Parser;
use std::fmt::{self, Display, Formatter};

use crate::error::Error;

#[derive(Parser)]
#[grammar = "lexer.pest"]
struct TokenParser;

/// Location of a token in the source text; `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Begin,
    Call,
    Const,
    Do,
    End,
    If,
    Odd,
    Procedure,
    Then,
    Var,
    While,
}

impl Keyword {
    fn from_text(text: &str) -> Keyword {
        use Keyword::*;
        match text.to_ascii_lowercase().as_str() {
            "begin" => Begin,
            "call" => Call,
            "const" => Const,
            "do" => Do,
            "end" => End,
            "if" => If,
            "odd" => Odd,
            "procedure" => Procedure,
            "then" => Then,
            "var" => Var,
            "while" => While,
            _ => unreachable!(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        use Keyword::*;
        match self {
            Begin => "begin",
            Call => "call",
            Const => "const",
            Do => "do",
            End => "end",
            If => "if",
            Odd => "odd",
            Procedure => "procedure",
            Then => "then",
            Var => "var",
            While => "while",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Assign,
    Plus,
    Minus,
    Times,
    Slash,
    Equal,
    Hash,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Question,
    Bang,
}

impl Operator {
    fn from_text(text: &str) -> Operator {
        use Operator::*;
        match text {
            ":=" => Assign,
            "+" => Plus,
            "-" => Minus,
            "*" => Times,
            "/" => Slash,
            "=" => Equal,
            "#" => Hash,
            "<" => Less,
            "<=" => LessEqual,
            ">" => Greater,
            ">=" => GreaterEqual,
            "?" => Question,
            "!" => Bang,
            _ => unreachable!(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        use Operator::*;
        match self {
            Assign => ":=",
            Plus => "+",
            Minus => "-",
            Times => "*",
            Slash => "/",
            Equal => "=",
            Hash => "#",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            Question => "?",
            Bang => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punctuation {
    Comma,
    Semicolon,
    Period,
    LeftParen,
    RightParen,
}

impl Punctuation {
    fn from_text(text: &str) -> Punctuation {
        use Punctuation::*;
        match text {
            "," => Comma,
            ";" => Semicolon,
            "." => Period,
            "(" => LeftParen,
            ")" => RightParen,
            _ => unreachable!(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        use Punctuation::*;
        match self {
            Comma => ",",
            Semicolon => ";",
            Period => ".",
            LeftParen => "(",
            RightParen => ")",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier(String),
    Number(i64),
    Operator(Operator),
    Punctuation(Punctuation),
    EndOfInput,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(keyword) => write!(f, "`{}`", keyword.as_str()),
            TokenKind::Identifier(name) => write!(f, "identifier `{}`", name),
            TokenKind::Number(value) => write!(f, "number {}", value),
            TokenKind::Operator(op) => write!(f, "`{}`", op.as_str()),
            TokenKind::Punctuation(punct) => write!(f, "`{}`", punct.as_str()),
            TokenKind::EndOfInput => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, position: Position) -> Self {
        Token {
            kind,
            position,
        }
    }

    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }
}

/// Lazy token stream over a source text.
///
/// Yields exactly one `EndOfInput` token (or the first error) and then stops.
/// Cloning a lexer snapshots its position, so a clone can be used to restart
/// scanning from that point.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    position: Position,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            position: Position::start(),
            finished: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.position.offset..]
    }

    fn advance(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
        self.position.offset += text.len();
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        let skipped = &rest[..rest.len() - trimmed.len()];
        self.advance(skipped);
    }

    pub fn next_token(&mut self) -> Result<Token, Error> {
        self.skip_whitespace();

        let position = self.position;
        let rest = self.rest();
        let found = match rest.chars().next() {
            Some(c) => c,
            None => return Ok(Token::new(TokenKind::EndOfInput, position)),
        };

        let pair = TokenParser::parse(Rule::token, rest)
            .ok()
            .and_then(|mut pairs| pairs.next())
            .and_then(|token| token.into_inner().next())
            .ok_or(Error::Lex { found, position })?;

        let text = pair.as_str();
        let kind = match pair.as_rule() {
            Rule::keyword => TokenKind::Keyword(Keyword::from_text(text)),
            Rule::ident => TokenKind::Identifier(text.to_owned()),
            Rule::number => {
                let value = text.parse().map_err(|_| Error::InvalidNumber {
                    literal: text.to_owned(),
                    position,
                })?;
                TokenKind::Number(value)
            },
            Rule::operator => TokenKind::Operator(Operator::from_text(text)),
            Rule::punctuation => TokenKind::Punctuation(Punctuation::from_text(text)),
            _ => unreachable!(),
        };

        self.advance(text);

        Ok(Token::new(kind, position))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let token = self.next_token();
        match &token {
            Ok(token) if !token.is_end() => {},
            _ => self.finished = true,
        }

        Some(token)
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    Lexer::new(source).collect()
}
