use pest::Parser;
use pest::iterators::Pair;
use pest_derive::*;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "assembler.pest"]
struct AssemblerParser;

use crate::instruction::{Instruction, Operation};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{0}")]
    Syntax(String),
    #[error("line {line}: invalid operand `{text}`")]
    InvalidOperand { line: usize, text: String },
    #[error("line {line}: unknown operation code {code}")]
    UnknownOperation { line: usize, code: i64 },
}

fn operand<T: std::str::FromStr>(pair: Option<Pair<Rule>>, line: usize) -> Result<T, Error> {
    let text = pair.map(|p| p.as_str()).unwrap_or_default();
    text.parse().map_err(|_| Error::InvalidOperand { line, text: text.to_owned() })
}

fn create_instruction(pair: Pair<Rule>) -> Result<Instruction, Error> {
    let line = pair.as_span().start_pos().line_col().0;
    let mut pairs = pair.into_inner().filter(|p| p.as_rule() != Rule::index);

    let mnemonic = pairs.next().map(|p| p.as_str().to_ascii_uppercase()).unwrap_or_default();
    let level = pairs.next();
    let argument = pairs.next();

    let instruction = match mnemonic.as_str() {
        "LIT" => Instruction::Lit(operand(argument, line)?),
        "OPR" => {
            let code = operand(argument, line)?;
            Instruction::Opr(Operation::from_code(code).ok_or(Error::UnknownOperation { line, code })?)
        },
        "LOD" => Instruction::Lod { level: operand(level, line)?, address: operand(argument, line)? },
        "STO" => Instruction::Sto { level: operand(level, line)?, address: operand(argument, line)? },
        "CAL" => Instruction::Cal { level: operand(level, line)?, address: operand(argument, line)? },
        "INT" => Instruction::Int(operand(argument, line)?),
        "JMP" => Instruction::Jmp(operand(argument, line)?),
        "JPC" => Instruction::Jpc(operand(argument, line)?),
        _ => unreachable!(),
    };

    Ok(instruction)
}

/// Read a program listing, one `MNEMONIC level argument` per line with an
/// optional `index:` prefix and `;` comments.
pub fn create_program(text: &str) -> Result<Vec<Instruction>, Error> {
    let assembler = AssemblerParser::parse(Rule::assembler, text)
        .map_err(|e| Error::Syntax(e.to_string()))?
        .next()
        .ok_or_else(|| Error::Syntax("empty listing".to_owned()))?;

    assembler.into_inner()
        .filter(|pair| pair.as_rule() == Rule::instruction)
        .map(create_instruction)
        .collect()
}
