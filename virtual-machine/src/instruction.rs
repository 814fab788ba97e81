use std::fmt::{self, Display, Formatter};

/// Operations selected by the `OPR` instruction, numbered with the classic
/// p-code codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Return,
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    Odd,
    Eq,
    Neq,
    Lt,
    Geq,
    Gt,
    Leq,
    Write,
    Read,
}

impl Operation {
    pub fn code(&self) -> i64 {
        use Operation::*;
        match self {
            Return => 0,
            Neg => 1,
            Add => 2,
            Sub => 3,
            Mul => 4,
            Div => 5,
            Odd => 6,
            Eq => 8,
            Neq => 9,
            Lt => 10,
            Geq => 11,
            Gt => 12,
            Leq => 13,
            Write => 14,
            Read => 16,
        }
    }

    pub fn from_code(code: i64) -> Option<Operation> {
        use Operation::*;
        let op = match code {
            0 => Return,
            1 => Neg,
            2 => Add,
            3 => Sub,
            4 => Mul,
            5 => Div,
            6 => Odd,
            8 => Eq,
            9 => Neq,
            10 => Lt,
            11 => Geq,
            12 => Gt,
            13 => Leq,
            14 => Write,
            16 => Read,
            _ => return None,
        };

        Some(op)
    }
}

/// A p-code instruction. `level` operands count static-link hops from the
/// current activation record; jump and call targets are instruction indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    Lit(i64),
    Opr(Operation),
    Lod { level: usize, address: usize },
    Sto { level: usize, address: usize },
    Cal { level: usize, address: usize },
    Int(usize),
    Jmp(usize),
    Jpc(usize),
}

impl Instruction {
    pub fn mnemonic(&self) -> &'static str {
        use Instruction::*;
        match self {
            Lit(_) => "LIT",
            Opr(_) => "OPR",
            Lod { .. } => "LOD",
            Sto { .. } => "STO",
            Cal { .. } => "CAL",
            Int(_) => "INT",
            Jmp(_) => "JMP",
            Jpc(_) => "JPC",
        }
    }

    /// Operands in `f l a` order.
    pub fn operands(&self) -> (usize, i64) {
        use Instruction::*;
        match *self {
            Lit(value) => (0, value),
            Opr(op) => (0, op.code()),
            Lod { level, address }
            | Sto { level, address }
            | Cal { level, address } => (level, address as i64),
            Int(size) => (0, size as i64),
            Jmp(target) | Jpc(target) => (0, target as i64),
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (level, argument) = self.operands();
        write!(f, "{} {} {}", self.mnemonic(), level, argument)
    }
}

/// Numbered program listing, readable back by `parser::create_program`.
pub struct Listing<'a>(pub &'a [Instruction]);

impl<'a> Display for Listing<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, instruction) in self.0.iter().enumerate() {
            writeln!(f, "{:4}: {}", index, instruction)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_format() {
        assert_eq!(Instruction::Lit(5).to_string(), "LIT 0 5");
        assert_eq!(Instruction::Opr(Operation::Add).to_string(), "OPR 0 2");
        assert_eq!(Instruction::Lod { level: 1, address: 3 }.to_string(), "LOD 1 3");
        assert_eq!(Instruction::Cal { level: 2, address: 17 }.to_string(), "CAL 2 17");
    }

    #[test]
    fn operation_codes_are_unique() {
        for code in 0..20 {
            if let Some(op) = Operation::from_code(code) {
                assert_eq!(op.code(), code);
            }
        }
        assert_eq!(Operation::from_code(7), None);
    }

    #[test]
    fn listing() {
        let program = [Instruction::Int(1), Instruction::Opr(Operation::Return)];
        assert_eq!(Listing(&program).to_string(), "   0: INT 0 1\n   1: OPR 0 0\n");
    }
}
