/// Program-wide index of a procedure declaration.
pub type ProcedureId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub constants: Vec<ConstDecl>,
    pub variables: Vec<String>,
    pub procedures: Vec<ProcDecl>,
    pub body: Statement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstDecl {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcDecl {
    pub name: String,
    pub id: ProcedureId,
    pub block: Block,
}

/// A resolved variable access: `level` static-link hops up from the frame of
/// the use site, then slot `address` in that frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub level: usize,
    pub address: usize,
}

/// A resolved procedure reference; `level` counts hops from the caller's
/// frame to the frame the procedure was declared in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureRef {
    pub name: String,
    pub level: usize,
    pub id: ProcedureId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Assign { target: Variable, expr: Expression },
    Call { procedure: ProcedureRef },
    Input { target: Variable },
    Output { expr: Expression },
    Compound { statements: Vec<Statement> },
    If { condition: Condition, then: Box<Statement> },
    While { condition: Condition, body: Box<Statement> },
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Neq,
    Lt,
    Leq,
    Gt,
    Geq,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Odd { expr: Expression },
    Compare { op: RelOp, left: Expression, right: Expression },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MulOp {
    Times,
    Div,
}

/// `[sign] first {op term}`, evaluated left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub sign: Option<AddOp>,
    pub first: Term,
    pub rest: Vec<(AddOp, Term)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub first: Factor,
    pub rest: Vec<(MulOp, Factor)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Factor {
    Variable(Variable),
    Constant { name: String, value: i64 },
    Number(i64),
    Paren(Box<Expression>),
}

impl Expression {
    pub fn simple(factor: Factor) -> Expression {
        Expression {
            sign: None,
            first: Term::simple(factor),
            rest: vec![],
        }
    }
}

impl Term {
    pub fn simple(factor: Factor) -> Term {
        Term {
            first: factor,
            rest: vec![],
        }
    }
}
