use parser::ast::{self, ProcedureId};
use parser::ast::visitor::Visitor;
use std::collections::BTreeMap;
use thiserror::Error;
use virtual_machine::instruction::Instruction;

mod visitor_impl;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("jump at {at} targets label {label} which was never placed")]
    UnresolvedFixup { at: usize, label: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Label(usize);

/// An emitted instruction whose target is only known once `label` is placed.
#[derive(Debug)]
struct Fixup {
    at: usize,
    label: Label,
}

#[derive(Debug)]
pub struct CodeGenerator {
    instructions: Vec<Instruction>,
    labels: Vec<Option<usize>>,
    procedures: BTreeMap<ProcedureId, Label>,
    fixups: Vec<Fixup>,
}

impl CodeGenerator {
    fn new() -> Self {
        CodeGenerator {
            instructions: vec![],
            labels: vec![],
            procedures: BTreeMap::new(),
            fixups: vec![],
        }
    }

    fn here(&self) -> usize {
        self.instructions.len()
    }

    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    fn emit_to(&mut self, instruction: Instruction, label: Label) {
        let at = self.here();
        self.emit(instruction);
        self.fixups.push(Fixup { at, label });
    }

    fn new_label(&mut self) -> Label {
        self.labels.push(None);
        Label(self.labels.len() - 1)
    }

    fn place(&mut self, label: Label) {
        self.labels[label.0] = Some(self.here());
    }

    /// Entry label of a procedure, created on first use.
    fn procedure_label(&mut self, id: ProcedureId) -> Label {
        if let Some(label) = self.procedures.get(&id) {
            return *label;
        }

        let label = self.new_label();
        self.procedures.insert(id, label);
        label
    }

    fn resolve(mut self) -> Result<Vec<Instruction>, Error> {
        for Fixup { at, label } in self.fixups {
            let target = self.labels[label.0].ok_or(Error::UnresolvedFixup { at, label: label.0 })?;

            let instruction = &mut self.instructions[at];
            *instruction = match *instruction {
                Instruction::Jmp(_) => Instruction::Jmp(target),
                Instruction::Jpc(_) => Instruction::Jpc(target),
                Instruction::Cal { level, .. } => Instruction::Cal { level, address: target },
                other => other,
            };
        }

        Ok(self.instructions)
    }
}

/// Translate a resolved program into p-code. Execution starts at instruction 0
/// and every block's body ends with `OPR 0 0`.
pub fn generate(program: &ast::Program) -> Result<Vec<Instruction>, Error> {
    let mut generator = CodeGenerator::new();

    generator.visit(program)?;
    generator.resolve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use virtual_machine::instruction::Operation;

    use Instruction::*;

    fn compile(text: &str) -> Vec<Instruction> {
        let program = parser::parse_ast(text).expect("program should parse");
        generate(&program).expect("program should generate")
    }

    #[test]
    fn simplest_program() {
        assert_eq!(compile("."), vec![Jmp(1), Int(0), Opr(Operation::Return)]);
    }

    #[test]
    fn output_expression() {
        let code = compile("const k = 4; var x; begin x := -k + 2 * 3; !x end.");

        assert_eq!(code, vec![
            Jmp(1),
            Int(1),
            Lit(4),
            Opr(Operation::Neg),
            Lit(2),
            Lit(3),
            Opr(Operation::Mul),
            Opr(Operation::Add),
            Sto { level: 0, address: 0 },
            Lod { level: 0, address: 0 },
            Opr(Operation::Write),
            Opr(Operation::Return),
        ]);
    }

    #[test]
    fn while_loop_targets() {
        let code = compile("var x; begin ?x; while x > 0 do x := x - 1 end.");

        assert_eq!(code, vec![
            Jmp(1),
            Int(1),
            Opr(Operation::Read),
            Sto { level: 0, address: 0 },
            Lod { level: 0, address: 0 },
            Lit(0),
            Opr(Operation::Gt),
            Jpc(13),
            Lod { level: 0, address: 0 },
            Lit(1),
            Opr(Operation::Sub),
            Sto { level: 0, address: 0 },
            Jmp(4),
            Opr(Operation::Return),
        ]);
    }

    #[test]
    fn if_skips_body() {
        let code = compile("var x; if odd x then x := 1.");

        assert_eq!(code, vec![
            Jmp(1),
            Int(1),
            Lod { level: 0, address: 0 },
            Opr(Operation::Odd),
            Jpc(7),
            Lit(1),
            Sto { level: 0, address: 0 },
            Opr(Operation::Return),
        ]);
    }

    #[test]
    fn procedures_precede_body() {
        let code = compile("var x; procedure p; var y; begin y := 1; x := y end; call p.");

        assert_eq!(code, vec![
            Jmp(8),
            Jmp(2),
            Int(1),
            Lit(1),
            Sto { level: 0, address: 0 },
            Lod { level: 0, address: 0 },
            Sto { level: 1, address: 0 },
            Opr(Operation::Return),
            Int(1),
            Cal { level: 0, address: 1 },
            Opr(Operation::Return),
        ]);
    }

    #[test]
    fn recursive_call_targets_own_entry() {
        let code = compile("var n; procedure p; begin n := n - 1; if n > 0 then call p end; begin n := 3; call p end.");
        let entry = 1;

        assert!(code.contains(&Cal { level: 1, address: entry }));
        assert!(code.contains(&Cal { level: 0, address: entry }));
        assert_eq!(code[entry], Jmp(entry + 1));
    }

    #[test]
    fn nested_procedure_levels() {
        let code = compile("var a; procedure p; procedure q; a := 7; call q; begin call p; !a end.");

        assert!(code.contains(&Sto { level: 2, address: 0 }));
        assert!(code.contains(&Cal { level: 0, address: 2 }));
    }

    #[test]
    fn every_block_returns() {
        let code = compile("procedure a; ; procedure b; procedure c; ; ; .");
        let returns = code.iter().filter(|i| **i == Opr(Operation::Return)).count();

        assert_eq!(returns, 4);
    }

    #[test]
    fn unplaced_label() {
        let mut generator = CodeGenerator::new();
        let label = generator.new_label();
        generator.emit_to(Instruction::Jmp(0), label);

        assert_eq!(generator.resolve(), Err(Error::UnresolvedFixup { at: 0, label: 0 }));
    }
}
