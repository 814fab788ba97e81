use parser::ast::visitor::Visitor;
use parser::ast::{self, AddOp, MulOp, RelOp};
use virtual_machine::instruction::{Instruction, Operation};
use super::{CodeGenerator, Error};

fn relation(op: RelOp) -> Operation {
    match op {
        RelOp::Eq => Operation::Eq,
        RelOp::Neq => Operation::Neq,
        RelOp::Lt => Operation::Lt,
        RelOp::Leq => Operation::Leq,
        RelOp::Gt => Operation::Gt,
        RelOp::Geq => Operation::Geq,
    }
}

impl CodeGenerator {
    fn store(&mut self, target: &ast::Variable) {
        self.emit(Instruction::Sto { level: target.level, address: target.address });
    }
}

impl Visitor for CodeGenerator {
    type Err = Error;

    fn visit_block(&mut self, block: &ast::Block) -> Result<(), Self::Err> {
        let body = self.new_label();
        self.emit_to(Instruction::Jmp(0), body);

        for procedure in &block.procedures {
            self.visit(procedure)?;
        }

        self.place(body);
        self.emit(Instruction::Int(block.variables.len()));
        self.visit(&block.body)?;
        self.emit(Instruction::Opr(Operation::Return));

        Ok(())
    }

    fn visit_procedure(&mut self, procedure: &ast::ProcDecl) -> Result<(), Self::Err> {
        let entry = self.procedure_label(procedure.id);
        self.place(entry);
        self.visit(&procedure.block)
    }

    fn visit_assign_statement(&mut self, target: &ast::Variable, expr: &ast::Expression) -> Result<(), Self::Err> {
        self.visit(expr)?;
        self.store(target);
        Ok(())
    }

    fn visit_call_statement(&mut self, procedure: &ast::ProcedureRef) -> Result<(), Self::Err> {
        let entry = self.procedure_label(procedure.id);
        self.emit_to(Instruction::Cal { level: procedure.level, address: 0 }, entry);
        Ok(())
    }

    fn visit_input_statement(&mut self, target: &ast::Variable) -> Result<(), Self::Err> {
        self.emit(Instruction::Opr(Operation::Read));
        self.store(target);
        Ok(())
    }

    fn visit_output_statement(&mut self, expr: &ast::Expression) -> Result<(), Self::Err> {
        self.visit(expr)?;
        self.emit(Instruction::Opr(Operation::Write));
        Ok(())
    }

    fn visit_if_statement(&mut self, condition: &ast::Condition, then: &ast::Statement) -> Result<(), Self::Err> {
        let end = self.new_label();

        self.visit(condition)?;
        self.emit_to(Instruction::Jpc(0), end);
        self.visit(then)?;
        self.place(end);

        Ok(())
    }

    fn visit_while_statement(&mut self, condition: &ast::Condition, body: &ast::Statement) -> Result<(), Self::Err> {
        let start = self.here();
        let end = self.new_label();

        self.visit(condition)?;
        self.emit_to(Instruction::Jpc(0), end);
        self.visit(body)?;
        self.emit(Instruction::Jmp(start));
        self.place(end);

        Ok(())
    }

    fn visit_odd_condition(&mut self, expr: &ast::Expression) -> Result<(), Self::Err> {
        self.visit(expr)?;
        self.emit(Instruction::Opr(Operation::Odd));
        Ok(())
    }

    fn visit_compare_condition(&mut self, op: RelOp, left: &ast::Expression, right: &ast::Expression) -> Result<(), Self::Err> {
        self.visit(left)?;
        self.visit(right)?;
        self.emit(Instruction::Opr(relation(op)));
        Ok(())
    }

    fn visit_expression(&mut self, expr: &ast::Expression) -> Result<(), Self::Err> {
        self.visit(&expr.first)?;
        if expr.sign == Some(AddOp::Minus) {
            self.emit(Instruction::Opr(Operation::Neg));
        }

        for (op, term) in &expr.rest {
            self.visit(term)?;
            let operation = match op {
                AddOp::Plus => Operation::Add,
                AddOp::Minus => Operation::Sub,
            };
            self.emit(Instruction::Opr(operation));
        }

        Ok(())
    }

    fn visit_term(&mut self, term: &ast::Term) -> Result<(), Self::Err> {
        self.visit(&term.first)?;

        for (op, factor) in &term.rest {
            self.visit(factor)?;
            let operation = match op {
                MulOp::Times => Operation::Mul,
                MulOp::Div => Operation::Div,
            };
            self.emit(Instruction::Opr(operation));
        }

        Ok(())
    }

    fn visit_variable(&mut self, variable: &ast::Variable) -> Result<(), Self::Err> {
        self.emit(Instruction::Lod { level: variable.level, address: variable.address });
        Ok(())
    }

    fn visit_number(&mut self, num: i64) -> Result<(), Self::Err> {
        self.emit(Instruction::Lit(num));
        Ok(())
    }
}
