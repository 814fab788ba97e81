use crate::ast::*;

pub trait Visitable {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> Result<(), V::Err>;
}

impl Visitable for Program {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> Result<(), V::Err> {
        visitor.visit_program(self)
    }
}

impl Visitable for Block {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> Result<(), V::Err> {
        visitor.visit_block(self)
    }
}

impl Visitable for ProcDecl {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> Result<(), V::Err> {
        visitor.visit_procedure(self)
    }
}

impl Visitable for Statement {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> Result<(), V::Err> {
        visitor.visit_statement(self)
    }
}

impl Visitable for Condition {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> Result<(), V::Err> {
        visitor.visit_condition(self)
    }
}

impl Visitable for Expression {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> Result<(), V::Err> {
        visitor.visit_expression(self)
    }
}

impl Visitable for Term {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> Result<(), V::Err> {
        visitor.visit_term(self)
    }
}

impl Visitable for Factor {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> Result<(), V::Err> {
        visitor.visit_factor(self)
    }
}

/// Depth-first walk over a program. Every method defaults to visiting the
/// node's children in source order; only leaves must be provided.
pub trait Visitor: Sized {
    type Err;

    fn visit<V: Visitable>(&mut self, visitable: &V) -> Result<(), Self::Err> {
        visitable.accept(self)
    }

    fn visit_program(&mut self, program: &Program) -> Result<(), Self::Err> {
        self.visit(&program.block)
    }

    fn visit_block(&mut self, block: &Block) -> Result<(), Self::Err> {
        for procedure in &block.procedures {
            self.visit(procedure)?;
        }

        self.visit(&block.body)
    }

    fn visit_procedure(&mut self, procedure: &ProcDecl) -> Result<(), Self::Err> {
        self.visit(&procedure.block)
    }

    fn visit_assign_statement(&mut self, target: &Variable, expr: &Expression) -> Result<(), Self::Err> {
        self.visit(expr)?;
        self.visit_variable(target)
    }

    fn visit_call_statement(&mut self, _procedure: &ProcedureRef) -> Result<(), Self::Err> {
        Ok(())
    }

    fn visit_input_statement(&mut self, target: &Variable) -> Result<(), Self::Err> {
        self.visit_variable(target)
    }

    fn visit_output_statement(&mut self, expr: &Expression) -> Result<(), Self::Err> {
        self.visit(expr)
    }

    fn visit_compound_statement(&mut self, statements: &[Statement]) -> Result<(), Self::Err> {
        for statement in statements {
            self.visit(statement)?;
        }

        Ok(())
    }

    fn visit_if_statement(&mut self, condition: &Condition, then: &Statement) -> Result<(), Self::Err> {
        self.visit(condition)?;
        self.visit(then)
    }

    fn visit_while_statement(&mut self, condition: &Condition, body: &Statement) -> Result<(), Self::Err> {
        self.visit(condition)?;
        self.visit(body)
    }

    fn visit_empty_statement(&mut self) -> Result<(), Self::Err> {
        Ok(())
    }

    fn visit_statement(&mut self, statement: &Statement) -> Result<(), Self::Err> {
        match statement {
            Statement::Assign { target, expr } => self.visit_assign_statement(target, expr),
            Statement::Call { procedure } => self.visit_call_statement(procedure),
            Statement::Input { target } => self.visit_input_statement(target),
            Statement::Output { expr } => self.visit_output_statement(expr),
            Statement::Compound { statements } => self.visit_compound_statement(statements),
            Statement::If { condition, then } => self.visit_if_statement(condition, then),
            Statement::While { condition, body } => self.visit_while_statement(condition, body),
            Statement::Empty => self.visit_empty_statement(),
        }
    }

    fn visit_odd_condition(&mut self, expr: &Expression) -> Result<(), Self::Err> {
        self.visit(expr)
    }

    fn visit_compare_condition(&mut self, _op: RelOp, left: &Expression, right: &Expression) -> Result<(), Self::Err> {
        self.visit(left)?;
        self.visit(right)
    }

    fn visit_condition(&mut self, condition: &Condition) -> Result<(), Self::Err> {
        match condition {
            Condition::Odd { expr } => self.visit_odd_condition(expr),
            Condition::Compare { op, left, right } => self.visit_compare_condition(*op, left, right),
        }
    }

    fn visit_expression(&mut self, expr: &Expression) -> Result<(), Self::Err> {
        self.visit(&expr.first)?;
        for (_, term) in &expr.rest {
            self.visit(term)?;
        }

        Ok(())
    }

    fn visit_term(&mut self, term: &Term) -> Result<(), Self::Err> {
        self.visit(&term.first)?;
        for (_, factor) in &term.rest {
            self.visit(factor)?;
        }

        Ok(())
    }

    fn visit_factor(&mut self, factor: &Factor) -> Result<(), Self::Err> {
        match factor {
            Factor::Variable(variable) => self.visit_variable(variable),
            Factor::Constant { value, .. } => self.visit_number(*value),
            Factor::Number(value) => self.visit_number(*value),
            Factor::Paren(expr) => self.visit(expr.as_ref()),
        }
    }

    fn visit_variable(&mut self, variable: &Variable) -> Result<(), Self::Err>;
    fn visit_number(&mut self, num: i64) -> Result<(), Self::Err>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_ast;

    #[derive(Default)]
    struct Collector {
        variables: Vec<String>,
        numbers: Vec<i64>,
        calls: Vec<String>,
    }

    impl Visitor for Collector {
        type Err = ();

        fn visit_call_statement(&mut self, procedure: &ProcedureRef) -> Result<(), ()> {
            self.calls.push(procedure.name.clone());
            Ok(())
        }

        fn visit_variable(&mut self, variable: &Variable) -> Result<(), ()> {
            self.variables.push(variable.name.clone());
            Ok(())
        }

        fn visit_number(&mut self, num: i64) -> Result<(), ()> {
            self.numbers.push(num);
            Ok(())
        }
    }

    #[test]
    fn walks_in_source_order() {
        let program = parse_ast(r#"
            const k = 7;
            var a, b;
            procedure p;
                b := a * k;
            begin
                ?a;
                call p;
                if odd b then !(b + 1)
            end.
        "#).unwrap();

        let mut collector = Collector::default();
        program.accept(&mut collector).unwrap();

        assert_eq!(collector.variables, vec!["a", "b", "a", "b", "b"]);
        assert_eq!(collector.numbers, vec![7, 1]);
        assert_eq!(collector.calls, vec!["p"]);
    }
}
