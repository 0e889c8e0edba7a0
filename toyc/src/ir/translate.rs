//! Walks an [`ast::Program`] and produces the same symbol table and TAC the
//! syntax-directed parser produces for the same source.

use crate::error::CompileError;
use crate::ir::ast::{self, Assignment, Expression, Statement, Step};
use crate::ir::generator::TacGenerator;
use crate::ir::tac::{Instruction, Label, Operand};
use crate::symbols::{SymbolTable, SymbolType};

pub fn translate(
    program: &ast::Program,
    symbols: &mut SymbolTable,
    code: &mut TacGenerator,
) -> Result<(), CompileError> {
    let mut translator = Translator { symbols, code };
    for statement in &program.statements {
        translator.statement(statement)?;
    }
    Ok(())
}

struct Translator<'a> {
    symbols: &'a mut SymbolTable,
    code: &'a mut TacGenerator,
}

impl Translator<'_> {
    fn statement(&mut self, statement: &Statement) -> Result<(), CompileError> {
        match statement {
            Statement::Declaration { name, ty, init, line } => {
                self.symbols
                    .declare(name, ty.clone())
                    .map_err(|e| CompileError::semantic(*line, e))?;
                if let Some(init) = init {
                    let value = self.expression(init)?;
                    let temp = self.code.emit_to_temp(value);
                    self.code.emit(Instruction::Copy { dest: Operand::name(name), src: temp });
                }
            }
            Statement::Assign(assignment) => self.assignment(assignment)?,
            Statement::Print { value } => {
                let value = self.expression(value)?;
                self.code.emit(Instruction::Print(value));
            }
            Statement::If { condition, then_branch, else_branch } => {
                let id = self.code.next_label_id();
                let else_label = Label::numbered("else", id);
                let cond = self.expression(condition)?;
                self.code.emit(Instruction::IfNotGoto { cond, target: else_label.clone() });
                self.statement(then_branch)?;
                match else_branch {
                    Some(alternate) => {
                        let end_label = Label::numbered("endif", id);
                        self.code.emit(Instruction::Goto(end_label.clone()));
                        self.code.emit(Instruction::Label(else_label));
                        self.statement(alternate)?;
                        self.code.emit(Instruction::Label(end_label));
                    }
                    None => self.code.emit(Instruction::Label(else_label)),
                }
            }
            Statement::For { init, condition, step, body } => {
                let id = self.code.next_label_id();
                let start = Label::numbered("loop_start", id);
                let end = Label::numbered("loop_end", id);

                self.statement(init)?;
                self.code.emit(Instruction::Label(start.clone()));
                let cond = self.expression(condition)?;
                self.code.emit(Instruction::IfNotGoto { cond, target: end.clone() });

                // Temporaries of the step are numbered before the body's,
                // exactly as in the single-pass parser.
                let deferred = self.code.begin_deferred();
                let result = self.step(step);
                let step_code = self.code.end_deferred(deferred);
                result?;

                self.statement(body)?;
                self.code.emit_all(step_code);
                self.code.emit(Instruction::Goto(start));
                self.code.emit(Instruction::Label(end));
            }
            Statement::While { declaration, condition, body } => {
                let id = self.code.next_label_id();
                let start = Label::numbered("while_start", id);
                let end = Label::numbered("while_end", id);

                if let Some(declaration) = declaration {
                    self.statement(declaration)?;
                }
                self.code.emit(Instruction::Label(start.clone()));
                let cond = self.expression(condition)?;
                self.code.emit(Instruction::IfNotGoto { cond, target: end.clone() });
                self.statement(body)?;
                self.code.emit(Instruction::Goto(start));
                self.code.emit(Instruction::Label(end));
            }
            Statement::Return { value } => {
                let value = self.expression(value)?;
                self.code.emit(Instruction::Return(value));
            }
            Statement::Function { name, body, line } => {
                self.symbols
                    .declare(name, SymbolType::func())
                    .map_err(|e| CompileError::semantic(*line, e))?;
                self.code.emit(Instruction::FuncStart(name.clone()));
                for statement in body {
                    self.statement(statement)?;
                }
                self.code.emit(Instruction::FuncEnd(name.clone()));
            }
            Statement::Block(body) => {
                for statement in body {
                    self.statement(statement)?;
                }
            }
        }
        Ok(())
    }

    fn assignment(&mut self, assignment: &Assignment) -> Result<(), CompileError> {
        self.symbols
            .require(&assignment.target)
            .map_err(|e| CompileError::semantic(assignment.line, e))?;

        let index = match &assignment.index {
            Some(index) => Some(self.expression(index)?),
            None => None,
        };
        let value = self.expression(&assignment.value)?;

        match index {
            Some(index) => {
                let temp = self.code.emit_to_temp(value);
                self.code.emit(Instruction::Store {
                    value: temp,
                    array: assignment.target.clone(),
                    index,
                });
            }
            None => self.code.emit(Instruction::Copy {
                dest: Operand::name(&assignment.target),
                src: value,
            }),
        }
        Ok(())
    }

    fn step(&mut self, step: &Step) -> Result<(), CompileError> {
        match step {
            Step::Assign(assignment) => self.assignment(assignment),
            Step::Expression(expression) => self.expression(expression).map(|_| ()),
        }
    }

    fn expression(&mut self, expression: &Expression) -> Result<Operand, CompileError> {
        match expression {
            Expression::Number(text) => Ok(Operand::literal(text)),
            Expression::Str(text) => Ok(Operand::Str(text.clone())),
            Expression::Bool(value) => Ok(Operand::literal(value.to_string())),
            Expression::Variable { name, line } => {
                self.symbols
                    .require(name)
                    .map_err(|e| CompileError::semantic(*line, e))?;
                Ok(Operand::name(name))
            }
            Expression::Index { array, index, line } => {
                self.symbols
                    .require(array)
                    .map_err(|e| CompileError::semantic(*line, e))?;
                let index = self.expression(index)?;
                Ok(Operand::Element { array: array.clone(), index: Box::new(index) })
            }
            Expression::Binary { left, op, right } => {
                let lhs = self.expression(left)?;
                let rhs = self.expression(right)?;
                Ok(self.code.emit_binary(lhs, *op, rhs))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SemanticError;
    use crate::parser::lexer::tokenize;
    use crate::parser::{parse, parse_program};

    fn both_pipelines(source: &str) -> (Vec<String>, Vec<String>) {
        let tokens = tokenize(source).expect("lex");
        let mut direct_symbols = SymbolTable::new();
        let mut direct = TacGenerator::new();
        parse_program(&tokens, &mut direct_symbols, &mut direct).expect("direct");

        let program = parse(source).expect("parse");
        let mut tree_symbols = SymbolTable::new();
        let mut tree = TacGenerator::new();
        translate(&program, &mut tree_symbols, &mut tree).expect("translate");

        assert_eq!(direct_symbols, tree_symbols);
        let render = |code: &TacGenerator| -> Vec<String> {
            code.instructions().iter().map(|i| i.to_string()).collect()
        };
        (render(&direct), render(&tree))
    }

    #[test]
    fn pipelines_agree_on_a_full_program() {
        let source = r#"
            func main() {
                int total = 0;
                int xs[10];
                for (int i = 0; i < 10; i = i + 1) {
                    xs[i] = i * 2 + 1;
                    if (xs[i] > 5 && true) total = total + xs[i]; else print("small");
                }
                while (int k = 3; k != 0) { k = k - 1; }
                print((total + 1) / 2);
                return total;
            }
        "#;
        let (direct, tree) = both_pipelines(source);
        assert_eq!(direct, tree);
        assert!(direct.first().is_some_and(|l| l == "FUNC_START main"));
    }

    #[test]
    fn pipelines_agree_on_expression_steps() {
        let (direct, tree) = both_pipelines("int i; for (i = 0; i < 2; i + 1) { int j = i; }");
        assert_eq!(direct, tree);
    }

    #[test]
    fn semantic_errors_surface_in_source_order() {
        let program = parse("int a;\nx = a;\nint a;").expect("parse");
        let mut symbols = SymbolTable::new();
        let mut code = TacGenerator::new();
        let err = translate(&program, &mut symbols, &mut code).expect_err("must fail");
        assert!(matches!(
            err,
            CompileError::Semantic { line: 2, source: SemanticError::Undeclared { .. } }
        ));
    }

    #[test]
    fn function_name_cannot_be_redeclared() {
        let program = parse("int main;\nfunc main() { }").expect("parse");
        let mut symbols = SymbolTable::new();
        let mut code = TacGenerator::new();
        let err = translate(&program, &mut symbols, &mut code).expect_err("must fail");
        assert_eq!(err.to_string(), "Semantic error at line 2: variable 'main' is already declared");
    }
}
