//! Syntax-directed translation: every reduction updates the symbol table and
//! appends TAC immediately, no tree is built.

use crate::error::CompileError;
use crate::ir::generator::TacGenerator;
use crate::ir::tac::{Instruction, Label, Operand};
use crate::symbols::{SymbolTable, SymbolType};

use super::cursor::{self, Cursor};
use super::lexer::{Token, TokenKind};
use super::{array_size, base_type};

pub fn parse_program(
    tokens: &[Token],
    symbols: &mut SymbolTable,
    code: &mut TacGenerator,
) -> Result<(), CompileError> {
    let mut parser = Parser {
        cursor: Cursor::new(tokens)?,
        symbols,
        code,
    };
    parser.parse_program()
}

struct Parser<'a> {
    cursor: Cursor<'a>,
    symbols: &'a mut SymbolTable,
    code: &'a mut TacGenerator,
}

impl Parser<'_> {
    fn parse_program(&mut self) -> Result<(), CompileError> {
        while !self.cursor.is_at_end() {
            self.parse_statement()?;
        }
        Ok(())
    }

    fn parse_statement(&mut self) -> Result<(), CompileError> {
        let token = self.cursor.peek();
        match token.kind {
            kind if kind.is_type_keyword() => self.parse_declaration(),
            TokenKind::Identifier if token.lexeme == "print" => self.parse_print(),
            TokenKind::Identifier => self.parse_assignment(),
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Func => self.parse_function(),
            TokenKind::LBrace => self.parse_block(),
            _ => Err(self.cursor.error("statement")),
        }
    }

    fn parse_declaration(&mut self) -> Result<(), CompileError> {
        let type_token = self.cursor.advance();
        let base = base_type(type_token)?;
        let name = self.cursor.expect(TokenKind::Identifier, "identifier")?;

        let ty = match array_size(&mut self.cursor)? {
            Some(size) => SymbolType::array(base, size),
            None => SymbolType::scalar(base),
        };
        self.symbols
            .declare(&name.lexeme, ty)
            .map_err(|e| CompileError::semantic(name.line(), e))?;

        if self.cursor.eat(TokenKind::Assign).is_some() {
            let value = self.parse_logical()?;
            let temp = self.code.emit_to_temp(value);
            self.code.emit(Instruction::Copy {
                dest: Operand::name(&name.lexeme),
                src: temp,
            });
        }

        self.cursor.expect(TokenKind::Semicolon, "';'")?;
        Ok(())
    }

    fn parse_print(&mut self) -> Result<(), CompileError> {
        self.cursor.advance(); // consume 'print'
        self.cursor.expect(TokenKind::LParen, "'('")?;
        let value = self.parse_logical()?;
        self.cursor.expect(TokenKind::RParen, "')'")?;
        self.cursor.expect(TokenKind::Semicolon, "';'")?;
        self.code.emit(Instruction::Print(value));
        Ok(())
    }

    fn parse_assignment(&mut self) -> Result<(), CompileError> {
        self.parse_assignment_body()?;
        self.cursor.expect(TokenKind::Semicolon, "';'")?;
        Ok(())
    }

    /// `name [ '[' expr ']' ] = expr` without the terminating `;`.
    fn parse_assignment_body(&mut self) -> Result<(), CompileError> {
        let target = self.cursor.expect(TokenKind::Identifier, "identifier")?;
        self.symbols
            .require(&target.lexeme)
            .map_err(|e| CompileError::semantic(target.line(), e))?;

        let index = if self.cursor.eat(TokenKind::LBracket).is_some() {
            let index = self.parse_logical()?;
            self.cursor.expect(TokenKind::RBracket, "']'")?;
            Some(index)
        } else {
            None
        };

        self.cursor.expect(TokenKind::Assign, "'='")?;
        let value = self.parse_logical()?;

        match index {
            Some(index) => {
                let temp = self.code.emit_to_temp(value);
                self.code.emit(Instruction::Store {
                    value: temp,
                    array: target.lexeme.clone(),
                    index,
                });
            }
            None => self.code.emit(Instruction::Copy {
                dest: Operand::name(&target.lexeme),
                src: value,
            }),
        }
        Ok(())
    }

    fn parse_if(&mut self) -> Result<(), CompileError> {
        let id = self.code.next_label_id();
        let else_label = Label::numbered("else", id);

        self.cursor.advance(); // consume 'if'
        self.cursor.expect(TokenKind::LParen, "'('")?;
        let condition = self.parse_logical()?;
        self.cursor.expect(TokenKind::RParen, "')'")?;
        self.code.emit(Instruction::IfNotGoto { cond: condition, target: else_label.clone() });

        self.parse_statement()?;

        if self.cursor.eat(TokenKind::Else).is_some() {
            let end_label = Label::numbered("endif", id);
            self.code.emit(Instruction::Goto(end_label.clone()));
            self.code.emit(Instruction::Label(else_label));
            self.parse_statement()?;
            self.code.emit(Instruction::Label(end_label));
        } else {
            self.code.emit(Instruction::Label(else_label));
        }
        Ok(())
    }

    fn parse_for(&mut self) -> Result<(), CompileError> {
        let id = self.code.next_label_id();
        let start = Label::numbered("loop_start", id);
        let end = Label::numbered("loop_end", id);

        self.cursor.advance(); // consume 'for'
        self.cursor.expect(TokenKind::LParen, "'('")?;

        // Инициализация: объявление или присваивание, вместе с ';'
        match self.cursor.peek_kind() {
            kind if kind.is_type_keyword() => self.parse_declaration()?,
            TokenKind::Identifier => self.parse_assignment()?,
            _ => return Err(self.cursor.error("declaration or assignment")),
        }

        self.code.emit(Instruction::Label(start.clone()));
        let condition = self.parse_logical()?;
        self.cursor.expect(TokenKind::Semicolon, "';'")?;
        self.code.emit(Instruction::IfNotGoto { cond: condition, target: end.clone() });

        // The step is parsed before the body but runs after it.
        let deferred = self.code.begin_deferred();
        let step = self.parse_step();
        let step_code = self.code.end_deferred(deferred);
        step?;

        self.cursor.expect(TokenKind::RParen, "')'")?;
        self.parse_statement()?;

        self.code.emit_all(step_code);
        self.code.emit(Instruction::Goto(start));
        self.code.emit(Instruction::Label(end));
        Ok(())
    }

    fn parse_step(&mut self) -> Result<(), CompileError> {
        if self.cursor.at_assignment() {
            self.parse_assignment_body()
        } else {
            self.parse_logical().map(|_| ())
        }
    }

    fn parse_while(&mut self) -> Result<(), CompileError> {
        let id = self.code.next_label_id();
        let start = Label::numbered("while_start", id);
        let end = Label::numbered("while_end", id);

        self.cursor.advance(); // consume 'while'
        self.cursor.expect(TokenKind::LParen, "'('")?;
        if self.cursor.peek_kind().is_type_keyword() {
            self.parse_declaration()?;
        }

        self.code.emit(Instruction::Label(start.clone()));
        let condition = self.parse_logical()?;
        self.cursor.expect(TokenKind::RParen, "')'")?;
        self.code.emit(Instruction::IfNotGoto { cond: condition, target: end.clone() });

        self.parse_statement()?;

        self.code.emit(Instruction::Goto(start));
        self.code.emit(Instruction::Label(end));
        Ok(())
    }

    fn parse_return(&mut self) -> Result<(), CompileError> {
        self.cursor.advance(); // consume 'return'
        let value = self.parse_logical()?;
        self.cursor.expect(TokenKind::Semicolon, "';'")?;
        self.code.emit(Instruction::Return(value));
        Ok(())
    }

    fn parse_function(&mut self) -> Result<(), CompileError> {
        self.cursor.advance(); // consume 'func'
        let name = self.cursor.expect(TokenKind::Identifier, "function name")?;
        self.cursor.expect(TokenKind::LParen, "'('")?;
        self.cursor.expect(TokenKind::RParen, "')' (functions take no parameters)")?;

        self.symbols
            .declare(&name.lexeme, SymbolType::func())
            .map_err(|e| CompileError::semantic(name.line(), e))?;

        self.code.emit(Instruction::FuncStart(name.lexeme.clone()));
        self.parse_block()?;
        self.code.emit(Instruction::FuncEnd(name.lexeme.clone()));
        Ok(())
    }

    fn parse_block(&mut self) -> Result<(), CompileError> {
        self.cursor.expect(TokenKind::LBrace, "'{'")?;
        while !self.cursor.check(TokenKind::RBrace) && !self.cursor.is_at_end() {
            self.parse_statement()?;
        }
        self.cursor.expect(TokenKind::RBrace, "'}'")?;
        Ok(())
    }

    fn parse_logical(&mut self) -> Result<Operand, CompileError> {
        let mut left = self.parse_expression()?;
        while let Some(op) = self.cursor.eat_operator(cursor::LOGICAL) {
            let right = self.parse_expression()?;
            left = self.code.emit_binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_expression(&mut self) -> Result<Operand, CompileError> {
        let mut left = self.parse_term()?;
        while let Some(op) = self.cursor.eat_operator(cursor::ADDITIVE) {
            let right = self.parse_term()?;
            left = self.code.emit_binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Operand, CompileError> {
        let mut left = self.parse_factor()?;
        while let Some(op) = self.cursor.eat_operator(cursor::MULTIPLICATIVE) {
            let right = self.parse_factor()?;
            left = self.code.emit_binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Operand, CompileError> {
        let token = self.cursor.peek();
        match token.kind {
            TokenKind::Number | TokenKind::True | TokenKind::False => {
                self.cursor.advance();
                Ok(Operand::literal(&token.lexeme))
            }
            TokenKind::StringLiteral => {
                self.cursor.advance();
                Ok(Operand::Str(token.lexeme.clone()))
            }
            TokenKind::Identifier => {
                self.cursor.advance();
                self.symbols
                    .require(&token.lexeme)
                    .map_err(|e| CompileError::semantic(token.line(), e))?;

                if self.cursor.eat(TokenKind::LBracket).is_some() {
                    let index = self.parse_logical()?;
                    self.cursor.expect(TokenKind::RBracket, "']'")?;
                    Ok(Operand::Element {
                        array: token.lexeme.clone(),
                        index: Box::new(index),
                    })
                } else {
                    Ok(Operand::name(&token.lexeme))
                }
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let value = self.parse_logical()?;
                self.cursor.expect(TokenKind::RParen, "')'")?;
                Ok(value)
            }
            _ => Err(self.cursor.error("number, string, identifier or '('")),
        }
    }
}
