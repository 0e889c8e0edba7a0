//! Same grammar as the syntax-directed parser, but recognition only: the
//! result is an [`ast::Program`] and nothing is declared or emitted.

use crate::error::CompileError;
use crate::ir::ast::{self, Assignment, Expression, Statement, Step};
use crate::symbols::SymbolType;

use super::cursor::{self, Cursor};
use super::lexer::{Token, TokenKind};
use super::{array_size, base_type};

pub fn parse_tokens(tokens: &[Token]) -> Result<ast::Program, CompileError> {
    let mut parser = TreeParser { cursor: Cursor::new(tokens)? };
    parser.parse_program()
}

struct TreeParser<'a> {
    cursor: Cursor<'a>,
}

impl TreeParser<'_> {
    fn parse_program(&mut self) -> Result<ast::Program, CompileError> {
        let mut statements = Vec::new();
        while !self.cursor.is_at_end() {
            statements.push(self.parse_statement()?);
        }
        Ok(ast::Program { statements })
    }

    fn parse_statement(&mut self) -> Result<Statement, CompileError> {
        let token = self.cursor.peek();
        match token.kind {
            kind if kind.is_type_keyword() => self.parse_declaration(),
            TokenKind::Identifier if token.lexeme == "print" => self.parse_print(),
            TokenKind::Identifier => {
                let assignment = self.parse_assignment_body()?;
                self.cursor.expect(TokenKind::Semicolon, "';'")?;
                Ok(Statement::Assign(assignment))
            }
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => {
                self.cursor.advance();
                let value = self.parse_logical()?;
                self.cursor.expect(TokenKind::Semicolon, "';'")?;
                Ok(Statement::Return { value })
            }
            TokenKind::Func => self.parse_function(),
            TokenKind::LBrace => Ok(Statement::Block(self.parse_block()?)),
            _ => Err(self.cursor.error("statement")),
        }
    }

    fn parse_declaration(&mut self) -> Result<Statement, CompileError> {
        let type_token = self.cursor.advance();
        let base = base_type(type_token)?;
        let name = self.cursor.expect(TokenKind::Identifier, "identifier")?;

        let ty = match array_size(&mut self.cursor)? {
            Some(size) => SymbolType::array(base, size),
            None => SymbolType::scalar(base),
        };

        let init = if self.cursor.eat(TokenKind::Assign).is_some() {
            Some(self.parse_logical()?)
        } else {
            None
        };

        self.cursor.expect(TokenKind::Semicolon, "';'")?;
        Ok(Statement::Declaration {
            name: name.lexeme.clone(),
            ty,
            init,
            line: name.line(),
        })
    }

    fn parse_print(&mut self) -> Result<Statement, CompileError> {
        self.cursor.advance();
        self.cursor.expect(TokenKind::LParen, "'('")?;
        let value = self.parse_logical()?;
        self.cursor.expect(TokenKind::RParen, "')'")?;
        self.cursor.expect(TokenKind::Semicolon, "';'")?;
        Ok(Statement::Print { value })
    }

    fn parse_assignment_body(&mut self) -> Result<Assignment, CompileError> {
        let target = self.cursor.expect(TokenKind::Identifier, "identifier")?;
        let index = if self.cursor.eat(TokenKind::LBracket).is_some() {
            let index = self.parse_logical()?;
            self.cursor.expect(TokenKind::RBracket, "']'")?;
            Some(index)
        } else {
            None
        };
        self.cursor.expect(TokenKind::Assign, "'='")?;
        let value = self.parse_logical()?;
        Ok(Assignment {
            target: target.lexeme.clone(),
            index,
            value,
            line: target.line(),
        })
    }

    fn parse_if(&mut self) -> Result<Statement, CompileError> {
        self.cursor.advance();
        self.cursor.expect(TokenKind::LParen, "'('")?;
        let condition = self.parse_logical()?;
        self.cursor.expect(TokenKind::RParen, "')'")?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.cursor.eat(TokenKind::Else).is_some() {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Statement::If { condition, then_branch, else_branch })
    }

    fn parse_for(&mut self) -> Result<Statement, CompileError> {
        self.cursor.advance();
        self.cursor.expect(TokenKind::LParen, "'('")?;
        let init = match self.cursor.peek_kind() {
            kind if kind.is_type_keyword() => self.parse_declaration()?,
            TokenKind::Identifier => {
                let assignment = self.parse_assignment_body()?;
                self.cursor.expect(TokenKind::Semicolon, "';'")?;
                Statement::Assign(assignment)
            }
            _ => return Err(self.cursor.error("declaration or assignment")),
        };
        let condition = self.parse_logical()?;
        self.cursor.expect(TokenKind::Semicolon, "';'")?;
        let step = if self.cursor.at_assignment() {
            Step::Assign(self.parse_assignment_body()?)
        } else {
            Step::Expression(self.parse_logical()?)
        };
        self.cursor.expect(TokenKind::RParen, "')'")?;
        let body = self.parse_statement()?;
        Ok(Statement::For {
            init: Box::new(init),
            condition,
            step,
            body: Box::new(body),
        })
    }

    fn parse_while(&mut self) -> Result<Statement, CompileError> {
        self.cursor.advance();
        self.cursor.expect(TokenKind::LParen, "'('")?;
        let declaration = if self.cursor.peek_kind().is_type_keyword() {
            Some(Box::new(self.parse_declaration()?))
        } else {
            None
        };
        let condition = self.parse_logical()?;
        self.cursor.expect(TokenKind::RParen, "')'")?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::While { declaration, condition, body })
    }

    fn parse_function(&mut self) -> Result<Statement, CompileError> {
        self.cursor.advance();
        let name = self.cursor.expect(TokenKind::Identifier, "function name")?;
        self.cursor.expect(TokenKind::LParen, "'('")?;
        self.cursor.expect(TokenKind::RParen, "')' (functions take no parameters)")?;
        let body = self.parse_block()?;
        Ok(Statement::Function {
            name: name.lexeme.clone(),
            body,
            line: name.line(),
        })
    }

    fn parse_block(&mut self) -> Result<Vec<Statement>, CompileError> {
        self.cursor.expect(TokenKind::LBrace, "'{'")?;
        let mut body = Vec::new();
        while !self.cursor.check(TokenKind::RBrace) && !self.cursor.is_at_end() {
            body.push(self.parse_statement()?);
        }
        self.cursor.expect(TokenKind::RBrace, "'}'")?;
        Ok(body)
    }

    fn parse_logical(&mut self) -> Result<Expression, CompileError> {
        self.parse_level(cursor::LOGICAL, Self::parse_expression)
    }

    fn parse_expression(&mut self) -> Result<Expression, CompileError> {
        self.parse_level(cursor::ADDITIVE, Self::parse_term)
    }

    fn parse_term(&mut self) -> Result<Expression, CompileError> {
        self.parse_level(cursor::MULTIPLICATIVE, Self::parse_factor)
    }

    /// One left-associative precedence level.
    fn parse_level(
        &mut self,
        level: &[TokenKind],
        operand: fn(&mut Self) -> Result<Expression, CompileError>,
    ) -> Result<Expression, CompileError> {
        let mut left = operand(self)?;
        while let Some(op) = self.cursor.eat_operator(level) {
            let right = operand(self)?;
            left = Expression::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expression, CompileError> {
        let token = self.cursor.peek();
        let expression = match token.kind {
            TokenKind::Number => Expression::Number(token.lexeme.clone()),
            TokenKind::StringLiteral => Expression::Str(token.lexeme.clone()),
            TokenKind::True => Expression::Bool(true),
            TokenKind::False => Expression::Bool(false),
            TokenKind::Identifier => {
                self.cursor.advance();
                if self.cursor.eat(TokenKind::LBracket).is_some() {
                    let index = self.parse_logical()?;
                    self.cursor.expect(TokenKind::RBracket, "']'")?;
                    return Ok(Expression::Index {
                        array: token.lexeme.clone(),
                        index: Box::new(index),
                        line: token.line(),
                    });
                }
                return Ok(Expression::Variable {
                    name: token.lexeme.clone(),
                    line: token.line(),
                });
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_logical()?;
                self.cursor.expect(TokenKind::RParen, "')'")?;
                return Ok(inner);
            }
            _ => return Err(self.cursor.error("number, string, identifier or '('")),
        };
        self.cursor.advance();
        Ok(expression)
    }
}
