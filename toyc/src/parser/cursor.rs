use crate::error::CompileError;
use crate::ir::tac::BinaryOp;

use super::lexer::{Token, TokenKind};

/// Operators of one precedence level, all left-associative.
pub const LOGICAL: &[TokenKind] = &[TokenKind::And, TokenKind::Or];
pub const ADDITIVE: &[TokenKind] = &[
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Equal,
    TokenKind::Greater,
    TokenKind::GreaterEqual,
    TokenKind::Less,
    TokenKind::LessEqual,
    TokenKind::NotEqual,
];
pub const MULTIPLICATIVE: &[TokenKind] = &[TokenKind::Star, TokenKind::Slash];

/// Read-only walk over a token sequence that ends with `Eof`.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Result<Self, CompileError> {
        match tokens.last() {
            Some(token) if token.kind == TokenKind::Eof => Ok(Self { tokens, position: 0 }),
            Some(token) => Err(CompileError::Syntax {
                line: token.line(),
                expected: "end of input".to_string(),
                found: token.kind.name(),
                lexeme: token.lexeme.clone(),
            }),
            None => Err(CompileError::Syntax {
                line: 1,
                expected: "end of input".to_string(),
                found: "nothing",
                lexeme: String::new(),
            }),
        }
    }

    pub fn peek(&self) -> &'a Token {
        self.lookahead(0)
    }

    pub fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    /// Never runs past the `Eof` sentinel.
    pub fn lookahead(&self, n: usize) -> &'a Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + n).min(last)]
    }

    pub fn advance(&mut self) -> &'a Token {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub fn eat(&mut self, kind: TokenKind) -> Option<&'a Token> {
        if self.check(kind) { Some(self.advance()) } else { None }
    }

    pub fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<&'a Token, CompileError> {
        match self.eat(kind) {
            Some(token) => Ok(token),
            None => Err(self.error(expected)),
        }
    }

    /// Consumes the next token if it is one of `level`'s operators.
    pub fn eat_operator(&mut self, level: &[TokenKind]) -> Option<BinaryOp> {
        let kind = self.peek_kind();
        if !level.contains(&kind) {
            return None;
        }
        let op = BinaryOp::from_token(kind)?;
        self.advance();
        Some(op)
    }

    /// True when the cursor sits on `name =` or `name[...] =`.
    pub fn at_assignment(&self) -> bool {
        if !self.check(TokenKind::Identifier) {
            return false;
        }
        let mut n = 1;
        if self.lookahead(n).kind == TokenKind::LBracket {
            let mut depth = 0usize;
            loop {
                match self.lookahead(n).kind {
                    TokenKind::LBracket => depth += 1,
                    TokenKind::RBracket => {
                        depth -= 1;
                        if depth == 0 { break; }
                    }
                    TokenKind::Eof => return false,
                    _ => {}
                }
                n += 1;
            }
            n += 1;
        }
        self.lookahead(n).kind == TokenKind::Assign
    }

    pub fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Syntax error at the current token.
    pub fn error(&self, expected: &str) -> CompileError {
        let token = self.peek();
        CompileError::Syntax {
            line: token.line(),
            expected: expected.to_string(),
            found: token.kind.name(),
            lexeme: token.lexeme.clone(),
        }
    }
}
