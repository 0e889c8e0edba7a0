pub mod lexer;
pub mod parser;
pub mod tree;

mod cursor;

use crate::error::CompileError;
use crate::ir::ast;
use crate::symbols::ArraySize;

use cursor::Cursor;
use lexer::{Token, TokenKind};

pub use parser::parse_program;

/// Из текста в AST (только распознавание, без таблицы символов)
pub fn parse(source: &str) -> Result<ast::Program, CompileError> {
    let tokens = lexer::tokenize(source)?;
    tree::parse_tokens(&tokens)
}

/// Base type tag of a declaration keyword.
fn base_type(token: &Token) -> Result<&'static str, CompileError> {
    token.kind.type_name().ok_or_else(|| CompileError::Syntax {
        line: token.line(),
        expected: "type".to_string(),
        found: token.kind.name(),
        lexeme: token.lexeme.clone(),
    })
}

/// Optional `[]` or `[N]` after a declared name.
fn array_size(cursor: &mut Cursor<'_>) -> Result<Option<ArraySize>, CompileError> {
    if cursor.eat(TokenKind::LBracket).is_none() {
        return Ok(None);
    }
    if cursor.eat(TokenKind::RBracket).is_some() {
        return Ok(Some(ArraySize::Open));
    }
    let size = cursor.expect(TokenKind::Number, "array size or ']'")?;
    cursor.expect(TokenKind::RBracket, "']'")?;
    Ok(Some(ArraySize::Fixed(size.lexeme.clone())))
}
