//! Front end for a small C-like toy language.
//!
//! - `parser::lexer` turns source text into tokens.
//! - `parser::parser` translates tokens straight into three-address code,
//!   filling the symbol table on the way.
//! - `parser::tree` + `ir::translate` do the same in two passes over an AST.
//! - `backends` lower the TAC into a target listing.

pub mod backends;
pub mod error;
pub mod ir;
pub mod parser;
pub mod span;
pub mod symbols;

pub use backends::BackendType;
pub use error::{CompileError, SemanticError};
pub use ir::{Instruction, TacGenerator};
pub use parser::lexer::{Token, TokenKind};
pub use symbols::SymbolTable;

/// How tokens become TAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pipeline {
    /// Single pass, no tree.
    #[default]
    Direct,
    /// Parse to `ir::ast`, then translate.
    Tree,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    pub pipeline: Pipeline,
    pub target: BackendType,
}

/// Everything one compilation unit produces.
#[derive(Debug)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub symbols: SymbolTable,
    pub code: Vec<Instruction>,
    pub assembly: Vec<String>,
}

pub fn compile(source: &str, options: &CompileOptions) -> Result<Compilation, CompileError> {
    let tokens = parser::lexer::tokenize(source)?;

    let mut symbols = SymbolTable::new();
    let mut code = TacGenerator::new();
    match options.pipeline {
        Pipeline::Direct => parser::parse_program(&tokens, &mut symbols, &mut code)?,
        Pipeline::Tree => {
            let program = parser::tree::parse_tokens(&tokens)?;
            ir::translate::translate(&program, &mut symbols, &mut code)?;
        }
    }

    let code = code.into_instructions();
    let assembly = options.target.create().lower(&code);

    Ok(Compilation { tokens, symbols, code, assembly })
}
