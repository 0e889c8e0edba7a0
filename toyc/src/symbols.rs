use std::collections::HashMap;
use std::fmt;

use crate::error::SemanticError;

/// Declared type of a symbol: a base tag plus an optional array suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolType {
    pub base: String,
    pub array: Option<ArraySize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArraySize {
    /// `int a[]`
    Open,
    /// `int a[5]`, size kept as written
    Fixed(String),
}

impl SymbolType {
    pub fn scalar(base: impl Into<String>) -> Self {
        Self { base: base.into(), array: None }
    }

    pub fn array(base: impl Into<String>, size: ArraySize) -> Self {
        Self { base: base.into(), array: Some(size) }
    }

    pub fn func() -> Self {
        Self::scalar("func")
    }

    pub fn is_array(&self) -> bool {
        self.array.is_some()
    }
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.array {
            None => write!(f, "{}", self.base),
            Some(ArraySize::Open) => write!(f, "{}[]", self.base),
            Some(ArraySize::Fixed(n)) => write!(f, "{}[{}]", self.base, n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub ty: SymbolType,
}

/// One flat namespace for the whole compilation unit. Symbols are kept in
/// declaration order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, ty: SymbolType) -> Result<(), SemanticError> {
        if self.index.contains_key(name) {
            return Err(SemanticError::Redeclared { name: name.to_string() });
        }
        self.index.insert(name.to_string(), self.symbols.len());
        self.symbols.push(Symbol { name: name.to_string(), ty });
        Ok(())
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn type_of(&self, name: &str) -> Result<&SymbolType, SemanticError> {
        self.index
            .get(name)
            .map(|&i| &self.symbols[i].ty)
            .ok_or_else(|| SemanticError::Undeclared { name: name.to_string() })
    }

    /// Fails with [`SemanticError::Undeclared`] unless `name` was declared.
    pub fn require(&self, name: &str) -> Result<(), SemanticError> {
        self.type_of(name).map(|_| ())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            writeln!(f, "{} : {}", symbol.name, symbol.ty)?;
        }
        Ok(())
    }
}
