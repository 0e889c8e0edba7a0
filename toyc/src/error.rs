use thiserror::Error;

/// Violations detected by the symbol table. The table itself knows nothing
/// about source positions, the parser attaches the line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("variable '{name}' is already declared")]
    Redeclared { name: String },

    #[error("variable '{name}' is not declared")]
    Undeclared { name: String },
}

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexical error at line {line}: {message}")]
    Lexical { line: usize, message: String },

    #[error("Syntax error at line {line}: expected {expected}, found {found} '{lexeme}'")]
    Syntax {
        line: usize,
        expected: String,
        found: &'static str,
        lexeme: String,
    },

    #[error("Semantic error at line {line}: {source}")]
    Semantic {
        line: usize,
        #[source]
        source: SemanticError,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl CompileError {
    pub fn semantic(line: usize, source: SemanticError) -> Self {
        Self::Semantic { line, source }
    }

    /// Source line the error points at, if it came from the pipeline.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Lexical { line, .. } | Self::Syntax { line, .. } | Self::Semantic { line, .. } => {
                Some(*line)
            }
            Self::Io { .. } => None,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::Lexical { .. } => "lexical",
            Self::Syntax { .. } => "syntax",
            Self::Semantic { .. } => "semantic",
            Self::Io { .. } => "io",
        }
    }
}
