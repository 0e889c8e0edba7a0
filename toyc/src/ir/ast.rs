use crate::ir::tac::BinaryOp;
use crate::symbols::SymbolType;

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// int a[5] = 3;
    Declaration {
        name: String,
        ty: SymbolType,
        init: Option<Expression>,
        line: usize,
    },
    /// a = 1; или a[i] = 1;
    Assign(Assignment),
    /// print(x);
    Print { value: Expression },
    /// if (cond) stmt else stmt
    If {
        condition: Expression,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },
    /// for (init; cond; step) body
    For {
        init: Box<Statement>,
        condition: Expression,
        step: Step,
        body: Box<Statement>,
    },
    /// while ([decl] cond) body
    While {
        declaration: Option<Box<Statement>>,
        condition: Expression,
        body: Box<Statement>,
    },
    Return { value: Expression },
    /// func name() { ... }
    Function {
        name: String,
        body: Vec<Statement>,
        line: usize,
    },
    Block(Vec<Statement>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: String,
    pub index: Option<Expression>,
    pub value: Expression,
    pub line: usize,
}

/// Increment clause of a `for` loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Assign(Assignment),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// 10, 3.14
    Number(String),
    /// "text"
    Str(String),
    /// true, false
    Bool(bool),
    Variable { name: String, line: usize },
    /// a[i + 1]
    Index {
        array: String,
        index: Box<Expression>,
        line: usize,
    },
    Binary {
        left: Box<Expression>,
        op: BinaryOp,
        right: Box<Expression>,
    },
}
