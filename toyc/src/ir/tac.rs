//! Three-address code.
//!
//! Instructions are kept structured; `Display` renders the canonical text
//! form used in dumps (`t0 = a + 1`, `if not t1 goto loop_end_0`, ...).

use std::fmt;

use crate::parser::lexer::TokenKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Numeric or boolean literal, kept as written.
    Literal(String),
    /// String literal without quotes; rendered quoted.
    Str(String),
    /// Declared identifier.
    Name(String),
    /// Compiler temporary `t<N>`.
    Temp(usize),
    /// `name[index]`, an opaque element reference.
    Element { array: String, index: Box<Operand> },
}

impl Operand {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) | Self::Name(text) => f.write_str(text),
            Self::Str(text) => write!(f, "\"{}\"", text),
            Self::Temp(n) => write!(f, "t{}", n),
            Self::Element { array, index } => write!(f, "{}[{}]", array, index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,          // +
    Subtract,     // -
    Multiply,     // *
    Divide,       // /
    Equal,        // ==
    NotEqual,     // !=
    Greater,      // >
    GreaterEqual, // >=
    Less,         // <
    LessEqual,    // <=
    And,          // &&
    Or,           // ||
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Plus => Self::Add,
            TokenKind::Minus => Self::Subtract,
            TokenKind::Star => Self::Multiply,
            TokenKind::Slash => Self::Divide,
            TokenKind::Equal => Self::Equal,
            TokenKind::NotEqual => Self::NotEqual,
            TokenKind::Greater => Self::Greater,
            TokenKind::GreaterEqual => Self::GreaterEqual,
            TokenKind::Less => Self::Less,
            TokenKind::LessEqual => Self::LessEqual,
            TokenKind::And => Self::And,
            TokenKind::Or => Self::Or,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Subtract | Self::Multiply | Self::Divide)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    /// `loop_start` + 3 -> `loop_start_3`
    pub fn numbered(role: &str, id: usize) -> Self {
        Self(format!("{}_{}", role, id))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// dest = lhs op rhs
    Binary {
        dest: Operand,
        lhs: Operand,
        op: BinaryOp,
        rhs: Operand,
    },
    /// dest = src
    Copy { dest: Operand, src: Operand },
    /// label:
    Label(Label),
    /// if not cond goto target
    IfNotGoto { cond: Operand, target: Label },
    /// goto target
    Goto(Label),
    FuncStart(String),
    FuncEnd(String),
    Print(Operand),
    Return(Operand),
    /// store value to array[index]
    Store {
        value: Operand,
        array: String,
        index: Operand,
    },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary { dest, lhs, op, rhs } => write!(f, "{} = {} {} {}", dest, lhs, op, rhs),
            Self::Copy { dest, src } => write!(f, "{} = {}", dest, src),
            Self::Label(label) => write!(f, "{}:", label),
            Self::IfNotGoto { cond, target } => write!(f, "if not {} goto {}", cond, target),
            Self::Goto(target) => write!(f, "goto {}", target),
            Self::FuncStart(name) => write!(f, "FUNC_START {}", name),
            Self::FuncEnd(name) => write!(f, "FUNC_END {}", name),
            Self::Print(value) => write!(f, "PRINT {}", value),
            Self::Return(value) => write!(f, "return {}", value),
            Self::Store { value, array, index } => write!(f, "store {} to {}[{}]", value, array, index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_text_forms() {
        let element = Operand::Element {
            array: "a".to_string(),
            index: Box::new(Operand::Temp(2)),
        };
        let cases = [
            (
                Instruction::Binary {
                    dest: Operand::Temp(0),
                    lhs: Operand::name("a"),
                    op: BinaryOp::Add,
                    rhs: Operand::literal("10"),
                },
                "t0 = a + 10",
            ),
            (
                Instruction::Copy { dest: Operand::Temp(1), src: Operand::Str("hi".to_string()) },
                "t1 = \"hi\"",
            ),
            (Instruction::Label(Label::numbered("loop_start", 0)), "loop_start_0:"),
            (
                Instruction::IfNotGoto { cond: Operand::Temp(3), target: Label::numbered("else", 1) },
                "if not t3 goto else_1",
            ),
            (Instruction::Goto(Label::numbered("while_start", 4)), "goto while_start_4"),
            (Instruction::FuncStart("main".to_string()), "FUNC_START main"),
            (Instruction::FuncEnd("main".to_string()), "FUNC_END main"),
            (Instruction::Print(element), "PRINT a[t2]"),
            (Instruction::Return(Operand::literal("0")), "return 0"),
            (
                Instruction::Store {
                    value: Operand::Temp(5),
                    array: "a".to_string(),
                    index: Operand::literal("2"),
                },
                "store t5 to a[2]",
            ),
        ];

        for (instruction, text) in cases {
            assert_eq!(instruction.to_string(), text);
        }
    }

    #[test]
    fn operators_map_from_tokens() {
        assert_eq!(BinaryOp::from_token(TokenKind::GreaterEqual), Some(BinaryOp::GreaterEqual));
        assert_eq!(BinaryOp::from_token(TokenKind::Assign), None);
        assert!(BinaryOp::Divide.is_arithmetic());
        assert!(!BinaryOp::Less.is_arithmetic());
    }
}
