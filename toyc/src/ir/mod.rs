pub mod ast;
pub mod generator;
pub mod tac;
pub mod translate;

pub use generator::TacGenerator;
pub use tac::{BinaryOp, Instruction, Label, Operand};
