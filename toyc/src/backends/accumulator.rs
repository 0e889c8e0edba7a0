use std::fmt;

use crate::ir::{BinaryOp, Instruction, Operand};

use super::Backend;

const ACC: &str = "AX";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Add,
    Sub,
    Mul,
    Div,
}

impl Opcode {
    pub fn for_op(op: BinaryOp) -> Option<Self> {
        match op {
            BinaryOp::Add => Some(Self::Add),
            BinaryOp::Subtract => Some(Self::Sub),
            BinaryOp::Multiply => Some(Self::Mul),
            BinaryOp::Divide => Some(Self::Div),
            BinaryOp::Equal
            | BinaryOp::NotEqual
            | BinaryOp::Greater
            | BinaryOp::GreaterEqual
            | BinaryOp::Less
            | BinaryOp::LessEqual
            | BinaryOp::And
            | BinaryOp::Or => None,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmLine {
    /// MOV dest, src
    Mov { dest: String, src: String },
    /// ADD AX, src (and friends)
    Arith { opcode: Opcode, src: String },
    /// TAC the accumulator model has no opcode for, kept as written.
    Verbatim(String),
}

impl fmt::Display for AsmLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mov { dest, src } => write!(f, "MOV {}, {}", dest, src),
            Self::Arith { opcode, src } => write!(f, "{} {}, {}", opcode, ACC, src),
            Self::Verbatim(text) => f.write_str(text),
        }
    }
}

/// Single-register machine: every value travels through `AX`.
pub struct AccumulatorBackend {
    lines: Vec<AsmLine>,
}

impl Backend for AccumulatorBackend {
    fn lower(&mut self, code: &[Instruction]) -> Vec<String> {
        self.lower_program(code).iter().map(|line| line.to_string()).collect()
    }
}

impl AccumulatorBackend {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn lower_program(&mut self, code: &[Instruction]) -> Vec<AsmLine> {
        for instruction in code {
            self.lower_instruction(instruction);
        }
        std::mem::take(&mut self.lines)
    }

    fn lower_instruction(&mut self, instruction: &Instruction) {
        match instruction {
            Instruction::Copy { dest, src } => {
                self.load(src);
                self.store(dest);
            }
            Instruction::Binary { dest, lhs, op, rhs } => {
                match Opcode::for_op(*op) {
                    Some(opcode) => {
                        self.load(lhs);
                        self.emit(AsmLine::Arith { opcode, src: rhs.to_string() });
                        self.store(dest);
                    }
                    // Сравнения и логика: опкодов нет
                    None => self.verbatim(instruction),
                }
            }
            Instruction::Label(_)
            | Instruction::IfNotGoto { .. }
            | Instruction::Goto(_)
            | Instruction::FuncStart(_)
            | Instruction::FuncEnd(_)
            | Instruction::Print(_)
            | Instruction::Return(_)
            | Instruction::Store { .. } => self.verbatim(instruction),
        }
    }

    fn load(&mut self, value: &Operand) {
        self.emit(AsmLine::Mov { dest: ACC.to_string(), src: value.to_string() });
    }

    fn store(&mut self, dest: &Operand) {
        self.emit(AsmLine::Mov { dest: dest.to_string(), src: ACC.to_string() });
    }

    fn verbatim(&mut self, instruction: &Instruction) {
        self.emit(AsmLine::Verbatim(instruction.to_string()));
    }

    fn emit(&mut self, line: AsmLine) {
        self.lines.push(line);
    }
}

impl Default for AccumulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Label;

    fn lower(code: &[Instruction]) -> Vec<String> {
        AccumulatorBackend::new().lower(code)
    }

    #[test]
    fn copy_goes_through_accumulator() {
        let code = [Instruction::Copy { dest: Operand::name("a"), src: Operand::literal("5") }];
        assert_eq!(lower(&code), ["MOV AX, 5", "MOV a, AX"]);
    }

    #[test]
    fn arithmetic_loads_left_operand_first() {
        let code = [
            Instruction::Binary {
                dest: Operand::Temp(0),
                lhs: Operand::name("a"),
                op: BinaryOp::Add,
                rhs: Operand::literal("10"),
            },
            Instruction::Binary {
                dest: Operand::Temp(1),
                lhs: Operand::Temp(0),
                op: BinaryOp::Divide,
                rhs: Operand::literal("2"),
            },
        ];
        assert_eq!(
            lower(&code),
            ["MOV AX, a", "ADD AX, 10", "MOV t0, AX", "MOV AX, t0", "DIV AX, 2", "MOV t1, AX"]
        );
    }

    #[test]
    fn all_four_opcodes() {
        let ops = [
            (BinaryOp::Add, "ADD"),
            (BinaryOp::Subtract, "SUB"),
            (BinaryOp::Multiply, "MUL"),
            (BinaryOp::Divide, "DIV"),
        ];
        for (op, mnemonic) in ops {
            let code = [Instruction::Binary {
                dest: Operand::Temp(0),
                lhs: Operand::literal("1"),
                op,
                rhs: Operand::literal("2"),
            }];
            assert_eq!(lower(&code)[1], format!("{} AX, 2", mnemonic));
        }
    }

    #[test]
    fn control_flow_passes_through_verbatim() {
        let code = [
            Instruction::FuncStart("main".to_string()),
            Instruction::Label(Label::numbered("while_start", 0)),
            Instruction::Binary {
                dest: Operand::Temp(0),
                lhs: Operand::name("n"),
                op: BinaryOp::Greater,
                rhs: Operand::literal("0"),
            },
            Instruction::IfNotGoto { cond: Operand::Temp(0), target: Label::numbered("while_end", 0) },
            Instruction::Print(Operand::name("n")),
            Instruction::Goto(Label::numbered("while_start", 0)),
            Instruction::Label(Label::numbered("while_end", 0)),
            Instruction::Store {
                value: Operand::Temp(1),
                array: "a".to_string(),
                index: Operand::literal("2"),
            },
            Instruction::Return(Operand::name("n")),
            Instruction::FuncEnd("main".to_string()),
        ];
        let expected: Vec<String> = code.iter().map(|i| i.to_string()).collect();
        assert_eq!(lower(&code), expected);
    }

    #[test]
    fn element_operands_stay_opaque() {
        let element = Operand::Element { array: "a".to_string(), index: Box::new(Operand::name("i")) };
        let code = [Instruction::Copy { dest: Operand::Temp(3), src: element }];
        assert_eq!(lower(&code), ["MOV AX, a[i]", "MOV t3, AX"]);
    }

    #[test]
    fn backend_is_reusable_after_lowering() {
        let mut backend = AccumulatorBackend::new();
        let code = [Instruction::Return(Operand::literal("0"))];
        assert_eq!(backend.lower_program(&code).len(), 1);
        assert_eq!(backend.lower_program(&code).len(), 1);
    }
}
