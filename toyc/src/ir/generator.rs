use super::tac::{BinaryOp, Instruction, Operand};

/// Append-only TAC log with the temporary and label counters of one
/// compilation unit.
#[derive(Debug, Default)]
pub struct TacGenerator {
    instructions: Vec<Instruction>,
    next_temp: usize,
    next_label: usize,
}

/// Outer log parked while instructions are recorded into a side buffer.
#[must_use = "pass the guard back to `end_deferred` to restore the main log"]
#[derive(Debug)]
pub struct Deferred {
    outer: Vec<Instruction>,
}

impl TacGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_temp(&mut self) -> Operand {
        let temp = Operand::Temp(self.next_temp);
        self.next_temp += 1;
        temp
    }

    /// Id shared by the labels of one construct (`else_3`, `endif_3`).
    pub fn next_label_id(&mut self) -> usize {
        let id = self.next_label;
        self.next_label += 1;
        id
    }

    pub fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn emit_all(&mut self, instructions: Vec<Instruction>) {
        self.instructions.extend(instructions);
    }

    /// Emits `tN = lhs op rhs` and returns `tN`.
    pub fn emit_binary(&mut self, lhs: Operand, op: BinaryOp, rhs: Operand) -> Operand {
        let dest = self.new_temp();
        self.emit(Instruction::Binary { dest: dest.clone(), lhs, op, rhs });
        dest
    }

    /// Emits `tN = value` and returns `tN`.
    pub fn emit_to_temp(&mut self, value: Operand) -> Operand {
        let dest = self.new_temp();
        self.emit(Instruction::Copy { dest: dest.clone(), src: value });
        dest
    }

    /// Starts recording into a side buffer. Temporaries keep coming from the
    /// shared counter, so the buffer can be appended later without clashes.
    pub fn begin_deferred(&mut self) -> Deferred {
        Deferred { outer: std::mem::take(&mut self.instructions) }
    }

    /// Restores the main log and returns what was recorded since
    /// `begin_deferred`.
    pub fn end_deferred(&mut self, deferred: Deferred) -> Vec<Instruction> {
        std::mem::replace(&mut self.instructions, deferred.outer)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::tac::Label;

    #[test]
    fn temporaries_are_never_reused() {
        let mut code = TacGenerator::new();
        let names: Vec<_> = (0..4).map(|_| code.new_temp().to_string()).collect();
        assert_eq!(names, ["t0", "t1", "t2", "t3"]);
    }

    #[test]
    fn emit_binary_returns_fresh_destination() {
        let mut code = TacGenerator::new();
        let product = code.emit_binary(Operand::literal("3"), BinaryOp::Multiply, Operand::literal("4"));
        let sum = code.emit_binary(Operand::literal("2"), BinaryOp::Add, product);
        assert_eq!(sum, Operand::Temp(1));

        let text: Vec<_> = code.instructions().iter().map(|i| i.to_string()).collect();
        assert_eq!(text, ["t0 = 3 * 4", "t1 = 2 + t0"]);
    }

    #[test]
    fn deferred_block_is_appended_later() {
        let mut code = TacGenerator::new();
        code.emit(Instruction::Label(Label::numbered("loop_start", 0)));

        let guard = code.begin_deferred();
        let step = code.emit_binary(Operand::name("i"), BinaryOp::Add, Operand::literal("1"));
        code.emit(Instruction::Copy { dest: Operand::name("i"), src: step });
        let step_code = code.end_deferred(guard);
        assert_eq!(code.len(), 1);

        code.emit(Instruction::Print(Operand::name("i")));
        code.emit_all(step_code);

        let text: Vec<_> = code.instructions().iter().map(|i| i.to_string()).collect();
        assert_eq!(text, ["loop_start_0:", "PRINT i", "t0 = i + 1", "i = t0"]);
        assert_eq!(code.new_temp(), Operand::Temp(1));
    }

    #[test]
    fn label_ids_increase() {
        let mut code = TacGenerator::new();
        assert_eq!(code.next_label_id(), 0);
        assert_eq!(code.next_label_id(), 1);
        assert!(code.is_empty());
    }
}
