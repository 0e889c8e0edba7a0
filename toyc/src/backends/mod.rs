pub mod accumulator;

use crate::ir::Instruction;

/// Lowers a finished TAC log into a target listing, one line per entry.
pub trait Backend {
    fn lower(&mut self, code: &[Instruction]) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendType {
    #[default]
    Accumulator,
}

impl BackendType {
    pub fn all() -> Vec<Self> {
        vec![Self::Accumulator]
    }

    pub fn by_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|b| b.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Accumulator => "acc",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Accumulator => "single-accumulator pseudo-assembly (MOV/ADD/SUB/MUL/DIV)",
        }
    }

    pub fn create(&self) -> Box<dyn Backend> {
        match self {
            Self::Accumulator => Box::new(accumulator::AccumulatorBackend::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        assert_eq!(BackendType::by_name("acc"), Some(BackendType::Accumulator));
        assert_eq!(BackendType::by_name("x86"), None);
        assert_eq!(BackendType::default().name(), "acc");
    }
}
