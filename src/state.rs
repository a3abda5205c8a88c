use crate::instruction::BUS_MAX;
use crate::memory::Memory;

/// Smallest value considered negative. Values `500..=999` are ten's-complement negatives, so
/// `999` is `-1`.
pub const NEGATIVE_MIN: u16 = 500;

/// Represents complete machine state during a run.
///
/// Every run owns exactly one of these; nothing is shared between runs.
pub struct RunState {
    /// 1000 decimal words, populated by the loader
    pub(crate) mem: Memory,
    /// Program counter
    pub(crate) pc: u16,
    /// Accumulator (A)
    pub(crate) acc: u16,
    /// Auxiliary register (B)
    pub(crate) b_reg: u16,
    /// Condition flags
    pub(crate) flags: Flags,
    /// One-shot: next instruction reads and writes B instead of A
    pub(crate) use_b: bool,
    /// Never cleared once set
    pub(crate) halted: bool,
    /// Completed cycles
    pub(crate) cycles: u64,

    pub(crate) trace: bool,
    pub(crate) max_cycles: Option<u64>,
}

/// Zero and positive condition flags.
///
/// Both start cleared, so a branch before any flag-setting instruction is never taken.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    pub zero: bool,
    pub positive: bool,
}

impl Flags {
    pub fn from_value(value: u16) -> Self {
        debug_assert!(value <= BUS_MAX, "flags must be computed on truncated values");
        Flags {
            zero: value == 0,
            positive: value < NEGATIVE_MIN,
        }
    }
}

impl RunState {
    pub fn new(mem: Memory) -> Self {
        RunState {
            mem,
            pc: 0,
            acc: 0,
            b_reg: 0,
            flags: Flags::default(),
            use_b: false,
            halted: false,
            cycles: 0,
            trace: false,
            max_cycles: None,
        }
    }

    /// Print every cycle to stderr.
    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    /// Fail the run if it has not halted after `limit` cycles.
    pub fn set_max_cycles(&mut self, limit: Option<u64>) {
        self.max_cycles = limit;
    }

    /// Jump to `pc` before the next cycle. Range is checked when the cycle starts.
    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn acc(&self) -> u16 {
        self.acc
    }

    pub fn b_reg(&self) -> u16 {
        self.b_reg
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn use_b(&self) -> bool {
        self.use_b
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.mem
    }

    #[inline]
    pub(crate) fn set_flags(&mut self, value: u16) {
        self.flags = Flags::from_value(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_for_every_value() {
        for value in 0..=BUS_MAX {
            let flags = Flags::from_value(value);
            assert_eq!(flags.zero, value == 0, "zero flag for {value}");
            assert_eq!(flags.positive, value < 500, "positive flag for {value}");
        }
    }

    #[test]
    fn starts_cleared() {
        let state = RunState::new(Memory::new());
        assert_eq!(state.pc(), 0);
        assert_eq!(state.acc(), 0);
        assert_eq!(state.b_reg(), 0);
        assert_eq!(state.flags(), Flags::default());
        assert!(!state.use_b());
        assert!(!state.is_halted());
    }
}
