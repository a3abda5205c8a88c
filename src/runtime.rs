use crate::channel::Channel;
use crate::error::RunError;
use crate::instruction::{Instruction, BUS_MAX, WORD_COUNT};
use crate::memory::Memory;
use crate::output::Output;
use crate::state::RunState;

/// Run a freshly loaded program from `start` until it halts.
///
/// Returns the final machine state. Any error aborts the run and the state is dropped with it.
pub fn run<C: Channel>(mem: Memory, start: u16, chan: &mut C) -> Result<RunState, RunError> {
    let mut state = RunState::new(mem);
    state.run(start, chan)?;
    Ok(state)
}

impl RunState {
    /// Set the program counter to `start` and cycle until halted.
    pub fn run<C: Channel>(&mut self, start: u16, chan: &mut C) -> Result<(), RunError> {
        self.pc = start;
        self.resume(chan)
    }

    /// Cycle from the current program counter until halted.
    pub fn resume<C: Channel>(&mut self, chan: &mut C) -> Result<(), RunError> {
        while !self.halted {
            if self.pc > BUS_MAX {
                return Err(RunError::OutOfRangeProgramCounter { pc: self.pc });
            }
            if let Some(limit) = self.max_cycles {
                if self.cycles >= limit {
                    return Err(RunError::CycleLimit { limit });
                }
            }
            self.cycle(chan)?;
        }
        Ok(())
    }

    /// Fetch, decode, execute and write back a single instruction.
    pub fn cycle<C: Channel>(&mut self, chan: &mut C) -> Result<(), RunError> {
        // Fetch
        let addr = self.pc;
        let word = self.mem.read(addr)?;
        // PC incremented before instruction is performed, so branches simply overwrite it
        self.pc = (self.pc + 1) % WORD_COUNT;

        // Decode
        let instr = Instruction::decode(word);

        // Select working register
        let on_b = self.use_b;
        let working = if on_b { self.b_reg } else { self.acc };

        // Execute
        let res = self.execute(instr, working, chan)?;

        // Write back
        // `USB` never consumes the flag it sets, and its result always lands in A
        if on_b && !instr.is_use_b() {
            self.b_reg = res;
            self.use_b = false;
        } else {
            self.acc = res;
        }

        self.cycles += 1;
        if self.trace {
            Output::Trace.print_trace(self, addr, word, instr);
        }
        Ok(())
    }
}
