use crate::channel::Channel;
use crate::error::RunError;
use crate::instruction::{truncate, ExtendedOp, Instruction, BUS_MAX};
use crate::state::RunState;

impl RunState {
    /// Perform one decoded instruction against `working`, returning the new working value.
    ///
    /// Only memory, flags, PC and the halt/use-B flags are touched here. Writing the result back
    /// to A or B is left to the caller, and never happens if this returns an error.
    pub(crate) fn execute<C: Channel>(
        &mut self,
        instr: Instruction,
        working: u16,
        chan: &mut C,
    ) -> Result<u16, RunError> {
        match instr {
            Instruction::Halt => {
                self.halted = true;
                Ok(working)
            }
            // OS-call-like traps are slotted in here
            Instruction::Trap(operand) => Err(RunError::UnknownTrap { operand }),
            Instruction::Add(addr) => {
                let val = self.mem.read(addr as u16)?;
                Ok(self.arith(working as i32 + val as i32))
            }
            Instruction::Sub(addr) => {
                let val = self.mem.read(addr as u16)?;
                Ok(self.arith(working as i32 - val as i32))
            }
            Instruction::Store(addr) => {
                self.mem.write(addr as u16, working);
                self.set_flags(working);
                Ok(working)
            }
            Instruction::Extended(op) => self.extended(op, working),
            Instruction::Load(addr) => {
                let val = self.mem.read(addr as u16)?;
                self.set_flags(val);
                Ok(val)
            }
            Instruction::Branch(addr) => {
                self.pc = addr as u16;
                Ok(working)
            }
            Instruction::BranchZero(addr) => {
                if self.flags.zero {
                    self.pc = addr as u16;
                }
                Ok(working)
            }
            Instruction::BranchPositive(addr) => {
                if self.flags.positive {
                    self.pc = addr as u16;
                }
                Ok(working)
            }
            Instruction::Input => self.input(chan),
            Instruction::Output => {
                if chan.output_is_interactive() {
                    chan.prompt("out=");
                }
                chan.write(working)?;
                self.set_flags(working);
                Ok(working)
            }
            Instruction::UserIo(operand) => match chan.user_io(operand, working) {
                Some(result) => {
                    let val = result?;
                    Ok(truncate(val as i32))
                }
                None => Err(RunError::UnknownIoInstruction { operand }),
            },
        }
    }

    /// Truncate an arithmetic result to the bus width and set flags from it.
    #[inline]
    fn arith(&mut self, value: i32) -> u16 {
        let res = truncate(value);
        self.set_flags(res);
        res
    }

    fn extended(&mut self, op: ExtendedOp, working: u16) -> Result<u16, RunError> {
        match op {
            ExtendedOp::UseB => {
                self.use_b = true;
                Ok(working)
            }
            ExtendedOp::Mul => Ok(self.arith(self.b_reg as i32 * working as i32)),
            ExtendedOp::Div => {
                if working == 0 {
                    return Err(RunError::DivisionByZero {
                        dividend: self.b_reg,
                    });
                }
                Ok(self.arith((self.b_reg / working) as i32))
            }
            // User-defined ALU operations are slotted in here
            ExtendedOp::Unknown(operand) => Err(RunError::UnknownExtendedInstruction { operand }),
        }
    }

    fn input<C: Channel>(&mut self, chan: &mut C) -> Result<u16, RunError> {
        if chan.input_is_interactive() {
            chan.prompt("in? ");
        }
        let value = chan.read()?;
        if !(0..=BUS_MAX as i32).contains(&value) {
            return Err(RunError::IoValueRange { value });
        }
        Ok(self.arith(value))
    }
}
