use std::fmt;

/// Largest value the internal buses can carry.
pub const BUS_MAX: u16 = 999;
/// Number of distinct words (and addresses).
pub const WORD_COUNT: u16 = BUS_MAX + 1;

// Base opcodes, add the operand to form an instruction. Eg. `LDA + 12`
pub const HLT: u16 = 0;
pub const ADD: u16 = 100;
pub const SUB: u16 = 200;
pub const STA: u16 = 300;
pub const EXT: u16 = 400;
pub const LDA: u16 = 500;
pub const BRA: u16 = 600;
pub const BRZ: u16 = 700;
pub const BRP: u16 = 800;
pub const IO: u16 = 900;

// Fully formed instructions
pub const USB: u16 = EXT + 1;
pub const MUL: u16 = EXT + 2;
pub const DIV: u16 = EXT + 3;
pub const INP: u16 = IO + 1;
pub const OUT: u16 = IO + 2;

/// Reduce any intermediate result to the bus width.
///
/// Negative values wrap around, so `-1` becomes `999`.
#[inline]
pub fn truncate(value: i32) -> u16 {
    value.rem_euclid(WORD_COUNT as i32) as u16
}

/// A single decoded instruction.
///
/// Decoding never fails: every word in `0..=999` maps onto one of these variants. Operands which
/// fall into an unassigned slot of an extension point are kept so they can be reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// `000`
    Halt,
    /// `001..=099`, reserved for OS-call-like traps
    Trap(u8),
    Add(u8),
    Sub(u8),
    Store(u8),
    Extended(ExtendedOp),
    Load(u8),
    Branch(u8),
    BranchZero(u8),
    BranchPositive(u8),
    Input,
    Output,
    /// `900`, `903..=999`
    UserIo(u8),
}

/// Operations living under opcode `4xx`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtendedOp {
    /// Next instruction reads and writes B instead of the accumulator.
    UseB,
    Mul,
    Div,
    Unknown(u8),
}

impl Instruction {
    /// Split `word` into operator class and operand.
    ///
    /// Words are expected to be bus-sized; anything above [`BUS_MAX`] is truncated first.
    pub fn decode(word: u16) -> Self {
        let word = word % WORD_COUNT;
        let operand = operand(word);
        match operator(word) {
            0 if operand == 0 => Self::Halt,
            0 => Self::Trap(operand),
            1 => Self::Add(operand),
            2 => Self::Sub(operand),
            3 => Self::Store(operand),
            4 => Self::Extended(ExtendedOp::decode(operand)),
            5 => Self::Load(operand),
            6 => Self::Branch(operand),
            7 => Self::BranchZero(operand),
            8 => Self::BranchPositive(operand),
            _ => match word {
                INP => Self::Input,
                OUT => Self::Output,
                _ => Self::UserIo(operand),
            },
        }
    }

    /// Whether this is the instruction which selects B for the next instruction.
    pub fn is_use_b(&self) -> bool {
        matches!(self, Self::Extended(ExtendedOp::UseB))
    }
}

impl ExtendedOp {
    fn decode(operand: u8) -> Self {
        match EXT + operand as u16 {
            USB => Self::UseB,
            MUL => Self::Mul,
            DIV => Self::Div,
            _ => Self::Unknown(operand),
        }
    }
}

/// Hundreds digit of a word.
#[inline]
pub fn operator(word: u16) -> u8 {
    (word / 100) as u8
}

/// Low two digits of a word.
#[inline]
pub fn operand(word: u16) -> u8 {
    (word % 100) as u8
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halt => write!(f, "HLT"),
            Self::Trap(n) => write!(f, "TRP {n:02}"),
            Self::Add(addr) => write!(f, "ADD {addr:02}"),
            Self::Sub(addr) => write!(f, "SUB {addr:02}"),
            Self::Store(addr) => write!(f, "STA {addr:02}"),
            Self::Extended(ExtendedOp::UseB) => write!(f, "USB"),
            Self::Extended(ExtendedOp::Mul) => write!(f, "MUL"),
            Self::Extended(ExtendedOp::Div) => write!(f, "DIV"),
            Self::Extended(ExtendedOp::Unknown(n)) => write!(f, "EXT {n:02}"),
            Self::Load(addr) => write!(f, "LDA {addr:02}"),
            Self::Branch(addr) => write!(f, "BRA {addr:02}"),
            Self::BranchZero(addr) => write!(f, "BRZ {addr:02}"),
            Self::BranchPositive(addr) => write!(f, "BRP {addr:02}"),
            Self::Input => write!(f, "INP"),
            Self::Output => write!(f, "OUT"),
            Self::UserIo(n) => write!(f, "IO  {n:02}"),
        }
    }
}
