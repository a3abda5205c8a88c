use std::{error::Error, fmt, num::ParseIntError};

use miette::{miette, LabeledSpan, Report, Severity};

use crate::{loader::ProgramSource, span::Span};

/// Fatal error raised while running a program.
///
/// Nothing is retried: the machine state at the point of failure must be discarded.
#[derive(Debug, PartialEq, Eq)]
pub enum RunError {
    OutOfRangeProgramCounter { pc: u16 },
    UnmappedMemory { address: u16 },
    UnknownTrap { operand: u8 },
    UnknownExtendedInstruction { operand: u8 },
    UnknownIoInstruction { operand: u8 },
    IoValueRange { value: i32 },
    DivisionByZero { dividend: u16 },
    /// Input channel produced something which is not a number.
    InvalidInput { text: String },
    /// Input channel failed or was closed.
    Channel { reason: String },
    CycleLimit { limit: u64 },
}

impl Error for RunError {}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRangeProgramCounter { pc } => {
                write!(f, "Out of range program counter: {}", pc)
            }
            Self::UnmappedMemory { address } => {
                write!(f, "Read from unmapped memory at address {:03}", address)
            }
            Self::UnknownTrap { operand } => {
                write!(f, "Unknown trap instruction: {:03}", operand)
            }
            Self::UnknownExtendedInstruction { operand } => {
                write!(f, "Unknown extended instruction: {:03}", 400 + *operand as u16)
            }
            Self::UnknownIoInstruction { operand } => {
                write!(f, "Unknown I/O instruction: {:03}", 900 + *operand as u16)
            }
            Self::IoValueRange { value } => write!(f, "Out of range input value: {}", value),
            Self::DivisionByZero { dividend } => {
                write!(f, "Division by zero (dividend {})", dividend)
            }
            Self::InvalidInput { text } => write!(f, "Input is not a number: `{}`", text),
            Self::Channel { reason } => write!(f, "I/O channel failed: {}", reason),
            Self::CycleLimit { limit } => {
                write!(f, "Program did not halt within {} cycles", limit)
            }
        }
    }
}

impl RunError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::OutOfRangeProgramCounter { .. } => "run::out_of_range_pc",
            Self::UnmappedMemory { .. } => "run::unmapped_memory",
            Self::UnknownTrap { .. } => "run::unknown_trap",
            Self::UnknownExtendedInstruction { .. } => "run::unknown_extended",
            Self::UnknownIoInstruction { .. } => "run::unknown_io",
            Self::IoValueRange { .. } => "run::io_value_range",
            Self::DivisionByZero { .. } => "run::division_by_zero",
            Self::InvalidInput { .. } => "run::invalid_input",
            Self::Channel { .. } => "run::channel",
            Self::CycleLimit { .. } => "run::cycle_limit",
        }
    }

    fn help(&self) -> &'static str {
        match self {
            Self::OutOfRangeProgramCounter { .. } => "addresses range from 000 to 999",
            Self::UnmappedMemory { .. } => {
                "every cell must be loaded or stored to before it is read"
            }
            Self::UnknownTrap { .. } => "only `000` (HLT) is defined under opcode 0xx",
            Self::UnknownExtendedInstruction { .. } => {
                "defined extended instructions are 401 (USB), 402 (MUL) and 403 (DIV)"
            }
            Self::UnknownIoInstruction { .. } => {
                "defined I/O instructions are 901 (INP) and 902 (OUT)"
            }
            Self::IoValueRange { .. } | Self::InvalidInput { .. } => {
                "input values range from 0 to 999"
            }
            Self::DivisionByZero { .. } => "check the divisor before executing DIV",
            Self::Channel { .. } => "the program may be reading more input than was given",
            Self::CycleLimit { .. } => "raise `--max-cycles` or check the program for loops",
        }
    }

    /// Convert into a diagnostic for display, noting where execution stopped.
    pub fn report(self, pc: u16) -> Report {
        let message = self.to_string();
        miette!(
            severity = Severity::Error,
            code = self.code(),
            help = self.help(),
            "{message} (next instruction at {pc:03})",
        )
    }
}

// Loader errors

pub fn load_bad_number(src: &ProgramSource, span: Span, e: ParseIntError) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::bad_number",
        help = "values and addresses are plain decimal numbers",
        labels = vec![LabeledSpan::at(span, "not a number")],
        "Encountered an invalid number: {e}",
    )
    .with_source_code(src.named())
}

pub fn load_out_of_range(src: &ProgramSource, span: Span, what: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::out_of_range",
        help = "addresses and values range from 0 to 999",
        labels = vec![LabeledSpan::at(span, format!("{what} out of range"))],
        "Encountered an out of range {what}",
    )
    .with_source_code(src.named())
}

pub fn load_duplicate_address(src: &ProgramSource, span: Span, address: u16) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::duplicate_address",
        help = "each address may only be given a value once",
        labels = vec![LabeledSpan::at(span, "already defined")],
        "Address {address:03} is defined twice",
    )
    .with_source_code(src.named())
}

pub fn load_overflow(src: &ProgramSource, span: Span) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::overflow",
        help = "the program continues past address 999; give this line an explicit address",
        labels = vec![LabeledSpan::at(span, "no address left")],
        "Program does not fit in memory",
    )
    .with_source_code(src.named())
}

pub fn load_trailing(src: &ProgramSource, span: Span) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::trailing",
        help = "lines hold `value`, `address value` or `address: value`",
        labels = vec![LabeledSpan::at(span, "unexpected token")],
        "Unexpected token after value",
    )
    .with_source_code(src.named())
}
