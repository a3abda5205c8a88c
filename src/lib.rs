// Machine
pub mod instruction;
pub use instruction::{ExtendedOp, Instruction};
mod memory;
pub use memory::Memory;
mod state;
pub use state::{Flags, RunState};

// Running
mod ops;
mod runtime;
pub use runtime::run;
mod channel;
pub use channel::{BufferChannel, Channel, StdChannel};
mod output;
pub use output::Output;

// Loading
mod loader;
pub use loader::{load, load_file, ProgramSource};
mod span;

mod error;
pub use error::RunError;

/// Amount of lines to show as context, each side of focus line (line containing span).
pub const DIAGNOSTIC_CONTEXT_LINES: usize = 4;
