use std::collections::VecDeque;
use std::io::{stdin, stdout, BufRead, IsTerminal, Write};

use console::Term;

use crate::error::RunError;
use crate::output::Output;

/// Numeric input/output capability used by `INP`, `OUT` and the user I/O instructions.
pub trait Channel {
    /// Block until one value is available.
    ///
    /// Range is not checked here; the runtime rejects anything outside `0..=999`.
    fn read(&mut self) -> Result<i32, RunError>;

    fn write(&mut self, value: u16) -> Result<(), RunError>;

    fn input_is_interactive(&self) -> bool {
        false
    }

    fn output_is_interactive(&self) -> bool {
        false
    }

    /// Show a short cosmetic prompt, only called for interactive channels.
    fn prompt(&mut self, _text: &str) {}

    /// Handle `900` or `903..=999`.
    ///
    /// Return `None` if `operand` is not a device this channel knows about. On success the
    /// returned value replaces the working register.
    fn user_io(&mut self, _operand: u8, _working: u16) -> Option<Result<u16, RunError>> {
        None
    }
}

/// Channel connected to the process' stdin and stdout.
pub struct StdChannel {
    input_interactive: bool,
    output_interactive: bool,
    /// Numbers already read from a redirected stdin line, but not yet consumed
    pending: VecDeque<String>,
}

impl StdChannel {
    pub fn new() -> Self {
        StdChannel {
            input_interactive: stdin().is_terminal(),
            output_interactive: stdout().is_terminal(),
            pending: VecDeque::new(),
        }
    }

    fn next_token(&mut self) -> Result<String, RunError> {
        if self.input_interactive {
            let line = Term::stdout().read_line().map_err(channel_error)?;
            return Ok(line.trim().to_string());
        }
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            let mut line = String::new();
            let read = stdin().lock().read_line(&mut line).map_err(channel_error)?;
            if read == 0 {
                return Err(RunError::Channel {
                    reason: "end of input".to_string(),
                });
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }
}

impl Default for StdChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Channel for StdChannel {
    fn read(&mut self) -> Result<i32, RunError> {
        let token = self.next_token()?;
        parse_value(&token)
    }

    fn write(&mut self, value: u16) -> Result<(), RunError> {
        Output::Normal.print_str(&format!("{value}\n"));
        Ok(())
    }

    fn input_is_interactive(&self) -> bool {
        self.input_interactive
    }

    fn output_is_interactive(&self) -> bool {
        self.output_interactive
    }

    fn prompt(&mut self, text: &str) {
        Output::Normal.print_str(text);
        let _ = stdout().flush();
    }
}

/// In-memory channel with queued input and captured output.
#[derive(Debug, Default)]
pub struct BufferChannel {
    input: VecDeque<i32>,
    output: Vec<u16>,
}

impl BufferChannel {
    pub fn new(input: impl IntoIterator<Item = i32>) -> Self {
        BufferChannel {
            input: input.into_iter().collect(),
            output: Vec::new(),
        }
    }

    pub fn output(&self) -> &[u16] {
        &self.output
    }

    pub fn push_input(&mut self, value: i32) {
        self.input.push_back(value);
    }
}

impl Channel for BufferChannel {
    fn read(&mut self) -> Result<i32, RunError> {
        self.input.pop_front().ok_or_else(|| RunError::Channel {
            reason: "input queue is empty".to_string(),
        })
    }

    fn write(&mut self, value: u16) -> Result<(), RunError> {
        self.output.push(value);
        Ok(())
    }
}

fn parse_value(token: &str) -> Result<i32, RunError> {
    token.parse().map_err(|_| RunError::InvalidInput {
        text: token.to_string(),
    })
}

fn channel_error(e: std::io::Error) -> RunError {
    RunError::Channel {
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_values() {
        assert_eq!(parse_value("42"), Ok(42));
        assert_eq!(parse_value("-3"), Ok(-3));
        assert_eq!(parse_value("1000"), Ok(1000));
        assert_eq!(
            parse_value("4x"),
            Err(RunError::InvalidInput {
                text: "4x".to_string()
            })
        );
    }

    #[test]
    fn buffer_channel_queues() {
        let mut chan = BufferChannel::new([1, 2]);
        chan.push_input(3);
        assert_eq!(chan.read(), Ok(1));
        assert_eq!(chan.read(), Ok(2));
        assert_eq!(chan.read(), Ok(3));
        assert!(matches!(chan.read(), Err(RunError::Channel { .. })));

        chan.write(7).unwrap();
        chan.write(999).unwrap();
        assert_eq!(chan.output(), &[7, 999]);
        assert!(!chan.input_is_interactive());
        assert!(chan.user_io(5, 0).is_none());
    }
}
