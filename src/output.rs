use std::cell::RefCell;
use std::str::Chars;

use colored::{ColoredString, Colorize};

use crate::instruction::Instruction;
use crate::state::RunState;

/// Where a piece of text goes.
///
/// Program output goes to stdout untouched. Trace output goes to stderr, colored unless
/// `--minimal` was given.
#[derive(Clone, Copy, Debug)]
pub enum Output {
    Normal,
    Trace,
}

struct Decolored<'a> {
    chars: Chars<'a>,
}

impl Output {
    thread_local! {
        static IS_LINE_START: RefCell<bool> = const { RefCell::new(true) };
        static IS_MINIMAL: RefCell<bool> = const { RefCell::new(false) };
    }

    pub fn set_line_start(new_value: bool) -> bool {
        Self::IS_LINE_START.with(|value| value.replace(new_value))
    }
    /// Private. Use [`Output::start_new_line`].
    fn is_line_start() -> bool {
        Self::IS_LINE_START.with(|value| *value.borrow())
    }
    pub fn set_minimal(new_value: bool) -> bool {
        Self::IS_MINIMAL.with(|value| value.replace(new_value))
    }
    pub fn is_minimal() -> bool {
        Self::IS_MINIMAL.with(|value| *value.borrow())
    }

    fn set_line_start_from_str(string: &str) {
        let last = Decolored::new(string).last();
        if let Some(ch) = last {
            Output::set_line_start(ch == '\n');
        }
    }

    pub fn print_str(&self, string: &str) {
        match self {
            Self::Normal => {
                print!("{}", string);
                Self::set_line_start_from_str(string);
            }
            Self::Trace => {
                if Self::is_minimal() {
                    eprint_colorless(string);
                } else {
                    eprint!("{}", ColoredString::from(string).blue());
                }
                Self::set_line_start_from_str(string);
            }
        }
    }

    /// Finish a half-written line, eg. after an `in? ` prompt.
    pub fn start_new_line(&self) {
        if !Self::is_line_start() {
            self.print_str("\n");
        }
    }

    /// One line per executed instruction: where it was, what it was and the state after it.
    pub fn print_trace(&self, state: &RunState, addr: u16, word: u16, instr: Instruction) {
        self.start_new_line();
        let flags = state.flags();
        let line = format!(
            "{:03}  {:03}  {:<6}  A {:03}  B {:03}  {}{}{}\n",
            addr,
            word,
            instr.to_string(),
            state.acc(),
            state.b_reg(),
            if flags.zero { 'Z' } else { '-' },
            if flags.positive { 'P' } else { '-' },
            if state.use_b() { 'B' } else { '-' },
        );
        if Self::is_minimal() {
            self.print_str(&line);
        } else {
            // Dim the address column
            self.print_str(&format!("\x1b[2m{}\x1b[0m{}", &line[..3], &line[3..]));
        }
    }
}

impl<'a> Decolored<'a> {
    pub fn new(string: &'a str) -> Self {
        Self {
            chars: string.chars(),
        }
    }
}

impl<'a> Iterator for Decolored<'a> {
    type Item = char;
    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ch) = self.chars.next() {
            // Skip everything between '\x1b' and 'm' (inclusive)
            if ch == '\x1b' {
                while self.chars.next().is_some_and(|ch| ch != 'm') {}
                continue;
            }
            return Some(ch);
        }
        None
    }
}

fn eprint_colorless(string: &str) {
    for ch in Decolored::new(string) {
        eprint!("{}", ch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decolored() {
        assert_eq!(Decolored::new("abcdef").collect::<String>(), "abcdef");
        assert_eq!(
            Decolored::new("000\x1b[2m  \x1b[0m901").collect::<String>(),
            "000  901"
        );
        assert_eq!(Decolored::new("abc\x1b[0xyz").collect::<String>(), "abc");
    }

    #[test]
    fn tracks_line_start() {
        Output::set_line_start(true);
        Output::set_line_start_from_str("in? ");
        assert!(!Output::is_line_start());
        Output::set_line_start_from_str("42\n\x1b[0m");
        assert!(Output::is_line_start());
    }
}
