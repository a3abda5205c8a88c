use std::fs;
use std::path::Path;

use miette::{IntoDiagnostic, NamedSource, Result};

use crate::error;
use crate::instruction::{BUS_MAX, WORD_COUNT};
use crate::memory::Memory;
use crate::span::Span;

/// Program text together with the name it is reported under.
#[derive(Clone, Copy, Debug)]
pub struct ProgramSource<'a> {
    pub name: &'a str,
    pub text: &'a str,
}

impl<'a> ProgramSource<'a> {
    pub fn new(name: &'a str, text: &'a str) -> Self {
        ProgramSource { name, text }
    }

    pub(crate) fn named(&self) -> NamedSource<String> {
        NamedSource::new(self.name, self.text.to_string())
    }
}

/// Read and load a program file into fresh memory.
pub fn load_file(path: &Path) -> Result<Memory> {
    let text = fs::read_to_string(path).into_diagnostic()?;
    let name = path.display().to_string();
    let mut mem = Memory::new();
    load(ProgramSource::new(&name, &text), &mut mem)?;
    Ok(mem)
}

/// Populate `mem` from program text.
///
/// Each line holds `value`, `address value` or `address: value`. A bare value is placed after
/// the previous one, starting at address 0. `;` and `#` start comments.
pub fn load(src: ProgramSource, mem: &mut Memory) -> Result<()> {
    let mut next_addr: u16 = 0;
    for line in src.text.lines() {
        let code = match line.find([';', '#']) {
            Some(idx) => &line[..idx],
            None => line,
        };
        let mut tokens = code
            .split(|ch: char| ch.is_whitespace() || ch == ':')
            .filter(|token| !token.is_empty());
        let Some(first) = tokens.next() else {
            continue;
        };

        let (addr, value) = match tokens.next() {
            Some(second) => (parse_word(src, first, "address")?, second),
            None => {
                if next_addr >= WORD_COUNT {
                    return Err(error::load_overflow(&src, Span::within(src.text, first)));
                }
                (next_addr, first)
            }
        };
        if let Some(extra) = tokens.next() {
            return Err(error::load_trailing(&src, Span::within(src.text, extra)));
        }
        let word = parse_word(src, value, "value")?;

        if mem.is_mapped(addr) {
            return Err(error::load_duplicate_address(
                &src,
                Span::within(src.text, code.trim()),
                addr,
            ));
        }
        mem.write(addr, word);
        next_addr = addr + 1;
    }
    Ok(())
}

fn parse_word(src: ProgramSource, token: &str, what: &str) -> Result<u16> {
    let span = Span::within(src.text, token);
    let value: i64 = token
        .parse()
        .map_err(|e| error::load_bad_number(&src, span, e))?;
    if !(0..=BUS_MAX as i64).contains(&value) {
        return Err(error::load_out_of_range(&src, span, what));
    }
    Ok(value as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_str(text: &str) -> Result<Memory> {
        let mut mem = Memory::new();
        load(ProgramSource::new("test.lmc", text), &mut mem)?;
        Ok(mem)
    }

    fn error_code(text: &str) -> String {
        let report = load_str(text).unwrap_err();
        let code = report.code().expect("diagnostic has a code").to_string();
        code
    }

    #[test]
    fn sequential_values() {
        let mem = load_str("901\n902\n000\n").unwrap();
        assert_eq!(mem.iter().collect::<Vec<_>>(), vec![(0, 901), (1, 902), (2, 0)]);
    }

    #[test]
    fn explicit_addresses_and_comments() {
        let src = "\
; add two numbers
10: 512     # load
11 113
    902

# data
20 7
";
        let mem = load_str(src).unwrap();
        assert_eq!(
            mem.iter().collect::<Vec<_>>(),
            vec![(10, 512), (11, 113), (12, 902), (20, 7)]
        );
        assert!(!mem.is_mapped(0));
    }

    #[test]
    fn rejects_bad_numbers() {
        assert_eq!(error_code("901\nabc\n"), "load::bad_number");
        assert_eq!(error_code("-1\n"), "load::out_of_range");
        assert_eq!(error_code("1000\n"), "load::out_of_range");
        assert_eq!(error_code("1000 5\n"), "load::out_of_range");
    }

    #[test]
    fn rejects_duplicates_and_trailing() {
        assert_eq!(error_code("5 100\n5 200\n"), "load::duplicate_address");
        assert_eq!(error_code("0\n0: 1\n"), "load::duplicate_address");
        assert_eq!(error_code("1 2 3\n"), "load::trailing");
    }

    #[test]
    fn rejects_overflow() {
        assert!(load_str("999 1\n").is_ok());
        assert_eq!(error_code("999 1\n2\n"), "load::overflow");
    }

    #[test]
    fn labels_offending_token() {
        let report = load_str("901\n  12x\n").unwrap_err();
        let labels: Vec<_> = report.labels().expect("diagnostic has labels").collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 6);
        assert_eq!(labels[0].len(), 3);
    }
}
