use crate::error::RunError;
use crate::instruction::{BUS_MAX, WORD_COUNT};

/// Flat decimal memory: 1000 cells of one word each.
///
/// A cell which was never written holds nothing, and reading it is an error rather than a
/// silent zero.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    cells: Box<[Option<u16>; WORD_COUNT as usize]>,
}

impl Memory {
    pub fn new() -> Self {
        Self {
            cells: Box::new([None; WORD_COUNT as usize]),
        }
    }

    /// Build memory from consecutive words, starting at address 0.
    #[cfg(test)]
    pub(crate) fn from_words(words: &[u16]) -> Self {
        assert!(words.len() <= WORD_COUNT as usize, "program does not fit in memory");
        let mut memory = Self::new();
        for (addr, word) in words.iter().enumerate() {
            assert!(*word <= BUS_MAX, "word {word} is wider than the bus");
            memory.cells[addr] = Some(*word);
        }
        memory
    }

    pub fn read(&self, addr: u16) -> Result<u16, RunError> {
        self.get(addr).ok_or(RunError::UnmappedMemory { address: addr })
    }

    pub fn get(&self, addr: u16) -> Option<u16> {
        self.cells.get(addr as usize).copied().flatten()
    }

    /// Store `value` at `addr`. Both must already be truncated to the bus width.
    #[inline]
    pub fn write(&mut self, addr: u16, value: u16) {
        debug_assert!(addr <= BUS_MAX && value <= BUS_MAX);
        self.cells[addr as usize] = Some(value);
    }

    pub fn is_mapped(&self, addr: u16) -> bool {
        self.get(addr).is_some()
    }

    /// Amount of cells holding a value.
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every mapped cell, in address order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(addr, cell)| cell.map(|value| (addr as u16, value)))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_reads_fail() {
        let memory = Memory::from_words(&[512, 0]);
        assert_eq!(memory.read(0), Ok(512));
        assert_eq!(memory.read(1), Ok(0));
        assert_eq!(memory.read(2), Err(RunError::UnmappedMemory { address: 2 }));
        assert_eq!(
            memory.read(1000),
            Err(RunError::UnmappedMemory { address: 1000 })
        );
    }

    #[test]
    fn write_maps_cell() {
        let mut memory = Memory::new();
        assert!(memory.is_empty());
        memory.write(999, 42);
        assert!(memory.is_mapped(999));
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.iter().collect::<Vec<_>>(), vec![(999, 42)]);
    }
}
