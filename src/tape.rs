use crate::error::ExecutionError;

/// The interpreter's memory: a row of `u8` cells that grows to the right one
/// page at a time, plus the cursor pointing at the current cell.
#[derive(Debug, Clone)]
pub struct Tape {
    cells: Vec<u8>,
    cursor: usize,
}

impl Tape {
    /// Number of cells allocated up front and added by each growth step.
    pub const PAGE_SIZE: usize = 1024;

    /// A single zeroed page with the cursor on cell 0.
    pub fn new() -> Self {
        Self {
            cells: vec![0; Self::PAGE_SIZE],
            cursor: 0,
        }
    }

    /// Value of the cell under the cursor.
    pub fn current(&self) -> u8 {
        self.cells[self.cursor]
    }

    /// Move the cursor one cell right, growing the tape first if needed.
    pub fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor >= self.cells.len() {
            // Round up to the next page boundary past the cursor.
            let new_len = (self.cursor / Self::PAGE_SIZE + 1) * Self::PAGE_SIZE;
            self.cells.resize(new_len, 0);
        }
    }

    /// Move the cursor one cell left.
    ///
    /// Fails with [`ExecutionError::OutOfBounds`] at `ip` and leaves the cursor
    /// on cell 0 if it is already there; the tape never wraps.
    pub fn retreat(&mut self, ip: usize) -> Result<(), ExecutionError> {
        let Some(c) = self.cursor.checked_sub(1) else {
            return Err(ExecutionError::OutOfBounds { ip });
        };
        self.cursor = c;
        Ok(())
    }

    pub fn increment(&mut self) {
        let cell = &mut self.cells[self.cursor];
        *cell = cell.wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        let cell = &mut self.cells[self.cursor];
        *cell = cell.wrapping_sub(1);
    }

    /// Overwrite the cell under the cursor.
    pub fn write(&mut self, value: u8) {
        self.cells[self.cursor] = value;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Allocated size in cells. Always a multiple of [`Tape::PAGE_SIZE`].
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_zeroed_page() {
        let tape = Tape::new();
        assert_eq!(tape.len(), Tape::PAGE_SIZE);
        assert_eq!(tape.cursor(), 0);
        assert!(tape.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn wrapping_addition() {
        let mut tape = Tape::new();
        for _ in 0..256 {
            tape.increment();
        }
        assert_eq!(tape.current(), 0);
    }

    #[test]
    fn wrapping_subtraction() {
        let mut tape = Tape::new();
        tape.decrement();
        assert_eq!(tape.current(), 255);
    }

    #[test]
    fn mixed_increments_and_decrements_are_modular() {
        let mut tape = Tape::new();
        for _ in 0..300 {
            tape.increment();
        }
        for _ in 0..50 {
            tape.decrement();
        }
        assert_eq!(tape.current(), ((300 - 50) % 256) as u8);
    }

    #[test]
    fn retreat_at_zero_fails_and_does_not_wrap() {
        let mut tape = Tape::new();
        assert!(matches!(tape.retreat(9), Err(ExecutionError::OutOfBounds { ip: 9 })));
        assert_eq!(tape.cursor(), 0);
    }

    #[test]
    fn advance_grows_by_whole_pages() {
        let mut tape = Tape::new();
        for _ in 0..Tape::PAGE_SIZE - 1 {
            tape.advance();
        }
        assert_eq!(tape.len(), Tape::PAGE_SIZE);

        tape.advance();
        assert_eq!(tape.cursor(), Tape::PAGE_SIZE);
        assert_eq!(tape.len(), 2 * Tape::PAGE_SIZE);
    }

    #[test]
    fn cursor_always_indexes_a_cell_after_advance() {
        let mut tape = Tape::new();
        for _ in 0..5 * Tape::PAGE_SIZE + 17 {
            tape.advance();
            assert!(tape.cursor() < tape.len());
            assert_eq!(tape.len() % Tape::PAGE_SIZE, 0);
            assert_eq!(tape.current(), 0);
        }
    }

    #[test]
    fn write_then_move_keeps_values() {
        let mut tape = Tape::new();
        tape.write(42);
        tape.advance();
        tape.write(7);
        tape.retreat(0).unwrap();
        assert_eq!(tape.current(), 42);
        assert_eq!(&tape.cells()[..2], &[42, 7]);
    }
}
