//! The data tape: a row of byte cells that grows at either end on demand.


use std::collections::VecDeque;
use std::fmt;
use std::ops::Index;


/// Number of cells a fresh tape starts with.
pub const INITIAL_CELLS: usize = 5;
/// Index of the data pointer on a fresh tape.
pub const INITIAL_POINTER: usize = 2;


/// Direction of a pointer move or a neighbour access.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Left,
    Right,
}


/// Growable bidirectional tape of unsigned 8-bit cells with a data pointer.
///
/// The pointer always addresses an existing cell. Anything that would reach
/// past either end first inserts a zero cell there; inserting on the left
/// shifts every index by one, so the pointer is moved along with its cell.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tape {
    cells: VecDeque<u8>,
    pointer: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    /// Five zero cells with the pointer on the middle one.
    pub fn new() -> Self {
        Self {
            cells: VecDeque::from(vec![0; INITIAL_CELLS]),
            pointer: INITIAL_POINTER,
        }
    }

    /// Index of the cell under the pointer.
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Number of cells currently allocated.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Value of the cell under the pointer.
    pub fn current(&self) -> u8 {
        self.cells[self.pointer]
    }

    /// Overwrite the cell under the pointer.
    pub fn set(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    /// Add `delta` to the cell under the pointer, wrapping modulo 256.
    pub fn add(&mut self, delta: i64) {
        let delta = delta.rem_euclid(256) as u8;
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_add(delta);
    }

    /// Move the pointer one cell, growing the tape if there is no cell there.
    pub fn shift(&mut self, direction: Direction) {
        self.pointer = self.neighbour(direction);
    }

    /// Overwrite the current cell with its neighbour's value.
    pub fn copy(&mut self, direction: Direction) {
        let source = self.neighbour(direction);
        self.cells[self.pointer] = self.cells[source];
    }

    /// Add the neighbour's value into the current cell.
    pub fn add_from(&mut self, direction: Direction) {
        let source = self.neighbour(direction);
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_add(self.cells[source]);
    }

    /// Index of the neighbouring cell, creating it first if the pointer sits
    /// on that end of the tape.
    fn neighbour(&mut self, direction: Direction) -> usize {
        match direction {
            Direction::Left => {
                if self.pointer == 0 {
                    self.cells.push_front(0);
                    self.pointer += 1;
                }
                self.pointer - 1
            },
            Direction::Right => {
                if self.pointer + 1 == self.cells.len() {
                    self.cells.push_back(0);
                }
                self.pointer + 1
            },
        }
    }

    /// All cells, leftmost first.
    pub fn cells(&self) -> impl Iterator<Item = u8> + '_ {
        self.cells.iter().copied()
    }
}

impl Index<usize> for Tape {
    type Output = u8;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cells[index]
    }
}

/// Cells separated by spaces, the pointer cell wrapped in brackets.
impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if i == self.pointer {
                write!(f, "[{}]", cell)?;
            } else {
                write!(f, "{}", cell)?;
            }
        }
        Ok(())
    }
}
