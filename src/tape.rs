//! This module defines the `Tape`, an unbounded bidirectional sequence of symbols with a
//! single read/write head. Cells are materialized lazily as the head moves past either end.

use std::fmt;

use crate::types::{Symbol, BLANK_SYMBOL};

/// A single tape with a read/write head.
///
/// A fresh tape holds one blank placeholder cell. The first `append` or `prepend` replaces
/// that placeholder, so loading an n-symbol input yields exactly n cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<Symbol>,
    head: usize,
    first_write: bool,
}

impl Tape {
    /// Creates a tape holding a single blank cell under the head.
    pub fn new() -> Self {
        Self {
            cells: vec![BLANK_SYMBOL],
            head: 0,
            first_write: true,
        }
    }

    /// Creates a fresh tape and appends every character of `input`, head on the first cell.
    ///
    /// An empty input leaves the single blank cell in place.
    pub fn from_input(input: &str) -> Self {
        let mut tape = Self::new();
        for symbol in input.chars() {
            tape.append(symbol);
        }
        tape
    }

    /// Adds a symbol to the right end of the tape.
    pub fn append(&mut self, symbol: Symbol) {
        self.take_placeholder();
        self.cells.push(symbol);
    }

    /// Adds a symbol to the left end of the tape, keeping the head on the same cell.
    pub fn prepend(&mut self, symbol: Symbol) {
        let replaced = self.take_placeholder();
        self.cells.insert(0, symbol);
        // The placeholder was the only cell, so there is nothing to the right to follow.
        if !replaced {
            self.head += 1;
        }
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> Symbol {
        self.cells[self.head]
    }

    /// Overwrites the symbol under the head.
    pub fn write(&mut self, symbol: Symbol) {
        self.cells[self.head] = symbol;
    }

    /// Moves the head one cell left, growing the tape by a blank at the left end if needed.
    pub fn move_left(&mut self) {
        if self.head == 0 {
            self.cells.insert(0, BLANK_SYMBOL);
        } else {
            self.head -= 1;
        }
    }

    /// Moves the head one cell right, growing the tape by a blank at the right end if needed.
    pub fn move_right(&mut self) {
        if self.head + 1 >= self.cells.len() {
            self.cells.push(BLANK_SYMBOL);
        }
        self.head += 1;
    }

    /// Index of the head within the materialized cells.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Number of materialized cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A tape always holds at least one cell.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The materialized cells, left to right.
    pub fn symbols(&self) -> &[Symbol] {
        &self.cells
    }

    fn take_placeholder(&mut self) -> bool {
        if !self.first_write {
            return false;
        }

        self.first_write = false;
        self.cells.clear();
        self.head = 0;
        true
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells.iter().try_for_each(|c| write!(f, "{c}"))
    }
}
