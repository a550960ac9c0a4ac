//! # Grid and Fixed-Mask Model
//!
//! A [`Grid`] is a 9x9 array of digits stored inline, so copying one is a
//! plain memory copy and parents never share storage with their children.
//! In a puzzle `0` marks a blank cell; in an individual every cell holds a
//! digit from 1 to 9.
//!
//! A [`FixedMask`] records which cells were given as clues. A [`Puzzle`] is
//! the validated input: a grid plus its mask.
//!
//! ```rust
//! use sudoku_genalg::grid::Puzzle;
//!
//! let puzzle = Puzzle::reference();
//! assert_eq!(puzzle.fixed_mask().clue_count(), 30);
//! assert!(puzzle.fixed_mask().is_fixed(0, 1));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{GeneticError, Result};

/// Side length of the grid.
pub const SIZE: usize = 9;

/// Side length of one box.
pub const BOX_SIZE: usize = 3;

/// Sum of the digits 1 through 9.
pub const DIGIT_SUM: u32 = 45;

/// Product of the digits 1 through 9 (9!).
pub const DIGIT_PRODUCT: u64 = 362_880;

/// One row, column or box worth of digits.
pub type Row = [u8; SIZE];

/// A 9x9 Sudoku grid.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [Row; SIZE],
}

impl Grid {
    pub fn new(cells: [Row; SIZE]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Row; SIZE] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.cells[row][col] = value;
    }

    pub fn row(&self, row: usize) -> &Row {
        &self.cells[row]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut Row {
        &mut self.cells[row]
    }

    pub fn set_row(&mut self, row: usize, values: Row) {
        self.cells[row] = values;
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.cells.iter()
    }

    pub fn column(&self, col: usize) -> Row {
        std::array::from_fn(|row| self.cells[row][col])
    }

    /// Returns the digits of box `index` (0..9, row-major), read row-major.
    ///
    /// Box `index` has its top-left corner at
    /// `(index / 3 * 3, index % 3 * 3)`.
    pub fn block(&self, index: usize) -> Row {
        let top = (index / BOX_SIZE) * BOX_SIZE;
        let left = (index % BOX_SIZE) * BOX_SIZE;
        std::array::from_fn(|i| self.cells[top + i / BOX_SIZE][left + i % BOX_SIZE])
    }

    /// The 18 units scored by the fitness functions: 9 columns, then 9 boxes.
    ///
    /// Rows are left out because every individual keeps them valid.
    pub fn scoring_units(&self) -> impl Iterator<Item = Row> + '_ {
        (0..SIZE)
            .map(|col| self.column(col))
            .chain((0..SIZE).map(|index| self.block(index)))
    }

    /// Returns `true` if every row, column and box holds 1..=9 exactly once.
    pub fn is_solved(&self) -> bool {
        (0..SIZE).all(|i| {
            is_permutation(&self.cells[i])
                && is_permutation(&self.column(i))
                && is_permutation(&self.block(i))
        })
    }

    /// Returns `true` if every row holds 1..=9 exactly once.
    pub fn rows_are_permutations(&self) -> bool {
        self.cells.iter().all(|row| is_permutation(row))
    }
}

impl From<[Row; SIZE]> for Grid {
    fn from(cells: [Row; SIZE]) -> Self {
        Self::new(cells)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            for value in row {
                write!(f, "{}", value)?;
            }
            if i + 1 < SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Returns `true` if `unit` contains each digit 1..=9 exactly once.
pub fn is_permutation(unit: &[u8]) -> bool {
    if unit.len() != SIZE {
        return false;
    }
    let mut seen = [false; SIZE + 1];
    for &value in unit {
        let value = value as usize;
        if value == 0 || value > SIZE || seen[value] {
            return false;
        }
        seen[value] = true;
    }
    true
}

/// Number of distinct values in `unit`.
pub fn distinct_count(unit: &[u8]) -> usize {
    let mut seen = [false; u8::MAX as usize + 1];
    unit.iter()
        .filter(|&&value| !std::mem::replace(&mut seen[value as usize], true))
        .count()
}

/// Cells that hold a puzzle clue and must never change.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedMask {
    cells: [[bool; SIZE]; SIZE],
}

impl FixedMask {
    /// Derives the mask from a puzzle grid: non-zero cells are fixed.
    pub fn from_puzzle(puzzle: &Grid) -> Self {
        Self {
            cells: std::array::from_fn(|row| std::array::from_fn(|col| puzzle.get(row, col) != 0)),
        }
    }

    pub fn is_fixed(&self, row: usize, col: usize) -> bool {
        self.cells[row][col]
    }

    pub fn row(&self, row: usize) -> &[bool; SIZE] {
        &self.cells[row]
    }

    /// Non-fixed column indices of `row`, left to right.
    pub fn free_columns(&self, row: usize) -> Vec<usize> {
        (0..SIZE).filter(|&col| !self.cells[row][col]).collect()
    }

    pub fn clue_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&fixed| fixed).count()
    }
}

/// Derives the [`FixedMask`] of a puzzle grid.
pub fn fixed_mask(puzzle: &Grid) -> FixedMask {
    FixedMask::from_puzzle(puzzle)
}

/// A validated puzzle: the clue grid and its fixed mask.
///
/// With the `serde` feature a puzzle serializes as its 9x9 cell array and
/// deserializes through [`Puzzle::new`], so malformed input is rejected.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "[Row; SIZE]", into = "[Row; SIZE]"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Puzzle {
    grid: Grid,
    fixed: FixedMask,
}

impl Puzzle {
    /// Builds a puzzle, rejecting digits above 9 and duplicate clues in any
    /// row, column or box.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::InvalidPuzzle` describing the first problem found.
    pub fn new(cells: [Row; SIZE]) -> Result<Self> {
        let grid = Grid::new(cells);

        for (row, values) in grid.rows().enumerate() {
            if let Some(col) = values.iter().position(|&v| v as usize > SIZE) {
                return Err(GeneticError::InvalidPuzzle(format!(
                    "cell ({}, {}) holds {}, expected 0-9",
                    row, col, values[col]
                )));
            }
        }

        for i in 0..SIZE {
            check_unit_clues(grid.row(i), "row", i)?;
            check_unit_clues(&grid.column(i), "column", i)?;
            check_unit_clues(&grid.block(i), "box", i)?;
        }

        Ok(Self {
            grid,
            fixed: FixedMask::from_puzzle(&grid),
        })
    }

    /// The 30-clue puzzle used as the default demonstration input.
    pub fn reference() -> Self {
        let grid = Grid::new(REFERENCE_PUZZLE);
        Self {
            grid,
            fixed: FixedMask::from_puzzle(&grid),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn fixed_mask(&self) -> &FixedMask {
        &self.fixed
    }

    /// Returns `true` if every clue of this puzzle appears unchanged in `grid`.
    pub fn is_respected_by(&self, grid: &Grid) -> bool {
        (0..SIZE).all(|row| {
            (0..SIZE).all(|col| {
                !self.fixed.is_fixed(row, col) || grid.get(row, col) == self.grid.get(row, col)
            })
        })
    }
}

fn check_unit_clues(unit: &Row, kind: &str, index: usize) -> Result<()> {
    let mut seen = [false; SIZE + 1];
    for &value in unit.iter().filter(|&&v| v != 0) {
        if std::mem::replace(&mut seen[value as usize], true) {
            return Err(GeneticError::InvalidPuzzle(format!(
                "{} {} contains clue {} more than once",
                kind, index, value
            )));
        }
    }
    Ok(())
}

impl FromStr for Puzzle {
    type Err = GeneticError;

    /// Parses 81 cells: digits `1`-`9`, with `0` or `.` for blanks.
    /// Whitespace and the separators `|`, `-`, `+` are ignored.
    fn from_str(text: &str) -> Result<Self> {
        let mut digits = Vec::with_capacity(SIZE * SIZE);
        for ch in text.chars() {
            match ch {
                '1'..='9' => digits.push(ch as u8 - b'0'),
                '0' | '.' => digits.push(0),
                '|' | '-' | '+' => {}
                c if c.is_whitespace() => {}
                other => {
                    return Err(GeneticError::InvalidPuzzle(format!(
                        "unexpected character '{}'",
                        other
                    )))
                }
            }
        }

        if digits.len() != SIZE * SIZE {
            return Err(GeneticError::InvalidPuzzle(format!(
                "expected {} cells, got {}",
                SIZE * SIZE,
                digits.len()
            )));
        }

        let cells =
            std::array::from_fn(|row| std::array::from_fn(|col| digits[row * SIZE + col]));
        Self::new(cells)
    }
}

impl TryFrom<[Row; SIZE]> for Puzzle {
    type Error = GeneticError;

    fn try_from(cells: [Row; SIZE]) -> Result<Self> {
        Self::new(cells)
    }
}

impl From<Puzzle> for [Row; SIZE] {
    fn from(puzzle: Puzzle) -> Self {
        *puzzle.grid.cells()
    }
}

#[rustfmt::skip]
const REFERENCE_PUZZLE: [Row; SIZE] = [
    [0, 6, 0, 1, 0, 4, 0, 5, 0],
    [0, 0, 8, 3, 0, 5, 6, 0, 0],
    [2, 0, 0, 0, 0, 0, 0, 0, 1],
    [8, 0, 0, 4, 0, 7, 0, 0, 6],
    [0, 0, 6, 0, 0, 0, 3, 0, 0],
    [7, 0, 0, 9, 0, 1, 0, 0, 4],
    [5, 0, 0, 0, 0, 0, 0, 0, 2],
    [0, 0, 7, 2, 0, 6, 9, 0, 0],
    [0, 4, 0, 5, 0, 8, 0, 7, 0],
];
