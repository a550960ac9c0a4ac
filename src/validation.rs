//! # Validation
//!
//! Flags the cells of a finished grid that break Sudoku's uniqueness rules.
//!
//! [`validate`] only checks rows and columns, while the fitness functions
//! score columns and boxes. [`validate_with_boxes`] closes that gap, and
//! [`ConflictScope`] picks which check fills the mask reported with a run's
//! result.

use std::fmt;

use strum::{Display, EnumIter, EnumString};

use crate::grid::{Grid, BOX_SIZE, SIZE};

/// Which units the reported conflict mask covers.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConflictScope {
    #[default]
    RowsAndColumns,
    WithBoxes,
}

impl ConflictScope {
    pub fn apply(&self, grid: &Grid) -> ConflictMask {
        match self {
            ConflictScope::RowsAndColumns => validate(grid),
            ConflictScope::WithBoxes => validate_with_boxes(grid),
        }
    }
}

/// A 9x9 map of cells involved in a duplicate.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ConflictMask {
    cells: [[bool; SIZE]; SIZE],
}

impl ConflictMask {
    pub fn cells(&self) -> &[[bool; SIZE]; SIZE] {
        &self.cells
    }

    pub fn is_conflict(&self, row: usize, col: usize) -> bool {
        self.cells[row][col]
    }

    /// Number of flagged cells.
    pub fn count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&flag| flag).count()
    }

    pub fn is_clear(&self) -> bool {
        self.count() == 0
    }

    fn mark_unit<I>(&mut self, grid: &Grid, positions: I)
    where
        I: Iterator<Item = (usize, usize)> + Clone,
    {
        let mut occurrences = [0usize; SIZE + 1];
        for (row, col) in positions.clone() {
            occurrences[grid.get(row, col) as usize] += 1;
        }
        for (row, col) in positions {
            if occurrences[grid.get(row, col) as usize] > 1 {
                self.cells[row][col] = true;
            }
        }
    }
}

impl fmt::Display for ConflictMask {
    /// `x` for a flagged cell, `.` otherwise; one line per row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            let line: String = row.iter().map(|&flag| if flag { 'x' } else { '.' }).collect();
            if i + 1 < SIZE {
                writeln!(f, "{}", line)?;
            } else {
                write!(f, "{}", line)?;
            }
        }
        Ok(())
    }
}

/// Marks every cell whose value repeats within its row or its column.
pub fn validate(grid: &Grid) -> ConflictMask {
    let mut mask = ConflictMask::default();
    for i in 0..SIZE {
        mask.mark_unit(grid, (0..SIZE).map(move |col| (i, col)));
        mask.mark_unit(grid, (0..SIZE).map(move |row| (row, i)));
    }
    mask
}

/// Like [`validate`], and also marks cells whose value repeats within their
/// 3x3 box.
pub fn validate_with_boxes(grid: &Grid) -> ConflictMask {
    let mut mask = validate(grid);
    for index in 0..SIZE {
        let top = index / BOX_SIZE * BOX_SIZE;
        let left = index % BOX_SIZE * BOX_SIZE;
        mask.mark_unit(
            grid,
            (0..SIZE).map(move |k| (top + k / BOX_SIZE, left + k % BOX_SIZE)),
        );
    }
    mask
}
