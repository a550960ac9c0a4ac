//! # Crossover
//!
//! Four recombination operators. Each builds the child row by row and every
//! child row is a permutation of 1..=9 that keeps the puzzle's clues.
//!
//! - `RowWise`: each row copied whole from `p1` with probability `pc`,
//!   otherwise from `p2`.
//! - `Alternating`: even rows from `p1`, odd rows from `p2`.
//! - `Pmx`: partially matched crossover on each row with probability `pc`,
//!   otherwise `p1`'s row.
//! - `Ox`: order crossover on each row with probability `pc`, otherwise
//!   `p1`'s row. It runs over the row's non-fixed cells only: OX reorders
//!   values outside its segment, and clues must not move.
//!
//! Cut points `(a, b)` are distinct and sorted; the copied segment is the
//! half-open range `a..b`.

use strum::{Display, EnumIter, EnumString};

use crate::error::{GeneticError, Result};
use crate::grid::{FixedMask, Row, SIZE};
use crate::individual::Individual;
use crate::rng::RandomNumberGenerator;

/// The crossover operator used for a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CrossoverMethod {
    #[default]
    #[strum(to_string = "row_wise", serialize = "rowwise", serialize = "rows")]
    RowWise,
    Alternating,
    Pmx,
    Ox,
}

impl CrossoverMethod {
    /// Builds one child from `p1` and `p2`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Breeding` if a parent row is not a permutation
    /// and PMX or OX cannot complete the child row.
    pub fn crossover(
        &self,
        p1: &Individual,
        p2: &Individual,
        fixed: &FixedMask,
        probability: f64,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Individual> {
        match self {
            CrossoverMethod::RowWise => Ok(row_wise(p1, p2, probability, rng)),
            CrossoverMethod::Alternating => Ok(alternating(p1, p2)),
            CrossoverMethod::Pmx => pmx(p1, p2, probability, rng),
            CrossoverMethod::Ox => ox(p1, p2, fixed, probability, rng),
        }
    }
}

/// Copies each row from `p1` with probability `probability`, else from `p2`.
pub fn row_wise(
    p1: &Individual,
    p2: &Individual,
    probability: f64,
    rng: &mut RandomNumberGenerator,
) -> Individual {
    let mut child = *p1;
    for row in 0..SIZE {
        if !rng.chance(probability) {
            child.grid_mut().set_row(row, *p2.row(row));
        }
    }
    child
}

/// Even rows from `p1`, odd rows from `p2`.
pub fn alternating(p1: &Individual, p2: &Individual) -> Individual {
    let mut child = *p1;
    for row in (1..SIZE).step_by(2) {
        child.grid_mut().set_row(row, *p2.row(row));
    }
    child
}

/// Applies [`pmx_row`] to each row with probability `probability`.
pub fn pmx(
    p1: &Individual,
    p2: &Individual,
    probability: f64,
    rng: &mut RandomNumberGenerator,
) -> Result<Individual> {
    let mut child = *p1;
    for row in 0..SIZE {
        if rng.chance(probability) {
            let cuts = rng.cut_points(SIZE)?;
            child.grid_mut().set_row(row, pmx_row(p1.row(row), p2.row(row), cuts)?);
        }
    }
    Ok(child)
}

/// Applies order crossover to the non-fixed cells of each row with
/// probability `probability`.
///
/// Rows with fewer than two free cells are copied from `p1`.
pub fn ox(
    p1: &Individual,
    p2: &Individual,
    fixed: &FixedMask,
    probability: f64,
    rng: &mut RandomNumberGenerator,
) -> Result<Individual> {
    let mut child = *p1;
    for row in 0..SIZE {
        if !rng.chance(probability) {
            continue;
        }
        let free = fixed.free_columns(row);
        if free.len() < 2 {
            continue;
        }

        let free_p1: Vec<u8> = free.iter().map(|&col| p1.row(row)[col]).collect();
        let free_p2: Vec<u8> = free.iter().map(|&col| p2.row(row)[col]).collect();
        let cuts = rng.cut_points(free.len())?;
        let merged = order_crossover(&free_p1, &free_p2, cuts)?;

        let target = child.grid_mut().row_mut(row);
        for (&col, value) in free.iter().zip(merged) {
            target[col] = value;
        }
    }
    Ok(child)
}

/// Partially matched crossover of two permutation rows.
pub fn pmx_row(p1: &Row, p2: &Row, cuts: (usize, usize)) -> Result<Row> {
    let merged = partially_matched_crossover(p1, p2, cuts)?;
    to_row(&merged)
}

/// Order crossover of two permutation rows.
pub fn ox_row(p1: &Row, p2: &Row, cuts: (usize, usize)) -> Result<Row> {
    let merged = order_crossover(p1, p2, cuts)?;
    to_row(&merged)
}

fn to_row(values: &[u8]) -> Result<Row> {
    values.try_into().map_err(|_| {
        GeneticError::Breeding(format!("expected {} values, got {}", SIZE, values.len()))
    })
}

fn check_cuts(len: usize, (a, b): (usize, usize)) -> Result<()> {
    if a >= b || b > len {
        return Err(GeneticError::Breeding(format!(
            "invalid cut points ({}, {}) for length {}",
            a, b, len
        )));
    }
    Ok(())
}

fn position_of(values: &[u8], value: u8) -> Result<usize> {
    values
        .iter()
        .position(|&v| v == value)
        .ok_or_else(|| GeneticError::Breeding(format!("value {} missing from parent", value)))
}

fn complete(child: Vec<Option<u8>>, operator: &str) -> Result<Vec<u8>> {
    child
        .into_iter()
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| GeneticError::Breeding(format!("{} left an empty slot", operator)))
}

/// PMX over two permutations of the same values.
///
/// `p1[a..b]` is copied into the child. Each value of `p2[a..b]` not yet in
/// the child goes to its own position in `p2`; when that slot is taken, the
/// slot moves to the position in `p2` of the value `p1` holds there, until a
/// free slot turns up. Remaining slots take `p2`'s value at the same index.
pub fn partially_matched_crossover(p1: &[u8], p2: &[u8], cuts: (usize, usize)) -> Result<Vec<u8>> {
    let len = p1.len();
    if p2.len() != len {
        return Err(GeneticError::Breeding("parents differ in length".to_string()));
    }
    check_cuts(len, cuts)?;
    let (a, b) = cuts;

    let mut child: Vec<Option<u8>> = vec![None; len];
    for i in a..b {
        child[i] = Some(p1[i]);
    }

    for &value in &p2[a..b] {
        if child.contains(&Some(value)) {
            continue;
        }

        let mut pos = position_of(p2, value)?;
        let mut steps = 0;
        while child[pos].is_some() {
            // the mapping chain visits each segment slot at most once
            steps += 1;
            if steps > len {
                return Err(GeneticError::Breeding(format!(
                    "PMX mapping for value {} did not resolve",
                    value
                )));
            }
            pos = position_of(p2, p1[pos])?;
        }
        child[pos] = Some(value);
    }

    for (slot, &value) in child.iter_mut().zip(p2) {
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    complete(child, "PMX")
}

/// OX over two permutations of the same values.
///
/// `p1[a..b]` is copied into the child. Starting at index `b` and wrapping
/// around, the values of `p2` not yet in the child fill the empty slots in
/// the same wrap-around order.
pub fn order_crossover(p1: &[u8], p2: &[u8], cuts: (usize, usize)) -> Result<Vec<u8>> {
    let len = p1.len();
    if p2.len() != len {
        return Err(GeneticError::Breeding("parents differ in length".to_string()));
    }
    check_cuts(len, cuts)?;
    let (a, b) = cuts;

    let mut child: Vec<Option<u8>> = vec![None; len];
    for i in a..b {
        child[i] = Some(p1[i]);
    }

    let mut slot = b % len;
    for step in 0..len {
        let value = p2[(b + step) % len];
        if child.contains(&Some(value)) {
            continue;
        }

        let mut scanned = 0;
        while child[slot].is_some() {
            scanned += 1;
            if scanned >= len {
                return Err(GeneticError::Breeding(format!(
                    "OX found no free slot for value {}",
                    value
                )));
            }
            slot = (slot + 1) % len;
        }
        child[slot] = Some(value);
    }

    complete(child, "OX")
}
