//! Dense LCS tables used by the quadratic algorithms.
//!
//! [`LcsMatrix`] stores every LCS length of an `(m+1) x (n+1)` grid and is
//! generic over its cell width so that small problems can use `u16` cells.
//! [`Matrix`] picks the width at construction. [`DirectionMatrix`] keeps
//! only the walking decision of each cell, one byte per cell, and computes
//! its scores with two rolling rows.
//!
//! In the inverse orientation `value(i, j)` is the LCS length of
//! `from[i..]` and `to[j..]`, which lets a walk start at `(0, 0)` and emit
//! tokens in forward order. In the direct orientation it is the LCS length
//! of `from[..i]` and `to[..j]`.

use crate::constants::NARROW_CELL_LIMIT;
use crate::equality::Equality;
use crate::error::{Error, Result};

/// Fails with [`Error::SizeLimit`] if an `m x n` table exceeds `threshold` cells.
pub fn check_threshold(m: usize, n: usize, threshold: usize) -> Result<()> {
    let size = m.saturating_mul(n);
    if size > threshold {
        tracing::debug!(size, threshold, "refusing to build matrix");
        return Err(Error::SizeLimit { size, threshold });
    }
    Ok(())
}

/// Which corner the table is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// `value(i, j)` covers the prefixes `from[..i]` and `to[..j]`.
    Direct,
    /// `value(i, j)` covers the suffixes `from[i..]` and `to[j..]`.
    Inverse,
}

/// Integer type stored in a matrix cell.
pub trait Cell: Copy + Ord + Default {
    fn to_usize(self) -> usize;
    fn succ(self) -> Self;
}

impl Cell for u16 {
    fn to_usize(self) -> usize {
        self as usize
    }

    fn succ(self) -> Self {
        self.saturating_add(1)
    }
}

impl Cell for u32 {
    fn to_usize(self) -> usize {
        self as usize
    }

    fn succ(self) -> Self {
        self.saturating_add(1)
    }
}

/// Walking decisions shared by every LCS table.
///
/// For an inverse table the cell `(i, j)` is asked whether deleting
/// `from[i]` (the "from" side) or inserting `to[j]` (the "to" side) keeps
/// more of the LCS. For a direct table the same question concerns
/// `from[i-1]` and `to[j-1]` while walking back from `(m, n)`.
pub trait LcsTable {
    /// Advancing along `from` keeps a strictly longer LCS.
    fn prefers_from(&self, i: usize, j: usize) -> bool;

    /// Advancing along `to` keeps a strictly longer LCS.
    fn prefers_to(&self, i: usize, j: usize) -> bool;

    /// Neither side is preferred.
    fn is_tied(&self, i: usize, j: usize) -> bool {
        !self.prefers_from(i, j) && !self.prefers_to(i, j)
    }

    /// Length of the longest common subsequence of the whole inputs.
    fn lcs_length(&self) -> usize;
}

/// Full LCS table with cells of type `C`.
#[derive(Debug, Clone)]
pub struct LcsMatrix<C: Cell = u32> {
    rows: usize,
    cols: usize,
    orientation: Orientation,
    cells: Vec<C>,
}

impl<C: Cell> LcsMatrix<C> {
    /// Computes the table for `from` (rows) and `to` (columns).
    pub fn compute<T, E>(from: &[T], to: &[T], eq: &E, orientation: Orientation) -> Self
    where
        E: Equality<T> + ?Sized,
    {
        let rows = from.len() + 1;
        let cols = to.len() + 1;
        let mut matrix = LcsMatrix {
            rows,
            cols,
            orientation,
            cells: vec![C::default(); rows * cols],
        };
        match orientation {
            Orientation::Inverse => {
                for i in (0..from.len()).rev() {
                    for j in (0..to.len()).rev() {
                        let value = if eq.equals(&from[i], &to[j]) {
                            matrix.cell(i + 1, j + 1).succ()
                        } else {
                            matrix.cell(i + 1, j).max(matrix.cell(i, j + 1))
                        };
                        matrix.set(i, j, value);
                    }
                }
            }
            Orientation::Direct => {
                for i in 1..rows {
                    for j in 1..cols {
                        let value = if eq.equals(&from[i - 1], &to[j - 1]) {
                            matrix.cell(i - 1, j - 1).succ()
                        } else {
                            matrix.cell(i - 1, j).max(matrix.cell(i, j - 1))
                        };
                        matrix.set(i, j, value);
                    }
                }
            }
        }
        matrix
    }

    /// Number of rows, `from.len() + 1`.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns, `to.len() + 1`.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The LCS length stored at `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> usize {
        self.cell(i, j).to_usize()
    }

    fn cell(&self, i: usize, j: usize) -> C {
        self.cells[i * self.cols + j]
    }

    fn set(&mut self, i: usize, j: usize, value: C) {
        self.cells[i * self.cols + j] = value;
    }

    fn neighbours(&self, i: usize, j: usize) -> (C, C) {
        match self.orientation {
            Orientation::Inverse => (self.cell(i + 1, j), self.cell(i, j + 1)),
            Orientation::Direct => (self.cell(i - 1, j), self.cell(i, j - 1)),
        }
    }
}

impl<C: Cell> LcsTable for LcsMatrix<C> {
    fn prefers_from(&self, i: usize, j: usize) -> bool {
        let (from, to) = self.neighbours(i, j);
        from > to
    }

    fn prefers_to(&self, i: usize, j: usize) -> bool {
        let (from, to) = self.neighbours(i, j);
        to > from
    }

    fn lcs_length(&self) -> usize {
        match self.orientation {
            Orientation::Inverse => self.get(0, 0),
            Orientation::Direct => self.get(self.rows - 1, self.cols - 1),
        }
    }
}

/// LCS table whose cell width is chosen from the input sizes.
#[derive(Debug, Clone)]
pub enum Matrix {
    Narrow(LcsMatrix<u16>),
    Wide(LcsMatrix<u32>),
}

impl Matrix {
    /// Computes the table, using `u16` cells when no LCS length can exceed them.
    pub fn compute<T, E>(from: &[T], to: &[T], eq: &E, orientation: Orientation) -> Self
    where
        E: Equality<T> + ?Sized,
    {
        if from.len().min(to.len()) <= NARROW_CELL_LIMIT {
            Matrix::Narrow(LcsMatrix::compute(from, to, eq, orientation))
        } else {
            Matrix::Wide(LcsMatrix::compute(from, to, eq, orientation))
        }
    }

    pub fn is_narrow(&self) -> bool {
        matches!(self, Matrix::Narrow(_))
    }

    pub fn get(&self, i: usize, j: usize) -> usize {
        match self {
            Matrix::Narrow(m) => m.get(i, j),
            Matrix::Wide(m) => m.get(i, j),
        }
    }
}

impl LcsTable for Matrix {
    fn prefers_from(&self, i: usize, j: usize) -> bool {
        match self {
            Matrix::Narrow(m) => m.prefers_from(i, j),
            Matrix::Wide(m) => m.prefers_from(i, j),
        }
    }

    fn prefers_to(&self, i: usize, j: usize) -> bool {
        match self {
            Matrix::Narrow(m) => m.prefers_to(i, j),
            Matrix::Wide(m) => m.prefers_to(i, j),
        }
    }

    fn lcs_length(&self) -> usize {
        match self {
            Matrix::Narrow(m) => m.lcs_length(),
            Matrix::Wide(m) => m.lcs_length(),
        }
    }
}

const FROM_GREATER: u8 = 0b01;
const TO_GREATER: u8 = 0b10;

/// Inverse-oriented table that keeps only which neighbour is larger.
///
/// Only cells with `i < from.len()` and `j < to.len()` can be queried.
#[derive(Debug, Clone)]
pub struct DirectionMatrix {
    cols: usize,
    lcs: usize,
    directions: Vec<u8>,
}

impl DirectionMatrix {
    pub fn compute<T, E>(from: &[T], to: &[T], eq: &E) -> Self
    where
        E: Equality<T> + ?Sized,
    {
        let cols = to.len();
        let mut directions = vec![0u8; from.len() * cols];
        // below[j] holds value(i + 1, j), current[j] holds value(i, j)
        let mut below = vec![0u32; cols + 1];
        let mut current = vec![0u32; cols + 1];
        for i in (0..from.len()).rev() {
            current[cols] = 0;
            for j in (0..cols).rev() {
                let down = below[j];
                let right = current[j + 1];
                directions[i * cols + j] = match down.cmp(&right) {
                    std::cmp::Ordering::Greater => FROM_GREATER,
                    std::cmp::Ordering::Less => TO_GREATER,
                    std::cmp::Ordering::Equal => 0,
                };
                current[j] = if eq.equals(&from[i], &to[j]) {
                    below[j + 1] + 1
                } else {
                    down.max(right)
                };
            }
            std::mem::swap(&mut below, &mut current);
        }
        DirectionMatrix {
            cols,
            lcs: below[0] as usize,
            directions,
        }
    }
}

impl LcsTable for DirectionMatrix {
    fn prefers_from(&self, i: usize, j: usize) -> bool {
        self.directions[i * self.cols + j] & FROM_GREATER != 0
    }

    fn prefers_to(&self, i: usize, j: usize) -> bool {
        self.directions[i * self.cols + j] & TO_GREATER != 0
    }

    fn lcs_length(&self) -> usize {
        self.lcs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equality::DefaultEquality;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_inverse_lcs() {
        let from = chars("abcbdab");
        let to = chars("bdcaba");
        let m: LcsMatrix = LcsMatrix::compute(&from, &to, &DefaultEquality, Orientation::Inverse);
        assert_eq!(m.lcs_length(), 4);
        assert_eq!(m.rows(), 8);
        assert_eq!(m.cols(), 7);
        assert_eq!(m.get(from.len(), 0), 0);
    }

    #[test]
    fn test_direct_lcs() {
        let from = chars("abcbdab");
        let to = chars("bdcaba");
        let m: LcsMatrix<u16> =
            LcsMatrix::compute(&from, &to, &DefaultEquality, Orientation::Direct);
        assert_eq!(m.lcs_length(), 4);
        assert_eq!(m.get(0, to.len()), 0);
    }

    #[test]
    fn test_inverse_invariant() {
        let from = chars("axbxc");
        let to = chars("bxaxc");
        let m: LcsMatrix = LcsMatrix::compute(&from, &to, &DefaultEquality, Orientation::Inverse);
        for i in 0..from.len() {
            for j in 0..to.len() {
                if from[i] == to[j] {
                    assert_eq!(m.get(i, j), m.get(i + 1, j + 1) + 1);
                } else {
                    assert_eq!(m.get(i, j), m.get(i + 1, j).max(m.get(i, j + 1)));
                }
            }
        }
    }

    #[test]
    fn test_width_selection() {
        let from = chars("abc");
        let to = chars("abd");
        let m = Matrix::compute(&from, &to, &DefaultEquality, Orientation::Inverse);
        assert!(m.is_narrow());
        assert_eq!(m.lcs_length(), 2);
        assert_eq!(m.get(0, 0), 2);
    }

    #[test]
    fn test_check_threshold() {
        assert!(check_threshold(8_000, 8_000, 64_000_000).is_ok());
        let err = check_threshold(8_001, 8_000, 64_000_000).unwrap_err();
        assert!(matches!(
            err,
            Error::SizeLimit {
                size: 64_008_000,
                threshold: 64_000_000
            }
        ));
    }

    #[test]
    fn test_direction_matrix_agrees() {
        let from = chars("abcbdabxyz");
        let to = chars("bdcabazyx");
        let full: LcsMatrix =
            LcsMatrix::compute(&from, &to, &DefaultEquality, Orientation::Inverse);
        let dirs = DirectionMatrix::compute(&from, &to, &DefaultEquality);
        assert_eq!(dirs.lcs_length(), full.lcs_length());
        for i in 0..from.len() {
            for j in 0..to.len() {
                assert_eq!(dirs.prefers_from(i, j), full.prefers_from(i, j));
                assert_eq!(dirs.prefers_to(i, j), full.prefers_to(i, j));
                assert_eq!(dirs.is_tied(i, j), full.is_tied(i, j));
            }
        }
    }
}
