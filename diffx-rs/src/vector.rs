//! The k-line vector of Myers' algorithms.
//!
//! A [`KVector`] records, for each diagonal `k = x - y`, the furthest `x`
//! reached so far. Diagonals can be negative, so the vector stores its
//! values with an offset.

use std::ops::{Index, IndexMut};

/// Furthest-reaching `x` per diagonal, indexed by `k`.
#[derive(Debug, Clone)]
pub struct KVector {
    offset: isize,
    values: Vec<isize>,
}

impl KVector {
    /// Creates a vector able to hold diagonals `-(max_d + 1)..=(max_d + 1)`.
    pub fn new(max_d: usize) -> Self {
        let offset = max_d as isize + 1;
        KVector {
            offset,
            values: vec![0; 2 * max_d + 3],
        }
    }

    /// Largest `|k|` that can be indexed.
    pub fn reach(&self) -> isize {
        self.offset
    }

    /// Copies the diagonals `-d..=d`.
    pub fn snapshot(&self, d: usize) -> KSnapshot {
        let d = (d as isize).min(self.offset);
        let lo = (self.offset - d) as usize;
        let hi = (self.offset + d) as usize;
        KSnapshot {
            d,
            values: self.values[lo..=hi].to_vec(),
        }
    }
}

impl Index<isize> for KVector {
    type Output = isize;

    fn index(&self, k: isize) -> &isize {
        &self.values[(k + self.offset) as usize]
    }
}

impl IndexMut<isize> for KVector {
    fn index_mut(&mut self, k: isize) -> &mut isize {
        &mut self.values[(k + self.offset) as usize]
    }
}

/// The diagonals `-d..=d` of a [`KVector`] at the end of round `d`.
#[derive(Debug, Clone)]
pub struct KSnapshot {
    d: isize,
    values: Vec<isize>,
}

impl KSnapshot {
    pub fn d(&self) -> usize {
        self.d as usize
    }

    /// Furthest `x` on diagonal `k`, or `None` outside the snapshot.
    pub fn get(&self, k: isize) -> Option<isize> {
        if k < -self.d || k > self.d {
            return None;
        }
        Some(self.values[(k + self.d) as usize])
    }
}
