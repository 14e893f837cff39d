//! Wagner-Fischer: the exact quadratic baseline.
//!
//! Builds an inverse LCS table and walks it from `(0, 0)`. At each cell the
//! side that keeps a longer LCS is consumed first. On a tie the tokens are
//! matched when equal, and `from` is consumed (a deletion) otherwise.

use super::{DiffAlgorithm, Emitter};
use crate::equality::{DefaultEquality, Equality};
use crate::error::Result;
use crate::handler::DiffHandler;
use crate::matrix::{DirectionMatrix, LcsTable, Matrix, Orientation};

/// Matrix-based LCS diff.
#[derive(Debug, Clone, Default)]
pub struct WagnerFischer<E = DefaultEquality> {
    eq: E,
    prefer_from: bool,
    direction_only: bool,
}

impl WagnerFischer {
    pub fn new() -> Self {
        WagnerFischer::with_equality(DefaultEquality)
    }
}

impl<E> WagnerFischer<E> {
    pub fn with_equality(eq: E) -> Self {
        WagnerFischer {
            eq,
            prefer_from: false,
            direction_only: false,
        }
    }

    /// Emit the `from` token on matches instead of the `to` token.
    pub fn prefer_from(mut self, prefer_from: bool) -> Self {
        self.prefer_from = prefer_from;
        self
    }

    /// Walk a one-byte-per-cell [`DirectionMatrix`] instead of the full table.
    pub fn with_direction_matrix(mut self, direction_only: bool) -> Self {
        self.direction_only = direction_only;
        self
    }
}

impl<T, E: Equality<T>> DiffAlgorithm<T> for WagnerFischer<E> {
    fn diff(&self, from: &[T], to: &[T], handler: &mut dyn DiffHandler<T>) -> Result<()> {
        let emitter = Emitter::new(from, to, self.prefer_from);
        if self.direction_only {
            let table = DirectionMatrix::compute(from, to, &self.eq);
            walk(&table, &self.eq, &emitter, handler);
        } else {
            let table = Matrix::compute(from, to, &self.eq, Orientation::Inverse);
            walk(&table, &self.eq, &emitter, handler);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "wagner-fischer"
    }
}

fn walk<T, E, M>(table: &M, eq: &E, emitter: &Emitter<'_, T>, handler: &mut dyn DiffHandler<T>)
where
    E: Equality<T>,
    M: LcsTable,
{
    let (m, n) = (emitter.from.len(), emitter.to.len());
    let (mut i, mut j) = (0, 0);
    while i < m && j < n {
        if table.prefers_from(i, j) {
            emitter.delete(handler, i);
            i += 1;
        } else if table.prefers_to(i, j) {
            emitter.insert(handler, j);
            j += 1;
        } else if eq.equals(&emitter.from[i], &emitter.to[j]) {
            emitter.matched(handler, i, j);
            i += 1;
            j += 1;
        } else {
            emitter.delete(handler, i);
            i += 1;
        }
    }
    emitter.deletes(handler, i..m);
    emitter.inserts(handler, j..n);
}
