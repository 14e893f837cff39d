//! Hirschberg's linear-space LCS.
//!
//! `from` is split in half. A forward score row for the first half and a
//! reverse score row for the second half locate the column of `to` where the
//! two partial LCS lengths add up to the most, and both halves are solved
//! recursively. Single-token and empty ranges are the base cases.

use std::ops::Range;

use super::{DiffAlgorithm, Emitter};
use crate::equality::{DefaultEquality, Equality};
use crate::error::Result;
use crate::handler::DiffHandler;

/// Divide-and-conquer LCS diff in O(m + n) space.
#[derive(Debug, Clone, Default)]
pub struct Hirschberg<E = DefaultEquality> {
    eq: E,
    prefer_from: bool,
}

impl Hirschberg {
    pub fn new() -> Self {
        Hirschberg::with_equality(DefaultEquality)
    }
}

impl<E> Hirschberg<E> {
    pub fn with_equality(eq: E) -> Self {
        Hirschberg {
            eq,
            prefer_from: false,
        }
    }

    pub fn prefer_from(mut self, prefer_from: bool) -> Self {
        self.prefer_from = prefer_from;
        self
    }
}

impl<T, E: Equality<T>> DiffAlgorithm<T> for Hirschberg<E> {
    fn diff(&self, from: &[T], to: &[T], handler: &mut dyn DiffHandler<T>) -> Result<()> {
        let emitter = Emitter::new(from, to, self.prefer_from);
        split(&emitter, &self.eq, 0..from.len(), 0..to.len(), handler);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "hirschberg"
    }
}

fn split<T, E>(
    emitter: &Emitter<'_, T>,
    eq: &E,
    a: Range<usize>,
    b: Range<usize>,
    handler: &mut dyn DiffHandler<T>,
) where
    E: Equality<T>,
{
    if b.is_empty() {
        emitter.deletes(handler, a);
    } else if a.is_empty() {
        emitter.inserts(handler, b);
    } else if a.len() == 1 {
        let i = a.start;
        let mut matched = false;
        for j in b {
            if !matched && eq.equals(&emitter.from[i], &emitter.to[j]) {
                emitter.matched(handler, i, j);
                matched = true;
            } else {
                emitter.insert(handler, j);
            }
        }
        if !matched {
            emitter.delete(handler, i);
        }
    } else {
        let half = a.start + a.len() / 2;
        let forward = forward_scores(&emitter.from[a.start..half], &emitter.to[b.clone()], eq);
        let reverse = reverse_scores(&emitter.from[half..a.end], &emitter.to[b.clone()], eq);
        let k = best_column(&forward, &reverse);
        tracing::trace!(half, k, "hirschberg split");
        split(emitter, eq, a.start..half, b.start..b.start + k, handler);
        split(emitter, eq, half..a.end, b.start + k..b.end, handler);
    }
}

/// Last row of the direct LCS table: `row[j]` is `LCS(a, b[..j])`.
fn forward_scores<T, E: Equality<T>>(a: &[T], b: &[T], eq: &E) -> Vec<usize> {
    let mut previous = vec![0; b.len() + 1];
    let mut current = vec![0; b.len() + 1];
    for x in a {
        std::mem::swap(&mut previous, &mut current);
        for (j, y) in b.iter().enumerate() {
            current[j + 1] = if eq.equals(x, y) {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
    }
    current
}

/// Reverse scores: `row[j]` is `LCS(a, b[b.len() - j..])`.
fn reverse_scores<T, E: Equality<T>>(a: &[T], b: &[T], eq: &E) -> Vec<usize> {
    let n = b.len();
    let mut previous = vec![0; n + 1];
    let mut current = vec![0; n + 1];
    for x in a.iter().rev() {
        std::mem::swap(&mut previous, &mut current);
        for j in (0..n).rev() {
            current[n - j] = if eq.equals(x, &b[j]) {
                previous[n - j - 1] + 1
            } else {
                current[n - j - 1].max(previous[n - j])
            };
        }
    }
    current
}

/// The first column maximising `forward[k] + reverse[n - k]`.
fn best_column(forward: &[usize], reverse: &[usize]) -> usize {
    let n = forward.len() - 1;
    let mut best = 0;
    let mut k = 0;
    for j in 0..=n {
        let score = forward[j] + reverse[n - j];
        if score > best {
            best = score;
            k = j;
        }
    }
    k
}
