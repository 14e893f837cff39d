//! Myers' greedy O(ND) shortest-edit-script search.
//!
//! For each edit distance `d` every diagonal is extended to its furthest
//! point, taking the better of a step down (insertion) from diagonal
//! `k + 1` or a step right (deletion) from diagonal `k - 1`, then following
//! matching tokens. The vector is snapshotted after each round so that the
//! path can be rebuilt backwards from `(m, n)` once it is reached.

use super::{DiffAlgorithm, Emitter};
use crate::equality::{DefaultEquality, Equality};
use crate::error::{Error, Result};
use crate::handler::DiffHandler;
use crate::snake::{Direction, EdgeSnake, Point, SnakePath};
use crate::vector::{KSnapshot, KVector};

/// Greedy Myers diff.
#[derive(Debug, Clone, Default)]
pub struct MyersGreedy<E = DefaultEquality> {
    eq: E,
    prefer_from: bool,
}

impl MyersGreedy {
    pub fn new() -> Self {
        MyersGreedy::with_equality(DefaultEquality)
    }
}

impl<E> MyersGreedy<E> {
    pub fn with_equality(eq: E) -> Self {
        MyersGreedy {
            eq,
            prefer_from: false,
        }
    }

    pub fn prefer_from(mut self, prefer_from: bool) -> Self {
        self.prefer_from = prefer_from;
        self
    }
}

impl<T, E: Equality<T>> DiffAlgorithm<T> for MyersGreedy<E> {
    fn diff(&self, from: &[T], to: &[T], handler: &mut dyn DiffHandler<T>) -> Result<()> {
        let emitter = Emitter::new(from, to, self.prefer_from);
        greedy(&emitter, &self.eq, handler)
    }

    fn name(&self) -> &'static str {
        "myers-greedy"
    }
}

/// Runs the greedy search over the emitter's sequences and streams the result.
pub(crate) fn greedy<T, E>(
    emitter: &Emitter<'_, T>,
    eq: &E,
    handler: &mut dyn DiffHandler<T>,
) -> Result<()>
where
    E: Equality<T> + ?Sized,
{
    let path = shortest_path(emitter.from, emitter.to, eq)?;
    path.emit(emitter, handler);
    Ok(())
}

/// Computes the snakes of a shortest edit path.
pub(crate) fn shortest_path<T, E>(from: &[T], to: &[T], eq: &E) -> Result<SnakePath>
where
    E: Equality<T> + ?Sized,
{
    let n = from.len() as isize;
    let m = to.len() as isize;
    let max_d = from.len() + to.len();
    let mut v = KVector::new(max_d);
    let mut trace: Vec<KSnapshot> = Vec::new();

    for d in 0..=max_d as isize {
        let mut k = -d;
        while k <= d {
            let mut x = if k == -d || (k != d && v[k - 1] < v[k + 1]) {
                v[k + 1]
            } else {
                v[k - 1] + 1
            };
            let mut y = x - k;
            while x < n && y < m && eq.equals(&from[x as usize], &to[y as usize]) {
                x += 1;
                y += 1;
            }
            v[k] = x;
            if x >= n && y >= m {
                tracing::trace!(d, "myers-greedy reached the end point");
                return Ok(backtrack(&trace, d, n, m));
            }
            k += 2;
        }
        trace.push(v.snapshot(d as usize));
    }
    Err(Error::SearchExhausted {
        algorithm: "myers-greedy",
        max_d,
    })
}

/// Rebuilds the path ending at `(n, m)` at distance `d_end`.
///
/// `trace[d]` holds the vector at the end of round `d`.
fn backtrack(trace: &[KSnapshot], d_end: isize, n: isize, m: isize) -> SnakePath {
    let mut snakes = Vec::with_capacity(d_end as usize + 1);
    let (mut x, mut y) = (n, m);
    for d in (1..=d_end).rev() {
        let previous = &trace[d as usize - 1];
        let k = x - y;
        let at = |k: isize| previous.get(k).unwrap_or(-1);
        let down = k == -d || (k != d && at(k - 1) < at(k + 1));
        let previous_k = if down { k + 1 } else { k - 1 };
        let previous_x = at(previous_k);
        let previous_y = previous_x - previous_k;
        let (mid_x, direction) = if down {
            (previous_x, Direction::Down)
        } else {
            (previous_x + 1, Direction::Right)
        };
        snakes.push(EdgeSnake::new(
            Point::new(previous_x as usize, previous_y as usize),
            direction,
            1,
            (x - mid_x) as usize,
        ));
        x = previous_x;
        y = previous_y;
    }
    // round zero is a pure diagonal from the origin
    debug_assert_eq!(x, y);
    snakes.push(EdgeSnake::diagonal(Point::new(0, 0), x as usize));

    let mut path = SnakePath::new();
    for snake in snakes.into_iter().rev() {
        path.push(snake);
    }
    path
}
