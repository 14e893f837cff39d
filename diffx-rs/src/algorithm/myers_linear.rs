//! Linear-space Myers: divide and conquer on the middle snake.
//!
//! A forward search from the top-left and a reverse search from the
//! bottom-right advance one edit distance at a time until their furthest
//! points overlap on some diagonal. The overlap lies on a shortest path, so
//! the problem splits there and both halves are solved recursively. Only
//! two vectors are live at any time.
//!
//! Recursion depth is logarithmic for balanced splits and bounded by the
//! edit distance in the worst case.

use super::{DiffAlgorithm, Emitter};
use crate::equality::{DefaultEquality, Equality};
use crate::error::{Error, Result};
use crate::handler::DiffHandler;
use crate::snake::{Direction, EdgeSnake, Point, SnakePath};
use crate::vector::KVector;

/// Linear-space Myers diff.
#[derive(Debug, Clone, Default)]
pub struct MyersLinear<E = DefaultEquality> {
    eq: E,
    prefer_from: bool,
}

impl MyersLinear {
    pub fn new() -> Self {
        MyersLinear::with_equality(DefaultEquality)
    }
}

impl<E> MyersLinear<E> {
    pub fn with_equality(eq: E) -> Self {
        MyersLinear {
            eq,
            prefer_from: false,
        }
    }

    pub fn prefer_from(mut self, prefer_from: bool) -> Self {
        self.prefer_from = prefer_from;
        self
    }
}

impl<T, E: Equality<T>> DiffAlgorithm<T> for MyersLinear<E> {
    fn diff(&self, from: &[T], to: &[T], handler: &mut dyn DiffHandler<T>) -> Result<()> {
        let max_d = (from.len() + to.len() + 1) / 2 + 1;
        let mut search = Search {
            from,
            to,
            eq: &self.eq,
            forward: KVector::new(max_d),
            reverse: KVector::new(max_d),
            path: SnakePath::new(),
        };
        search.conquer(0, from.len(), 0, to.len())?;
        search
            .path
            .emit(&Emitter::new(from, to, self.prefer_from), handler);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "myers-linear"
    }
}

struct Search<'a, T, E: ?Sized> {
    from: &'a [T],
    to: &'a [T],
    eq: &'a E,
    forward: KVector,
    reverse: KVector,
    path: SnakePath,
}

impl<T, E: Equality<T> + ?Sized> Search<'_, T, E> {
    fn common_prefix(&self, x: usize, x_end: usize, y: usize, y_end: usize) -> usize {
        self.from[x..x_end]
            .iter()
            .zip(&self.to[y..y_end])
            .take_while(|(a, b)| self.eq.equals(a, b))
            .count()
    }

    fn common_suffix(&self, x: usize, x_end: usize, y: usize, y_end: usize) -> usize {
        self.from[x..x_end]
            .iter()
            .rev()
            .zip(self.to[y..y_end].iter().rev())
            .take_while(|(a, b)| self.eq.equals(a, b))
            .count()
    }

    /// Solves the rectangle `[x, x_end) x [y, y_end)`, appending to the path.
    fn conquer(
        &mut self,
        mut x: usize,
        mut x_end: usize,
        mut y: usize,
        mut y_end: usize,
    ) -> Result<()> {
        let origin = Point::new(x, y);
        let prefix = self.common_prefix(x, x_end, y, y_end);
        x += prefix;
        y += prefix;
        let suffix = self.common_suffix(x, x_end, y, y_end);
        x_end -= suffix;
        y_end -= suffix;

        if x == x_end && y == y_end {
            self.path.push(EdgeSnake::diagonal(origin, prefix));
        } else if y == y_end {
            self.path
                .push(EdgeSnake::new(origin, Direction::Left, x_end - x, prefix));
        } else if x == x_end {
            self.path
                .push(EdgeSnake::new(origin, Direction::Up, y_end - y, prefix));
        } else {
            self.path.push(EdgeSnake::diagonal(origin, prefix));
            let (mid_x, mid_y) = self.middle_snake(x, x_end, y, y_end).ok_or(
                Error::SearchExhausted {
                    algorithm: "myers-linear",
                    max_d: (x_end - x + y_end - y + 1) / 2 + 1,
                },
            )?;
            tracing::trace!(mid_x, mid_y, "myers-linear split");
            self.conquer(x, mid_x, y, mid_y)?;
            self.conquer(mid_x, x_end, mid_y, y_end)?;
        }
        self.path
            .push(EdgeSnake::diagonal(Point::new(x_end, y_end), suffix));
        Ok(())
    }

    /// Finds the start of a middle snake of `[x0, x1) x [y0, y1)`.
    fn middle_snake(
        &mut self,
        x0: usize,
        x1: usize,
        y0: usize,
        y1: usize,
    ) -> Option<(usize, usize)> {
        let n = (x1 - x0) as isize;
        let m = (y1 - y0) as isize;
        let delta = n - m;
        let odd = delta & 1 != 0;
        let d_max = (n + m + 1) / 2 + 1;
        self.forward[1] = 0;
        self.reverse[1] = 0;

        for d in 0..d_max {
            let mut k = -d;
            while k <= d {
                let mut x = if k == -d || (k != d && self.forward[k - 1] < self.forward[k + 1]) {
                    self.forward[k + 1]
                } else {
                    self.forward[k - 1] + 1
                };
                let y = x - k;
                let (start_x, start_y) = (x, y);
                if x < n && (0..m).contains(&y) {
                    x += self.common_prefix(
                        x0 + x as usize,
                        x1,
                        y0 + y as usize,
                        y1,
                    ) as isize;
                }
                self.forward[k] = x;
                if odd
                    && (k - delta).abs() <= d - 1
                    && self.forward[k] + self.reverse[delta - k] >= n
                {
                    return Some((x0 + start_x as usize, y0 + start_y as usize));
                }
                k += 2;
            }

            let mut k = -d;
            while k <= d {
                let mut x = if k == -d || (k != d && self.reverse[k - 1] < self.reverse[k + 1]) {
                    self.reverse[k + 1]
                } else {
                    self.reverse[k - 1] + 1
                };
                let mut y = x - k;
                if x < n && (0..m).contains(&y) {
                    let advance = self.common_suffix(
                        x0,
                        x0 + (n - x) as usize,
                        y0,
                        y0 + (m - y) as usize,
                    ) as isize;
                    x += advance;
                    y += advance;
                }
                self.reverse[k] = x;
                if !odd
                    && (k - delta).abs() <= d
                    && self.reverse[k] + self.forward[delta - k] >= n
                {
                    return Some((x0 + (n - x) as usize, y0 + (m - y) as usize));
                }
                k += 2;
            }
        }
        None
    }
}
