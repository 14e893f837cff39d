//! Edge snakes: the building blocks of a Myers edit path.
//!
//! An [`EdgeSnake`] is a run of non-diagonal edges in a single direction
//! joined to a run of diagonal (matching) steps. Forward snakes (`Right`,
//! `Down`) take their edits first and their matches second; reverse snakes
//! (`Left`, `Up`), found by searching back from the end, have the matches
//! first when read in forward order.
//!
//! Coordinates use `x` for the position in `from` and `y` for `to`.

use crate::algorithm::Emitter;
use crate::handler::DiffHandler;

/// A position in the edit graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Point { x, y }
    }

    fn advance(self, dx: usize, dy: usize) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Direction of the non-diagonal edges of a snake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Forward insertion: `y` grows.
    Down,
    /// Forward deletion: `x` grows.
    Right,
    /// Reverse insertion.
    Up,
    /// Reverse deletion.
    Left,
}

impl Direction {
    pub fn is_forward(self) -> bool {
        matches!(self, Direction::Down | Direction::Right)
    }

    pub fn is_insertion(self) -> bool {
        matches!(self, Direction::Down | Direction::Up)
    }
}

/// Edits in one direction joined to a diagonal run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSnake {
    /// Lowest point of the snake in forward order.
    pub start: Point,
    pub direction: Direction,
    /// Number of non-diagonal edges.
    pub edited: usize,
    /// Number of diagonal steps.
    pub matching: usize,
}

impl EdgeSnake {
    pub fn new(start: Point, direction: Direction, edited: usize, matching: usize) -> Self {
        EdgeSnake {
            start,
            direction,
            edited,
            matching,
        }
    }

    /// A snake made of matches only.
    pub fn diagonal(start: Point, matching: usize) -> Self {
        EdgeSnake::new(start, Direction::Right, 0, matching)
    }

    fn edit_delta(&self) -> (usize, usize) {
        if self.direction.is_insertion() {
            (0, self.edited)
        } else {
            (self.edited, 0)
        }
    }

    /// Point between the edges and the diagonal.
    pub fn mid(&self) -> Point {
        if self.direction.is_forward() {
            let (dx, dy) = self.edit_delta();
            self.start.advance(dx, dy)
        } else {
            self.start.advance(self.matching, self.matching)
        }
    }

    pub fn end(&self) -> Point {
        let (dx, dy) = self.edit_delta();
        self.start.advance(dx + self.matching, dy + self.matching)
    }

    /// Absorbs `next` if it starts where this snake ends and the result is
    /// still a single snake. Returns false when the two must stay apart.
    pub fn append(&mut self, next: &EdgeSnake) -> bool {
        if self.end() != next.start {
            return false;
        }
        if next.edited == 0 && (self.edited == 0 || self.direction.is_forward()) {
            self.matching += next.matching;
            return true;
        }
        if self.edited == 0 && !next.direction.is_forward() {
            self.direction = next.direction;
            self.edited = next.edited;
            self.matching += next.matching;
            return true;
        }
        if self.direction == next.direction {
            if self.direction.is_forward() && self.matching == 0 {
                self.edited += next.edited;
                self.matching = next.matching;
                return true;
            }
            if !self.direction.is_forward() && next.matching == 0 {
                self.edited += next.edited;
                return true;
            }
        }
        false
    }

    /// Streams the operations covered by this snake.
    pub(crate) fn emit<T>(&self, emitter: &Emitter<'_, T>, handler: &mut dyn DiffHandler<T>) {
        let start = self.start;
        if self.direction.is_forward() {
            self.emit_edits(start, emitter, handler);
            let mid = self.mid();
            emitter.matches(handler, mid.x, mid.y, self.matching);
        } else {
            emitter.matches(handler, start.x, start.y, self.matching);
            self.emit_edits(self.mid(), emitter, handler);
        }
    }

    fn emit_edits<T>(&self, at: Point, emitter: &Emitter<'_, T>, handler: &mut dyn DiffHandler<T>) {
        if self.direction.is_insertion() {
            emitter.inserts(handler, at.y..at.y + self.edited);
        } else {
            emitter.deletes(handler, at.x..at.x + self.edited);
        }
    }
}

/// An ordered chain of snakes covering an edit path.
#[derive(Debug, Clone, Default)]
pub struct SnakePath {
    snakes: Vec<EdgeSnake>,
}

impl SnakePath {
    pub fn new() -> Self {
        SnakePath { snakes: Vec::new() }
    }

    /// Adds a snake, merging it into the last one when possible.
    /// Empty snakes are ignored.
    pub fn push(&mut self, snake: EdgeSnake) {
        if snake.edited == 0 && snake.matching == 0 {
            return;
        }
        if let Some(last) = self.snakes.last_mut() {
            if last.append(&snake) {
                return;
            }
        }
        self.snakes.push(snake);
    }

    pub fn snakes(&self) -> &[EdgeSnake] {
        &self.snakes
    }

    pub fn len(&self) -> usize {
        self.snakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snakes.is_empty()
    }

    /// Point reached by the last snake, or the origin.
    pub fn end(&self) -> Point {
        self.snakes.last().map(EdgeSnake::end).unwrap_or_default()
    }

    pub(crate) fn emit<T>(&self, emitter: &Emitter<'_, T>, handler: &mut dyn DiffHandler<T>) {
        for snake in &self.snakes {
            snake.emit(emitter, handler);
        }
    }
}
