//! Structure-aware matrix diff.
//!
//! Walks an inverse LCS table like Wagner-Fischer, but every step is
//! checked against an [`ElementStack`] so that end markers are only emitted
//! with the operator that opened their element. When the preferred step is
//! refused the next-best legal step is taken.
//!
//! Priority at each cell, for `a = from[i]` and `b = to[j]`:
//!
//! - `from` preferred: delete `a` (unless `b` is an attribute that must
//!   come first), match, insert `b`;
//! - `to` preferred: insert `b` (unless `a` is an attribute that must come
//!   first), match, delete `a`;
//! - tie: match, delete `a` unless only `b` is an attribute, insert `b`
//!   unless only `a` is an attribute.
//!
//! Two start markers only match if their end markers are equal too, so an
//! element opened by a match can always be closed by one.
//!
//! On properly nested input some step is always legal. An end marker that
//! closes nothing on its own side can leave every step refused; it is then
//! emitted as an edit, on the side the table prefers, and the walk resumes.
//!
//! The table is only built after slicing, and only if it fits within the
//! configured threshold.

use super::slicer::TokenSlicer;
use super::stack::ElementStack;
use super::token::StructuredToken;
use crate::algorithm::{DiffAlgorithm, Emitter};
use crate::constants::DEFAULT_THRESHOLD;
use crate::equality::{DefaultEquality, Equality};
use crate::error::Result;
use crate::handler::DiffHandler;
use crate::matrix::{check_threshold, LcsTable, Matrix, Orientation};
use crate::operator::Operator;
use crate::slice::Affixes;

/// Matrix diff constrained to well-formed output.
#[derive(Debug, Clone)]
pub struct MatrixXmlAlgorithm<E = DefaultEquality> {
    eq: E,
    prefer_from: bool,
    slice: bool,
    threshold: usize,
}

impl MatrixXmlAlgorithm {
    pub fn new() -> Self {
        MatrixXmlAlgorithm::with_equality(DefaultEquality)
    }
}

impl Default for MatrixXmlAlgorithm {
    fn default() -> Self {
        MatrixXmlAlgorithm::new()
    }
}

impl<E> MatrixXmlAlgorithm<E> {
    pub fn with_equality(eq: E) -> Self {
        MatrixXmlAlgorithm {
            eq,
            prefer_from: false,
            slice: true,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn prefer_from(mut self, prefer_from: bool) -> Self {
        self.prefer_from = prefer_from;
        self
    }

    /// Whether to strip structural affixes before building the table.
    pub fn slice(mut self, slice: bool) -> Self {
        self.slice = slice;
        self
    }

    /// Maximum number of table cells.
    pub fn threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }
}

impl<T: StructuredToken, E: Equality<T>> DiffAlgorithm<T> for MatrixXmlAlgorithm<E> {
    fn diff(&self, from: &[T], to: &[T], handler: &mut dyn DiffHandler<T>) -> Result<()> {
        let affixes = if self.slice {
            TokenSlicer::new(from, to, &self.eq).analyze()
        } else {
            Affixes::default()
        };
        let from_middle = affixes.middle(from);
        let to_middle = affixes.middle(to);
        check_threshold(from_middle.len(), to_middle.len(), self.threshold)?;
        tracing::debug!(
            prefix = affixes.prefix,
            suffix = affixes.suffix,
            rows = from_middle.len(),
            cols = to_middle.len(),
            "matrix-xml"
        );

        let emitter = Emitter::new(from, to, self.prefer_from);
        affixes.emit_prefix(&emitter, handler);
        constrained_walk(
            &Emitter::new(from_middle, to_middle, self.prefer_from),
            &self.eq,
            ElementStack::from_matched(&from[..affixes.prefix]),
            handler,
        );
        affixes.emit_suffix(&emitter, handler);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "matrix-xml"
    }
}

/// Runs the constrained table walk over the emitter's sequences.
///
/// `open` holds the elements already open around the sequences; they are
/// left open when the walk ends.
pub(crate) fn constrained_walk<'a, T, E>(
    emitter: &Emitter<'a, T>,
    eq: &E,
    open: ElementStack<'a, T>,
    handler: &mut dyn DiffHandler<T>,
) where
    T: StructuredToken,
    E: Equality<T> + ?Sized,
{
    let table = Matrix::compute(emitter.from, emitter.to, eq, Orientation::Inverse);
    let mut walker = Walker {
        emitter,
        pairs: ClosingPairs::new(emitter.from, emitter.to),
        stack: open,
        handler,
    };
    let (m, n) = (emitter.from.len(), emitter.to.len());
    let (mut i, mut j) = (0, 0);
    while i < m && j < n {
        match walker.choose(&table, eq, i, j) {
            Some(Operator::Delete) => {
                walker.delete(i);
                i += 1;
            }
            Some(Operator::Insert) => {
                walker.insert(j);
                j += 1;
            }
            Some(Operator::Match) => {
                walker.matched(i, j);
                i += 1;
                j += 1;
            }
            None => {
                // Both candidates are end markers closing nothing open on
                // their side; the stack ignores them.
                tracing::debug!(
                    i,
                    j,
                    depth = walker.stack.depth(),
                    "no legal step, skipping stray end marker"
                );
                if table.prefers_to(i, j) {
                    walker.insert(j);
                    j += 1;
                } else {
                    walker.delete(i);
                    i += 1;
                }
            }
        }
    }
    for x in i..m {
        walker.delete(x);
    }
    for y in j..n {
        walker.insert(y);
    }
}

struct Walker<'a, 'e, 'h, T> {
    emitter: &'e Emitter<'a, T>,
    pairs: ClosingPairs,
    stack: ElementStack<'a, T>,
    handler: &'h mut dyn DiffHandler<T>,
}

impl<'a, T: StructuredToken> Walker<'a, '_, '_, T> {
    fn choose<E, M>(&self, table: &M, eq: &E, i: usize, j: usize) -> Option<Operator>
    where
        E: Equality<T> + ?Sized,
        M: LcsTable,
    {
        let (from, to) = (self.emitter.from, self.emitter.to);
        let (a, b) = (&from[i], &to[j]);
        let stack = &self.stack;
        let can_match = || {
            eq.equals(a, b)
                && stack.is_allowed(Operator::Match, a)
                && self.pairs.agree(eq, from, to, i, j)
        };
        let can_delete = stack.is_allowed(Operator::Delete, a);
        let can_insert = stack.is_allowed(Operator::Insert, b);

        if table.prefers_from(i, j) {
            if can_delete && !stack.has_priority_over(b, a) {
                Some(Operator::Delete)
            } else if can_match() {
                Some(Operator::Match)
            } else if can_insert {
                Some(Operator::Insert)
            } else {
                None
            }
        } else if table.prefers_to(i, j) {
            if can_insert && !stack.has_priority_over(a, b) {
                Some(Operator::Insert)
            } else if can_match() {
                Some(Operator::Match)
            } else if can_delete {
                Some(Operator::Delete)
            } else {
                None
            }
        } else if can_match() {
            Some(Operator::Match)
        } else if can_delete && !(b.is_attribute() && !a.is_attribute()) {
            Some(Operator::Delete)
        } else if can_insert && !(a.is_attribute() && !b.is_attribute()) {
            Some(Operator::Insert)
        } else {
            None
        }
    }

    fn delete(&mut self, i: usize) {
        let from = self.emitter.from;
        self.stack.update(Operator::Delete, &from[i]);
        self.emitter.delete(self.handler, i);
    }

    fn insert(&mut self, j: usize) {
        let to = self.emitter.to;
        self.stack.update(Operator::Insert, &to[j]);
        self.emitter.insert(self.handler, j);
    }

    fn matched(&mut self, i: usize, j: usize) {
        let from = self.emitter.from;
        self.stack.update(Operator::Match, &from[i]);
        self.emitter.matched(self.handler, i, j);
    }
}

/// The end marker closing each start marker, on both sides.
pub(crate) struct ClosingPairs {
    from: Vec<Option<usize>>,
    to: Vec<Option<usize>>,
}

impl ClosingPairs {
    pub(crate) fn new<T: StructuredToken>(from: &[T], to: &[T]) -> Self {
        ClosingPairs {
            from: closing_indices(from),
            to: closing_indices(to),
        }
    }

    /// Whether `from[i]` and `to[j]` may be matched as far as their end
    /// markers go. Only start markers are constrained: both must be closed,
    /// by equal end markers, or neither.
    pub(crate) fn agree<T, E>(&self, eq: &E, from: &[T], to: &[T], i: usize, j: usize) -> bool
    where
        T: StructuredToken,
        E: Equality<T> + ?Sized,
    {
        if !from[i].is_start() {
            return true;
        }
        match (self.from[i], self.to[j]) {
            (Some(x), Some(y)) => eq.equals(&from[x], &to[y]),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Index of the end marker closing each start marker, by depth.
fn closing_indices<T: StructuredToken>(tokens: &[T]) -> Vec<Option<usize>> {
    let mut closing = vec![None; tokens.len()];
    let mut open = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        if token.is_start() {
            open.push(index);
        } else if token.is_end() {
            if let Some(start) = open.pop() {
                closing[start] = Some(index);
            }
        }
    }
    closing
}
