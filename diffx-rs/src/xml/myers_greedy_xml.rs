//! Structure-aware greedy Myers diff.
//!
//! The furthest-reaching search of [`crate::algorithm::MyersGreedy`] with
//! the element stack checked at every edge and every diagonal step. Each
//! diagonal carries the stack of the path that reached it. Stacks are kept
//! in an arena of nodes linked to their parent, so a diagonal that extends
//! its neighbour's path shares the neighbour's nodes instead of copying
//! them.
//!
//! Start markers only match when their end markers are equal, as in the
//! matrix variant. On properly nested input every diagonal can always take
//! a step. A search where every diagonal gets stuck on stray end markers
//! falls back to the constrained matrix walk of
//! [`MatrixXmlAlgorithm`](super::MatrixXmlAlgorithm), subject to its
//! threshold.

use super::matrix_xml::{constrained_walk, ClosingPairs};
use super::slicer::TokenSlicer;
use super::stack::ElementStack;
use super::token::StructuredToken;
use crate::algorithm::{DiffAlgorithm, Emitter};
use crate::constants::DEFAULT_THRESHOLD;
use crate::equality::{DefaultEquality, Equality};
use crate::error::Result;
use crate::handler::DiffHandler;
use crate::matrix::check_threshold;
use crate::operator::Operator;
use crate::slice::Affixes;
use crate::snake::{Direction, EdgeSnake, Point, SnakePath};

/// Greedy Myers diff constrained to well-formed output.
#[derive(Debug, Clone)]
pub struct MyersGreedyXmlAlgorithm<E = DefaultEquality> {
    eq: E,
    prefer_from: bool,
    slice: bool,
    threshold: usize,
}

impl MyersGreedyXmlAlgorithm {
    pub fn new() -> Self {
        MyersGreedyXmlAlgorithm::with_equality(DefaultEquality)
    }
}

impl Default for MyersGreedyXmlAlgorithm {
    fn default() -> Self {
        MyersGreedyXmlAlgorithm::new()
    }
}

impl<E> MyersGreedyXmlAlgorithm<E> {
    pub fn with_equality(eq: E) -> Self {
        MyersGreedyXmlAlgorithm {
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

    pub fn slice(mut self, slice: bool) -> Self {
        self.slice = slice;
        self
    }

    /// Cell limit for the matrix fallback.
    pub fn threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }
}

impl<T: StructuredToken, E: Equality<T>> DiffAlgorithm<T> for MyersGreedyXmlAlgorithm<E> {
    fn diff(&self, from: &[T], to: &[T], handler: &mut dyn DiffHandler<T>) -> Result<()> {
        let affixes = if self.slice {
            TokenSlicer::new(from, to, &self.eq).analyze()
        } else {
            Affixes::default()
        };
        let prefix = &from[..affixes.prefix];
        let middle = Emitter::new(affixes.middle(from), affixes.middle(to), self.prefer_from);

        let mut search = Search::new(&middle, &self.eq, prefix);
        let path = search.run();
        if path.is_none() {
            tracing::debug!(
                rows = middle.from.len(),
                cols = middle.to.len(),
                "myers-greedy-xml is stuck, falling back to matrix-xml"
            );
            check_threshold(middle.from.len(), middle.to.len(), self.threshold)?;
        }

        let emitter = Emitter::new(from, to, self.prefer_from);
        affixes.emit_prefix(&emitter, handler);
        match path {
            Some(path) => path.emit(&middle, handler),
            None => constrained_walk(
                &middle,
                &self.eq,
                ElementStack::from_matched(prefix),
                handler,
            ),
        }
        affixes.emit_suffix(&emitter, handler);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "myers-greedy-xml"
    }
}

/// One entry of a persistent stack.
struct Node<'a, T> {
    operator: Operator,
    start: &'a T,
    parent: Option<usize>,
}

/// Arena of persistent stacks; a stack is the index of its top node.
struct Stacks<'a, T> {
    nodes: Vec<Node<'a, T>>,
}

impl<'a, T: StructuredToken> Stacks<'a, T> {
    fn is_allowed(&self, top: Option<usize>, operator: Operator, token: &T) -> bool {
        if !token.is_end() {
            return true;
        }
        match top.map(|index| &self.nodes[index]) {
            Some(node) => node.operator == operator && token.closes(node.start),
            None => false,
        }
    }

    /// The stack after emitting an allowed `token` on top of `top`.
    fn apply(&mut self, top: Option<usize>, operator: Operator, token: &'a T) -> Option<usize> {
        if token.is_start() {
            self.nodes.push(Node {
                operator,
                start: token,
                parent: top,
            });
            Some(self.nodes.len() - 1)
        } else if token.is_end() {
            top.and_then(|index| self.nodes[index].parent)
        } else {
            top
        }
    }
}

/// Furthest point of a diagonal and the stack of the path reaching it.
#[derive(Clone, Copy)]
struct Reach {
    x: isize,
    stack: Option<usize>,
}

/// How a diagonal was reached in a round, for backtracking.
#[derive(Clone, Copy)]
struct Step {
    down: bool,
    x: isize,
}

struct Search<'a, 'e, T, E: ?Sized> {
    emitter: &'e Emitter<'a, T>,
    eq: &'e E,
    pairs: ClosingPairs,
    stacks: Stacks<'a, T>,
    base: Option<usize>,
}

impl<'a, 'e, T, E> Search<'a, 'e, T, E>
where
    T: StructuredToken,
    E: Equality<T> + ?Sized,
{
    fn new(emitter: &'e Emitter<'a, T>, eq: &'e E, prefix: &'a [T]) -> Self {
        let mut stacks = Stacks { nodes: Vec::new() };
        let mut base = None;
        for token in prefix {
            if stacks.is_allowed(base, Operator::Match, token) {
                base = stacks.apply(base, Operator::Match, token);
            }
        }
        Search {
            emitter,
            eq,
            pairs: ClosingPairs::new(emitter.from, emitter.to),
            stacks,
            base,
        }
    }

    /// Follows the diagonal from `x` while matches are legal.
    fn slide(&mut self, k: isize, mut x: isize, mut stack: Option<usize>) -> Reach {
        let (from, to) = (self.emitter.from, self.emitter.to);
        let (n, m) = (from.len() as isize, to.len() as isize);
        let mut y = x - k;
        while x < n && y < m {
            let (a, b) = (&from[x as usize], &to[y as usize]);
            if !self.eq.equals(a, b)
                || !self.stacks.is_allowed(stack, Operator::Match, a)
                || !self.pairs.agree(self.eq, from, to, x as usize, y as usize)
            {
                break;
            }
            stack = self.stacks.apply(stack, Operator::Match, a);
            x += 1;
            y += 1;
        }
        Reach { x, stack }
    }

    /// Returns the path of a shortest legal script, or `None` if every
    /// diagonal got stuck.
    fn run(&mut self) -> Option<SnakePath> {
        let (from, to) = (self.emitter.from, self.emitter.to);
        let (n, m) = (from.len() as isize, to.len() as isize);
        let max_d = n + m;
        let offset = max_d + 1;
        let mut reach: Vec<Option<Reach>> = vec![None; 2 * offset as usize + 1];
        let mut trace: Vec<Vec<Option<Step>>> = Vec::new();

        for d in 0..=max_d {
            let mut round: Vec<Option<Step>> = vec![None; 2 * d as usize + 1];
            let mut live = false;
            let mut k = -d;
            while k <= d {
                let start = if d == 0 {
                    Some((0, self.base, false))
                } else {
                    let down = reach[(k + 1 + offset) as usize].and_then(|r| {
                        let y = r.x - (k + 1);
                        let token = to.get(y as usize)?;
                        self.stacks
                            .is_allowed(r.stack, Operator::Insert, token)
                            .then(|| (r.x, r.stack, true, token, Operator::Insert))
                    });
                    let right = reach[(k - 1 + offset) as usize].and_then(|r| {
                        let token = from.get(r.x as usize)?;
                        self.stacks
                            .is_allowed(r.stack, Operator::Delete, token)
                            .then(|| (r.x + 1, r.stack, false, token, Operator::Delete))
                    });
                    let chosen = match (down, right) {
                        (Some(down), Some(right)) if right.0 > down.0 => Some(right),
                        (Some(down), _) => Some(down),
                        (None, right) => right,
                    };
                    chosen.map(|(x, stack, is_down, token, operator)| {
                        (x, self.stacks.apply(stack, operator, token), is_down)
                    })
                };

                let slot = (k + offset) as usize;
                match start {
                    Some((x, stack, down)) => {
                        let end = self.slide(k, x, stack);
                        reach[slot] = Some(end);
                        round[(k + d) as usize] = Some(Step { down, x: end.x });
                        live = true;
                        if end.x == n && end.x - k == m {
                            trace.push(round);
                            tracing::trace!(
                                d,
                                nodes = self.stacks.nodes.len(),
                                "myers-greedy-xml reached the end point"
                            );
                            return backtrack(&trace, d, k);
                        }
                    }
                    None => reach[slot] = None,
                }
                k += 2;
            }
            if !live {
                return None;
            }
            trace.push(round);
        }
        None
    }
}

fn backtrack(trace: &[Vec<Option<Step>>], d_end: isize, k_end: isize) -> Option<SnakePath> {
    let step_at = |d: isize, k: isize| -> Option<Step> {
        let round = trace.get(d as usize)?;
        let index = usize::try_from(k + d).ok()?;
        round.get(index).copied().flatten()
    };

    let mut snakes = Vec::with_capacity(d_end as usize + 1);
    let mut k = k_end;
    for d in (1..=d_end).rev() {
        let step = step_at(d, k)?;
        let previous_k = if step.down { k + 1 } else { k - 1 };
        let previous = step_at(d - 1, previous_k)?;
        let (x, y) = (previous.x, previous.x - previous_k);
        let (mid_x, direction) = if step.down {
            (x, Direction::Down)
        } else {
            (x + 1, Direction::Right)
        };
        snakes.push(EdgeSnake::new(
            Point::new(x as usize, y as usize),
            direction,
            1,
            (step.x - mid_x) as usize,
        ));
        k = previous_k;
    }
    let first = step_at(0, 0)?;
    snakes.push(EdgeSnake::diagonal(Point::new(0, 0), first.x as usize));

    let mut path = SnakePath::new();
    for snake in snakes.into_iter().rev() {
        path.push(snake);
    }
    Some(path)
}
