//! Fast path for structured tokens.
//!
//! Most edits to a document leave whole elements alone, and on those inputs
//! the plain linear-space Myers diff already produces a well-formed script.
//! [`OptimisticXmlAlgorithm`] runs it first, records only the operators, and
//! checks the result against an [`ElementStack`]. Only a script that breaks
//! the nesting is thrown away and redone with the constrained matrix walk.

use super::matrix_xml::{constrained_walk, ClosingPairs};
use super::slicer::TokenSlicer;
use super::stack::ElementStack;
use super::token::StructuredToken;
use crate::algorithm::{DiffAlgorithm, Emitter, MyersLinear};
use crate::constants::DEFAULT_THRESHOLD;
use crate::equality::{DefaultEquality, Equality};
use crate::error::Result;
use crate::handler::DiffHandler;
use crate::matrix::check_threshold;
use crate::operator::Operator;
use crate::slice::Affixes;

/// Linear-space Myers, redone with the matrix walk when its script is not
/// well-formed.
#[derive(Debug, Clone)]
pub struct OptimisticXmlAlgorithm<E = DefaultEquality> {
    eq: E,
    prefer_from: bool,
    slice: bool,
    threshold: usize,
}

impl OptimisticXmlAlgorithm {
    pub fn new() -> Self {
        OptimisticXmlAlgorithm::with_equality(DefaultEquality)
    }
}

impl Default for OptimisticXmlAlgorithm {
    fn default() -> Self {
        OptimisticXmlAlgorithm::new()
    }
}

impl<E> OptimisticXmlAlgorithm<E> {
    pub fn with_equality(eq: E) -> Self {
        OptimisticXmlAlgorithm {
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

impl<T: StructuredToken, E: Equality<T>> DiffAlgorithm<T> for OptimisticXmlAlgorithm<E> {
    fn diff(&self, from: &[T], to: &[T], handler: &mut dyn DiffHandler<T>) -> Result<()> {
        let affixes = if self.slice {
            TokenSlicer::new(from, to, &self.eq).analyze()
        } else {
            Affixes::default()
        };
        let prefix = &from[..affixes.prefix];
        let middle = Emitter::new(affixes.middle(from), affixes.middle(to), self.prefer_from);

        let mut operators = Vec::with_capacity(middle.from.len() + middle.to.len());
        {
            let mut record = |operator: Operator, _: &T| operators.push(operator);
            MyersLinear::with_equality(|a: &T, b: &T| self.eq.equals(a, b)).diff(
                middle.from,
                middle.to,
                &mut record,
            )?;
        }

        let well_formed = is_well_formed(&operators, &middle, &self.eq, prefix);
        if !well_formed {
            tracing::debug!(
                operations = operators.len(),
                "myers-linear script is not well-formed, falling back to matrix-xml"
            );
            check_threshold(middle.from.len(), middle.to.len(), self.threshold)?;
        }

        let emitter = Emitter::new(from, to, self.prefer_from);
        affixes.emit_prefix(&emitter, handler);
        if well_formed {
            replay(&operators, &middle, handler);
        } else {
            constrained_walk(&middle, &self.eq, ElementStack::from_matched(prefix), handler);
        }
        affixes.emit_suffix(&emitter, handler);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "optimistic-xml"
    }
}

/// Whether `operators`, read over the emitter's sequences, close every
/// element with the operator that opened it and leave the elements of
/// `prefix` as they were.
fn is_well_formed<T, E>(
    operators: &[Operator],
    emitter: &Emitter<'_, T>,
    eq: &E,
    prefix: &[T],
) -> bool
where
    T: StructuredToken,
    E: Equality<T> + ?Sized,
{
    let (from, to) = (emitter.from, emitter.to);
    let pairs = ClosingPairs::new(from, to);
    let mut stack = ElementStack::from_matched(prefix);
    let base = stack.depth();
    let (mut i, mut j) = (0, 0);
    for &operator in operators {
        let token = match operator {
            Operator::Insert => to.get(j),
            Operator::Delete | Operator::Match => from.get(i),
        };
        let Some(token) = token else {
            return false;
        };
        if operator == Operator::Match && (j >= to.len() || !pairs.agree(eq, from, to, i, j)) {
            return false;
        }
        if !stack.update(operator, token) {
            return false;
        }
        match operator {
            Operator::Insert => j += 1,
            Operator::Delete => i += 1,
            Operator::Match => {
                i += 1;
                j += 1;
            }
        }
    }
    i == from.len() && j == to.len() && stack.depth() == base
}

fn replay<T>(operators: &[Operator], emitter: &Emitter<'_, T>, handler: &mut dyn DiffHandler<T>) {
    let (mut i, mut j) = (0, 0);
    for &operator in operators {
        match operator {
            Operator::Insert => {
                emitter.insert(handler, j);
                j += 1;
            }
            Operator::Delete => {
                emitter.delete(handler, i);
                i += 1;
            }
            Operator::Match => {
                emitter.matched(handler, i, j);
                i += 1;
                j += 1;
            }
        }
    }
}
