//! Open-element tracking for the structural filter.

use super::token::StructuredToken;
use crate::operator::Operator;

/// The start markers still open on the current path, each with the
/// operator that opened it.
///
/// An end marker may only be emitted with the operator of the innermost
/// open element, and only if it closes that element.
#[derive(Debug, Clone)]
pub struct ElementStack<'a, T> {
    entries: Vec<(Operator, &'a T)>,
}

impl<'a, T: StructuredToken> ElementStack<'a, T> {
    pub fn new() -> Self {
        ElementStack {
            entries: Vec::with_capacity(16),
        }
    }

    /// The elements left open by `tokens` when all of them are matched.
    pub fn from_matched(tokens: &'a [T]) -> Self {
        let mut stack = ElementStack::new();
        for token in tokens {
            stack.update(Operator::Match, token);
        }
        stack
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The innermost open element.
    pub fn current(&self) -> Option<(Operator, &'a T)> {
        self.entries.last().copied()
    }

    /// Whether `token` can be emitted with `operator` here.
    pub fn is_allowed(&self, operator: Operator, token: &T) -> bool {
        if !token.is_end() {
            return true;
        }
        match self.current() {
            Some((open_operator, start)) => open_operator == operator && token.closes(start),
            None => false,
        }
    }

    /// Attributes must come before anything else inside an open element, so
    /// an attribute wins over a non-attribute when both are candidates.
    pub fn has_priority_over(&self, token: &T, other: &T) -> bool {
        token.is_attribute() && !other.is_attribute() && !self.is_empty()
    }

    /// Records `token` as emitted with `operator`.
    ///
    /// Returns false, leaving the stack untouched, if the token is an end
    /// marker that is not allowed.
    pub fn update(&mut self, operator: Operator, token: &'a T) -> bool {
        if token.is_start() {
            self.entries.push((operator, token));
        } else if token.is_end() {
            if !self.is_allowed(operator, token) {
                return false;
            }
            self.entries.pop();
        }
        true
    }
}

impl<T: StructuredToken> Default for ElementStack<'_, T> {
    fn default() -> Self {
        ElementStack::new()
    }
}
