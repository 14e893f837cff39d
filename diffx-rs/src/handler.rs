//! Sinks for edit scripts.
//!
//! Every algorithm streams its output into a [`DiffHandler`], one call per
//! emitted operation, in output order. The handler owns any accumulation.

use std::marker::PhantomData;

use crate::operator::{Operation, Operator};

/// Receives the operations of an edit script.
pub trait DiffHandler<T: ?Sized> {
    /// Called once before the first operation of a run.
    fn start(&mut self) {}

    /// Called for each operation, in output order.
    fn handle(&mut self, operator: Operator, token: &T);

    /// Called once after the last operation of a run.
    fn end(&mut self) {}
}

impl<T: ?Sized, F> DiffHandler<T> for F
where
    F: FnMut(Operator, &T),
{
    fn handle(&mut self, operator: Operator, token: &T) {
        self(operator, token)
    }
}

/// Collects operations so they can be inspected or replayed later.
#[derive(Debug, Clone)]
pub struct OperationBuffer<T> {
    operations: Vec<Operation<T>>,
}

impl<T> OperationBuffer<T> {
    pub fn new() -> Self {
        OperationBuffer {
            operations: Vec::new(),
        }
    }

    pub fn operations(&self) -> &[Operation<T>] {
        &self.operations
    }

    pub fn into_operations(self) -> Vec<Operation<T>> {
        self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Number of operations that are not matches.
    pub fn edit_count(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| op.operator.is_edit())
            .count()
    }

    /// The operators of the buffered script, without tokens.
    pub fn operators(&self) -> Vec<Operator> {
        self.operations.iter().map(|op| op.operator).collect()
    }
}

impl<T> Default for OperationBuffer<T> {
    fn default() -> Self {
        OperationBuffer::new()
    }
}

impl<T: Clone> DiffHandler<T> for OperationBuffer<T> {
    fn handle(&mut self, operator: Operator, token: &T) {
        self.operations.push(Operation::new(operator, token.clone()));
    }
}

/// Counts operations by operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountingHandler {
    pub inserted: usize,
    pub deleted: usize,
    pub matched: usize,
}

impl CountingHandler {
    pub fn new() -> Self {
        CountingHandler::default()
    }

    pub fn edits(&self) -> usize {
        self.inserted + self.deleted
    }
}

impl<T: ?Sized> DiffHandler<T> for CountingHandler {
    fn handle(&mut self, operator: Operator, _token: &T) {
        match operator {
            Operator::Insert => self.inserted += 1,
            Operator::Delete => self.deleted += 1,
            Operator::Match => self.matched += 1,
        }
    }
}

/// Forwards every call to two handlers, first then second.
pub struct MuxHandler<A, B, T: ?Sized> {
    first: A,
    second: B,
    _token: PhantomData<fn(&T)>,
}

impl<A, B, T> MuxHandler<A, B, T>
where
    A: DiffHandler<T>,
    B: DiffHandler<T>,
    T: ?Sized,
{
    pub fn new(first: A, second: B) -> Self {
        MuxHandler {
            first,
            second,
            _token: PhantomData,
        }
    }

    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A, B, T> DiffHandler<T> for MuxHandler<A, B, T>
where
    A: DiffHandler<T>,
    B: DiffHandler<T>,
    T: ?Sized,
{
    fn start(&mut self) {
        self.first.start();
        self.second.start();
    }

    fn handle(&mut self, operator: Operator, token: &T) {
        self.first.handle(operator, token);
        self.second.handle(operator, token);
    }

    fn end(&mut self) {
        self.first.end();
        self.second.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_collects_in_order() {
        let mut buffer = OperationBuffer::new();
        buffer.handle(Operator::Match, &'a');
        buffer.handle(Operator::Delete, &'b');
        buffer.handle(Operator::Insert, &'c');
        assert_eq!(
            buffer.operators(),
            vec![Operator::Match, Operator::Delete, Operator::Insert]
        );
        assert_eq!(buffer.edit_count(), 2);
        assert_eq!(buffer.operations()[1], Operation::delete('b'));
    }

    #[test]
    fn test_closure_handler() {
        let mut seen = Vec::new();
        {
            let mut handler = |op: Operator, token: &i32| seen.push((op, *token));
            DiffHandler::<i32>::handle(&mut handler, Operator::Insert, &7);
        }
        assert_eq!(seen, vec![(Operator::Insert, 7)]);
    }

    #[test]
    fn test_mux_forwards_to_both() {
        let mut mux = MuxHandler::new(CountingHandler::new(), OperationBuffer::new());
        mux.start();
        mux.handle(Operator::Insert, &"x");
        mux.handle(Operator::Match, &"y");
        mux.end();
        let (counts, buffer) = mux.into_inner();
        assert_eq!(counts.inserted, 1);
        assert_eq!(counts.matched, 1);
        assert_eq!(buffer.len(), 2);
    }
}
