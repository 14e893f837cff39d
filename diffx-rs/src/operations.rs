//! Utilities over recorded edit scripts.
//!
//! These work on the `Vec<Operation<T>>` produced by an
//! [`OperationBuffer`](crate::handler::OperationBuffer) and are mostly used to
//! check that a script really transforms one sequence into the other.

use crate::equality::{DefaultEquality, Equality};
use crate::error::{Error, Result};
use crate::handler::DiffHandler;
use crate::operator::{Operation, Operator};

/// Applies `operations` to `input`, returning the target sequence.
///
/// Deleted and matched tokens must line up with `input` in order, and every
/// input token must be consumed.
pub fn apply<T: Clone + PartialEq>(input: &[T], operations: &[Operation<T>]) -> Result<Vec<T>> {
    apply_with(input, operations, &DefaultEquality)
}

/// Same as [`apply`], comparing tokens with a custom equality.
pub fn apply_with<T, E>(input: &[T], operations: &[Operation<T>], eq: &E) -> Result<Vec<T>>
where
    T: Clone,
    E: Equality<T> + ?Sized,
{
    let mut output = Vec::with_capacity(operations.len());
    let mut i = 0;
    for (position, op) in operations.iter().enumerate() {
        match op.operator {
            Operator::Insert => output.push(op.token.clone()),
            Operator::Delete | Operator::Match => {
                let expected = input.get(i).ok_or_else(|| {
                    Error::InvalidScript(format!(
                        "operation {} ({}) runs past the end of the input",
                        position, op.operator
                    ))
                })?;
                if !eq.equals(expected, &op.token) {
                    return Err(Error::InvalidScript(format!(
                        "operation {} ({}) does not match input token {}",
                        position, op.operator, i
                    )));
                }
                if op.operator == Operator::Match {
                    output.push(op.token.clone());
                }
                i += 1;
            }
        }
    }
    if i != input.len() {
        return Err(Error::InvalidScript(format!(
            "{} input tokens left unconsumed",
            input.len() - i
        )));
    }
    Ok(output)
}

/// Regenerates one side of the diff: the target when `forward` is true,
/// the source otherwise.
pub fn generate<T: Clone>(operations: &[Operation<T>], forward: bool) -> Vec<T> {
    let skipped = if forward {
        Operator::Delete
    } else {
        Operator::Insert
    };
    operations
        .iter()
        .filter(|op| op.operator != skipped)
        .map(|op| op.token.clone())
        .collect()
}

/// Swaps inserts and deletes, producing the script from target to source.
pub fn flip<T: Clone>(operations: &[Operation<T>]) -> Vec<Operation<T>> {
    operations.iter().cloned().map(Operation::flip).collect()
}

/// Streams recorded operations into a handler, including start and end.
pub fn replay<T, H>(operations: &[Operation<T>], handler: &mut H)
where
    H: DiffHandler<T> + ?Sized,
{
    handler.start();
    for op in operations {
        handler.handle(op.operator, &op.token);
    }
    handler.end();
}

/// Number of non-match operations.
pub fn edit_count<T>(operations: &[Operation<T>]) -> usize {
    operations.iter().filter(|op| op.operator.is_edit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::OperationBuffer;

    fn script() -> Vec<Operation<char>> {
        vec![
            Operation::matched('a'),
            Operation::delete('b'),
            Operation::insert('x'),
            Operation::matched('c'),
        ]
    }

    #[test]
    fn test_apply() {
        let to = apply(&['a', 'b', 'c'], &script()).unwrap();
        assert_eq!(to, vec!['a', 'x', 'c']);
    }

    #[test]
    fn test_apply_flipped() {
        let from = apply(&['a', 'x', 'c'], &flip(&script())).unwrap();
        assert_eq!(from, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_apply_rejects_mismatch() {
        let err = apply(&['a', 'z', 'c'], &script()).unwrap_err();
        assert!(matches!(err, Error::InvalidScript(_)));
    }

    #[test]
    fn test_apply_rejects_leftover() {
        assert!(apply(&['a', 'b', 'c', 'd'], &script()).is_err());
        assert!(apply(&['a', 'b'], &script()).is_err());
    }

    #[test]
    fn test_generate() {
        assert_eq!(generate(&script(), true), vec!['a', 'x', 'c']);
        assert_eq!(generate(&script(), false), vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_replay() {
        let mut buffer = OperationBuffer::new();
        replay(&script(), &mut buffer);
        assert_eq!(buffer.into_operations(), script());
        assert_eq!(edit_count(&script()), 2);
    }
}
