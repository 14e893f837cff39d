//! Edit operators and operations.

use std::fmt;

/// The three kinds of step in an edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// The token only exists in the target sequence.
    Insert,
    /// The token only exists in the source sequence.
    Delete,
    /// The token is common to both sequences.
    Match,
}

impl Operator {
    /// Swaps `Insert` and `Delete`; `Match` is left unchanged.
    pub fn flip(self) -> Operator {
        match self {
            Operator::Insert => Operator::Delete,
            Operator::Delete => Operator::Insert,
            Operator::Match => Operator::Match,
        }
    }

    /// Returns true for `Insert` and `Delete`.
    pub fn is_edit(self) -> bool {
        self != Operator::Match
    }

    /// Single-character symbol used by the short formatter.
    pub fn symbol(self) -> char {
        match self {
            Operator::Insert => '+',
            Operator::Delete => '-',
            Operator::Match => '=',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An operator paired with the token it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operation<T> {
    pub operator: Operator,
    pub token: T,
}

impl<T> Operation<T> {
    pub fn new(operator: Operator, token: T) -> Self {
        Operation { operator, token }
    }

    pub fn insert(token: T) -> Self {
        Operation::new(Operator::Insert, token)
    }

    pub fn delete(token: T) -> Self {
        Operation::new(Operator::Delete, token)
    }

    pub fn matched(token: T) -> Self {
        Operation::new(Operator::Match, token)
    }

    /// Returns the same token with its operator flipped.
    pub fn flip(self) -> Self {
        Operation {
            operator: self.operator.flip(),
            token: self.token,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Operation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip() {
        assert_eq!(Operator::Insert.flip(), Operator::Delete);
        assert_eq!(Operator::Delete.flip(), Operator::Insert);
        assert_eq!(Operator::Match.flip(), Operator::Match);
    }

    #[test]
    fn test_is_edit() {
        assert!(Operator::Insert.is_edit());
        assert!(Operator::Delete.is_edit());
        assert!(!Operator::Match.is_edit());
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::insert("a").to_string(), "+a");
        assert_eq!(Operation::delete("b").to_string(), "-b");
        assert_eq!(Operation::matched("c").to_string(), "=c");
        assert_eq!(Operation::insert("a").flip(), Operation::delete("a"));
    }
}
