//! Well-formedness check for structured edit scripts.

use std::fmt;

use super::token::StructuredToken;
use crate::handler::DiffHandler;
use crate::operator::Operator;

/// A handler that verifies every end marker closes the innermost element
/// opened with the same operator, and that nothing is left open.
#[derive(Debug, Clone)]
pub struct BalanceCheck<T> {
    open: Vec<(Operator, T)>,
    errors: Vec<String>,
    position: usize,
}

impl<T> BalanceCheck<T> {
    pub fn new() -> Self {
        BalanceCheck {
            open: Vec::new(),
            errors: Vec::new(),
            position: 0,
        }
    }

    /// True when no error was found and every element was closed.
    pub fn is_balanced(&self) -> bool {
        self.errors.is_empty() && self.open.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Number of elements still open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }
}

impl<T> Default for BalanceCheck<T> {
    fn default() -> Self {
        BalanceCheck::new()
    }
}

impl<T> DiffHandler<T> for BalanceCheck<T>
where
    T: StructuredToken + Clone + fmt::Debug,
{
    fn start(&mut self) {
        self.open.clear();
        self.errors.clear();
        self.position = 0;
    }

    fn handle(&mut self, operator: Operator, token: &T) {
        self.position += 1;
        if token.is_start() {
            self.open.push((operator, token.clone()));
        } else if token.is_end() {
            match self.open.last() {
                Some((open_operator, start))
                    if *open_operator == operator && token.closes(start) =>
                {
                    self.open.pop();
                }
                Some((open_operator, start)) => self.errors.push(format!(
                    "operation {}: {}{:?} does not close {}{:?}",
                    self.position, operator, token, open_operator, start
                )),
                None => self.errors.push(format!(
                    "operation {}: {}{:?} closes nothing",
                    self.position, operator, token
                )),
            }
        }
    }

    fn end(&mut self) {
        for (operator, start) in &self.open {
            self.errors
                .push(format!("{}{:?} is never closed", operator, start));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlToken;

    #[test]
    fn test_balanced_stream() {
        let mut check = BalanceCheck::new();
        check.start();
        check.handle(Operator::Match, &XmlToken::start("a"));
        check.handle(Operator::Insert, &XmlToken::start("b"));
        check.handle(Operator::Insert, &XmlToken::end("b"));
        check.handle(Operator::Match, &XmlToken::end("a"));
        check.end();
        assert!(check.is_balanced());
    }

    #[test]
    fn test_operator_mismatch() {
        let mut check = BalanceCheck::new();
        check.handle(Operator::Insert, &XmlToken::start("a"));
        check.handle(Operator::Match, &XmlToken::end("a"));
        assert!(!check.is_balanced());
        assert_eq!(check.errors().len(), 1);
        assert!(check.errors()[0].starts_with("operation 2"));
    }

    #[test]
    fn test_unclosed() {
        let mut check = BalanceCheck::new();
        check.handle(Operator::Delete, &XmlToken::start("a"));
        check.end();
        assert!(!check.is_balanced());
        assert_eq!(check.depth(), 1);
        assert!(check.errors()[0].contains("never closed"));
    }
}
