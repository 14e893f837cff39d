//! Common prefix and suffix removal.
//!
//! Stripping the shared ends of two sequences leaves the quadratic
//! algorithms a smaller middle to work on without changing the result.
//! Structured tokens use [`crate::xml::TokenSlicer`] instead, which only
//! cuts where nesting allows.

use crate::algorithm::Emitter;
use crate::equality::Equality;
use crate::handler::DiffHandler;

/// Number of tokens shared at the start and at the end of two sequences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Affixes {
    pub prefix: usize,
    pub suffix: usize,
}

impl Affixes {
    pub fn new(prefix: usize, suffix: usize) -> Self {
        Affixes { prefix, suffix }
    }

    /// Longest common prefix, then longest common suffix of what remains.
    pub fn compute<T, E>(from: &[T], to: &[T], eq: &E) -> Self
    where
        E: Equality<T> + ?Sized,
    {
        let prefix = from
            .iter()
            .zip(to)
            .take_while(|(a, b)| eq.equals(a, b))
            .count();
        let suffix = from[prefix..]
            .iter()
            .rev()
            .zip(to[prefix..].iter().rev())
            .take_while(|(a, b)| eq.equals(a, b))
            .count();
        Affixes { prefix, suffix }
    }

    pub fn is_empty(&self) -> bool {
        self.prefix == 0 && self.suffix == 0
    }

    pub fn total(&self) -> usize {
        self.prefix + self.suffix
    }

    /// The part of `sequence` between the prefix and the suffix.
    pub fn middle<'a, T>(&self, sequence: &'a [T]) -> &'a [T] {
        &sequence[self.prefix..sequence.len() - self.suffix]
    }

    pub(crate) fn emit_prefix<T>(
        &self,
        emitter: &Emitter<'_, T>,
        handler: &mut dyn DiffHandler<T>,
    ) {
        emitter.matches(handler, 0, 0, self.prefix);
    }

    pub(crate) fn emit_suffix<T>(
        &self,
        emitter: &Emitter<'_, T>,
        handler: &mut dyn DiffHandler<T>,
    ) {
        let i = emitter.from.len() - self.suffix;
        let j = emitter.to.len() - self.suffix;
        emitter.matches(handler, i, j, self.suffix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equality::DefaultEquality;

    #[test]
    fn test_compute() {
        let from: Vec<char> = "abcxyzde".chars().collect();
        let to: Vec<char> = "abcqde".chars().collect();
        let affixes = Affixes::compute(&from, &to, &DefaultEquality);
        assert_eq!(affixes, Affixes::new(3, 2));
        assert_eq!(affixes.middle(&from), &['x', 'y', 'z']);
        assert_eq!(affixes.middle(&to), &['q']);
    }

    #[test]
    fn test_identical_not_counted_twice() {
        let s: Vec<char> = "aaaa".chars().collect();
        let affixes = Affixes::compute(&s, &s, &DefaultEquality);
        assert_eq!(affixes.total(), 4);
        assert!(affixes.middle(&s).is_empty());
    }

    #[test]
    fn test_empty() {
        let affixes = Affixes::compute::<char, _>(&[], &['a'], &DefaultEquality);
        assert!(affixes.is_empty());
    }
}
