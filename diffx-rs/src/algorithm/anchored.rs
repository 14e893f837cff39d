//! Anchor-based heuristics: Patience and Histogram.
//!
//! Both strip the common prefix and suffix, then look for rare tokens that
//! occur in both remaining ranges. Every pairing of such occurrences is a
//! candidate anchor; the longest chain of candidates increasing in both
//! sequences is matched, and the gaps between anchors are solved the same
//! way. A range without candidates is handed to Myers' greedy algorithm.
//!
//! Patience only accepts tokens that occur exactly once on each side.
//! Histogram accepts up to `ceil(sqrt(max(len)))` occurrences per side.
//! Neither guarantees a minimal script.

use std::hash::Hash;
use std::ops::Range;

use rustc_hash::FxHashMap;

use super::myers_greedy::greedy;
use super::{DiffAlgorithm, Emitter};
use crate::equality::{DefaultEquality, Equality};
use crate::error::Result;
use crate::handler::DiffHandler;

/// Patience diff: anchors on tokens unique to both sides.
#[derive(Debug, Clone, Default)]
pub struct Patience<E = DefaultEquality> {
    eq: E,
    prefer_from: bool,
}

impl Patience {
    pub fn new() -> Self {
        Patience::with_equality(DefaultEquality)
    }
}

impl<E> Patience<E> {
    pub fn with_equality(eq: E) -> Self {
        Patience {
            eq,
            prefer_from: false,
        }
    }

    pub fn prefer_from(mut self, prefer_from: bool) -> Self {
        self.prefer_from = prefer_from;
        self
    }
}

impl<T: Hash + Eq, E: Equality<T>> DiffAlgorithm<T> for Patience<E> {
    fn diff(&self, from: &[T], to: &[T], handler: &mut dyn DiffHandler<T>) -> Result<()> {
        let emitter = Emitter::new(from, to, self.prefer_from);
        let anchored = Anchored {
            emitter: &emitter,
            eq: &self.eq,
            rarity: Rarity::Unique,
        };
        anchored.solve(0..from.len(), 0..to.len(), handler)
    }

    fn name(&self) -> &'static str {
        "patience"
    }
}

/// Histogram diff: anchors on low-occurrence tokens.
#[derive(Debug, Clone, Default)]
pub struct Histogram<E = DefaultEquality> {
    eq: E,
    prefer_from: bool,
}

impl Histogram {
    pub fn new() -> Self {
        Histogram::with_equality(DefaultEquality)
    }
}

impl<E> Histogram<E> {
    pub fn with_equality(eq: E) -> Self {
        Histogram {
            eq,
            prefer_from: false,
        }
    }

    pub fn prefer_from(mut self, prefer_from: bool) -> Self {
        self.prefer_from = prefer_from;
        self
    }
}

impl<T: Hash + Eq, E: Equality<T>> DiffAlgorithm<T> for Histogram<E> {
    fn diff(&self, from: &[T], to: &[T], handler: &mut dyn DiffHandler<T>) -> Result<()> {
        let emitter = Emitter::new(from, to, self.prefer_from);
        let anchored = Anchored {
            emitter: &emitter,
            eq: &self.eq,
            rarity: Rarity::LowOccurrence,
        };
        anchored.solve(0..from.len(), 0..to.len(), handler)
    }

    fn name(&self) -> &'static str {
        "histogram"
    }
}

/// How rare a token must be to serve as an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rarity {
    Unique,
    LowOccurrence,
}

impl Rarity {
    /// Maximum occurrences per side for ranges of the given lengths.
    fn limit(self, from_len: usize, to_len: usize) -> usize {
        match self {
            Rarity::Unique => 1,
            Rarity::LowOccurrence => ceil_sqrt(from_len.max(to_len)).max(1),
        }
    }
}

fn ceil_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    while root * root < n {
        root += 1;
    }
    while root > 0 && (root - 1) * (root - 1) >= n {
        root -= 1;
    }
    root
}

#[derive(Default)]
struct Occurrences {
    from: Vec<usize>,
    to: Vec<usize>,
}

struct Anchored<'a, 'e, T, E> {
    emitter: &'e Emitter<'a, T>,
    eq: &'e E,
    rarity: Rarity,
}

impl<T: Hash + Eq, E: Equality<T>> Anchored<'_, '_, T, E> {
    fn solve(
        &self,
        a: Range<usize>,
        b: Range<usize>,
        handler: &mut dyn DiffHandler<T>,
    ) -> Result<()> {
        let from = self.emitter.from;
        let to = self.emitter.to;

        let prefix = from[a.clone()]
            .iter()
            .zip(&to[b.clone()])
            .take_while(|(x, y)| self.eq.equals(x, y))
            .count();
        self.emitter.matches(handler, a.start, b.start, prefix);
        let a = a.start + prefix..a.end;
        let b = b.start + prefix..b.end;

        let suffix = from[a.clone()]
            .iter()
            .rev()
            .zip(to[b.clone()].iter().rev())
            .take_while(|(x, y)| self.eq.equals(x, y))
            .count();
        let a = a.start..a.end - suffix;
        let b = b.start..b.end - suffix;

        if a.is_empty() {
            self.emitter.inserts(handler, b.clone());
        } else if b.is_empty() {
            self.emitter.deletes(handler, a.clone());
        } else {
            let anchors = self.anchors(a.clone(), b.clone());
            if anchors.is_empty() {
                tracing::trace!(?a, ?b, "no anchors, falling back to myers-greedy");
                greedy(&self.emitter.narrow(a.clone(), b.clone()), self.eq, handler)?;
            } else {
                let (mut i, mut j) = (a.start, b.start);
                for &(x, y) in &anchors {
                    self.solve(i..x, j..y, handler)?;
                    self.emitter.matched(handler, x, y);
                    i = x + 1;
                    j = y + 1;
                }
                self.solve(i..a.end, j..b.end, handler)?;
            }
        }

        self.emitter.matches(handler, a.end, b.end, suffix);
        Ok(())
    }

    /// The longest increasing chain of rare matching pairs.
    fn anchors(&self, a: Range<usize>, b: Range<usize>) -> Vec<(usize, usize)> {
        let from = self.emitter.from;
        let to = self.emitter.to;
        let limit = self.rarity.limit(a.len(), b.len());

        let mut table: FxHashMap<&T, Occurrences> = FxHashMap::default();
        for i in a {
            table.entry(&from[i]).or_default().from.push(i);
        }
        for j in b {
            if let Some(entry) = table.get_mut(&to[j]) {
                entry.to.push(j);
            }
        }

        let mut candidates = Vec::new();
        for occurrences in table.values() {
            let (xs, ys) = (&occurrences.from, &occurrences.to);
            if ys.is_empty() || xs.len() > limit || ys.len() > limit {
                continue;
            }
            for &x in xs {
                for &y in ys {
                    if self.eq.equals(&from[x], &to[y]) {
                        candidates.push((x, y));
                    }
                }
            }
        }
        // descending y within equal x keeps the chain strictly increasing in x
        candidates.sort_unstable_by(|p, q| p.0.cmp(&q.0).then(q.1.cmp(&p.1)));
        longest_increasing(&candidates)
    }
}

/// Longest subsequence of `pairs` with strictly increasing second members,
/// in O(k log k).
fn longest_increasing(pairs: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut tails: Vec<usize> = Vec::new();
    let mut previous: Vec<Option<usize>> = vec![None; pairs.len()];
    for (index, &(_, y)) in pairs.iter().enumerate() {
        let position = tails.partition_point(|&t| pairs[t].1 < y);
        if position > 0 {
            previous[index] = Some(tails[position - 1]);
        }
        if position == tails.len() {
            tails.push(index);
        } else {
            tails[position] = index;
        }
    }
    let mut chain = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(index) = cursor {
        chain.push(pairs[index]);
        cursor = previous[index];
    }
    chain.reverse();
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::OperationBuffer;
    use crate::operations;
    use crate::operator::Operator;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_ceil_sqrt() {
        assert_eq!(ceil_sqrt(0), 0);
        assert_eq!(ceil_sqrt(1), 1);
        assert_eq!(ceil_sqrt(4), 2);
        assert_eq!(ceil_sqrt(5), 3);
        assert_eq!(ceil_sqrt(10), 4);
    }

    #[test]
    fn test_longest_increasing() {
        let pairs = [(0, 3), (1, 1), (2, 4), (3, 2), (4, 5)];
        assert_eq!(longest_increasing(&pairs), vec![(1, 1), (3, 2), (4, 5)]);
        assert!(longest_increasing(&[]).is_empty());
    }

    #[test]
    fn test_same_x_not_chained() {
        let pairs = [(0, 2), (0, 1), (0, 0)];
        assert_eq!(longest_increasing(&pairs).len(), 1);
    }

    #[test]
    fn test_patience_moves() {
        let from = chars("axbxc");
        let to = chars("bxaxc");
        let mut buffer = OperationBuffer::new();
        Patience::new().diff(&from, &to, &mut buffer).unwrap();
        let ops = buffer.into_operations();
        assert_eq!(operations::apply(&from, &ops).unwrap(), to);
        assert_eq!(ops.last().map(|op| op.operator), Some(Operator::Match));
    }

    #[test]
    fn test_histogram_repeated_tokens() {
        let from = chars("aabbaabbcc");
        let to = chars("abababcbc");
        let mut buffer = OperationBuffer::new();
        Histogram::new().diff(&from, &to, &mut buffer).unwrap();
        let ops = buffer.into_operations();
        assert_eq!(operations::apply(&from, &ops).unwrap(), to);
    }

    #[test]
    fn test_fallback_without_anchors() {
        let from = chars("abab");
        let to = chars("baba");
        let mut buffer = OperationBuffer::new();
        Patience::new().diff(&from, &to, &mut buffer).unwrap();
        assert_eq!(buffer.edit_count(), 2);
    }
}
