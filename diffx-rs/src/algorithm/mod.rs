//! Diff algorithms over token sequences.
//!
//! Every algorithm implements [`DiffAlgorithm`]: given two token slices it
//! streams an edit script into a [`DiffHandler`]. The algorithms differ in
//! their time and space trade-offs:
//!
//! | algorithm | time | space | minimal |
//! |---|---|---|---|
//! | [`WagnerFischer`] | O(mn) | O(mn) | yes |
//! | [`MyersGreedy`] | O((m+n)D) | O(D²) | yes |
//! | [`MyersLinear`] | O((m+n)D) | O(m+n) | yes |
//! | [`Hirschberg`] | O(mn) | O(m+n) | yes |
//! | [`Patience`], [`Histogram`] | ~O(n log n) | O(m+n) | no |
//!
//! The structure-aware variants live in [`crate::xml`].

mod anchored;
mod hirschberg;
mod myers_greedy;
mod myers_linear;
mod wagner_fischer;

use std::fmt;
use std::hash::Hash;
use std::ops::Range;
use std::str::FromStr;

pub use anchored::{Histogram, Patience};
pub use hirschberg::Hirschberg;
pub use myers_greedy::MyersGreedy;
pub use myers_linear::MyersLinear;
pub use wagner_fischer::WagnerFischer;

use crate::config::DiffConfig;
use crate::equality::Equality;
use crate::error::{Error, Result};
use crate::handler::DiffHandler;
use crate::operator::Operator;
use crate::xml::{
    MatrixXmlAlgorithm, MyersGreedyXmlAlgorithm, OptimisticXmlAlgorithm, StructuredToken,
};

/// Computes an edit script between two token sequences.
///
/// Implementations hold configuration only; no state survives between
/// calls, so one instance can serve many diffs in sequence.
pub trait DiffAlgorithm<T> {
    /// Streams the operations turning `from` into `to` into `handler`.
    ///
    /// The handler's `start` and `end` hooks are left to the caller.
    fn diff(&self, from: &[T], to: &[T], handler: &mut dyn DiffHandler<T>) -> Result<()>;

    /// Short name used in logs and on the command line.
    fn name(&self) -> &'static str;
}

/// Selects one of the available algorithms by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    WagnerFischer,
    MyersGreedy,
    MyersLinear,
    Hirschberg,
    Patience,
    Histogram,
    MatrixXml,
    MyersGreedyXml,
    OptimisticXml,
}

impl Algorithm {
    pub const ALL: [Algorithm; 9] = [
        Algorithm::WagnerFischer,
        Algorithm::MyersGreedy,
        Algorithm::MyersLinear,
        Algorithm::Hirschberg,
        Algorithm::Patience,
        Algorithm::Histogram,
        Algorithm::MatrixXml,
        Algorithm::MyersGreedyXml,
        Algorithm::OptimisticXml,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::WagnerFischer => "wagner-fischer",
            Algorithm::MyersGreedy => "myers-greedy",
            Algorithm::MyersLinear => "myers-linear",
            Algorithm::Hirschberg => "hirschberg",
            Algorithm::Patience => "patience",
            Algorithm::Histogram => "histogram",
            Algorithm::MatrixXml => "matrix-xml",
            Algorithm::MyersGreedyXml => "myers-greedy-xml",
            Algorithm::OptimisticXml => "optimistic-xml",
        }
    }

    /// Whether the algorithm only accepts structured tokens.
    pub fn is_structured(self) -> bool {
        matches!(
            self,
            Algorithm::MatrixXml | Algorithm::MyersGreedyXml | Algorithm::OptimisticXml
        )
    }

    /// Whether the algorithm always produces a minimal edit script.
    pub fn is_minimal(self) -> bool {
        matches!(
            self,
            Algorithm::WagnerFischer
                | Algorithm::MyersGreedy
                | Algorithm::MyersLinear
                | Algorithm::Hirschberg
        )
    }

    /// Instantiates an algorithm for unstructured tokens.
    pub fn create<T, E>(self, eq: E, prefer_from: bool) -> Result<Box<dyn DiffAlgorithm<T>>>
    where
        T: Hash + Eq,
        E: Equality<T> + 'static,
    {
        let algorithm: Box<dyn DiffAlgorithm<T>> = match self {
            Algorithm::WagnerFischer => {
                Box::new(WagnerFischer::with_equality(eq).prefer_from(prefer_from))
            }
            Algorithm::MyersGreedy => {
                Box::new(MyersGreedy::with_equality(eq).prefer_from(prefer_from))
            }
            Algorithm::MyersLinear => {
                Box::new(MyersLinear::with_equality(eq).prefer_from(prefer_from))
            }
            Algorithm::Hirschberg => {
                Box::new(Hirschberg::with_equality(eq).prefer_from(prefer_from))
            }
            Algorithm::Patience => Box::new(Patience::with_equality(eq).prefer_from(prefer_from)),
            Algorithm::Histogram => {
                Box::new(Histogram::with_equality(eq).prefer_from(prefer_from))
            }
            Algorithm::MatrixXml | Algorithm::MyersGreedyXml | Algorithm::OptimisticXml => {
                return Err(Error::UnsupportedAlgorithm(self.name()))
            }
        };
        Ok(algorithm)
    }

    /// Instantiates any algorithm for structured tokens.
    ///
    /// The structured algorithms take their slicing and matrix threshold
    /// from `config`; the others only read its match preference.
    pub fn create_structured<T, E>(
        self,
        eq: E,
        config: &DiffConfig,
    ) -> Result<Box<dyn DiffAlgorithm<T>>>
    where
        T: StructuredToken + Hash + Eq,
        E: Equality<T> + 'static,
    {
        match self {
            Algorithm::MatrixXml => Ok(Box::new(
                MatrixXmlAlgorithm::with_equality(eq)
                    .prefer_from(config.prefer_from)
                    .slice(config.slice)
                    .threshold(config.threshold),
            )),
            Algorithm::MyersGreedyXml => Ok(Box::new(
                MyersGreedyXmlAlgorithm::with_equality(eq)
                    .prefer_from(config.prefer_from)
                    .slice(config.slice)
                    .threshold(config.threshold),
            )),
            Algorithm::OptimisticXml => Ok(Box::new(
                OptimisticXmlAlgorithm::with_equality(eq)
                    .prefer_from(config.prefer_from)
                    .slice(config.slice)
                    .threshold(config.threshold),
            )),
            _ => self.create(eq, config.prefer_from),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}

/// Writes operations for positions of `from` and `to`, choosing which side's
/// token a match carries.
pub(crate) struct Emitter<'a, T> {
    pub from: &'a [T],
    pub to: &'a [T],
    prefer_from: bool,
}

impl<'a, T> Emitter<'a, T> {
    pub fn new(from: &'a [T], to: &'a [T], prefer_from: bool) -> Self {
        Emitter {
            from,
            to,
            prefer_from,
        }
    }

    pub fn matched(&self, handler: &mut dyn DiffHandler<T>, i: usize, j: usize) {
        let token = if self.prefer_from {
            &self.from[i]
        } else {
            &self.to[j]
        };
        handler.handle(Operator::Match, token);
    }

    pub fn delete(&self, handler: &mut dyn DiffHandler<T>, i: usize) {
        handler.handle(Operator::Delete, &self.from[i]);
    }

    pub fn insert(&self, handler: &mut dyn DiffHandler<T>, j: usize) {
        handler.handle(Operator::Insert, &self.to[j]);
    }

    /// `count` matches starting at `(i, j)`.
    pub fn matches(&self, handler: &mut dyn DiffHandler<T>, i: usize, j: usize, count: usize) {
        for step in 0..count {
            self.matched(handler, i + step, j + step);
        }
    }

    pub fn deletes(&self, handler: &mut dyn DiffHandler<T>, range: Range<usize>) {
        for i in range {
            self.delete(handler, i);
        }
    }

    pub fn inserts(&self, handler: &mut dyn DiffHandler<T>, range: Range<usize>) {
        for j in range {
            self.insert(handler, j);
        }
    }

    /// An emitter over sub-slices, keeping the same match preference.
    pub fn narrow(&self, from: Range<usize>, to: Range<usize>) -> Emitter<'a, T> {
        Emitter::new(&self.from[from], &self.to[to], self.prefer_from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equality::DefaultEquality;

    #[test]
    fn test_parse_names() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert_eq!(
            "Myers_Linear".parse::<Algorithm>().unwrap(),
            Algorithm::MyersLinear
        );
        assert!(matches!(
            "levenshtein".parse::<Algorithm>(),
            Err(Error::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn test_create_rejects_structured() {
        let result = Algorithm::MatrixXml.create::<char, _>(DefaultEquality, false);
        assert!(matches!(result, Err(Error::UnsupportedAlgorithm(_))));
        let algorithm = Algorithm::Patience
            .create::<char, _>(DefaultEquality, false)
            .unwrap();
        assert_eq!(algorithm.name(), "patience");
    }

    #[test]
    fn test_classification() {
        assert!(Algorithm::Hirschberg.is_minimal());
        assert!(!Algorithm::Histogram.is_minimal());
        assert!(Algorithm::MyersGreedyXml.is_structured());
        assert!(Algorithm::OptimisticXml.is_structured());
        assert!(!Algorithm::OptimisticXml.is_minimal());
    }

    #[test]
    fn test_create_structured() {
        use crate::xml::XmlToken;

        let config = DiffConfig::default();
        let algorithm = Algorithm::MyersGreedyXml
            .create_structured::<XmlToken, _>(DefaultEquality, &config)
            .unwrap();
        assert_eq!(algorithm.name(), "myers-greedy-xml");
        let algorithm = Algorithm::OptimisticXml
            .create_structured::<XmlToken, _>(DefaultEquality, &config)
            .unwrap();
        assert_eq!(algorithm.name(), "optimistic-xml");
        let algorithm = Algorithm::Hirschberg
            .create_structured::<XmlToken, _>(DefaultEquality, &config)
            .unwrap();
        assert_eq!(algorithm.name(), "hirschberg");
    }
}
