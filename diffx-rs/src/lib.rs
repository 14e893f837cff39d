//! diffx - Token sequence differencing
//!
//! This library computes edit scripts between two sequences of tokens:
//! lines, words, characters, or the start/end/attribute/text tokens of a
//! flattened XML document.
//!
//! # Overview
//!
//! An edit script is a stream of [`Operation`]s, each an [`Operator`]
//! (insert, delete or match) applied to one token. Applying the deletes and
//! matches of a script to the "from" sequence reproduces the "to"
//! sequence.
//!
//! Six classic algorithms are provided, selected through [`Algorithm`]:
//! Wagner-Fischer, Myers (greedy and linear space), Hirschberg, Patience
//! and Histogram. The [`xml`] module adds three variants that never break
//! the nesting of the token stream: an end marker is always emitted with the
//! same operator as the start marker it closes.
//!
//! # Example
//!
//! ```
//! use diffx::{operations, DiffConfig, DiffProcessor, OperationBuffer};
//!
//! let from: Vec<char> = "kitten".chars().collect();
//! let to: Vec<char> = "sitting".chars().collect();
//!
//! let mut buffer = OperationBuffer::new();
//! DiffProcessor::new(DiffConfig::default())
//!     .diff(&from, &to, &mut buffer)
//!     .unwrap();
//! assert_eq!(buffer.edit_count(), 5);
//! assert_eq!(operations::apply(&from, buffer.operations()).unwrap(), to);
//! ```

pub mod algorithm;
pub mod config;
pub mod constants;
pub mod equality;
pub mod error;
pub mod format;
pub mod handler;
pub mod matrix;
pub mod operations;
pub mod operator;
pub mod slice;
pub mod snake;
pub mod vector;
pub mod xml;

// Re-export commonly used types
pub use algorithm::{
    Algorithm, DiffAlgorithm, Hirschberg, Histogram, MyersGreedy, MyersLinear, Patience,
    WagnerFischer,
};
pub use config::{DiffConfig, DiffProcessor};
pub use constants::*;
pub use equality::{DefaultEquality, Equality, IgnoreAsciiCase};
pub use error::{Error, Result};
pub use format::ShortFormatter;
pub use handler::{CountingHandler, DiffHandler, MuxHandler, OperationBuffer};
pub use operator::{Operation, Operator};
pub use slice::Affixes;

// Re-export structured diff types
pub use xml::{
    BalanceCheck, ElementStack, MatrixXmlAlgorithm, MyersGreedyXmlAlgorithm, OptimisticXmlAlgorithm,
    StructuredToken, TokenKind, TokenSlicer, XmlToken,
};

/// Diffs two sequences with the default configuration and collects the
/// script.
pub fn diff<T>(from: &[T], to: &[T]) -> Result<Vec<Operation<T>>>
where
    T: std::hash::Hash + Eq + Clone,
{
    let mut buffer = OperationBuffer::new();
    DiffProcessor::default().diff(from, to, &mut buffer)?;
    Ok(buffer.into_operations())
}
