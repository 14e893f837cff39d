//! Structural-validity layer for XML-shaped token streams.
//!
//! The algorithms here produce edit scripts that can always be serialized
//! back into properly nested markup: an end marker is only ever emitted
//! with the operator that emitted its start marker.

mod balance;
mod matrix_xml;
mod myers_greedy_xml;
mod optimistic;
mod slicer;
mod stack;
mod token;

pub use balance::BalanceCheck;
pub use matrix_xml::MatrixXmlAlgorithm;
pub use myers_greedy_xml::MyersGreedyXmlAlgorithm;
pub use optimistic::OptimisticXmlAlgorithm;
pub use slicer::{is_balanced, TokenSlicer};
pub use stack::ElementStack;
pub use token::{StructuredToken, TokenKind, XmlToken};
