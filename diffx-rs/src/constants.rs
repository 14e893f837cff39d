//! Constants used throughout diffx.

/// Default maximum number of matrix cells (`from.len() * to.len()`) the
/// thresholded algorithms will allocate.
pub const DEFAULT_THRESHOLD: usize = 64_000_000;

/// Largest dimension for which a matrix can store its scores in `u16` cells.
///
/// LCS lengths never exceed the shorter side, so a matrix whose sides both
/// fit below this bound never overflows a narrow cell.
pub const NARROW_CELL_LIMIT: usize = u16::MAX as usize;
