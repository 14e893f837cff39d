//! Run configuration and the driver that applies it.
//!
//! [`DiffProcessor`] wraps an [`Algorithm`] with the steps every run shares:
//! handler hooks, slicing of the common ends, and the size guard for the
//! matrix algorithms.

use std::hash::Hash;

use crate::algorithm::{Algorithm, DiffAlgorithm, Emitter};
use crate::constants::DEFAULT_THRESHOLD;
use crate::equality::{DefaultEquality, Equality};
use crate::error::Result;
use crate::handler::DiffHandler;
use crate::matrix::check_threshold;
use crate::operator::Operator;
use crate::slice::Affixes;
use crate::xml::{StructuredToken, TokenSlicer};

/// Options for one diff run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffConfig {
    pub algorithm: Algorithm,
    /// Strip common prefix and suffix before running the algorithm.
    pub slice: bool,
    /// Largest matrix, in cells, a quadratic-space algorithm may allocate.
    pub threshold: usize,
    /// Matches carry the token from the "from" side instead of the "to" side.
    pub prefer_from: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        DiffConfig {
            algorithm: Algorithm::MyersLinear,
            slice: true,
            threshold: DEFAULT_THRESHOLD,
            prefer_from: false,
        }
    }
}

impl DiffConfig {
    pub fn new(algorithm: Algorithm) -> Self {
        DiffConfig {
            algorithm,
            ..DiffConfig::default()
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_slice(mut self, slice: bool) -> Self {
        self.slice = slice;
        self
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_prefer_from(mut self, prefer_from: bool) -> Self {
        self.prefer_from = prefer_from;
        self
    }
}

/// Runs the configured algorithm over whole sequences.
///
/// A successful run calls `handler.start()` once, emits the operations, then
/// calls `handler.end()` once. `start` is held back until the first operation,
/// so a run rejected before emitting anything leaves the handler untouched,
/// wherever the rejection happens: the processor's own size guard, the
/// threshold of a structured algorithm, or its matrix fallback. A run that
/// fails part way does not call `end`.
#[derive(Debug, Clone, Default)]
pub struct DiffProcessor {
    config: DiffConfig,
}

impl DiffProcessor {
    pub fn new(config: DiffConfig) -> Self {
        DiffProcessor { config }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Diffs plain tokens compared with `==`.
    pub fn diff<T>(&self, from: &[T], to: &[T], handler: &mut dyn DiffHandler<T>) -> Result<()>
    where
        T: Hash + Eq,
    {
        self.diff_with(from, to, DefaultEquality, handler)
    }

    /// Diffs plain tokens compared with `eq`.
    ///
    /// Fails with [`crate::Error::UnsupportedAlgorithm`] for the structured
    /// algorithms.
    pub fn diff_with<T, E>(
        &self,
        from: &[T],
        to: &[T],
        eq: E,
        handler: &mut dyn DiffHandler<T>,
    ) -> Result<()>
    where
        T: Hash + Eq,
        E: Equality<T> + Clone + 'static,
    {
        let algorithm = self.config.algorithm.create(eq.clone(), self.config.prefer_from)?;
        let affixes = if self.config.slice {
            Affixes::compute(from, to, &eq)
        } else {
            Affixes::default()
        };
        self.run(algorithm.as_ref(), from, to, affixes, handler)
    }

    /// Diffs structured tokens compared with `==`.
    pub fn diff_structured<T>(
        &self,
        from: &[T],
        to: &[T],
        handler: &mut dyn DiffHandler<T>,
    ) -> Result<()>
    where
        T: StructuredToken + Hash + Eq,
    {
        self.diff_structured_with(from, to, DefaultEquality, handler)
    }

    /// Diffs structured tokens compared with `eq`.
    ///
    /// Every algorithm is accepted; only the structured ones guarantee a
    /// well-formed script. Slicing never cuts through an element.
    pub fn diff_structured_with<T, E>(
        &self,
        from: &[T],
        to: &[T],
        eq: E,
        handler: &mut dyn DiffHandler<T>,
    ) -> Result<()>
    where
        T: StructuredToken + Hash + Eq,
        E: Equality<T> + Clone + 'static,
    {
        let algorithm = self.config.algorithm.create_structured(eq.clone(), &self.config)?;
        // The structured algorithms slice and guard their own input.
        let affixes = if self.config.slice && !self.config.algorithm.is_structured() {
            TokenSlicer::new(from, to, &eq).analyze()
        } else {
            Affixes::default()
        };
        self.run(algorithm.as_ref(), from, to, affixes, handler)
    }

    fn run<T>(
        &self,
        algorithm: &dyn DiffAlgorithm<T>,
        from: &[T],
        to: &[T],
        affixes: Affixes,
        handler: &mut dyn DiffHandler<T>,
    ) -> Result<()> {
        let (from_middle, to_middle) = (affixes.middle(from), affixes.middle(to));
        if self.config.algorithm == Algorithm::WagnerFischer {
            check_threshold(from_middle.len(), to_middle.len(), self.config.threshold)?;
        }
        tracing::debug!(
            algorithm = algorithm.name(),
            from = from.len(),
            to = to.len(),
            prefix = affixes.prefix,
            suffix = affixes.suffix,
            "running diff"
        );

        let emitter = Emitter::new(from, to, self.config.prefer_from);
        let mut handler = DeferredStart::new(handler);
        affixes.emit_prefix(&emitter, &mut handler);
        algorithm.diff(from_middle, to_middle, &mut handler)?;
        affixes.emit_suffix(&emitter, &mut handler);
        handler.finish();
        Ok(())
    }
}

/// Forwards to a handler, calling its `start` just before the first operation.
struct DeferredStart<'h, T> {
    inner: &'h mut dyn DiffHandler<T>,
    started: bool,
}

impl<'h, T> DeferredStart<'h, T> {
    fn new(inner: &'h mut dyn DiffHandler<T>) -> Self {
        DeferredStart {
            inner,
            started: false,
        }
    }

    fn begin(&mut self) {
        if !self.started {
            self.started = true;
            self.inner.start();
        }
    }

    /// Ends the run. An empty script still gets both hooks.
    fn finish(mut self) {
        self.begin();
        self.inner.end();
    }
}

impl<T> DiffHandler<T> for DeferredStart<'_, T> {
    fn handle(&mut self, operator: Operator, token: &T) {
        self.begin();
        self.inner.handle(operator, token);
    }
}
