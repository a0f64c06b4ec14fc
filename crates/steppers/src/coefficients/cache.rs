use std::collections::HashMap;

use log::trace;

/// Memoized coefficients keyed by union-timeline position and step size.
///
/// Keys use the integer position of a step's start in the union timeline
/// together with the exact bit pattern of its size, so no floating-point
/// comparison is involved in lookups. A cache is meant to live for a single
/// boundary computation; it is a pure optimization and may be rebuilt freely.
#[derive(Debug, Default)]
pub struct CoefficientCache {
    entries: HashMap<(usize, u64), Vec<f64>>,
    hits: usize,
    misses: usize,
}

impl CoefficientCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached coefficients for `(position, step)`, computing them
    /// with `compute` on a miss.
    pub fn get_or_insert_with<F>(&mut self, position: usize, step: f64, compute: F) -> &[f64]
    where
        F: FnOnce() -> Vec<f64>,
    {
        let key = (position, step.to_bits());
        if self.entries.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            trace!("computing coefficients for union position {position}, step {step}");
            self.entries.insert(key, compute());
        }
        &self.entries[&key]
    }

    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits
    }

    #[must_use]
    pub fn misses(&self) -> usize {
        self.misses
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
