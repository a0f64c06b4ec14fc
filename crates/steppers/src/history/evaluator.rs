use std::collections::{HashMap, hash_map};

use stagger_core::Coupling;

use super::BoundaryHistory;

/// Memoizing view pairing local and remote samples through a coupling.
///
/// The evaluator borrows the history for its whole lifetime, so positions into
/// [`BoundaryHistory::local`] and [`BoundaryHistory::remote`] cannot shift
/// while it is alive. Each distinct (local, remote) pair is evaluated at most
/// once; later requests return the stored result.
pub struct BoundaryEvaluator<'h, L, R, C>
where
    C: Coupling<L, R>,
{
    history: &'h BoundaryHistory<L, R>,
    coupling: &'h C,
    cache: HashMap<(usize, usize), C::Output>,
}

impl<'h, L, R, C> BoundaryEvaluator<'h, L, R, C>
where
    C: Coupling<L, R>,
{
    pub(crate) fn new(history: &'h BoundaryHistory<L, R>, coupling: &'h C) -> Self {
        Self {
            history,
            coupling,
            cache: HashMap::new(),
        }
    }

    /// The history this evaluator reads from.
    #[must_use]
    pub fn history(&self) -> &'h BoundaryHistory<L, R> {
        self.history
    }

    /// Returns the coupling between the samples at the given positions.
    ///
    /// # Errors
    ///
    /// Returns the coupling's error if evaluation fails. Failed evaluations are
    /// not cached.
    ///
    /// # Panics
    ///
    /// Panics if either position is out of range for its side.
    pub fn evaluate(&mut self, local: usize, remote: usize) -> Result<&C::Output, C::Error> {
        match self.cache.entry((local, remote)) {
            hash_map::Entry::Occupied(entry) => Ok(entry.into_mut()),
            hash_map::Entry::Vacant(entry) => {
                let value = self.coupling.evaluate(
                    &self.history.local()[local].sample,
                    &self.history.remote()[remote].sample,
                )?;
                Ok(entry.insert(value))
            }
        }
    }

    /// Number of distinct pairs the coupling has been evaluated for.
    #[must_use]
    pub fn evaluations(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, convert::Infallible};

    use stagger_core::TimeTag;

    use super::*;

    #[test]
    fn evaluates_each_pair_once() {
        let mut history = BoundaryHistory::<f64, f64>::default();
        history.local_insert(TimeTag::at(0.0), 1.0).unwrap();
        history.local_insert(TimeTag::at(1.0), 2.0).unwrap();
        history.remote_insert(TimeTag::at(0.0), 10.0).unwrap();

        let calls = Cell::new(0);
        let coupling = |l: &f64, r: &f64| {
            calls.set(calls.get() + 1);
            Ok::<_, Infallible>(l + r)
        };

        let mut evaluator = history.evaluator(&coupling);
        assert_eq!(*evaluator.evaluate(1, 0).unwrap(), 12.0);
        assert_eq!(*evaluator.evaluate(1, 0).unwrap(), 12.0);
        assert_eq!(*evaluator.evaluate(0, 0).unwrap(), 11.0);

        assert_eq!(calls.get(), 2);
        assert_eq!(evaluator.evaluations(), 2);
    }
}
