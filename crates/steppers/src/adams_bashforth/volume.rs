use stagger_core::{ApproximateTime, EndTime, EvolutionDirection, StepEnd, TimeTag, VectorSpace};

use crate::{
    coefficients::{coefficients, steps_between},
    history::{Entry, HistoryError, Sequence, Side},
};

use super::{AdamsBashforth, Error};

/// Time-tagged derivatives of one element's evolved variables.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        try_from = "StepHistoryParts<T>",
        bound(deserialize = "T: serde::Deserialize<'de>")
    )
)]
pub struct StepHistory<T> {
    direction: EvolutionDirection,
    derivatives: Sequence<T>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
struct StepHistoryParts<T> {
    direction: EvolutionDirection,
    derivatives: Sequence<T>,
}

#[cfg(feature = "serde")]
impl<T> TryFrom<StepHistoryParts<T>> for StepHistory<T> {
    type Error = HistoryError;

    fn try_from(parts: StepHistoryParts<T>) -> Result<Self, Self::Error> {
        parts.derivatives.check_order(Side::Local, parts.direction)?;
        Ok(Self {
            direction: parts.direction,
            derivatives: parts.derivatives,
        })
    }
}

impl<T> Default for StepHistory<T> {
    fn default() -> Self {
        Self::new(EvolutionDirection::Forward)
    }
}

impl<T> StepHistory<T> {
    #[must_use]
    pub fn new(direction: EvolutionDirection) -> Self {
        Self {
            direction,
            derivatives: Sequence::default(),
        }
    }

    #[must_use]
    pub fn direction(&self) -> EvolutionDirection {
        self.direction
    }

    /// Records the derivative at `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NonMonotonicAppend`] if `tag` is not strictly
    /// after the latest recorded time.
    pub fn push(&mut self, tag: TimeTag, derivative: T) -> Result<(), HistoryError> {
        self.derivatives
            .push(Side::Local, self.direction, tag, derivative)
    }

    /// Stored derivatives, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[Entry<T>] {
        self.derivatives.entries()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.derivatives.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.derivatives.len() == 0
    }

    #[must_use]
    pub fn last(&self) -> Option<&Entry<T>> {
        self.derivatives.last()
    }

    /// Drops everything but the `count` newest derivatives.
    fn keep_last(&mut self, count: usize) {
        let from = self.derivatives.len().saturating_sub(count);
        self.derivatives.retain_from_position(from);
        self.derivatives.compact();
    }
}

impl AdamsBashforth {
    /// Advances `u` by `step` from the latest derivative in `history`.
    ///
    /// While fewer derivatives than the configured order exist, the step uses
    /// the order the available history supports. Afterward only the
    /// derivatives the next step can use are kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStep`] for an unusable step and
    /// [`Error::InsufficientHistory`] if `history` is empty.
    pub fn update_u<T: VectorSpace>(
        &self,
        u: &mut T,
        history: &mut StepHistory<T>,
        step: f64,
    ) -> Result<(), Error> {
        Self::check_step(history.direction(), step)?;
        let order = self.volume_order(history)?;
        let entries = history.entries();
        let end = StepEnd::new(entries[entries.len() - 1].tag, step);
        apply_update(u, entries, order, &end);
        history.keep_last(self.number_of_past_steps());
        Ok(())
    }

    /// Advances `u` like [`update_u`](Self::update_u) and writes the
    /// difference from a one-order-lower step into `error`.
    ///
    /// Returns `false` without touching `error` when the step ran at first
    /// order, where no lower-order comparison exists.
    ///
    /// # Errors
    ///
    /// Same as [`update_u`](Self::update_u).
    pub fn update_u_with_error<T: VectorSpace + Clone>(
        &self,
        u: &mut T,
        error: &mut T,
        history: &mut StepHistory<T>,
        step: f64,
    ) -> Result<bool, Error> {
        Self::check_step(history.direction(), step)?;
        let order = self.volume_order(history)?;
        let entries = history.entries();
        let end = StepEnd::new(entries[entries.len() - 1].tag, step);

        let estimated = if order > 1 {
            let mut lower = u.clone();
            apply_update(&mut lower, entries, order - 1, &end);
            apply_update(u, entries, order, &end);
            *error = u.clone();
            error.add_scaled(-1.0, &lower);
            true
        } else {
            apply_update(u, entries, order, &end);
            false
        };

        history.keep_last(self.number_of_past_steps());
        Ok(estimated)
    }

    /// Advances `u` from the latest derivative to `time` without consuming
    /// history.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DenseOutputOutOfRange`] if `time` is not after the
    /// latest derivative and [`Error::InsufficientHistory`] if `history` is
    /// empty.
    pub fn dense_update_u<T: VectorSpace>(
        &self,
        u: &mut T,
        history: &StepHistory<T>,
        time: f64,
    ) -> Result<(), Error> {
        let order = self.volume_order(history)?;
        let entries = history.entries();
        let start = entries[entries.len() - 1].tag;
        let end = ApproximateTime(time);
        if !time.is_finite() || !history.direction().less(&start, &end) {
            return Err(Error::DenseOutputOutOfRange {
                time,
                start: start.value(),
            });
        }
        apply_update(u, entries, order, &end);
        Ok(())
    }

    fn volume_order<T>(&self, history: &StepHistory<T>) -> Result<usize, Error> {
        if history.is_empty() {
            return Err(Error::InsufficientHistory {
                side: Side::Local,
                have: 0,
                need: 1,
            });
        }
        Ok(self.order().min(history.len()))
    }
}

/// Adds an order-`order` step over the newest `entries` ending at `end`.
fn apply_update<T: VectorSpace, E: EndTime>(
    u: &mut T,
    entries: &[Entry<T>],
    order: usize,
    end: &E,
) {
    let window = &entries[entries.len() - order..];
    let times: Vec<TimeTag> = window.iter().map(|entry| entry.tag).collect();
    let step = end.since(&times[order - 1]);
    for (weight, entry) in coefficients(&steps_between(&times, step)).iter().zip(window) {
        u.add_scaled(step * weight, &entry.sample);
    }
}
