//! Per-interface storage of time-tagged boundary samples.
//!
//! A [`BoundaryHistory`] holds two independent sequences, one for the element
//! being stepped (the local side) and one for its neighbor (the remote side).
//! Each side only grows at its newest end and only shrinks at its oldest end,
//! and only after entries have been explicitly marked unneeded by the
//! integrator, which is the only component that knows the order it needs.
//!
//! # Example
//!
//! ```
//! use stagger_core::TimeTag;
//! use stagger_steppers::history::{BoundaryHistory, Side};
//!
//! let mut history = BoundaryHistory::<f64, f64>::default();
//! history.local_insert(TimeTag::at(0.0), 1.0)?;
//! history.remote_insert(TimeTag::at(0.0), 2.0)?;
//! history.local_insert(TimeTag::at(1.0), 1.5)?;
//!
//! history.mark_unneeded(Side::Local, &TimeTag::at(1.0));
//! assert_eq!(history.local_size(), 2);
//!
//! history.compact();
//! assert_eq!(history.local_size(), 1);
//! # Ok::<(), stagger_steppers::history::HistoryError>(())
//! ```

mod entry;
mod error;
mod evaluator;
mod sequence;

use std::fmt;

use log::debug;
use stagger_core::{Coupling, EvolutionDirection, TimeTag};

pub use entry::Entry;
pub use error::HistoryError;
pub use evaluator::BoundaryEvaluator;

pub(crate) use sequence::Sequence;

/// One side of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// The element whose step is being taken.
    Local,

    /// The neighboring element across the interface.
    Remote,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

/// Time-tagged samples from both sides of one interface.
///
/// Samples are opaque to the history; they are only ever handed to a
/// [`Coupling`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        try_from = "HistoryParts<L, R>",
        bound(deserialize = "L: serde::Deserialize<'de>, R: serde::Deserialize<'de>")
    )
)]
pub struct BoundaryHistory<L, R> {
    direction: EvolutionDirection,
    local: Sequence<L>,
    remote: Sequence<R>,
    integration_order: Option<usize>,
}

/// Unvalidated form of a [`BoundaryHistory`] as it appears in serialized data.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(bound(deserialize = "L: serde::Deserialize<'de>, R: serde::Deserialize<'de>"))]
struct HistoryParts<L, R> {
    direction: EvolutionDirection,
    local: Sequence<L>,
    remote: Sequence<R>,
    integration_order: Option<usize>,
}

#[cfg(feature = "serde")]
impl<L, R> TryFrom<HistoryParts<L, R>> for BoundaryHistory<L, R> {
    type Error = HistoryError;

    fn try_from(parts: HistoryParts<L, R>) -> Result<Self, Self::Error> {
        parts.local.check_order(Side::Local, parts.direction)?;
        parts.remote.check_order(Side::Remote, parts.direction)?;
        Ok(Self {
            direction: parts.direction,
            local: parts.local,
            remote: parts.remote,
            integration_order: parts.integration_order,
        })
    }
}

impl<L, R> Default for BoundaryHistory<L, R> {
    fn default() -> Self {
        Self::new(EvolutionDirection::Forward)
    }
}

impl<L, R> BoundaryHistory<L, R> {
    /// Creates an empty history for evolution in `direction`.
    #[must_use]
    pub fn new(direction: EvolutionDirection) -> Self {
        Self {
            direction,
            local: Sequence::default(),
            remote: Sequence::default(),
            integration_order: None,
        }
    }

    #[must_use]
    pub fn direction(&self) -> EvolutionDirection {
        self.direction
    }

    /// Records a local sample.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NonMonotonicAppend`] if `tag` is not strictly
    /// after the latest local sample. The history is left unchanged.
    pub fn local_insert(&mut self, tag: TimeTag, sample: L) -> Result<(), HistoryError> {
        self.local.push(Side::Local, self.direction, tag, sample)
    }

    /// Records a remote sample.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NonMonotonicAppend`] if `tag` is not strictly
    /// after the latest remote sample. The history is left unchanged.
    pub fn remote_insert(&mut self, tag: TimeTag, sample: R) -> Result<(), HistoryError> {
        self.remote.push(Side::Remote, self.direction, tag, sample)
    }

    /// Stored local entries, oldest first.
    ///
    /// Includes entries that have been marked unneeded but not yet compacted.
    #[must_use]
    pub fn local(&self) -> &[Entry<L>] {
        self.local.entries()
    }

    /// Stored remote entries, oldest first.
    ///
    /// Includes entries that have been marked unneeded but not yet compacted.
    #[must_use]
    pub fn remote(&self) -> &[Entry<R>] {
        self.remote.entries()
    }

    /// Local entries not marked unneeded.
    #[must_use]
    pub fn local_retained(&self) -> &[Entry<L>] {
        self.local.retained()
    }

    /// Remote entries not marked unneeded.
    #[must_use]
    pub fn remote_retained(&self) -> &[Entry<R>] {
        self.remote.retained()
    }

    #[must_use]
    pub fn local_size(&self) -> usize {
        self.local.len()
    }

    #[must_use]
    pub fn remote_size(&self) -> usize {
        self.remote.len()
    }

    pub fn local_times(&self) -> impl DoubleEndedIterator<Item = TimeTag> + '_ {
        self.local.entries().iter().map(|entry| entry.tag)
    }

    pub fn remote_times(&self) -> impl DoubleEndedIterator<Item = TimeTag> + '_ {
        self.remote.entries().iter().map(|entry| entry.tag)
    }

    /// The latest local entry, if any.
    #[must_use]
    pub fn local_last(&self) -> Option<&Entry<L>> {
        self.local.last()
    }

    /// The latest remote entry, if any.
    #[must_use]
    pub fn remote_last(&self) -> Option<&Entry<R>> {
        self.remote.last()
    }

    /// Absolute index of the oldest stored entry on `side`.
    ///
    /// Absolute indices count every entry ever appended, so they stay valid
    /// across compaction.
    #[must_use]
    pub fn first_index(&self, side: Side) -> usize {
        match side {
            Side::Local => self.local.first_index(),
            Side::Remote => self.remote.first_index(),
        }
    }

    /// Marks every entry on `side` strictly before `before` as unneeded.
    ///
    /// Nothing is removed until [`compact`](Self::compact) is called, and
    /// marks never move backward.
    pub fn mark_unneeded(&mut self, side: Side, before: &TimeTag) {
        match side {
            Side::Local => self.local.mark_unneeded(self.direction, before),
            Side::Remote => self.remote.mark_unneeded(self.direction, before),
        }
    }

    /// Marks every entry on `side` before stored position `position` unneeded.
    pub(crate) fn retain_from_position(&mut self, side: Side, position: usize) {
        match side {
            Side::Local => self.local.retain_from_position(position),
            Side::Remote => self.remote.retain_from_position(position),
        }
    }

    /// Reclaims entries marked unneeded.
    pub fn compact(&mut self) {
        let local = self.local.compact();
        let remote = self.remote.compact();
        if local + remote > 0 {
            debug!("compacted boundary history: {local} local, {remote} remote entries");
        }
    }

    /// Drops all samples on both sides and any order override.
    pub fn clear(&mut self) {
        self.local.clear();
        self.remote.clear();
        self.integration_order = None;
    }

    /// The order requested for the next step, if overridden.
    ///
    /// Drivers set this while self-starting, when less history exists than
    /// the stepper's configured order requires.
    #[must_use]
    pub fn integration_order(&self) -> Option<usize> {
        self.integration_order
    }

    pub fn set_integration_order(&mut self, order: Option<usize>) {
        self.integration_order = order;
    }

    /// Returns a memoizing view that evaluates `coupling` on sample pairs.
    pub fn evaluator<'h, C>(&'h self, coupling: &'h C) -> BoundaryEvaluator<'h, L, R, C>
    where
        C: Coupling<L, R>,
    {
        BoundaryEvaluator::new(self, coupling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times<T>(entries: &[Entry<T>]) -> Vec<f64> {
        entries.iter().map(|entry| entry.tag.value()).collect()
    }

    #[test]
    fn sides_are_independent() {
        let mut history = BoundaryHistory::<u8, &str>::default();
        history.local_insert(TimeTag::at(0.0), 1).unwrap();
        history.remote_insert(TimeTag::at(0.0), "a").unwrap();
        history.remote_insert(TimeTag::at(0.5), "b").unwrap();

        assert_eq!(history.local_size(), 1);
        assert_eq!(history.remote_size(), 2);
        assert_eq!(history.remote_last().unwrap().sample, "b");
        assert_eq!(
            history.local_times().map(|t| t.value()).collect::<Vec<_>>(),
            vec![0.0]
        );
    }

    #[test]
    fn non_monotonic_append_leaves_history_unchanged() {
        let mut history = BoundaryHistory::<u8, u8>::default();
        history.remote_insert(TimeTag::at(1.0), 1).unwrap();
        let before = history.clone();

        let err = history.remote_insert(TimeTag::at(0.5), 2).unwrap_err();

        assert_eq!(
            err,
            HistoryError::NonMonotonicAppend {
                side: Side::Remote,
                previous: 1.0,
                attempted: 0.5,
            }
        );
        assert_eq!(history, before);
    }

    #[test]
    fn backward_history_accepts_decreasing_times() {
        let mut history = BoundaryHistory::<u8, u8>::new(EvolutionDirection::Backward);
        history.local_insert(TimeTag::at(1.0), 0).unwrap();
        history.local_insert(TimeTag::at(0.5), 1).unwrap();
        assert!(history.local_insert(TimeTag::at(0.75), 2).is_err());
    }

    #[test]
    fn marks_take_effect_on_compact() {
        let mut history = BoundaryHistory::<u8, u8>::default();
        for (i, t) in [0.0, 1.0, 2.0].into_iter().enumerate() {
            history.local_insert(TimeTag::at(t), i as u8).unwrap();
            history.remote_insert(TimeTag::at(t), i as u8).unwrap();
        }

        history.mark_unneeded(Side::Local, &TimeTag::at(2.0));
        history.mark_unneeded(Side::Remote, &TimeTag::at(1.0));
        assert_eq!(times(history.local()), vec![0.0, 1.0, 2.0]);
        assert_eq!(times(history.local_retained()), vec![2.0]);

        history.compact();
        assert_eq!(times(history.local()), vec![2.0]);
        assert_eq!(times(history.remote()), vec![1.0, 2.0]);
        assert_eq!(history.first_index(Side::Local), 2);
        assert_eq!(history.first_index(Side::Remote), 1);
    }

    #[test]
    fn integration_order_override() {
        let mut history = BoundaryHistory::<u8, u8>::default();
        assert_eq!(history.integration_order(), None);
        history.set_integration_order(Some(2));
        assert_eq!(history.integration_order(), Some(2));
    }

    #[test]
    fn clear_resets_the_order_override() {
        let mut history = BoundaryHistory::<u8, u8>::default();
        history.local_insert(TimeTag::at(0.0), 1).unwrap();
        history.remote_insert(TimeTag::at(0.0), 1).unwrap();
        history.set_integration_order(Some(1));

        history.clear();

        assert_eq!(history.local_size(), 0);
        assert_eq!(history.remote_size(), 0);
        assert_eq!(history.integration_order(), None);
    }

    #[cfg(feature = "serde")]
    fn serialized() -> serde_json::Value {
        let mut history = BoundaryHistory::<u8, u8>::default();
        for (i, t) in [0.0, 1.0, 2.0].into_iter().enumerate() {
            history.local_insert(TimeTag::at(t), i as u8).unwrap();
            history.remote_insert(TimeTag::at(t), i as u8).unwrap();
        }
        history.mark_unneeded(Side::Local, &TimeTag::at(1.0));
        serde_json::to_value(&history).unwrap()
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialization_accepts_valid_histories() {
        let history: BoundaryHistory<u8, u8> = serde_json::from_value(serialized()).unwrap();
        assert_eq!(times(history.local_retained()), vec![1.0, 2.0]);
        assert_eq!(times(history.remote()), vec![0.0, 1.0, 2.0]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialization_rejects_retention_outside_storage() {
        let mut value = serialized();
        value["local"]["compacted"] = serde_json::json!(5);
        assert!(serde_json::from_value::<BoundaryHistory<u8, u8>>(value).is_err());

        let mut value = serialized();
        value["remote"]["retain_from"] = serde_json::json!(4);
        assert!(serde_json::from_value::<BoundaryHistory<u8, u8>>(value).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialization_rejects_unordered_samples() {
        let mut value = serialized();
        value["remote"]["entries"].as_array_mut().unwrap().reverse();
        assert!(serde_json::from_value::<BoundaryHistory<u8, u8>>(value).is_err());

        // Decreasing times are only valid for backward evolution.
        let mut value = serialized();
        value["local"]["entries"].as_array_mut().unwrap().reverse();
        value["remote"]["entries"].as_array_mut().unwrap().reverse();
        value["local"]["retain_from"] = serde_json::json!(0);
        value["direction"] = serde_json::json!("Backward");
        let history: BoundaryHistory<u8, u8> = serde_json::from_value(value).unwrap();
        assert_eq!(times(history.local()), vec![2.0, 1.0, 0.0]);
    }
}
