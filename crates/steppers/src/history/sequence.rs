use stagger_core::{EvolutionDirection, TimeTag};

use super::{Entry, HistoryError, Side};

/// One side's time-ordered samples.
///
/// Entries live in an append-only `Vec`. Marking entries unneeded only moves a
/// logical retention index; memory is reclaimed by [`Sequence::compact`].
/// Absolute indices (position plus the number of compacted entries) stay
/// stable for an entry's whole lifetime.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        try_from = "SequenceParts<T>",
        bound(deserialize = "T: serde::Deserialize<'de>")
    )
)]
pub(crate) struct Sequence<T> {
    entries: Vec<Entry<T>>,
    compacted: usize,
    retain_from: usize,
}

/// Unvalidated form of a [`Sequence`] as it appears in serialized data.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
pub(crate) struct SequenceParts<T> {
    entries: Vec<Entry<T>>,
    compacted: usize,
    retain_from: usize,
}

#[cfg(feature = "serde")]
impl<T> TryFrom<SequenceParts<T>> for Sequence<T> {
    type Error = HistoryError;

    fn try_from(parts: SequenceParts<T>) -> Result<Self, Self::Error> {
        let SequenceParts {
            entries,
            compacted,
            retain_from,
        } = parts;
        if retain_from < compacted || retain_from - compacted > entries.len() {
            return Err(HistoryError::InvalidRetention {
                compacted,
                retain_from,
                len: entries.len(),
            });
        }
        Ok(Self {
            entries,
            compacted,
            retain_from,
        })
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            compacted: 0,
            retain_from: 0,
        }
    }
}

impl<T> Sequence<T> {
    /// Appends a sample, enforcing strict monotonicity in `direction`.
    pub(crate) fn push(
        &mut self,
        side: Side,
        direction: EvolutionDirection,
        tag: TimeTag,
        sample: T,
    ) -> Result<(), HistoryError> {
        if let Some(last) = self.entries.last() {
            if !direction.less(&last.tag, &tag) {
                return Err(HistoryError::NonMonotonicAppend {
                    side,
                    previous: last.tag.value(),
                    attempted: tag.value(),
                });
            }
        }
        self.entries.push(Entry::new(tag, sample));
        Ok(())
    }

    /// Checks that stored tags increase strictly in `direction`.
    pub(crate) fn check_order(
        &self,
        side: Side,
        direction: EvolutionDirection,
    ) -> Result<(), HistoryError> {
        let times: Vec<TimeTag> = self.entries.iter().map(|entry| entry.tag).collect();
        if direction.is_strictly_sorted(&times) {
            return Ok(());
        }
        let (previous, attempted) = times
            .windows(2)
            .find(|pair| !direction.less(&pair[0], &pair[1]))
            .map_or((f64::NAN, f64::NAN), |pair| (pair[0].value(), pair[1].value()));
        Err(HistoryError::NonMonotonicAppend {
            side,
            previous,
            attempted,
        })
    }

    pub(crate) fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn last(&self) -> Option<&Entry<T>> {
        self.entries.last()
    }

    /// Entries that have not been marked unneeded.
    pub(crate) fn retained(&self) -> &[Entry<T>] {
        &self.entries[self.retain_from - self.compacted..]
    }

    /// Absolute index of the first stored entry.
    pub(crate) fn first_index(&self) -> usize {
        self.compacted
    }

    /// Marks every entry strictly before `before` as unneeded.
    pub(crate) fn mark_unneeded(&mut self, direction: EvolutionDirection, before: &TimeTag) {
        let position = self
            .entries
            .partition_point(|entry| direction.less(&entry.tag, before));
        self.retain_from_position(position);
    }

    /// Marks every entry before the stored position as unneeded.
    ///
    /// Marks only ever move forward.
    pub(crate) fn retain_from_position(&mut self, position: usize) {
        let position = position.min(self.entries.len());
        self.retain_from = self.retain_from.max(self.compacted + position);
    }

    /// Number of entries marked unneeded but not yet reclaimed.
    pub(crate) fn unneeded(&self) -> usize {
        self.retain_from - self.compacted
    }

    /// Drops unneeded entries, returning how many were removed.
    pub(crate) fn compact(&mut self) -> usize {
        let removed = self.unneeded();
        self.entries.drain(..removed);
        self.compacted = self.retain_from;
        removed
    }

    pub(crate) fn clear(&mut self) {
        self.compacted += self.entries.len();
        self.retain_from = self.compacted;
        self.entries.clear();
    }
}
