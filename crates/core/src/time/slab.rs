use thiserror::Error;

use super::EvolutionDirection;

/// A contiguous span of simulated time that elements subdivide into steps.
///
/// A slab whose `end` precedes its `start` runs backward in time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slab {
    start: f64,
    end: f64,
}

/// Errors that can occur when constructing a [`Slab`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SlabError {
    #[error("slab bounds must be finite, got [{start}, {end}]")]
    NotFinite { start: f64, end: f64 },
}

impl Slab {
    /// Creates a slab spanning `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns [`SlabError::NotFinite`] if either bound is NaN or infinite.
    pub fn new(start: f64, end: f64) -> Result<Self, SlabError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(SlabError::NotFinite { start, end });
        }
        Ok(Self { start, end })
    }

    /// A zero-length slab at a single instant.
    pub(super) fn instant(value: f64) -> Self {
        Self {
            start: value,
            end: value,
        }
    }

    /// Creates a slab of the given signed duration beginning at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`SlabError::NotFinite`] if the resulting bounds are not finite.
    pub fn with_duration(start: f64, duration: f64) -> Result<Self, SlabError> {
        Self::new(start, start + duration)
    }

    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Signed duration, negative for backward slabs.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// The direction this slab runs in.
    ///
    /// Degenerate slabs are treated as forward.
    #[must_use]
    pub fn direction(&self) -> EvolutionDirection {
        if self.end < self.start {
            EvolutionDirection::Backward
        } else {
            EvolutionDirection::Forward
        }
    }

    /// The slab immediately following this one with the same duration.
    ///
    /// # Errors
    ///
    /// Returns [`SlabError::NotFinite`] if the advanced bounds overflow.
    pub fn advance(&self) -> Result<Self, SlabError> {
        Self::with_duration(self.end, self.duration())
    }
}
