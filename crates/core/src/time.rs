//! Points in simulated time.
//!
//! A [`TimeTag`] identifies a step boundary as an exact fractional position
//! within a [`Slab`]. Tags reduce to a real coordinate through
//! [`TimeTag::value`], and all ordering goes through an
//! [`EvolutionDirection`] so that the same code handles forward and backward
//! evolution.
//!
//! Dense output needs to integrate up to times that are not step boundaries.
//! The [`TimeLike`] trait abstracts over both representations, letting one
//! algorithm accept either a [`TimeTag`] or an [`ApproximateTime`] as the end
//! of an integration, and [`EndTime`] measures sub-intervals against it.

mod direction;
mod fraction;
mod slab;

use std::{cmp::Ordering, fmt};

pub use direction::EvolutionDirection;
pub use fraction::{Fraction, FractionError};
pub use slab::{Slab, SlabError};

/// Anything that can be located on the real time axis.
pub trait TimeLike {
    /// Returns the real-valued time coordinate.
    fn value(&self) -> f64;
}

impl TimeLike for f64 {
    fn value(&self) -> f64 {
        *self
    }
}

/// The end of an integration interval.
///
/// Integrators measure every sub-interval against the end time through
/// [`EndTime::since`], which lets an exact representation avoid rounding when
/// the interval starts at a known tag.
pub trait EndTime: TimeLike {
    /// Returns the signed duration from `tag` to this end time.
    fn since(&self, tag: &TimeTag) -> f64 {
        self.value() - tag.value()
    }
}

/// A step boundary: an exact fractional position within a slab.
///
/// Tags compare by their real coordinate, so the end of one slab and the start
/// of the next denote the same instant. The slab's orientation serves as a
/// direction hint.
///
/// Comparison is exact floating-point equality of the coordinates. Two sides
/// of an interface only recognize a shared boundary when both build its tag
/// from the same slab and fraction, or from the same `f64`.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeTag {
    slab: Slab,
    fraction: Fraction,
}

impl TimeTag {
    /// Creates a tag at `fraction` of the way through `slab`.
    #[must_use]
    pub fn new(slab: Slab, fraction: Fraction) -> Self {
        Self { slab, fraction }
    }

    /// Creates a tag at the start of `slab`.
    #[must_use]
    pub fn slab_start(slab: Slab) -> Self {
        Self::new(slab, Fraction::ZERO)
    }

    /// Creates a tag at the end of `slab`.
    #[must_use]
    pub fn slab_end(slab: Slab) -> Self {
        Self::new(slab, Fraction::ONE)
    }

    /// Creates a tag for an isolated instant.
    ///
    /// The tag lives at the start of a degenerate slab, which is convenient
    /// when the caller tracks times as plain floats.
    ///
    /// Tags made this way equal each other only when the floats are
    /// bit-for-bit equal, so `at(0.1 + 0.2)` and `at(0.3)` are distinct
    /// times. Callers whose elements share step boundaries should derive the
    /// shared tags from one [`Slab`] with [`TimeTag::new`] or
    /// [`TimeTag::advanced_by`].
    ///
    /// # Panics
    ///
    /// Panics if `value` is not finite.
    #[must_use]
    pub fn at(value: f64) -> Self {
        assert!(value.is_finite(), "time must be finite, got {value}");
        Self::slab_start(Slab::instant(value))
    }

    /// Returns the tag `step` further through the same slab.
    ///
    /// # Errors
    ///
    /// Returns an error if the result would lie past the end of the slab.
    pub fn advanced_by(&self, step: Fraction) -> Result<Self, FractionError> {
        Ok(Self::new(self.slab, self.fraction.checked_add(step)?))
    }

    #[must_use]
    pub fn slab(&self) -> Slab {
        self.slab
    }

    #[must_use]
    pub fn fraction(&self) -> Fraction {
        self.fraction
    }

    /// The direction hint carried by the tag's slab.
    #[must_use]
    pub fn direction(&self) -> EvolutionDirection {
        self.slab.direction()
    }

    /// Returns the real-valued time coordinate.
    ///
    /// Slab endpoints map exactly to the slab bounds, avoiding rounding in
    /// `start + 1 * (end - start)`.
    #[must_use]
    pub fn value(&self) -> f64 {
        if self.fraction.is_zero() {
            self.slab.start()
        } else if self.fraction.is_one() {
            self.slab.end()
        } else {
            self.slab.start() + self.fraction.as_f64() * self.slab.duration()
        }
    }
}

impl TimeLike for TimeTag {
    fn value(&self) -> f64 {
        TimeTag::value(self)
    }
}

impl PartialEq for TimeTag {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimeTag {}

impl PartialOrd for TimeTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeTag {
    /// Natural (forward) order; use [`EvolutionDirection::cmp`] when the
    /// evolution direction matters.
    fn cmp(&self, other: &Self) -> Ordering {
        EvolutionDirection::Forward.cmp(self, other)
    }
}

impl fmt::Display for TimeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl EndTime for TimeTag {}

/// The end of a step of known size taken from a tag.
///
/// The duration from the step's own start is the step size itself, with no
/// round trip through `start + step - start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepEnd {
    start: TimeTag,
    step: f64,
}

impl StepEnd {
    #[must_use]
    pub fn new(start: TimeTag, step: f64) -> Self {
        Self { start, step }
    }

    #[must_use]
    pub fn start(&self) -> TimeTag {
        self.start
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }
}

impl TimeLike for StepEnd {
    fn value(&self) -> f64 {
        self.start.value() + self.step
    }
}

impl EndTime for StepEnd {
    fn since(&self, tag: &TimeTag) -> f64 {
        if *tag == self.start {
            self.step
        } else {
            self.value() - tag.value()
        }
    }
}

/// A time that is not necessarily a step boundary, used for dense output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateTime(pub f64);

impl TimeLike for ApproximateTime {
    fn value(&self) -> f64 {
        self.0
    }
}

impl EndTime for ApproximateTime {}

impl fmt::Display for ApproximateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
