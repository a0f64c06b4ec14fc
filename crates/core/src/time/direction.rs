use std::cmp::Ordering;

use super::TimeLike;

/// The direction simulated time advances in.
///
/// Every ordering comparison within one integration goes through a single
/// direction, so "earlier" and "later" mean the same thing on both sides of an
/// interface even when evolving backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvolutionDirection {
    #[default]
    Forward,
    Backward,
}

impl EvolutionDirection {
    /// Returns the direction implied by the sign of a step.
    #[must_use]
    pub fn of_step(step: f64) -> Self {
        if step < 0.0 {
            Self::Backward
        } else {
            Self::Forward
        }
    }

    #[must_use]
    pub fn is_forward(self) -> bool {
        self == Self::Forward
    }

    /// Compares two times in evolution order.
    #[must_use]
    pub fn cmp<A, B>(self, a: &A, b: &B) -> Ordering
    where
        A: TimeLike + ?Sized,
        B: TimeLike + ?Sized,
    {
        // Adding zero folds -0.0 into +0.0 so both compare equal.
        let ordering = (a.value() + 0.0).total_cmp(&(b.value() + 0.0));
        match self {
            Self::Forward => ordering,
            Self::Backward => ordering.reverse(),
        }
    }

    /// Returns `true` if `a` comes strictly before `b` in evolution order.
    #[must_use]
    pub fn less<A, B>(self, a: &A, b: &B) -> bool
    where
        A: TimeLike + ?Sized,
        B: TimeLike + ?Sized,
    {
        self.cmp(a, b) == Ordering::Less
    }

    /// Returns `true` if the times are sorted strictly in evolution order.
    #[must_use]
    pub fn is_strictly_sorted<T: TimeLike>(self, times: &[T]) -> bool {
        times.windows(2).all(|pair| self.less(&pair[0], &pair[1]))
    }
}
