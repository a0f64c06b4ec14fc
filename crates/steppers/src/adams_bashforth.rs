//! An Nth order Adams–Bashforth stepper with multirate boundary coupling.
//!
//! The stepper advances element-local (volume) data from a history of
//! derivatives, and computes boundary corrections between elements that may
//! be stepping with different, independently chosen step sizes.
//!
//! # Boundary corrections
//!
//! Each interface keeps a [`BoundaryHistory`] of local and remote samples.
//! When both sides stepped in lock-step over the last `k` steps, the correction
//! is an ordinary Adams–Bashforth sum over the coupling at shared times. When
//! they did not, the two time sequences are merged into a union timeline and
//! every local/remote sample pair receives a coefficient built from
//! Adams–Bashforth weights over the union sub-intervals and Lagrange
//! interpolation across the sides. The coupling is only evaluated for pairs
//! with a non-zero coefficient.
//!
//! # Example
//!
//! ```
//! use std::convert::Infallible;
//!
//! use stagger_core::TimeTag;
//! use stagger_steppers::{AdamsBashforth, history::BoundaryHistory};
//!
//! let stepper = AdamsBashforth::new(2)?;
//! let mut history = BoundaryHistory::<f64, f64>::default();
//! for t in [0.0, 1.0] {
//!     history.local_insert(TimeTag::at(t), t)?;
//!     history.remote_insert(TimeTag::at(t), 0.0)?;
//! }
//!
//! let coupling = |local: &f64, remote: &f64| Ok::<_, Infallible>(local - remote);
//! let mut correction = 0.0;
//! stepper.add_boundary_delta(&mut correction, &mut history, 1.0, &coupling)?;
//!
//! // The integral of t from 1 to 2.
//! assert!((correction - 1.5).abs() < 1e-12);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`BoundaryHistory`]: crate::history::BoundaryHistory

mod boundary;
mod config;
mod error;
mod volume;


pub use config::{ConfigError, Order};
pub use error::Error;
pub use volume::StepHistory;

use stagger_core::{EvolutionDirection, Fraction, FractionError, TimeTag};

use crate::history::BoundaryHistory;

/// Largest stable step for each order, relative to forward Euler.
const STABLE_STEP: [f64; 8] = [
    1.0,
    1.0 / 2.0,
    3.0 / 11.0,
    3.0 / 20.0,
    45.0 / 551.0,
    5.0 / 114.0,
    945.0 / 40663.0,
    945.0 / 77432.0,
];

/// An Nth order Adams–Bashforth stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdamsBashforth {
    order: Order,
}

impl AdamsBashforth {
    /// Creates a stepper of the given order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OrderOutOfRange`] unless `1 <= order <= 8`.
    pub fn new(order: usize) -> Result<Self, ConfigError> {
        Ok(Self::from(Order::new(order)?))
    }

    /// The configured convergence order.
    #[must_use]
    pub fn order(&self) -> usize {
        self.order.get()
    }

    /// The order of the embedded error estimate.
    #[must_use]
    pub fn error_estimate_order(&self) -> usize {
        self.order() - 1
    }

    /// Number of past derivative evaluations a full-order step reuses.
    #[must_use]
    pub fn number_of_past_steps(&self) -> usize {
        self.order() - 1
    }

    /// The stable step size factor relative to forward Euler.
    #[must_use]
    pub fn stable_step(&self) -> f64 {
        STABLE_STEP[self.order() - 1]
    }

    /// The tag a step of `step` (as a fraction of the slab) from `current`
    /// lands on.
    ///
    /// Adams–Bashforth takes no substeps, so this is the next step boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if the step would leave `current`'s slab.
    pub fn next_tag(&self, current: &TimeTag, step: Fraction) -> Result<TimeTag, FractionError> {
        current.advanced_by(step)
    }

    /// The order the next boundary step on `history` will use.
    ///
    /// This is the history's explicit integration order when set, and the
    /// configured order otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OrderExceedsConfiguration`] if the explicit order is
    /// above the configured order, or [`Error::InvalidOrder`] if it is zero.
    pub fn boundary_order<L, R>(&self, history: &BoundaryHistory<L, R>) -> Result<usize, Error> {
        match history.integration_order() {
            None => Ok(self.order()),
            Some(requested) if requested > self.order() => Err(Error::OrderExceedsConfiguration {
                requested,
                configured: self.order(),
            }),
            Some(requested) => Ok(Order::new(requested)?.get()),
        }
    }

    /// The reduced order a self-starting driver can use on `history`.
    ///
    /// During the first `k - 1` steps of a simulation fewer than `k` local
    /// samples exist, so the achievable order is capped by what is available.
    #[must_use]
    pub fn self_start_order<L, R>(&self, history: &BoundaryHistory<L, R>) -> usize {
        self.order().min(history.local_size())
    }

    /// Checks that `step` is usable for evolution in `direction`.
    fn check_step(direction: EvolutionDirection, step: f64) -> Result<(), Error> {
        if step.is_finite() && step != 0.0 && EvolutionDirection::of_step(step) == direction {
            Ok(())
        } else {
            Err(Error::InvalidStep(step))
        }
    }
}

impl From<Order> for AdamsBashforth {
    fn from(order: Order) -> Self {
        Self { order }
    }
}
