//! Multirate Adams–Bashforth steppers for local time stepping.
//!
//! Elements of a discretized domain may each take their own step sizes. This
//! crate advances element data and computes the boundary corrections between
//! neighbors whose step boundaries do not line up.
//!
//! - [`AdamsBashforth`]: the stepper, covering volume updates, boundary
//!   corrections, and dense output
//! - [`BoundaryHistory`]: per-interface local and remote samples with lazy
//!   retention
//! - [`coefficients`]: Adams–Bashforth weights for variable step sizes
//! - [`lagrange`]: the interpolation used to reconcile the two sides
//!
//! Sample types and the coupling between them are supplied by the caller
//! through [`stagger_core::Coupling`].

pub mod adams_bashforth;
pub mod coefficients;
pub mod history;
pub mod lagrange;

pub use adams_bashforth::{AdamsBashforth, StepHistory};
pub use history::BoundaryHistory;
