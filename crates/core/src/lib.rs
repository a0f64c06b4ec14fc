//! Core traits and types for the Stagger multirate time-stepping framework.
//!
//! This crate defines the shared abstractions that the steppers build on:
//!
//! - [`TimeTag`]: an exact point in simulated time, ordered through an
//!   [`EvolutionDirection`]
//! - [`TimeLike`]: anything with a real time coordinate, including
//!   [`ApproximateTime`] for dense output
//! - [`EndTime`]: the end of an integration interval, exact ([`StepEnd`]) or
//!   approximate
//! - [`VectorSpace`]: correction values accumulated through weighted sums
//! - [`Coupling`]: the opaque physical coupling between two interface samples

mod coupling;
pub mod time;
mod vector_space;

pub use coupling::Coupling;
pub use time::{
    ApproximateTime, EndTime, EvolutionDirection, Fraction, FractionError, Slab, SlabError,
    StepEnd, TimeLike, TimeTag,
};
pub use vector_space::VectorSpace;
