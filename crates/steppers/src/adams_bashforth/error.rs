use std::error::Error as StdError;

use thiserror::Error;

use crate::history::Side;

use super::ConfigError;

/// Errors that can occur while taking an Adams–Bashforth step.
///
/// All of these indicate a coordination problem in the calling driver. None
/// are retried, and a failed call leaves the history unmodified.
#[derive(Debug, Error)]
pub enum Error {
    #[error("insufficient {side} history: have {have} samples, need {need}")]
    InsufficientHistory { side: Side, have: usize, need: usize },

    #[error("remote history at t={latest} is not before the end time t={end}")]
    HistoryNotYetArrived { latest: f64, end: f64 },

    #[error("requested order {requested} exceeds the configured order {configured}")]
    OrderExceedsConfiguration { requested: usize, configured: usize },

    #[error("dense output time {time} is not after the step start {start}")]
    DenseOutputOutOfRange { time: f64, start: f64 },

    #[error("step size {0} is zero, non-finite, or against the evolution direction")]
    InvalidStep(f64),

    #[error("invalid order: {0}")]
    InvalidOrder(#[from] ConfigError),

    #[error("coupling evaluation failed")]
    Coupling(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn coupling<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Coupling(Box::new(err))
    }
}
