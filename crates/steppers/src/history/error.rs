use thiserror::Error;

use super::Side;

/// Errors that can occur when recording history.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum HistoryError {
    #[error(
        "{side} sample at t={attempted} is not after the previous sample at t={previous}"
    )]
    NonMonotonicAppend {
        side: Side,
        previous: f64,
        attempted: f64,
    },

    #[error(
        "retention index {retain_from} is outside the {len} stored entries after {compacted} compacted ones"
    )]
    InvalidRetention {
        compacted: usize,
        retain_from: usize,
        len: usize,
    },
}
