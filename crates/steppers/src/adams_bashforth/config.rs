use thiserror::Error;

use crate::coefficients::MAXIMUM_ORDER;

/// A validated Adams–Bashforth order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "usize", into = "usize")
)]
pub struct Order(usize);

/// Errors that can occur when validating stepper configuration.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("order must be between 1 and 8, got {0}")]
    OrderOutOfRange(usize),
}

impl Default for Order {
    fn default() -> Self {
        Self(3)
    }
}

impl Order {
    /// Creates a validated order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OrderOutOfRange`] unless `1 <= order <= 8`.
    pub fn new(order: usize) -> Result<Self, ConfigError> {
        if (1..=MAXIMUM_ORDER).contains(&order) {
            Ok(Self(order))
        } else {
            Err(ConfigError::OrderOutOfRange(order))
        }
    }

    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for Order {
    type Error = ConfigError;

    fn try_from(order: usize) -> Result<Self, Self::Error> {
        Self::new(order)
    }
}

impl From<Order> for usize {
    fn from(order: Order) -> Self {
        order.0
    }
}
