use std::fmt;

use thiserror::Error;

/// An exact position within a slab, as a reduced fraction in `[0, 1]`.
///
/// Keeping positions rational means that two elements stepping through the
/// same slab agree exactly on shared step boundaries, which is what allows
/// equal-time detection between the two sides of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "FractionParts")
)]
pub struct Fraction {
    numerator: u64,
    denominator: u64,
}

/// Unvalidated form of a [`Fraction`] as it appears in serialized data.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct FractionParts {
    numerator: u64,
    denominator: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<FractionParts> for Fraction {
    type Error = FractionError;

    fn try_from(parts: FractionParts) -> Result<Self, Self::Error> {
        Self::new(parts.numerator, parts.denominator)
    }
}

/// Errors that can occur when constructing a [`Fraction`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FractionError {
    #[error("denominator must be non-zero")]
    ZeroDenominator,

    #[error("fraction {numerator}/{denominator} is greater than one")]
    GreaterThanOne { numerator: u64, denominator: u64 },

    #[error("fraction does not fit in 64-bit terms")]
    Overflow,
}

impl Fraction {
    /// The start of a slab.
    pub const ZERO: Self = Self {
        numerator: 0,
        denominator: 1,
    };

    /// The end of a slab.
    pub const ONE: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    /// Creates a reduced fraction.
    ///
    /// # Errors
    ///
    /// Returns an error if the denominator is zero or the fraction exceeds one.
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, FractionError> {
        if denominator == 0 {
            return Err(FractionError::ZeroDenominator);
        }
        if numerator > denominator {
            return Err(FractionError::GreaterThanOne {
                numerator,
                denominator,
            });
        }

        let divisor = gcd(numerator, denominator);
        Ok(Self {
            numerator: numerator / divisor,
            denominator: denominator / divisor,
        })
    }

    /// Returns `self + other`.
    ///
    /// # Errors
    ///
    /// Returns [`FractionError::GreaterThanOne`] if the sum lies past the end
    /// of the slab and [`FractionError::Overflow`] if its reduced terms do not
    /// fit in a `u64`.
    pub fn checked_add(self, other: Self) -> Result<Self, FractionError> {
        let numerator = u128::from(self.numerator) * u128::from(other.denominator)
            + u128::from(other.numerator) * u128::from(self.denominator);
        let denominator = u128::from(self.denominator) * u128::from(other.denominator);
        let divisor = wide_gcd(numerator, denominator);

        let numerator = u64::try_from(numerator / divisor).map_err(|_| FractionError::Overflow)?;
        let denominator =
            u64::try_from(denominator / divisor).map_err(|_| FractionError::Overflow)?;
        Self::new(numerator, denominator)
    }

    #[must_use]
    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    #[must_use]
    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    /// Returns the fraction as a float.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    #[must_use]
    pub fn is_one(&self) -> bool {
        self.numerator == self.denominator
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn wide_gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
