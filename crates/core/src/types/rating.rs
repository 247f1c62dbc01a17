//! Product rating on a 0 to 5 scale.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RatingError {
    /// The input is not a finite number.
    #[error("rating must be a number (got '{0}')")]
    NotANumber(String),
    /// The value is outside `[0, 5]`.
    #[error("rating must be between {min} and {max} (got {value})")]
    OutOfRange {
        /// The rejected value.
        value: f64,
        /// Lowest allowed rating.
        min: f64,
        /// Highest allowed rating.
        max: f64,
    },
}

/// A rating in the closed range `[0, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    /// Lowest allowed rating.
    pub const MIN: f64 = 0.0;
    /// Highest allowed rating.
    pub const MAX: f64 = 5.0;

    /// Create a rating from a number.
    ///
    /// # Errors
    ///
    /// Returns an error for NaN, infinities and values outside `[0, 5]`.
    pub fn new(value: f64) -> Result<Self, RatingError> {
        if !value.is_finite() {
            return Err(RatingError::NotANumber(value.to_string()));
        }
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(RatingError::OutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    /// Parse a rating from user input. Blank input is the default rating of 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a number or out of range.
    pub fn parse(s: &str) -> Result<Self, RatingError> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }
        let value: f64 = s
            .parse()
            .map_err(|_| RatingError::NotANumber(s.to_owned()))?;
        Self::new(value)
    }

    /// The numeric value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Rating {
    type Error = RatingError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}
