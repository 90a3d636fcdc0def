use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Lowest rating a user can give to an item
pub const MIN_RATING: f64 = 1.0;
/// Highest rating a user can give to an item
pub const MAX_RATING: f64 = 5.0;
/// Sentinel for "not rated"
pub const UNRATED: f64 = 0.0;

/// A user's ratings over every item, `0.0` meaning unrated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RatingVector {
    data: Vec<f64>,
}

impl RatingVector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f64]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Number of items with a non-zero rating
    #[inline]
    pub fn rated_count(&self) -> usize {
        rated_count(&self.data)
    }

    /// Number of items still unrated
    #[inline]
    pub fn unrated_count(&self) -> usize {
        self.data.len() - self.rated_count()
    }

    /// Column indices of unrated items, ascending
    pub fn unrated_indices(&self) -> Vec<usize> {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &value)| value == UNRATED)
            .map(|(index, _)| index)
            .collect()
    }

    /// Check that the vector has `expected_dim` entries, each finite and in `[0, 5]`.
    pub fn validate(&self, expected_dim: usize) -> Result<()> {
        if self.dim() != expected_dim {
            return Err(Error::DimensionMismatch {
                expected: expected_dim,
                actual: self.dim(),
            });
        }

        for (index, &value) in self.data.iter().enumerate() {
            if !is_valid_rating(value) {
                return Err(Error::InvalidRating { index, value });
            }
        }

        Ok(())
    }
}

impl From<Vec<f64>> for RatingVector {
    fn from(data: Vec<f64>) -> Self {
        Self::new(data)
    }
}

#[inline]
pub(crate) fn is_valid_rating(value: f64) -> bool {
    value.is_finite() && (UNRATED..=MAX_RATING).contains(&value)
}

#[inline]
pub(crate) fn is_rated(value: f64) -> bool {
    value != UNRATED
}

#[inline]
pub(crate) fn rated_count(values: &[f64]) -> usize {
    values.iter().filter(|&&v| is_rated(v)).count()
}
