//! Exact k-nearest-neighbor search over a [`RatingMatrix`].
//!
//! Every user is scored against the candidate, then all users are ranked by
//! similarity, highest first. The ranking is a stable sort, so users with equal
//! similarity stay in ascending row order.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::{Error, RatingMatrix, RatingVector, Result};

/// The k users most similar to a candidate, most similar first.
///
/// `indices[i]` and `similarities[i]` describe the same neighbor.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NeighborSet {
    indices: Vec<usize>,
    similarities: Vec<f64>,
}

impl NeighborSet {
    /// Build a neighbor set from `(row index, similarity)` pairs, kept in the given order.
    pub fn from_pairs(pairs: Vec<(usize, f64)>) -> Self {
        let (indices, similarities) = pairs.into_iter().unzip();
        Self { indices, similarities }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    #[inline]
    pub fn similarities(&self) -> &[f64] {
        &self.similarities
    }

    /// `(row index, similarity)` pairs in rank order
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.similarities.iter().copied())
    }

    /// Mean similarity across the set, `0.0` when empty
    pub fn mean_similarity(&self) -> f64 {
        if self.similarities.is_empty() {
            return 0.0;
        }
        self.similarities.iter().sum::<f64>() / self.similarities.len() as f64
    }

    /// Check every index refers to a row of `matrix`
    pub(crate) fn check_bounds(&self, matrix: &RatingMatrix) -> Result<()> {
        match self.indices.iter().find(|&&index| index >= matrix.n_users()) {
            Some(&index) => Err(Error::NeighborOutOfRange {
                index,
                users: matrix.n_users(),
            }),
            None => Ok(()),
        }
    }
}

/// Check `candidate` has one rating per item of `matrix`
pub(crate) fn check_dimension(candidate: &RatingVector, matrix: &RatingMatrix) -> Result<()> {
    if candidate.dim() != matrix.n_items() {
        return Err(Error::DimensionMismatch {
            expected: matrix.n_items(),
            actual: candidate.dim(),
        });
    }
    Ok(())
}

/// Check `1 <= k <= n_users`
pub fn check_k(k: usize, matrix: &RatingMatrix) -> Result<()> {
    if k == 0 || k > matrix.n_users() {
        return Err(Error::InvalidK {
            k: i64::try_from(k).unwrap_or(i64::MAX),
            max: matrix.n_users(),
        });
    }
    Ok(())
}

/// Find the `k` users of `matrix` most cosine-similar to `candidate`.
///
/// Returns exactly `k` neighbors ordered by non-increasing similarity, ties
/// broken by ascending row index.
///
/// # Errors
/// [`Error::DimensionMismatch`] if the candidate length differs from the item
/// count, [`Error::InvalidK`] if `k` is zero or exceeds the user count.
pub fn find_k_neighbors(
    candidate: &RatingVector,
    matrix: &RatingMatrix,
    k: usize,
) -> Result<NeighborSet> {
    check_dimension(candidate, matrix)?;
    check_k(k, matrix)?;

    let mut ranked: Vec<(usize, f64)> = matrix
        .similarities_to(candidate.as_slice())
        .into_iter()
        .enumerate()
        .collect();

    // sort_by_key is stable
    ranked.sort_by_key(|&(_, similarity)| Reverse(OrderedFloat(similarity)));
    ranked.truncate(k);

    Ok(NeighborSet::from_pairs(ranked))
}
