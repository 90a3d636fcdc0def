//! User-based collaborative filtering scores for unrated items.
//!
//! For an item the candidate has not rated, the neighbors who did rate it
//! (the voting subset) contribute their rating weighted by their similarity:
//!
//! ```text
//! score = Σ rating·similarity / Σ similarity      (voting subset only)
//! ```
//!
//! If the voting subset's similarities sum to exactly zero the plain mean of
//! its ratings is used instead. An item nobody in the neighborhood rated
//! scores `0.0`.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::neighbors::{check_dimension, find_k_neighbors, NeighborSet};
use crate::vector::is_rated;
use crate::{RatingMatrix, RatingVector, Result};

/// A predicted score for one unrated item
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    /// Item label
    pub item: String,
    /// Column of the item in the rating matrix
    pub item_index: usize,
    pub predicted_score: f64,
    /// Neighbors who rated this item
    pub voter_count: usize,
    /// Unweighted mean of the voters' ratings, `0.0` without voters
    pub mean_neighbor_rating: f64,
}

#[derive(Debug, Default)]
struct Vote {
    weighted_sum: f64,
    similarity_sum: f64,
    rating_sum: f64,
    voters: usize,
}

impl Vote {
    fn tally(neighbors: &NeighborSet, matrix: &RatingMatrix, item: usize) -> Self {
        let mut vote = Vote::default();
        for (user, similarity) in neighbors.iter() {
            let rating = matrix.row(user)[item];
            if is_rated(rating) {
                vote.weighted_sum += rating * similarity;
                vote.similarity_sum += similarity;
                vote.rating_sum += rating;
                vote.voters += 1;
            }
        }
        vote
    }

    fn mean_rating(&self) -> f64 {
        if self.voters == 0 {
            0.0
        } else {
            self.rating_sum / self.voters as f64
        }
    }

    fn predicted_score(&self) -> f64 {
        if self.voters == 0 {
            0.0
        } else if self.similarity_sum == 0.0 {
            self.mean_rating()
        } else {
            self.weighted_sum / self.similarity_sum
        }
    }
}

/// Recommend up to `n` items the candidate has not rated, using its `k`
/// nearest neighbors in `matrix`.
///
/// Item labels come from [`RatingMatrix::item_labels`]. Results are ordered by
/// non-increasing predicted score, ties by ascending item index. A candidate
/// with no unrated items gets an empty list.
///
/// # Errors
/// Same as [`find_k_neighbors`].
pub fn recommend(
    candidate: &RatingVector,
    matrix: &RatingMatrix,
    k: usize,
    n: usize,
) -> Result<Vec<Recommendation>> {
    let neighbors = find_k_neighbors(candidate, matrix, k)?;
    recommend_with_neighbors(candidate, matrix, &neighbors, n)
}

/// Recommend from an already computed neighbor set.
pub fn recommend_with_neighbors(
    candidate: &RatingVector,
    matrix: &RatingMatrix,
    neighbors: &NeighborSet,
    n: usize,
) -> Result<Vec<Recommendation>> {
    check_dimension(candidate, matrix)?;
    neighbors.check_bounds(matrix)?;

    let mut scored: Vec<(usize, Vote)> = candidate
        .unrated_indices()
        .into_iter()
        .map(|item| (item, Vote::tally(neighbors, matrix, item)))
        .collect();

    // sort_by_key is stable: equal scores stay in item order
    scored.sort_by_key(|(_, vote)| Reverse(OrderedFloat(vote.predicted_score())));
    scored.truncate(n);

    let labels = matrix.item_labels();
    Ok(scored
        .into_iter()
        .map(|(item, vote)| Recommendation {
            item: labels[item].clone(),
            item_index: item,
            predicted_score: vote.predicted_score(),
            voter_count: vote.voters,
            mean_neighbor_rating: vote.mean_rating(),
        })
        .collect())
}
