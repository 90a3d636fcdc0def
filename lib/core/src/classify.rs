//! Behavioral segmentation of a candidate from its neighborhood.
//!
//! Two neighborhood statistics drive the label: the mean of all ratings the
//! neighbors gave (rated cells only) and the average number of items each
//! neighbor rated.

use serde::Serialize;

use crate::matrix::mean_and_std;
use crate::neighbors::{find_k_neighbors, NeighborSet};
use crate::vector::{is_rated, rated_count};
use crate::{RatingMatrix, RatingVector, Result};

/// Mean neighborhood rating at or above which a neighborhood is "high"
pub const HIGH_RATING_THRESHOLD: f64 = 4.0;
/// Mean neighborhood rating at or above which a neighborhood is "moderate"
pub const MODERATE_RATING_THRESHOLD: f64 = 3.0;
/// Average rated items per neighbor strictly above which a neighborhood is "active"
pub const ACTIVE_ITEMS_THRESHOLD: f64 = 100.0;

/// User segment derived from a neighborhood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    /// High ratings, active
    Enthusiasts,
    /// High ratings, casual
    #[serde(rename = "Positive Selectives")]
    PositiveSelectives,
    /// Moderate ratings, active
    #[serde(rename = "Active Moderates")]
    ActiveModerates,
    /// Moderate ratings, casual
    #[serde(rename = "Casual Moderates")]
    CasualModerates,
    /// Low ratings, active
    Critics,
    /// Low ratings, casual
    Explorers,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Enthusiasts,
        Category::PositiveSelectives,
        Category::ActiveModerates,
        Category::CasualModerates,
        Category::Critics,
        Category::Explorers,
    ];

    /// Decision table over mean rating and activity
    pub fn from_stats(mean_rating: f64, mean_rated_items: f64) -> Self {
        let active = mean_rated_items > ACTIVE_ITEMS_THRESHOLD;

        if mean_rating >= HIGH_RATING_THRESHOLD {
            if active {
                Category::Enthusiasts
            } else {
                Category::PositiveSelectives
            }
        } else if mean_rating >= MODERATE_RATING_THRESHOLD {
            if active {
                Category::ActiveModerates
            } else {
                Category::CasualModerates
            }
        } else if active {
            Category::Critics
        } else {
            Category::Explorers
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Enthusiasts => "Enthusiasts",
            Category::PositiveSelectives => "Positive Selectives",
            Category::ActiveModerates => "Active Moderates",
            Category::CasualModerates => "Casual Moderates",
            Category::Critics => "Critics",
            Category::Explorers => "Explorers",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Category and the neighborhood statistics it was derived from
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClassificationResult {
    pub category: Category,
    /// Neighbor row indices, most similar first
    pub neighbor_indices: Vec<usize>,
    /// Similarities, parallel to `neighbor_indices`
    pub similarities: Vec<f64>,
    /// Mean of every rated cell across the neighbors
    pub mean_rating: f64,
    /// Population standard deviation of the same cells
    pub rating_std_dev: f64,
    /// Average number of rated items per neighbor
    pub mean_rated_items: f64,
    pub mean_similarity: f64,
}

/// Classify `candidate` from its `k` nearest neighbors in `matrix`.
///
/// # Errors
/// Same as [`find_k_neighbors`].
pub fn classify(
    candidate: &RatingVector,
    matrix: &RatingMatrix,
    k: usize,
) -> Result<ClassificationResult> {
    let neighbors = find_k_neighbors(candidate, matrix, k)?;
    classify_with_neighbors(matrix, &neighbors)
}

/// Classify from an already computed neighbor set.
pub fn classify_with_neighbors(
    matrix: &RatingMatrix,
    neighbors: &NeighborSet,
) -> Result<ClassificationResult> {
    neighbors.check_bounds(matrix)?;

    let pooled: Vec<f64> = neighbors
        .indices()
        .iter()
        .flat_map(|&user| matrix.row(user).iter().copied())
        .filter(|&value| is_rated(value))
        .collect();
    let (mean_rating, rating_std_dev) = mean_and_std(&pooled);

    let mean_rated_items = if neighbors.is_empty() {
        0.0
    } else {
        let total: usize = neighbors
            .indices()
            .iter()
            .map(|&user| rated_count(matrix.row(user)))
            .sum();
        total as f64 / neighbors.len() as f64
    };

    Ok(ClassificationResult {
        category: Category::from_stats(mean_rating, mean_rated_items),
        neighbor_indices: neighbors.indices().to_vec(),
        similarities: neighbors.similarities().to_vec(),
        mean_rating,
        rating_std_dev,
        mean_rated_items,
        mean_similarity: neighbors.mean_similarity(),
    })
}
