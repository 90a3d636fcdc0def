use rayon::prelude::*;
use serde::Serialize;

use crate::simd::{dot_product_simd, norm_simd};
use crate::similarity::cosine_from_parts;
use crate::vector::{is_rated, is_valid_rating, rated_count, MAX_RATING, MIN_RATING};
use crate::{Error, Result};

/// Dense users x items rating matrix, `0.0` meaning unrated.
///
/// Rows are stored contiguously, row-major. Row norms are computed once at
/// construction so a neighbor scan only needs one dot product per user.
/// The matrix is immutable after construction and safe to share across threads.
#[derive(Debug, Clone)]
pub struct RatingMatrix {
    item_labels: Vec<String>,
    data: Vec<f64>,
    norms: Vec<f64>,
    n_users: usize,
    n_items: usize,
}

impl RatingMatrix {
    /// Build a matrix from item labels and one rating row per user.
    ///
    /// Every row must have exactly one rating per label, each finite
    /// and within `[0, 5]`.
    pub fn new(item_labels: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_items = item_labels.len();
        let n_users = rows.len();

        if n_items == 0 || n_users == 0 {
            return Err(Error::EmptyMatrix);
        }

        let mut data = Vec::with_capacity(n_users * n_items);
        for (row, ratings) in rows.into_iter().enumerate() {
            if ratings.len() != n_items {
                return Err(Error::RaggedRow {
                    row,
                    expected: n_items,
                    actual: ratings.len(),
                });
            }
            data.extend(ratings);
        }

        Self::from_parts(item_labels, data, n_users)
    }

    /// Build a matrix from a flat row-major buffer.
    pub fn from_flat(item_labels: Vec<String>, data: Vec<f64>, n_users: usize) -> Result<Self> {
        let n_items = item_labels.len();
        if n_items == 0 || n_users == 0 {
            return Err(Error::EmptyMatrix);
        }
        if data.len() != n_items * n_users {
            return Err(Error::BufferLength {
                expected: n_items * n_users,
                actual: data.len(),
            });
        }
        Self::from_parts(item_labels, data, n_users)
    }

    fn from_parts(item_labels: Vec<String>, data: Vec<f64>, n_users: usize) -> Result<Self> {
        let n_items = item_labels.len();
        if let Some((cell, &value)) = data.iter().enumerate().find(|(_, v)| !is_valid_rating(**v)) {
            return Err(Error::InvalidCell {
                user: cell / n_items,
                item: cell % n_items,
                value,
            });
        }

        let norms = data.chunks_exact(n_items).map(norm_simd).collect();
        Ok(Self {
            item_labels,
            data,
            norms,
            n_users,
            n_items,
        })
    }

    #[inline]
    pub fn n_users(&self) -> usize {
        self.n_users
    }

    #[inline]
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    #[inline]
    pub fn item_labels(&self) -> &[String] {
        &self.item_labels
    }

    /// Ratings of one user.
    ///
    /// # Panics
    /// If `user >= n_users()`.
    #[inline]
    pub fn row(&self, user: usize) -> &[f64] {
        let start = user * self.n_items;
        &self.data[start..start + self.n_items]
    }

    /// Iterate over user rows in index order
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.n_items)
    }

    /// Cosine similarity of `candidate` against every user, in row order.
    ///
    /// `candidate` must have `n_items()` entries.
    pub fn similarities_to(&self, candidate: &[f64]) -> Vec<f64> {
        let candidate_norm = norm_simd(candidate);
        self.data
            .par_chunks_exact(self.n_items)
            .zip(self.norms.par_iter())
            .map(|(row, &row_norm)| {
                cosine_from_parts(dot_product_simd(candidate, row), candidate_norm, row_norm)
            })
            .collect()
    }

    /// Number of rated cells in the whole matrix
    pub fn rated_cells(&self) -> usize {
        rated_count(&self.data)
    }

    /// Percentage of cells that hold a rating
    pub fn density(&self) -> f64 {
        self.rated_cells() as f64 / self.data.len() as f64 * 100.0
    }

    pub fn stats(&self) -> DatasetStats {
        let mut rated: Vec<f64> = self.data.iter().copied().filter(|&v| is_rated(v)).collect();
        let total_ratings = rated.len();
        let possible_ratings = self.data.len();

        let (mean, std_dev) = mean_and_std(&rated);
        rated.sort_by(|a, b| a.total_cmp(b));
        let median = median_of_sorted(&rated);

        let distribution = (MIN_RATING as u8..=MAX_RATING as u8)
            .map(|stars| {
                let count = self.data.iter().filter(|&&v| v == stars as f64).count();
                StarCount { stars, count }
            })
            .collect();

        DatasetStats {
            total_users: self.n_users,
            total_items: self.n_items,
            total_ratings,
            possible_ratings,
            density_pct: total_ratings as f64 / possible_ratings as f64 * 100.0,
            mean_rating: mean,
            median_rating: median,
            rating_std_dev: std_dev,
            distribution,
        }
    }
}

/// Summary of a loaded rating matrix
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetStats {
    pub total_users: usize,
    pub total_items: usize,
    pub total_ratings: usize,
    pub possible_ratings: usize,
    pub density_pct: f64,
    pub mean_rating: f64,
    pub median_rating: f64,
    pub rating_std_dev: f64,
    /// Cells holding exactly each whole star value
    pub distribution: Vec<StarCount>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StarCount {
    pub stars: u8,
    pub count: usize,
}

/// Mean and population standard deviation; `(0.0, 0.0)` for an empty slice.
pub(crate) fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    match sorted.len() {
        0 => 0.0,
        n if n % 2 == 1 => sorted[n / 2],
        n => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::cosine_similarity;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("item{}", i)).collect()
    }

    #[test]
    fn test_construction_and_rows() {
        let m = RatingMatrix::new(labels(3), vec![vec![1.0, 0.0, 2.0], vec![0.0, 5.0, 0.0]]).unwrap();
        assert_eq!(m.n_users(), 2);
        assert_eq!(m.n_items(), 3);
        assert_eq!(m.row(1), &[0.0, 5.0, 0.0]);
        assert_eq!(m.rows().count(), 2);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = RatingMatrix::new(labels(3), vec![vec![1.0, 0.0, 2.0], vec![1.0]]).unwrap_err();
        assert!(matches!(err, Error::RaggedRow { row: 1, expected: 3, actual: 1 }));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(RatingMatrix::new(labels(3), vec![]), Err(Error::EmptyMatrix)));
        assert!(matches!(RatingMatrix::new(vec![], vec![vec![]]), Err(Error::EmptyMatrix)));
    }

    #[test]
    fn test_from_flat() {
        let m = RatingMatrix::from_flat(labels(2), vec![1.0, 2.0, 3.0, 4.0], 2).unwrap();
        assert_eq!(m.row(0), &[1.0, 2.0]);
        assert!(matches!(
            RatingMatrix::from_flat(labels(3), vec![1.0, 2.0, 3.0, 4.0], 2),
            Err(Error::BufferLength { expected: 6, actual: 4 })
        ));
    }

    #[test]
    fn test_out_of_range_cells_rejected() {
        let err = RatingMatrix::new(labels(2), vec![vec![3.0, 4.0], vec![f64::NAN, 1.0]]).unwrap_err();
        assert!(matches!(err, Error::InvalidCell { user: 1, item: 0, .. }));

        let err = RatingMatrix::new(labels(2), vec![vec![3.0, 4.0], vec![1.0, -5.0]]).unwrap_err();
        assert!(matches!(err, Error::InvalidCell { user: 1, item: 1, value } if value == -5.0));

        assert!(matches!(
            RatingMatrix::new(labels(2), vec![vec![9.0, 0.0]]),
            Err(Error::InvalidCell { user: 0, item: 0, .. })
        ));
        assert!(matches!(
            RatingMatrix::from_flat(labels(2), vec![1.0, f64::INFINITY], 1),
            Err(Error::InvalidCell { user: 0, item: 1, .. })
        ));

        // bounds themselves are valid
        assert!(RatingMatrix::new(labels(2), vec![vec![0.0, 5.0]]).is_ok());
    }

    #[test]
    fn test_batched_similarities_match_pairwise() {
        let rows = vec![
            vec![5.0, 5.0, 4.0, 3.0, 4.0],
            vec![4.0, 4.0, 5.0, 2.0, 3.0],
            vec![0.0, 0.0, 0.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0, 5.0, 0.0],
        ];
        let m = RatingMatrix::new(labels(5), rows.clone()).unwrap();
        let candidate = [5.0, 4.0, 0.0, 0.0, 3.0];

        let batched = m.similarities_to(&candidate);
        for (row, sim) in rows.iter().zip(&batched) {
            assert_eq!(*sim, cosine_similarity(&candidate, row));
        }
        assert_eq!(batched[2], 0.0);
    }

    #[test]
    fn test_stats() {
        let m = RatingMatrix::new(
            labels(3),
            vec![vec![1.0, 0.0, 5.0], vec![3.0, 3.0, 0.0]],
        )
        .unwrap();
        let stats = m.stats();

        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.total_ratings, 4);
        assert_eq!(stats.possible_ratings, 6);
        assert!((stats.density_pct - 66.666_666).abs() < 1e-3);
        assert!((stats.mean_rating - 3.0).abs() < 1e-12);
        assert!((stats.median_rating - 3.0).abs() < 1e-12);
        assert!((stats.rating_std_dev - 2.0f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats.distribution.len(), 5);
        assert_eq!(stats.distribution[0], StarCount { stars: 1, count: 1 });
        assert_eq!(stats.distribution[2], StarCount { stars: 3, count: 2 });
        assert_eq!(stats.distribution[4], StarCount { stars: 5, count: 1 });
        assert!((m.density() - stats.density_pct).abs() < 1e-12);
    }

    #[test]
    fn test_mean_and_std_empty() {
        assert_eq!(mean_and_std(&[]), (0.0, 0.0));
    }
}
