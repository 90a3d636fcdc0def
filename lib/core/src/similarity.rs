//! Cosine similarity between rating vectors.
//!
//! Unrated items are stored as `0.0` and take part in the computation like any
//! other entry: they add nothing to the dot product or the norms, so the score
//! is computed over the full vector rather than over co-rated items only.

use crate::simd::{dot_product_simd, norm_simd};

/// Cosine similarity of two equal-length rating vectors.
///
/// Returns `0.0` when either vector has zero norm. Ratings are non-negative,
/// so the result lies in `[0, 1]` without any clamping.
#[inline]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    cosine_from_parts(dot_product_simd(a, b), norm_simd(a), norm_simd(b))
}

/// Cosine similarity from a precomputed dot product and norms.
///
/// Used by the batched matrix scan, which computes row norms once at load time.
/// Gives the same value as [`cosine_similarity`] for the same inputs.
#[inline]
pub fn cosine_from_parts(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors() {
        let a = [5.0, 4.0, 0.0, 3.0, 5.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetry() {
        let a = [5.0, 4.0, 0.0, 3.0, 5.0, 1.0, 0.0, 2.0, 4.0];
        let b = [4.0, 5.0, 0.0, 4.0, 4.0, 0.0, 3.0, 0.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn test_zero_vector() {
        let zero = [0.0; 5];
        let b = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(cosine_similarity(&zero, &b), 0.0);
        assert_eq!(cosine_similarity(&b, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_disjoint_ratings_are_orthogonal() {
        let a = [5.0, 0.0, 3.0, 0.0];
        let b = [0.0, 4.0, 0.0, 2.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_zeros_are_not_masked() {
        // Over co-rated items only these would be identical (1.0); over the full
        // vector the extra rating in `b` lowers the score.
        let a = [3.0, 3.0, 0.0];
        let b = [3.0, 3.0, 3.0];
        let expected = 18.0 / (18.0f64.sqrt() * 27.0f64.sqrt());
        assert!((cosine_similarity(&a, &b) - expected).abs() < 1e-12);
        assert!(cosine_similarity(&a, &b) < 1.0);
    }

    #[test]
    fn test_known_value() {
        let a = [5.0, 4.0, 0.0, 3.0, 5.0];
        let b = [4.0, 5.0, 0.0, 4.0, 4.0];
        let sim = cosine_similarity(&a, &b);
        assert!(sim > 0.95 && sim <= 1.0);
    }

    #[test]
    fn test_from_parts_matches_direct() {
        let a = [1.0, 2.0, 0.0, 5.0];
        let b = [2.0, 0.0, 1.0, 4.0];
        let direct = cosine_similarity(&a, &b);
        let parts = cosine_from_parts(dot_product_simd(&a, &b), norm_simd(&a), norm_simd(&b));
        assert_eq!(direct, parts);
    }
}
