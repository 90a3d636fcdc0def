//! # knnrec Core
//!
//! Core engine for the knnrec recommender.
//!
//! This crate provides the data structures and algorithms of user-based
//! collaborative filtering:
//!
//! - [`RatingMatrix`] - Dense users x items ratings with precomputed row norms
//! - [`RatingVector`] - A candidate user's ratings, `0.0` meaning unrated
//! - [`find_k_neighbors`] - Exact cosine k-nearest-neighbor search
//! - [`classify`] - Behavioral segment of a candidate from its neighborhood
//! - [`recommend`] - Similarity-weighted score prediction for unrated items
//!
//! Every operation is a pure function of its inputs. The matrix is read-only
//! once built, so it can be shared across threads without locking.
//!
//! ## Example
//!
//! ```rust
//! use knnrec_core::{RatingMatrix, RatingVector, classify, recommend};
//!
//! let labels = vec!["a".to_string(), "b".to_string(), "c".to_string()];
//! let matrix = RatingMatrix::new(labels, vec![
//!     vec![5.0, 4.0, 1.0],
//!     vec![4.0, 0.0, 5.0],
//!     vec![1.0, 1.0, 0.0],
//! ]).unwrap();
//!
//! let candidate = RatingVector::new(vec![5.0, 0.0, 0.0]);
//! let segment = classify(&candidate, &matrix, 2).unwrap();
//! let items = recommend(&candidate, &matrix, 2, 10).unwrap();
//!
//! assert_eq!(items.len(), 2);
//! println!("{} -> {:?}", segment.category, items);
//! ```

pub mod classify;
pub mod error;
pub mod matrix;
pub mod neighbors;
pub mod recommend;
pub mod similarity;
pub mod vector;

/// SIMD kernels for f64 rating vectors
///
/// - AVX2/FMA on x86_64
/// - NEON on ARM64/Apple Silicon
/// - Scalar fallback elsewhere
pub mod simd;

pub use classify::{classify, classify_with_neighbors, Category, ClassificationResult};
pub use error::{Error, Result};
pub use matrix::{DatasetStats, RatingMatrix, StarCount};
pub use neighbors::{check_k, find_k_neighbors, NeighborSet};
pub use recommend::{recommend, recommend_with_neighbors, Recommendation};
pub use similarity::cosine_similarity;
pub use vector::{RatingVector, MAX_RATING, MIN_RATING, UNRATED};
