//! # knnrec
//!
//! A user-based collaborative-filtering recommender.
//!
//! Given a matrix of user ratings over items, knnrec finds the users most
//! cosine-similar to a new user, places that user in one of six behavioral
//! segments and predicts scores for the items they have not rated yet.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! knnrec --dataset dataset_ratings.csv --http-port 5000 --default-k 10
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use knnrec::prelude::*;
//!
//! let matrix = read_ratings_csv("a,b,c\n5,4,0\n4,0,5\n1,1,2\n".as_bytes()).unwrap();
//! let candidate = RatingVector::new(vec![5.0, 0.0, 0.0]);
//!
//! let neighbors = find_k_neighbors(&candidate, &matrix, 2).unwrap();
//! let segment = classify_with_neighbors(&matrix, &neighbors).unwrap();
//! let items = recommend_with_neighbors(&candidate, &matrix, &neighbors, 5).unwrap();
//!
//! assert_eq!(items.len(), 2);
//! println!("{}: {:?}", segment.category, items);
//! ```
//!
//! ## Crate Structure
//!
//! - [`knnrec-core`](knnrec_core) - Similarity, neighbor search, classification, recommendation
//! - [`knnrec-storage`](knnrec_storage) - CSV dataset loading and shared serving state
//! - [`knnrec-api`](knnrec_api) - REST API

// Re-export core types
pub use knnrec_core::{
    classify, classify_with_neighbors, cosine_similarity, find_k_neighbors, recommend,
    recommend_with_neighbors, Category, ClassificationResult, DatasetStats, Error, NeighborSet,
    RatingMatrix, RatingVector, Recommendation, Result,
};

// Re-export storage
pub use knnrec_storage::{load_ratings_csv, read_ratings_csv, DatasetLoader, DatasetManager};

// Re-export API
pub use knnrec_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        classify, classify_with_neighbors, find_k_neighbors, read_ratings_csv, recommend,
        recommend_with_neighbors, Category, DatasetManager, Error, RatingMatrix, RatingVector,
        Recommendation, Result,
    };
}

/// SIMD kernels for rating vectors
pub mod simd {
    pub use knnrec_core::simd::{dot_product_simd, norm_simd};
}
