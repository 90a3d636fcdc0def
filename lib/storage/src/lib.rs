pub mod dataset;
pub mod manager;

pub use dataset::{load_ratings_csv, read_ratings_csv, DatasetLoader, EXCLUDED_COLUMNS};
pub use manager::{DatasetManager, DEFAULT_K, MAX_DEFAULT_K};
