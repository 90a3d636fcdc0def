use knnrec_core::{check_k, Error, RatingMatrix, Result};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::dataset::load_ratings_csv;

/// Neighbors used when a request does not ask for a specific K
pub const DEFAULT_K: usize = 10;
/// Upper bound accepted for the configurable default K
pub const MAX_DEFAULT_K: usize = 100;

/// Shared serving state: the immutable rating matrix and the default K.
///
/// The matrix never changes after construction, so readers need no lock.
/// The default K is a single atomic word; requests read it once through
/// [`DatasetManager::resolve_k`] and use that value for the whole computation.
pub struct DatasetManager {
    matrix: Arc<RatingMatrix>,
    default_k: AtomicUsize,
}

impl DatasetManager {
    pub fn new(matrix: RatingMatrix) -> Self {
        Self {
            matrix: Arc::new(matrix),
            default_k: AtomicUsize::new(DEFAULT_K),
        }
    }

    /// Load the rating matrix from a CSV file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let matrix = load_ratings_csv(path)?;
        Ok(Self::new(matrix))
    }

    /// Set the initial default K, validated like [`DatasetManager::set_default_k`]
    pub fn with_default_k(self, k: usize) -> Result<Self> {
        self.set_default_k(k)?;
        Ok(self)
    }

    #[inline]
    pub fn matrix(&self) -> &RatingMatrix {
        &self.matrix
    }

    #[inline]
    pub fn default_k(&self) -> usize {
        self.default_k.load(Ordering::Acquire)
    }

    /// Update the default K; must be within `1..=MAX_DEFAULT_K`.
    ///
    /// Not checked against the user count: a default above it makes requests
    /// without an explicit K fail validation until it is lowered.
    pub fn set_default_k(&self, k: usize) -> Result<()> {
        if !(1..=MAX_DEFAULT_K).contains(&k) {
            return Err(Error::InvalidConfig(format!(
                "k must be between 1 and {}",
                MAX_DEFAULT_K
            )));
        }
        let previous = self.default_k.swap(k, Ordering::AcqRel);
        info!("Default k changed from {} to {}", previous, k);
        Ok(())
    }

    /// Effective K for one request: `requested`, or the current default.
    ///
    /// Reads the shared default at most once. The result is valid for the
    /// loaded matrix (`1..=n_users`).
    pub fn resolve_k(&self, requested: Option<i64>) -> Result<usize> {
        let max = self.matrix.n_users();
        let k = match requested {
            Some(k) if k < 1 => return Err(Error::InvalidK { k, max }),
            Some(k) => usize::try_from(k).unwrap_or(usize::MAX),
            None => self.default_k(),
        };
        check_k(k, &self.matrix)?;
        Ok(k)
    }
}
