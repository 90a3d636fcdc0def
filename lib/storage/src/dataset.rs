//! CSV rating dataset loading
//!
//! Expected layout: a header row of item labels, then one row per user with a
//! rating per item. Cleaning applied while loading:
//!
//! - identifier/demographic columns (see [`EXCLUDED_COLUMNS`]) are dropped
//! - cells that are empty or not numeric become `0` (unrated)
//! - values are truncated toward zero and clamped to `[0, 5]`
//! - item columns nobody rated are dropped

use knnrec_core::{Error, RatingMatrix, Result, MAX_RATING, UNRATED};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Column names (case-insensitive) that never hold item ratings
pub const EXCLUDED_COLUMNS: &[&str] = &[
    "userid", "user_id", "id", "edad", "age", "género", "genero", "gender",
];

/// Configurable CSV loader producing a [`RatingMatrix`]
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    excluded_columns: Vec<String>,
    drop_empty_items: bool,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self {
            excluded_columns: EXCLUDED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            drop_empty_items: true,
        }
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set of columns to ignore
    pub fn with_excluded_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_columns = columns
            .into_iter()
            .map(|c| c.into().to_lowercase())
            .collect();
        self
    }

    /// Keep item columns even when no user rated them
    pub fn keep_empty_items(mut self) -> Self {
        self.drop_empty_items = false;
        self
    }

    /// Load a rating matrix from a CSV file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<RatingMatrix> {
        let path = path.as_ref();
        info!("Loading ratings from {}", path.display());

        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| Error::Dataset(format!("failed to open {}: {}", path.display(), e)))?;

        self.read_from(reader, &path.display().to_string())
    }

    /// Load a rating matrix from any CSV source
    pub fn read<R: Read>(&self, source: R) -> Result<RatingMatrix> {
        let reader = csv::ReaderBuilder::new().flexible(true).from_reader(source);
        self.read_from(reader, "<reader>")
    }

    fn read_from<R: Read>(&self, mut reader: csv::Reader<R>, origin: &str) -> Result<RatingMatrix> {
        let headers = reader
            .headers()
            .map_err(|e| Error::Dataset(format!("{}: failed to read headers: {}", origin, e)))?
            .clone();

        let columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(_, name)| !self.is_excluded(name))
            .map(|(position, name)| (position, name.trim().to_string()))
            .collect();

        let skipped = headers.len() - columns.len();
        if skipped > 0 {
            debug!("{}: dropped {} non-item columns", origin, skipped);
        }

        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                Error::Dataset(format!("{}: failed to read row {}: {}", origin, line + 2, e))
            })?;
            let row = columns
                .iter()
                .map(|(position, _)| record.get(*position).map(clean_cell).unwrap_or(UNRATED))
                .collect();
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(Error::Dataset(format!("{}: no user rows", origin)));
        }

        let keep: Vec<usize> = (0..columns.len())
            .filter(|&col| !self.drop_empty_items || rows.iter().any(|row| row[col] != UNRATED))
            .collect();

        let dropped = columns.len() - keep.len();
        if dropped > 0 {
            debug!("{}: dropped {} items without ratings", origin, dropped);
        }

        if keep.is_empty() {
            return Err(Error::Dataset(format!("{}: no item columns", origin)));
        }

        let labels: Vec<String> = keep.iter().map(|&col| columns[col].1.clone()).collect();
        let rows: Vec<Vec<f64>> = rows
            .into_iter()
            .map(|row| keep.iter().map(|&col| row[col]).collect())
            .collect();

        let matrix = RatingMatrix::new(labels, rows)?;
        info!(
            "Dataset ready: {} users, {} items, density {:.2}%",
            matrix.n_users(),
            matrix.n_items(),
            matrix.density()
        );

        Ok(matrix)
    }

    fn is_excluded(&self, column: &str) -> bool {
        let column = column.trim().to_lowercase();
        self.excluded_columns.iter().any(|c| *c == column)
    }
}

/// Load a rating matrix from a CSV file with the default cleaning rules
pub fn load_ratings_csv<P: AsRef<Path>>(path: P) -> Result<RatingMatrix> {
    DatasetLoader::default().load(path)
}

/// Read a rating matrix from CSV data with the default cleaning rules
pub fn read_ratings_csv<R: Read>(source: R) -> Result<RatingMatrix> {
    DatasetLoader::default().read(source)
}

fn clean_cell(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value.trunc().clamp(UNRATED, MAX_RATING),
        _ => UNRATED,
    }
}
