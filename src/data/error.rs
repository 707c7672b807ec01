use std::path::PathBuf;

use thiserror::Error;

use super::model::Indicator;

/// Failure to produce a [`Dataset`](super::model::Dataset) at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data source not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported data source: {0}")]
    UnsupportedFormat(String),

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {format} in {}: {message}", path.display())]
    Malformed {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}, column '{column}': cannot interpret '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("duplicate record for ({country}, {year})")]
    DuplicateRecord { country: String, year: i32 },

    #[cfg(feature = "duckdb")]
    #[error("database error: {0}")]
    Database(#[from] duckdb::Error),
}

/// A filter configuration that can never match anything.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("{indicator} range is inverted (min {min} > max {max})")]
    InvertedRange { indicator: Indicator, min: f64, max: f64 },
}

/// Failure while writing the current view to CSV.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
}
