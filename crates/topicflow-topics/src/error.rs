//! Topic error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or joining topic-model outputs.
#[derive(Debug, Error)]
pub enum TopicsError {
    /// CSV parse failure
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A table lacks a required column
    #[error("Missing column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// A numeric cell could not be parsed
    #[error("Invalid value '{value}' in {path} (row {row}, column '{column}')")]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    /// Table shape does not match the topic model
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
