//! Corpus error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating or parsing corpus inputs.
///
/// A document that cannot be loaded is not an error; see
/// [`crate::loader::LoadOutcome`].
#[derive(Debug, Error)]
pub enum CorpusError {
    /// An input directory does not exist or is not a directory
    #[error("Input directory not found: {0}")]
    MissingDirectory(PathBuf),

    /// Required input files are absent
    #[error("Missing input files: {}", display_paths(.0))]
    MissingFiles(Vec<PathBuf>),

    /// No `<year>_<Mon>_<key>.txt` file to infer the corpus year from
    #[error("Cannot detect corpus year from document names in {0}")]
    YearUndetected(PathBuf),

    /// A table lacks a required column
    #[error("Missing column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// CSV parse failure
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
