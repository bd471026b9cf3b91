//! Labeled numeric matrices (document-topic and topic-term tables).
//!
//! The first column of each row holds the row label; the header row holds
//! the column labels after an index-name cell.

use std::fs;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;

use crate::error::TopicsError;

/// A numeric table with row and column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix {
    pub path: PathBuf,
    pub row_labels: Vec<String>,
    pub columns: Vec<String>,
    /// Row-major values, `values[row].len() == columns.len()`
    pub values: Vec<Vec<f64>>,
}

impl LabeledMatrix {
    /// Read a matrix from a CSV file.
    pub fn read(path: &Path) -> Result<Self, TopicsError> {
        let bytes = fs::read(path)?;
        Self::parse(path, &bytes)
    }

    /// Parse CSV bytes; `path` is used for diagnostics only.
    pub fn parse(path: &Path, bytes: &[u8]) -> Result<Self, TopicsError> {
        let csv_error = |source| TopicsError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = ReaderBuilder::new().from_reader(bytes);
        let headers = reader.headers().map_err(csv_error)?.clone();
        let columns: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();

        let mut row_labels = Vec::new();
        let mut values = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(csv_error)?;
            let label = record.get(0).unwrap_or_default().to_string();
            let mut row = Vec::with_capacity(columns.len());
            for (column, cell) in columns.iter().zip(record.iter().skip(1)) {
                let value = cell
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| TopicsError::InvalidValue {
                        path: path.to_path_buf(),
                        row: i + 1,
                        column: column.clone(),
                        value: cell.to_string(),
                    })?;
                row.push(value);
            }
            row_labels.push(label);
            values.push(row);
        }

        Ok(Self {
            path: path.to_path_buf(),
            row_labels,
            columns,
            values,
        })
    }

    /// Index of a column by label.
    pub fn column_index(&self, name: &str) -> Result<usize, TopicsError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TopicsError::MissingColumn {
                path: self.path.clone(),
                column: name.to_string(),
            })
    }

    pub fn rows(&self) -> usize {
        self.values.len()
    }
}
