//! Per-period metadata tables.

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::CorpusError;
use crate::normalize::decode_windows_1252;

/// Column holding the raw document key.
pub const KEY_COLUMN: &str = "k";
/// Column holding the message author.
pub const AUTHOR_COLUMN: &str = "author";
/// Column holding the message timestamp.
pub const DATE_COLUMN: &str = "dateStamp";

/// One metadata row, fields as found in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRow {
    /// 1-based data row number, for diagnostics
    pub row: usize,
    pub key: String,
    pub author: Option<String>,
    pub date_stamp: Option<String>,
}

/// Read a Windows-1252 encoded metadata table, preserving row order.
pub fn read_metadata(path: &Path) -> Result<Vec<MetadataRow>, CorpusError> {
    let bytes = fs::read(path)?;
    let text = decode_windows_1252(&bytes);

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|source| CorpusError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    let column = |name: &str| -> Result<usize, CorpusError> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| CorpusError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };
    let key_col = column(KEY_COLUMN)?;
    let author_col = column(AUTHOR_COLUMN)?;
    let date_col = column(DATE_COLUMN)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|source| CorpusError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(MetadataRow {
            row: i + 1,
            key: field(&record, key_col).unwrap_or_default(),
            author: field(&record, author_col),
            date_stamp: field(&record, date_col),
        });
    }
    Ok(rows)
}

fn field(record: &StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_metadata_with_index_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.csv");
        fs::write(
            &path,
            ",k,author,dateStamp\n0,12,\"Bob \"\"B\"\" Smith\",2007-01-02 03:04:05\n1,13,,\n",
        )
        .unwrap();

        let rows = read_metadata(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "12");
        assert_eq!(rows[0].author.as_deref(), Some("Bob \"B\" Smith"));
        assert_eq!(rows[0].date_stamp.as_deref(), Some("2007-01-02 03:04:05"));
        assert_eq!(rows[1].row, 2);
        assert_eq!(rows[1].author, None);
        assert_eq!(rows[1].date_stamp, None);
    }

    #[test]
    fn test_read_metadata_decodes_windows_1252() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.csv");
        let mut bytes = b",k,author,dateStamp\n0,1,Ren".to_vec();
        bytes.push(0xe9);
        bytes.extend_from_slice(b",2007-01-02 03:04:05\n");
        fs::write(&path, bytes).unwrap();

        let rows = read_metadata(&path).unwrap();
        assert_eq!(rows[0].author.as_deref(), Some("René"));
    }

    #[test]
    fn test_read_metadata_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.csv");
        fs::write(&path, ",k,author\n0,1,a\n").unwrap();

        let err = read_metadata(&path).unwrap_err();
        assert!(matches!(err, CorpusError::MissingColumn { ref column, .. } if column == DATE_COLUMN));
    }

    #[test]
    fn test_read_metadata_short_rows_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.csv");
        fs::write(&path, ",k,author,dateStamp\n0,5\n").unwrap();

        let rows = read_metadata(&path).unwrap();
        assert_eq!(rows[0].key, "5");
        assert_eq!(rows[0].author, None);
    }
}
