//! Input directory layout and file naming conventions.
//!
//! Documents directory:
//! - `<prefix><Mon><year>.csv` metadata table per month
//! - `<year>_<Mon>_<key>.txt` text bodies
//!
//! LDA directory:
//! - `document_topic_Matrix/<Mon>.csv`
//! - `Topic_Term_Matrix/<Mon>.csv`
//! - `Topic_Flow/topic_flow.csv`

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use topicflow_types::Period;

use crate::error::CorpusError;

const DOC_TOPIC_DIR: &str = "document_topic_Matrix";
const TOPIC_TERM_DIR: &str = "Topic_Term_Matrix";
const TOPIC_FLOW_DIR: &str = "Topic_Flow";
const TOPIC_FLOW_FILE: &str = "topic_flow.csv";

/// Resolved locations of every input of one corpus year.
#[derive(Debug, Clone)]
pub struct InputLayout {
    docs_dir: PathBuf,
    lda_dir: PathBuf,
    metadata_prefix: String,
    year: i32,
}

impl InputLayout {
    /// Resolve the layout, detecting the corpus year unless one is given.
    ///
    /// Fails when either directory is missing. File presence is checked
    /// separately by [`InputLayout::validate`].
    pub fn resolve(
        docs_dir: impl Into<PathBuf>,
        lda_dir: impl Into<PathBuf>,
        metadata_prefix: impl Into<String>,
        year: Option<i32>,
    ) -> Result<Self, CorpusError> {
        let docs_dir = docs_dir.into();
        let lda_dir = lda_dir.into();
        for dir in [&docs_dir, &lda_dir] {
            if !dir.is_dir() {
                return Err(CorpusError::MissingDirectory(dir.clone()));
            }
        }

        let year = match year {
            Some(year) => year,
            None => detect_year(&docs_dir)?,
        };
        debug!(year, docs = %docs_dir.display(), lda = %lda_dir.display(), "Resolved input layout");

        Ok(Self {
            docs_dir,
            lda_dir,
            metadata_prefix: metadata_prefix.into(),
            year,
        })
    }

    /// Check that every required table exists, reporting all missing files at once.
    pub fn validate(&self) -> Result<(), CorpusError> {
        let mut required: Vec<PathBuf> = Vec::new();
        for period in Period::ALL {
            required.push(self.metadata_path(period));
            required.push(self.doc_topic_path(period));
            required.push(self.topic_term_path(period));
        }
        required.push(self.topic_flow_path());

        let missing: Vec<PathBuf> = required.into_iter().filter(|p| !p.is_file()).collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CorpusError::MissingFiles(missing))
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }

    pub fn lda_dir(&self) -> &Path {
        &self.lda_dir
    }

    /// Metadata table of a period.
    pub fn metadata_path(&self, period: Period) -> PathBuf {
        self.docs_dir.join(format!(
            "{}{}{}.csv",
            self.metadata_prefix,
            period.abbrev(),
            self.year
        ))
    }

    /// Text body of a document.
    pub fn text_path(&self, period: Period, raw_key: &str) -> PathBuf {
        self.docs_dir.join(self.text_filename(period, raw_key))
    }

    /// Text file name of a document, with the period token substituted.
    pub fn text_filename(&self, period: Period, raw_key: &str) -> String {
        text_filename(self.year, period, raw_key)
    }

    /// Document-topic matrix of a period.
    pub fn doc_topic_path(&self, period: Period) -> PathBuf {
        self.lda_dir
            .join(DOC_TOPIC_DIR)
            .join(format!("{}.csv", period.abbrev()))
    }

    /// Topic-term matrix of a period.
    pub fn topic_term_path(&self, period: Period) -> PathBuf {
        self.lda_dir
            .join(TOPIC_TERM_DIR)
            .join(format!("{}.csv", period.abbrev()))
    }

    /// Cross-period topic similarity table.
    pub fn topic_flow_path(&self) -> PathBuf {
        self.lda_dir.join(TOPIC_FLOW_DIR).join(TOPIC_FLOW_FILE)
    }
}

/// Infer the corpus year from the first `<year>_...txt` file, by sorted name.
pub fn detect_year(docs_dir: &Path) -> Result<i32, CorpusError> {
    WalkDir::new(docs_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            if !name.ends_with(".txt") {
                return None;
            }
            let prefix = name.get(..4)?;
            if prefix.chars().all(|c| c.is_ascii_digit()) {
                prefix.parse().ok()
            } else {
                None
            }
        })
        .next()
        .ok_or_else(|| CorpusError::YearUndetected(docs_dir.to_path_buf()))
}

/// Text file name `<year>_<Mon>_<key>.txt` for a raw key found in `period`.
///
/// Keys that already embed a year and period token (`2007_Feb_12`,
/// `2007_Feb_12.txt`) are rebuilt with `period`, whatever token they carried.
pub fn text_filename(year: i32, period: Period, raw_key: &str) -> String {
    format!("{}_{}_{}.txt", year, period.abbrev(), document_key(raw_key))
}

/// Bare document key: strips a `.txt` suffix and a `<year>_<Mon>_` prefix.
pub fn document_key(raw_key: &str) -> &str {
    let raw = raw_key.trim();
    let raw = raw.strip_suffix(".txt").unwrap_or(raw);
    let mut parts = raw.splitn(3, '_');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(token), Some(rest))
            if year.len() == 4
                && year.chars().all(|c| c.is_ascii_digit())
                && Period::from_abbrev(token).is_some()
                && !rest.is_empty() =>
        {
            rest
        }
        _ => raw,
    }
}

/// Row label of a document-topic matrix, e.g. `Jan/2007_Jan_123.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixLabel {
    /// Folder token, when the label carries a recognizable one
    pub folder: Option<Period>,
    /// Bare document key
    pub key: String,
}

impl MatrixLabel {
    /// Parse a row label. Both `/` and `\` separate the folder.
    pub fn parse(label: &str) -> Option<MatrixLabel> {
        let label = label.trim();
        let (folder, file) = match label.rfind(['/', '\\']) {
            Some(pos) => (Some(&label[..pos]), &label[pos + 1..]),
            None => (None, label),
        };
        let key = document_key(file);
        if key.is_empty() {
            return None;
        }
        let folder = folder.and_then(|f| {
            let last = f.rsplit(['/', '\\']).next().unwrap_or(f);
            Period::from_abbrev(last)
        });
        Some(MatrixLabel {
            folder,
            key: key.to_string(),
        })
    }

    /// File name this label refers to once placed in `period`.
    pub fn filename(&self, year: i32, period: Period) -> String {
        text_filename(year, period, &self.key)
    }
}
