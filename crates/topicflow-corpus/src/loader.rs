//! Metadata loading.
//!
//! For every metadata row of every period the loader tries to build a
//! document: usable metadata plus a readable text body. Rows that fail are
//! classified and counted but never abort the run. Surviving rows are handed
//! to the [`IdReconciler`] and bound to their global ids.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use topicflow_corpus::{InputLayout, MetadataLoader};
//!
//! let layout = InputLayout::resolve("data/docs", "data/LDA", "Full_Disclosure_Mailing_List_", None)?;
//! let corpus = MetadataLoader::new(&layout).load()?;
//! println!("{} documents, {}", corpus.documents.len(), corpus.skips);
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::{debug, info, instrument};

use topicflow_types::{DocId, Document, Period, PERIOD_COUNT};

use crate::error::CorpusError;
use crate::layout::{document_key, InputLayout};
use crate::metadata::{read_metadata, MetadataRow};
use crate::normalize::{
    decode_latin1, normalize_key, normalize_newlines, parse_timestamp, sanitize,
};
use crate::reconciler::{IdReconciler, IdSpace};

/// A metadata row with its text body, not yet bound to an id.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub raw_key: String,
    /// Bare key used for id reconciliation
    pub key: String,
    pub filename: String,
    pub author: String,
    pub timestamp: NaiveDateTime,
    pub text: String,
}

/// Result of trying to load one metadata row.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Found(Candidate),
    /// Key, author or timestamp absent or unusable
    MissingMetadata { row: usize, reason: String },
    /// No text file for the row
    MissingText { path: PathBuf },
    /// Text file present but unreadable
    ReadError { path: PathBuf, message: String },
    /// Key already produced a document in this period
    Duplicate { key: String },
}

impl LoadOutcome {
    /// Why the row was skipped, or `None` for [`LoadOutcome::Found`].
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            LoadOutcome::Found(_) => None,
            LoadOutcome::MissingMetadata { .. } => Some(SkipReason::MissingMetadata),
            LoadOutcome::MissingText { .. } => Some(SkipReason::MissingText),
            LoadOutcome::ReadError { .. } => Some(SkipReason::ReadError),
            LoadOutcome::Duplicate { .. } => Some(SkipReason::Duplicate),
        }
    }
}

/// Skip category for the observability histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    MissingMetadata,
    MissingText,
    ReadError,
    Duplicate,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingMetadata => write!(f, "missing-metadata"),
            SkipReason::MissingText => write!(f, "missing-text"),
            SkipReason::ReadError => write!(f, "read-error"),
            SkipReason::Duplicate => write!(f, "duplicate"),
        }
    }
}

/// Per-period histogram of skipped rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipReport {
    per_period: Vec<BTreeMap<SkipReason, usize>>,
}

impl Default for SkipReport {
    fn default() -> Self {
        Self {
            per_period: vec![BTreeMap::new(); PERIOD_COUNT],
        }
    }
}

impl SkipReport {
    pub fn record(&mut self, period: Period, reason: SkipReason) {
        *self.per_period[period.index()].entry(reason).or_insert(0) += 1;
    }

    /// Skips of one period by reason.
    pub fn for_period(&self, period: Period) -> &BTreeMap<SkipReason, usize> {
        &self.per_period[period.index()]
    }

    /// Skips of one reason over all periods.
    pub fn count(&self, reason: SkipReason) -> usize {
        self.per_period
            .iter()
            .filter_map(|m| m.get(&reason))
            .sum()
    }

    /// All skipped rows.
    pub fn total(&self) -> usize {
        self.per_period.iter().flat_map(|m| m.values()).sum()
    }

    /// Totals by reason over all periods.
    pub fn totals(&self) -> BTreeMap<SkipReason, usize> {
        let mut totals = BTreeMap::new();
        for map in &self.per_period {
            for (reason, n) in map {
                *totals.entry(*reason).or_insert(0) += n;
            }
        }
        totals
    }
}

impl std::fmt::Display for SkipReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let totals = self.totals();
        if totals.is_empty() {
            return write!(f, "0 skipped");
        }
        let parts: Vec<String> = totals.iter().map(|(r, n)| format!("{r}={n}")).collect();
        write!(f, "{} skipped ({})", self.total(), parts.join(", "))
    }
}

/// Documents of a corpus year bound to the reconciled id space.
#[derive(Debug, Clone)]
pub struct LoadedCorpus {
    /// Documents in id order; `documents[i].id == DocId(i + 1)`
    pub documents: Vec<Document>,
    pub id_space: IdSpace,
    /// Per period, the `(id, filename)` pairs emitted, in id order
    pub emitted: Vec<Vec<(DocId, String)>>,
    pub skips: SkipReport,
}

impl LoadedCorpus {
    /// Documents of one period.
    pub fn documents_in(&self, period: Period) -> &[Document] {
        let range = self.id_space.period_range(period);
        &self.documents[(range.start - 1) as usize..(range.end - 1) as usize]
    }

    /// `(id, filename)` pairs emitted for one period.
    pub fn emitted(&self, period: Period) -> &[(DocId, String)] {
        &self.emitted[period.index()]
    }
}

/// Loads metadata rows and text bodies for every period of a layout.
pub struct MetadataLoader<'a> {
    layout: &'a InputLayout,
}

impl<'a> MetadataLoader<'a> {
    pub fn new(layout: &'a InputLayout) -> Self {
        Self { layout }
    }

    /// Classify one metadata row. `seen` holds keys already found in the period.
    pub fn classify(&self, period: Period, row: &MetadataRow, seen: &HashSet<String>) -> LoadOutcome {
        let raw_key = normalize_key(&row.key);
        if raw_key.is_empty() {
            return LoadOutcome::MissingMetadata {
                row: row.row,
                reason: "empty key".to_string(),
            };
        }
        let Some(author) = row.author.as_deref() else {
            return LoadOutcome::MissingMetadata {
                row: row.row,
                reason: "missing author".to_string(),
            };
        };
        let Some(date_stamp) = row.date_stamp.as_deref() else {
            return LoadOutcome::MissingMetadata {
                row: row.row,
                reason: "missing timestamp".to_string(),
            };
        };
        let Some(timestamp) = parse_timestamp(date_stamp) else {
            return LoadOutcome::MissingMetadata {
                row: row.row,
                reason: format!("unparseable timestamp '{date_stamp}'"),
            };
        };

        let key = document_key(&raw_key).to_string();
        if seen.contains(&key) {
            return LoadOutcome::Duplicate { key };
        }

        let filename = self.layout.text_filename(period, &raw_key);
        let path = self.layout.docs_dir().join(&filename);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return LoadOutcome::MissingText { path };
            }
            Err(e) => {
                return LoadOutcome::ReadError {
                    path,
                    message: e.to_string(),
                };
            }
        };

        LoadOutcome::Found(Candidate {
            raw_key,
            key,
            filename,
            author: sanitize(author),
            timestamp,
            text: sanitize(&normalize_newlines(&decode_latin1(&bytes))),
        })
    }

    /// Classify every metadata row of a period, in table order.
    #[instrument(skip(self))]
    pub fn load_period(&self, period: Period) -> Result<Vec<LoadOutcome>, CorpusError> {
        let rows = read_metadata(&self.layout.metadata_path(period))?;
        let mut seen = HashSet::new();
        let mut outcomes = Vec::with_capacity(rows.len());
        for row in &rows {
            let outcome = self.classify(period, row, &seen);
            match &outcome {
                LoadOutcome::Found(candidate) => {
                    seen.insert(candidate.key.clone());
                }
                skipped => debug!(%period, row = row.row, ?skipped, "Skipping metadata row"),
            }
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Load all periods, reconcile ids and bind documents.
    #[instrument(skip(self), fields(year = self.layout.year()))]
    pub fn load(&self) -> Result<LoadedCorpus, CorpusError> {
        let mut skips = SkipReport::default();
        let mut found: Vec<Vec<Candidate>> = Vec::with_capacity(PERIOD_COUNT);

        for period in Period::ALL {
            let mut candidates = Vec::new();
            for outcome in self.load_period(period)? {
                match outcome.skip_reason() {
                    Some(reason) => skips.record(period, reason),
                    None => {
                        if let LoadOutcome::Found(candidate) = outcome {
                            candidates.push(candidate);
                        }
                    }
                }
            }
            info!(%period, documents = candidates.len(), skipped = skips.for_period(period).values().sum::<usize>(), "Loaded period");
            found.push(candidates);
        }

        Ok(bind(found, skips))
    }
}

/// Reconcile candidate keys and bind each candidate to its id.
fn bind(found: Vec<Vec<Candidate>>, skips: SkipReport) -> LoadedCorpus {
    let mut reconciler = IdReconciler::new();
    for (period, candidates) in Period::ALL.into_iter().zip(&found) {
        reconciler.add_keys(period, candidates.iter().map(|c| c.key.clone()));
    }
    let id_space = reconciler.reconcile();

    let mut documents = Vec::with_capacity(id_space.len());
    let mut emitted = Vec::with_capacity(PERIOD_COUNT);
    for (period, candidates) in Period::ALL.into_iter().zip(found) {
        let mut period_emitted = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let Some(id) = id_space.id_of(period, &candidate.key) else {
                continue;
            };
            period_emitted.push((id, candidate.filename.clone()));
            documents.push(Document {
                id,
                period,
                raw_key: candidate.raw_key,
                filename: candidate.filename,
                author: candidate.author,
                timestamp: candidate.timestamp,
                text: candidate.text,
            });
        }
        emitted.push(period_emitted);
    }

    info!(documents = documents.len(), %skips, "Reconciled corpus");
    LoadedCorpus {
        documents,
        id_space,
        emitted,
        skips,
    }
}
