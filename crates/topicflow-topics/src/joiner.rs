//! Topic matrix join.
//!
//! Aligns a period's document-topic matrix with the documents the loader
//! emitted. The join is an intersection: matrix rows without a loaded
//! document and loaded documents without a matrix row are both left out of
//! the topic model. Such documents remain valid everywhere else.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use topicflow_topics::{JoinConfig, LabeledMatrix, TopicJoiner};
//!
//! let joiner = TopicJoiner::new(JoinConfig::default(), layout.year());
//! let joined = joiner.join(Period::Jan, &doc_topic, &topic_term, corpus.emitted(Period::Jan))?;
//! println!("{} documents joined", joined.stats.joined);
//! ```

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use tracing::{debug, instrument};

use topicflow_corpus::MatrixLabel;
use topicflow_types::{DocId, Period, TopicKey, TopicModel, TOPICS_PER_PERIOD};

use crate::config::JoinConfig;
use crate::error::TopicsError;
use crate::matrix::LabeledMatrix;
use crate::rounding::round_weight;

/// Counters for one period's join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinStats {
    /// Matrix rows matched to a loaded document
    pub joined: usize,
    /// Matrix rows with no loaded document
    pub unmatched_rows: usize,
    /// Matrix rows whose label repeats an earlier row
    pub duplicate_rows: usize,
    /// Matrix rows whose label could not be parsed
    pub unparseable_rows: usize,
    /// Rows whose folder token disagreed with the period
    pub substituted_tokens: usize,
}

/// Topic model of one period plus join counters.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodJoin {
    pub model: TopicModel,
    pub stats: JoinStats,
}

/// Builds per-period topic models from topic-model outputs.
#[derive(Debug, Clone)]
pub struct TopicJoiner {
    config: JoinConfig,
    year: i32,
}

impl TopicJoiner {
    pub fn new(config: JoinConfig, year: i32) -> Self {
        Self { config, year }
    }

    /// Join one period.
    ///
    /// `doc_topic` needs topic columns labeled `1`..`10`; `topic_term` needs
    /// one row per topic, in slot order.
    #[instrument(skip_all, fields(%period))]
    pub fn join(
        &self,
        period: Period,
        doc_topic: &LabeledMatrix,
        topic_term: &LabeledMatrix,
        emitted: &[(DocId, String)],
    ) -> Result<PeriodJoin, TopicsError> {
        let topic_columns = topic_columns(doc_topic)?;
        if topic_term.rows() != TOPICS_PER_PERIOD {
            return Err(TopicsError::InvalidInput(format!(
                "{}: expected {} topic rows, found {}",
                topic_term.path.display(),
                TOPICS_PER_PERIOD,
                topic_term.rows()
            )));
        }

        let (matched, stats) = self.match_rows(period, doc_topic, emitted);
        let places = self.config.weight_precision;

        let mut model = TopicModel::default();
        for key in TopicKey::for_period(period) {
            model.topic_doc.insert(key, BTreeMap::new());
            model.topic_prob.insert(key.slot, key);
        }

        for (id, row) in &matched {
            let weights = &doc_topic.values[*row];
            let doc_entry = model.doc_topic.entry(*id).or_default();
            for (key, column) in TopicKey::for_period(period).zip(&topic_columns) {
                let weight = round_weight(weights[*column], places);
                doc_entry.insert(key, weight);
                if let Some(docs) = model.topic_doc.get_mut(&key) {
                    docs.insert(*id, weight);
                }
            }
        }

        for (key, weights) in TopicKey::for_period(period).zip(&topic_term.values) {
            model
                .topic_word
                .insert(key, self.top_words(&topic_term.columns, weights));
        }

        if stats.joined == 0 {
            debug!(%period, rows = doc_topic.rows(), documents = emitted.len(), "Empty topic join");
        } else {
            debug!(%period, ?stats, "Joined topic matrix");
        }
        Ok(PeriodJoin { model, stats })
    }

    /// Match matrix rows to emitted documents, first row wins.
    fn match_rows(
        &self,
        period: Period,
        doc_topic: &LabeledMatrix,
        emitted: &[(DocId, String)],
    ) -> (Vec<(DocId, usize)>, JoinStats) {
        let by_filename: HashMap<&str, DocId> = emitted
            .iter()
            .map(|(id, filename)| (filename.as_str(), *id))
            .collect();

        let mut stats = JoinStats::default();
        let mut matched: Vec<(DocId, usize)> = Vec::new();
        let mut seen: HashMap<DocId, usize> = HashMap::new();

        for (row, raw_label) in doc_topic.row_labels.iter().enumerate() {
            let Some(label) = MatrixLabel::parse(raw_label) else {
                stats.unparseable_rows += 1;
                continue;
            };
            if label.folder.is_some_and(|folder| folder != period) {
                stats.substituted_tokens += 1;
            }
            let filename = label.filename(self.year, period);
            let Some(id) = by_filename.get(filename.as_str()).copied() else {
                stats.unmatched_rows += 1;
                continue;
            };
            if seen.insert(id, row).is_some() {
                stats.duplicate_rows += 1;
                continue;
            }
            matched.push((id, row));
        }

        stats.joined = matched.len();
        (matched, stats)
    }

    /// Heaviest words of one topic row; ties keep column order.
    fn top_words(&self, columns: &[String], weights: &[f64]) -> IndexMap<String, f64> {
        let mut order: Vec<usize> = (0..weights.len()).collect();
        order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));
        order
            .into_iter()
            .take(self.config.top_words)
            .map(|i| {
                (
                    columns[i].clone(),
                    round_weight(weights[i], self.config.weight_precision),
                )
            })
            .collect()
    }
}

/// Column index of every topic slot (`1`..`10` in the table).
fn topic_columns(doc_topic: &LabeledMatrix) -> Result<Vec<usize>, TopicsError> {
    (1..=TOPICS_PER_PERIOD)
        .map(|n| doc_topic.column_index(&n.to_string()))
        .collect()
}
