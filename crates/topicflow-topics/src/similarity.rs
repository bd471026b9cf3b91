//! Topic similarity graph.
//!
//! The topic-flow table carries, for every pair of consecutive periods
//! `(A, B)`, the columns `A`, `B` and `A_B_similarity`: a 1-based topic of
//! `A`, a 1-based topic of `B`, and their similarity score. The builder turns
//! those rows into links between the 120 period-major topic nodes.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument, warn};

use topicflow_types::{
    NodeValue, Period, SimilarityGraph, SimilarityLink, TopicKey, TopicNode, TOPICS_PER_PERIOD,
};

use crate::config::GraphConfig;
use crate::error::TopicsError;

/// Cell values treated as missing.
const MISSING_MARKERS: &[&str] = &["", "nan", "NaN", "NAN", "NA", "N/A", "null"];

/// Node values drawn by [`NodeValue::Random`] fall in `1..RANDOM_NODE_CEILING`.
const RANDOM_NODE_CEILING: u32 = 100;

/// The raw topic-flow table, cells kept as text.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SimilarityTable {
    pub fn read(path: &Path) -> Result<Self, TopicsError> {
        let bytes = fs::read(path)?;
        Self::parse(path, &bytes)
    }

    /// Parse CSV bytes. Short rows are padded with empty (missing) cells.
    pub fn parse(path: &Path, bytes: &[u8]) -> Result<Self, TopicsError> {
        let csv_error = |source| TopicsError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = ReaderBuilder::new().flexible(true).from_reader(bytes);
        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            let mut row: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    fn column(&self, name: &str) -> Result<usize, TopicsError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TopicsError::MissingColumn {
                path: self.path.clone(),
                column: name.to_string(),
            })
    }
}

/// Name of the score column for a pair of periods.
pub fn similarity_column(from: Period, to: Period) -> String {
    format!("{}_{}_similarity", from.abbrev(), to.abbrev())
}

/// Row counters of one graph build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub links: usize,
    /// Rows with a missing cell in the pair's columns
    pub missing_rows: usize,
    /// Rows repeating an earlier row of the same pair
    pub duplicate_rows: usize,
    /// Rows whose topic index is not an integer in `1..=10`
    pub out_of_range_rows: usize,
}

/// A built graph plus its counters.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphBuild {
    pub graph: SimilarityGraph,
    pub stats: GraphStats,
}

/// Builds the similarity graph from the topic-flow table.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    config: GraphConfig,
}

impl GraphBuilder {
    pub fn new(config: GraphConfig) -> Self {
        Self { config }
    }

    /// All topic nodes, period-major.
    pub fn nodes(&self) -> Vec<TopicNode> {
        let mut rng = match self.config.node_value {
            NodeValue::Random { seed } => Some(StdRng::seed_from_u64(seed)),
            NodeValue::Fixed { .. } => None,
        };
        Period::ALL
            .iter()
            .flat_map(|period| TopicKey::for_period(*period))
            .map(|name| {
                let value = match (&self.config.node_value, rng.as_mut()) {
                    (NodeValue::Fixed { value }, _) => *value,
                    (_, Some(rng)) => rng.random_range(1..RANDOM_NODE_CEILING),
                    (_, None) => 1,
                };
                TopicNode { name, value }
            })
            .collect()
    }

    /// Build nodes and links.
    ///
    /// Fails when a pair's columns are absent or a present cell is not a
    /// number. Rows with missing cells, repeated rows, and rows naming a topic
    /// outside `1..=10` are skipped and counted.
    #[instrument(skip_all, fields(path = %table.path.display()))]
    pub fn build(&self, table: &SimilarityTable) -> Result<GraphBuild, TopicsError> {
        let mut stats = GraphStats::default();
        let mut links = Vec::new();

        for (from, to) in Period::adjacent_pairs() {
            let score_name = similarity_column(from, to);
            let columns = [
                table.column(from.abbrev())?,
                table.column(to.abbrev())?,
                table.column(&score_name)?,
            ];
            let names = [from.abbrev(), to.abbrev(), score_name.as_str()];

            let mut seen: HashSet<(u64, u64, u64)> = HashSet::new();
            for (row_index, row) in table.rows.iter().enumerate() {
                let cells = columns.map(|c| row[c].as_str());
                if cells.iter().any(|c| is_missing(c)) {
                    stats.missing_rows += 1;
                    continue;
                }

                let mut values = [0.0f64; 3];
                for (slot, (cell, name)) in cells.iter().zip(names).enumerate() {
                    values[slot] = parse_number(table, row_index, name, cell)?;
                }
                let [a, b, score] = values;

                if !seen.insert((a.to_bits(), b.to_bits(), score.to_bits())) {
                    stats.duplicate_rows += 1;
                    continue;
                }

                let (Some(a), Some(b)) = (topic_slot(a), topic_slot(b)) else {
                    warn!(
                        row = row_index + 1,
                        pair = %score_name,
                        from_topic = a,
                        to_topic = b,
                        "Skipping similarity row with topic outside 1..=10"
                    );
                    stats.out_of_range_rows += 1;
                    continue;
                };

                links.push(SimilarityLink {
                    source: TopicKey::new(from, a).node_index(),
                    target: TopicKey::new(to, b).node_index(),
                    value: score * self.config.similarity_scale,
                });
            }
        }

        stats.links = links.len();
        debug!(?stats, "Built similarity graph");
        Ok(GraphBuild {
            graph: SimilarityGraph {
                nodes: self.nodes(),
                links,
            },
            stats,
        })
    }
}

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

fn parse_number(
    table: &SimilarityTable,
    row: usize,
    column: &str,
    cell: &str,
) -> Result<f64, TopicsError> {
    cell.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TopicsError::InvalidValue {
            path: table.path.clone(),
            row: row + 1,
            column: column.to_string(),
            value: cell.to_string(),
        })
}

/// 1-based topic number to slot.
fn topic_slot(topic: f64) -> Option<u8> {
    let in_range = topic.fract() == 0.0 && topic >= 1.0 && topic <= TOPICS_PER_PERIOD as f64;
    in_range.then(|| topic as u8 - 1)
}
