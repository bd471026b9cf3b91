//! # topicflow-topics
//!
//! Turns topic-model outputs into the per-period topic models and the
//! cross-period similarity graph of the TopicFlow timeline.
//!
//! ## Features
//! - Labeled CSV matrix reading (document-topic, topic-term)
//! - Document-topic join against the loaded corpus
//! - Top-word selection per topic
//! - Weight rounding to a configurable number of decimal places
//! - Similarity graph of the 120 topics of a year

pub mod config;
pub mod error;
pub mod joiner;
pub mod matrix;
pub mod rounding;
pub mod similarity;

pub use config::{GraphConfig, JoinConfig};
pub use error::TopicsError;
pub use joiner::{JoinStats, PeriodJoin, TopicJoiner};
pub use matrix::LabeledMatrix;
pub use rounding::round_weight;
pub use similarity::{similarity_column, GraphBuild, GraphBuilder, GraphStats, SimilarityTable};
