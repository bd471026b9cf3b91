//! # topicflow-types
//!
//! Shared domain types for the TopicFlow data builder.
//!
//! This crate defines the core data structures used throughout the system:
//! - Periods: the 12 monthly buckets of a corpus year
//! - Documents: reconciled email bodies with their global ids
//! - Bins: per-period aggregates with their topic models
//! - Similarity graph: topic nodes and cross-period links
//! - Settings: layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use topicflow_types::{Period, TopicKey};
//!
//! let key = TopicKey::new(Period::Mar, 4);
//! assert_eq!(key.to_string(), "2_4");
//! ```

pub mod bin;
pub mod config;
pub mod document;
pub mod error;
pub mod graph;
pub mod period;

pub use bin::{Bin, BinSet, TopicKey, TopicModel, TOPICS_PER_PERIOD};
pub use config::{NodeValue, Settings, MAX_WEIGHT_PRECISION};
pub use document::{format_timestamp, DocId, DocRecord, Document};
pub use error::TopicFlowError;
pub use graph::{SimilarityGraph, SimilarityLink, TopicNode};
pub use period::{Period, PERIOD_COUNT};
