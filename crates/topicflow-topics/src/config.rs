//! Topic configuration.

use serde::{Deserialize, Serialize};
use topicflow_types::{NodeValue, Settings};

/// Topic matrix join configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinConfig {
    /// Decimal places kept for document and word weights
    #[serde(default = "default_weight_precision")]
    pub weight_precision: u32,

    /// Number of words kept per topic
    #[serde(default = "default_top_words")]
    pub top_words: usize,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            weight_precision: default_weight_precision(),
            top_words: default_top_words(),
        }
    }
}

impl From<&Settings> for JoinConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            weight_precision: settings.weight_precision,
            top_words: settings.top_words,
        }
    }
}

fn default_weight_precision() -> u32 {
    17
}
fn default_top_words() -> usize {
    10
}

/// Similarity graph configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Multiplier turning similarity scores into link widths
    #[serde(default = "default_similarity_scale")]
    pub similarity_scale: f64,

    /// Node sizing policy
    #[serde(default)]
    pub node_value: NodeValue,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            similarity_scale: default_similarity_scale(),
            node_value: NodeValue::default(),
        }
    }
}

impl From<&Settings> for GraphConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            similarity_scale: settings.similarity_scale,
            node_value: settings.node_value.clone(),
        }
    }
}

fn default_similarity_scale() -> f64 {
    200.0
}
