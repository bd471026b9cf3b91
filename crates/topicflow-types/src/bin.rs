//! Per-period bins and their topic models.
//!
//! Bins are kept as an ordered `Vec` indexed by period. The string-keyed
//! object the front-end expects (`{"0": {...}, "1": {...}}`) only exists at
//! serialization time.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::document::DocId;
use crate::period::Period;

/// Number of topics the topic model produces per period.
pub const TOPICS_PER_PERIOD: usize = 10;

/// Identity of one topic: `(period, slot)`, rendered as `"<period>_<slot>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TopicKey {
    pub period: Period,
    pub slot: u8,
}

impl TopicKey {
    pub fn new(period: Period, slot: u8) -> Self {
        Self { period, slot }
    }

    /// All topic keys of a period, slot order.
    pub fn for_period(period: Period) -> impl Iterator<Item = TopicKey> {
        (0..TOPICS_PER_PERIOD as u8).map(move |slot| TopicKey::new(period, slot))
    }

    /// Position of this topic in the period-major node list.
    pub fn node_index(&self) -> usize {
        self.period.index() * TOPICS_PER_PERIOD + self.slot as usize
    }

    /// Parse the `"<period>_<slot>"` form.
    pub fn parse(s: &str) -> Option<TopicKey> {
        let (period, slot) = s.split_once('_')?;
        let period = Period::from_index(period.parse().ok()?)?;
        let slot: u8 = slot.parse().ok()?;
        if slot as usize >= TOPICS_PER_PERIOD {
            return None;
        }
        Some(TopicKey::new(period, slot))
    }
}

impl std::fmt::Display for TopicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.period.index(), self.slot)
    }
}

impl Serialize for TopicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TopicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TopicKey::parse(&s).ok_or_else(|| de::Error::custom(format!("invalid topic key: {s}")))
    }
}

/// Topic associations of one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicModel {
    /// Topic -> document -> weight. One entry per topic; inner maps are empty
    /// when no document joined.
    pub topic_doc: BTreeMap<TopicKey, BTreeMap<DocId, f64>>,
    /// Document -> topic -> weight.
    pub doc_topic: BTreeMap<DocId, BTreeMap<TopicKey, f64>>,
    /// Topic -> top words, heaviest first.
    pub topic_word: BTreeMap<TopicKey, IndexMap<String, f64>>,
    /// Slot -> topic key.
    pub topic_prob: BTreeMap<u8, TopicKey>,
}

impl TopicModel {
    /// Number of documents that carry topic weights.
    pub fn joined_documents(&self) -> usize {
        self.doc_topic.len()
    }

    /// True when no document joined this period's topic matrix.
    pub fn is_empty_join(&self) -> bool {
        self.doc_topic.is_empty() && self.topic_doc.values().all(BTreeMap::is_empty)
    }
}

/// Per-period aggregate consumed by the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    #[serde(rename = "tweet_Ids")]
    pub tweet_ids: Vec<DocId>,
    pub start_time: Option<String>,
    pub bin_id: usize,
    pub topic_model: TopicModel,
    pub end_time: Option<String>,
}

/// All bins of a corpus year, indexed by period.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinSet(pub Vec<Bin>);

impl BinSet {
    pub fn get(&self, period: Period) -> Option<&Bin> {
        self.0.get(period.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bin> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for BinSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for bin in &self.0 {
            map.serialize_entry(&bin.bin_id.to_string(), bin)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BinSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let by_index = BTreeMap::<usize, Bin>::deserialize(deserializer)?;
        Ok(BinSet(by_index.into_values().collect()))
    }
}
