//! Document types.
//!
//! A document is one email body bound to a reconciled global id. Documents are
//! immutable once built; a candidate that fails to load never becomes one.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::period::Period;

/// Dense global document identifier, unique across all periods, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(pub u32);

impl DocId {
    /// Raw numeric value.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for DocId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A loaded, reconciled document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Reconciled global id
    pub id: DocId,
    /// Period the document belongs to
    pub period: Period,
    /// Key as found in the metadata table
    pub raw_key: String,
    /// Text file name the body was read from
    pub filename: String,
    /// Sanitized author
    pub author: String,
    /// Local wall-clock time of the message
    pub timestamp: NaiveDateTime,
    /// Sanitized body text
    pub text: String,
}

impl Document {
    /// Timestamp rendered as `month/day/year hour:minute`.
    pub fn display_date(&self) -> String {
        format_timestamp(&self.timestamp)
    }

    /// Consumer-facing record for `Doc.js`.
    pub fn record(&self) -> DocRecord {
        DocRecord {
            tweet_id: self.id,
            author: self.author.clone(),
            tweet_date: self.display_date(),
            text: self.text.clone(),
        }
    }
}

/// Document as the visualization front-end reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocRecord {
    pub tweet_id: DocId,
    pub author: String,
    pub tweet_date: String,
    pub text: String,
}

/// Render a timestamp as `month/day/year hour:minute` without zero padding.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    format!(
        "{}/{}/{} {}:{}",
        ts.month(),
        ts.day(),
        ts.year(),
        ts.hour(),
        ts.minute()
    )
}
