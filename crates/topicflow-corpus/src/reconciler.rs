//! Global document id reconciliation.
//!
//! Every period numbers its documents by raw key; the front-end needs one
//! dense id space over the whole year. Ids start at 1 and are assigned period
//! by period in calendar order, then in collection order within a period, so
//! each period owns one contiguous window.

use std::collections::HashMap;
use std::ops::Range;

use tracing::{debug, warn};

use topicflow_types::{DocId, Period, PERIOD_COUNT};

/// Assigns dense global ids to per-period key collections.
#[derive(Debug)]
pub struct IdReconciler {
    collections: Vec<Vec<String>>,
}

impl Default for IdReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl IdReconciler {
    pub fn new() -> Self {
        Self {
            collections: vec![Vec::new(); PERIOD_COUNT],
        }
    }

    /// Append keys to a period's collection, preserving their order.
    pub fn add_keys<I, S>(&mut self, period: Period, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.collections[period.index()].extend(keys.into_iter().map(Into::into));
        self
    }

    /// Assign ids. A key repeated within one period keeps its first id and is
    /// recorded in [`IdSpace::duplicates`].
    pub fn reconcile(self) -> IdSpace {
        let mut ranges = Vec::with_capacity(PERIOD_COUNT);
        let mut by_key = HashMap::new();
        let mut keys = Vec::new();
        let mut duplicates = Vec::new();
        let mut next: u32 = 1;

        for (period, collection) in Period::ALL.into_iter().zip(self.collections) {
            let start = next;
            for key in collection {
                if by_key.contains_key(&(period, key.clone())) {
                    warn!(%period, key = %key, "Duplicate document key, keeping first id");
                    duplicates.push((period, key));
                    continue;
                }
                by_key.insert((period, key.clone()), DocId(next));
                keys.push((period, key));
                next += 1;
            }
            debug!(%period, first = start, count = next - start, "Assigned document ids");
            ranges.push(start..next);
        }

        IdSpace {
            ranges,
            by_key,
            keys,
            duplicates,
        }
    }

    /// Convenience wrapper over [`IdReconciler::add_keys`] + [`IdReconciler::reconcile`].
    pub fn reconcile_collections<I, K, S>(collections: I) -> IdSpace
    where
        I: IntoIterator<Item = (Period, K)>,
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut reconciler = IdReconciler::new();
        for (period, keys) in collections {
            reconciler.add_keys(period, keys);
        }
        reconciler.reconcile()
    }
}

/// Dense id space over all periods.
#[derive(Debug, Clone, PartialEq)]
pub struct IdSpace {
    ranges: Vec<Range<u32>>,
    by_key: HashMap<(Period, String), DocId>,
    keys: Vec<(Period, String)>,
    duplicates: Vec<(Period, String)>,
}

impl IdSpace {
    /// Id of a period's key.
    pub fn id_of(&self, period: Period, key: &str) -> Option<DocId> {
        self.by_key.get(&(period, key.to_string())).copied()
    }

    /// Period and key of an id.
    pub fn key_of(&self, id: DocId) -> Option<(Period, &str)> {
        let index = id.get().checked_sub(1)? as usize;
        self.keys.get(index).map(|(p, k)| (*p, k.as_str()))
    }

    /// Half-open id window of a period.
    pub fn period_range(&self, period: Period) -> Range<u32> {
        self.ranges[period.index()].clone()
    }

    /// Ids of a period, in assignment order.
    pub fn ids(&self, period: Period) -> impl Iterator<Item = DocId> {
        self.period_range(period).map(DocId)
    }

    /// Number of ids assigned to strictly earlier periods.
    pub fn offset(&self, period: Period) -> u32 {
        self.ranges[period.index()].start - 1
    }

    /// Keys skipped because they repeated within a period.
    ///
    /// Empty for ids built by `MetadataLoader`, which drops repeated keys
    /// as `SkipReason::Duplicate` before reconciling.
    pub fn duplicates(&self) -> &[(Period, String)] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
