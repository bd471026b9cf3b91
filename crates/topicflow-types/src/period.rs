//! Calendar periods.
//!
//! A corpus year is split into 12 monthly buckets. Every input file, matrix
//! row label and output bin is addressed by one of them.

use serde::{Deserialize, Serialize};

/// Number of periods in a corpus year.
pub const PERIOD_COUNT: usize = 12;

/// One calendar month of a corpus year, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Period {
    /// All periods in calendar order.
    pub const ALL: [Period; PERIOD_COUNT] = [
        Period::Jan,
        Period::Feb,
        Period::Mar,
        Period::Apr,
        Period::May,
        Period::Jun,
        Period::Jul,
        Period::Aug,
        Period::Sep,
        Period::Oct,
        Period::Nov,
        Period::Dec,
    ];

    /// Zero-based index (Jan = 0).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Period for a zero-based index.
    pub fn from_index(index: usize) -> Option<Period> {
        Self::ALL.get(index).copied()
    }

    /// Three-letter abbreviation used in file names and table headers.
    pub fn abbrev(&self) -> &'static str {
        match self {
            Period::Jan => "Jan",
            Period::Feb => "Feb",
            Period::Mar => "Mar",
            Period::Apr => "Apr",
            Period::May => "May",
            Period::Jun => "Jun",
            Period::Jul => "Jul",
            Period::Aug => "Aug",
            Period::Sep => "Sep",
            Period::Oct => "Oct",
            Period::Nov => "Nov",
            Period::Dec => "Dec",
        }
    }

    /// Parse an abbreviation (case-sensitive, as written in file names).
    pub fn from_abbrev(token: &str) -> Option<Period> {
        Self::ALL.iter().copied().find(|p| p.abbrev() == token)
    }

    /// The following period, if any.
    pub fn next(&self) -> Option<Period> {
        Self::from_index(self.index() + 1)
    }

    /// Adjacent `(period, next)` pairs: Jan/Feb through Nov/Dec.
    pub fn adjacent_pairs() -> impl Iterator<Item = (Period, Period)> {
        Self::ALL.windows(2).map(|w| (w[0], w[1]))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.abbrev())
    }
}
