//! Response records returned by the backend.
//!
//! Every record is serialised as-is into a JSON response body. Failures are
//! part of the records (`error` fields), not separate types.

use serde::Serialize;

use crate::progress::Progress;

/// Word count of one title at one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRecord {
    pub title: u32,

    /// Echoed verbatim from the request.
    pub date: String,

    /// `None` (JSON `null`) when the fetch or parse failed.
    pub word_count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MetricRecord {
    /// A successful measurement.
    #[must_use]
    pub fn counted(title: u32, date: impl Into<String>, word_count: usize) -> Self {
        Self {
            title,
            date: date.into(),
            word_count: Some(word_count),
            error: None,
        }
    }

    /// A failed measurement.
    #[must_use]
    pub fn failed(title: u32, date: impl Into<String>, error: impl ToString) -> Self {
        Self {
            title,
            date: date.into(),
            word_count: None,
            error: Some(error.to_string()),
        }
    }
}

/// One point of a range snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotEntry {
    pub date: String,
    pub count: Option<usize>,
    #[serde(flatten)]
    pub progress: Progress,
}

/// Word counts of a title at evenly spaced dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotSeries {
    pub title: u32,
    pub start_date: String,
    pub end_date: String,
    pub word_counts: Vec<SnapshotEntry>,
}

/// CFR titles and chapters an agency is responsible for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgencyRecord {
    pub agency: String,

    /// Sorted, without duplicates.
    pub titles: Vec<String>,
}

/// Dates at which a title was revised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionDates {
    pub title: u32,
    pub revision_dates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A single editorial correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Correction {
    pub date: Option<String>,
    pub location: String,
}

/// Corrections published for a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Corrections {
    pub title: u32,
    pub total_corrections: usize,
    pub corrections: Vec<Correction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body returned in place of a result when the whole request failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}
