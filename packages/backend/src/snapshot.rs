//! Word counts of a title sampled across a date range.

use std::time::Instant;

use chrono::{Duration, NaiveDate};

use crate::config::{validate_date, SNAPSHOT_STEP_DAYS};
use crate::error::Result;
use crate::http::EcfrClient;
use crate::metrics::title_metrics;
use crate::progress::estimate_progress;
use crate::types::{SnapshotEntry, SnapshotSeries};

/// Dates from `start` in steps of [`SNAPSHOT_STEP_DAYS`], none after `end`.
///
/// The last date is not snapped to `end`; an `end` before `start` gives no
/// dates.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use ecfr_backend::snapshot::snapshot_dates;
///
/// let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
/// assert_eq!(snapshot_dates(start, end).len(), 3);
/// ```
pub fn snapshot_dates(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let step = Duration::days(SNAPSHOT_STEP_DAYS);
    let mut dates = Vec::new();
    let mut current = Some(start);
    while let Some(date) = current.filter(|d| *d <= end) {
        dates.push(date);
        current = date.checked_add_signed(step);
    }
    dates
}

/// Measure a title at every snapshot date between `start_date` and `end_date`.
///
/// Both dates must be `YYYY-MM-DD`; otherwise nothing is fetched. Dates are
/// fetched sequentially, and every entry carries the progress made up to and
/// including it.
pub async fn range_snapshots(
    client: &EcfrClient,
    title: u32,
    start_date: &str,
    end_date: &str,
) -> Result<SnapshotSeries> {
    let start = validate_date(start_date)?;
    let end = validate_date(end_date)?;
    let dates = snapshot_dates(start, end);

    tracing::info!(
        title,
        start_date,
        end_date,
        snapshots = dates.len(),
        "fetching range snapshots"
    );

    let started = Instant::now();
    let total = dates.len();
    let mut word_counts = Vec::with_capacity(total);
    for (index, date) in dates.iter().enumerate() {
        let date = date.format("%Y-%m-%d").to_string();
        let record = title_metrics(client, title, &date).await;
        let progress = estimate_progress(index, total, started);
        tracing::debug!(
            title,
            date = %date,
            percent_complete = progress.percent_complete,
            "snapshot done"
        );
        word_counts.push(SnapshotEntry {
            date,
            count: record.word_count,
            progress,
        });
    }

    Ok(SnapshotSeries {
        title,
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
        word_counts,
    })
}
