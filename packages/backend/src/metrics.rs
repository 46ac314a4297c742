//! Word counts of full CFR titles.
//!
//! The full text of a title as of a date is downloaded as XML, flattened
//! and counted. Failures never escape: they become the `error` field of
//! the returned [`MetricRecord`].

use crate::config::full_text_url;
use crate::error::{EcfrError, Result};
use crate::http::EcfrClient;
use crate::types::MetricRecord;
use crate::xml::{decode_document, word_count_of};

/// Download the full XML text of a title at a specific date.
pub async fn download_full_text(client: &EcfrClient, title: u32, date: &str) -> Result<String> {
    let url = full_text_url(client.base_url(), title, date);
    let bytes = client
        .download_bytes(&url, "application/xml")
        .await
        .map_err(|e| {
            if let EcfrError::Http(source) = e {
                EcfrError::FullTextDownload {
                    title,
                    date: date.to_string(),
                    source,
                }
            } else {
                e
            }
        })?;

    decode_document(bytes)
}

/// Count the words of a title at a specific date.
pub async fn fetch_word_count(client: &EcfrClient, title: u32, date: &str) -> Result<usize> {
    let xml = download_full_text(client, title, date).await?;
    word_count_of(&xml)
}

/// Measure a title at a date, capturing any failure in the record.
pub async fn title_metrics(client: &EcfrClient, title: u32, date: &str) -> MetricRecord {
    match fetch_word_count(client, title, date).await {
        Ok(word_count) => {
            tracing::info!(title, date, word_count, "counted title words");
            MetricRecord::counted(title, date, word_count)
        }
        Err(e) => {
            tracing::warn!(title, date, error = %e, "failed to count title words");
            MetricRecord::failed(title, date, e)
        }
    }
}

/// Measure a title at each of the given dates, one after the other.
///
/// Records come back in input order; one failing date does not affect the
/// others.
pub async fn title_history(client: &EcfrClient, title: u32, dates: &[String]) -> Vec<MetricRecord> {
    let mut records = Vec::with_capacity(dates.len());
    for date in dates {
        records.push(title_metrics(client, title, date).await);
    }
    records
}
