//! Revision history of a title: revision dates and editorial corrections.

use serde::Deserialize;

use crate::config::{corrections_url, revision_dates_url};
use crate::error::Result;
use crate::http::EcfrClient;
use crate::types::{Correction, Corrections, RevisionDates};

/// Location reported for a correction without CFR references.
pub const UNKNOWN_LOCATION: &str = "Unknown location";

#[derive(Debug, Deserialize)]
struct RevisionDatesResponse {
    #[serde(default)]
    revision_dates: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CorrectionsResponse {
    #[serde(default)]
    ecfr_corrections: Vec<UpstreamCorrection>,
}

#[derive(Debug, Deserialize)]
struct UpstreamCorrection {
    error_corrected: Option<String>,
    #[serde(default)]
    cfr_references: Vec<CorrectionReference>,
}

#[derive(Debug, Deserialize)]
struct CorrectionReference {
    cfr_reference: Option<String>,
}

impl From<UpstreamCorrection> for Correction {
    fn from(item: UpstreamCorrection) -> Self {
        let location = item
            .cfr_references
            .into_iter()
            .next()
            .and_then(|r| r.cfr_reference)
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());
        Correction {
            date: item.error_corrected,
            location,
        }
    }
}

/// Download the revision dates of a title.
pub async fn download_revision_dates(client: &EcfrClient, title: u32) -> Result<Vec<String>> {
    let url = revision_dates_url(client.base_url(), title);
    let response: RevisionDatesResponse = client.fetch_json(&url).await?;
    Ok(response.revision_dates)
}

/// Download the corrections of a title.
pub async fn download_corrections(client: &EcfrClient, title: u32) -> Result<Vec<Correction>> {
    let url = corrections_url(client.base_url(), title);
    let response: CorrectionsResponse = client.fetch_json(&url).await?;
    Ok(response
        .ecfr_corrections
        .into_iter()
        .map(Correction::from)
        .collect())
}

/// Revision dates of a title; a failure yields an empty list plus `error`.
pub async fn title_revision_dates(client: &EcfrClient, title: u32) -> RevisionDates {
    match download_revision_dates(client, title).await {
        Ok(revision_dates) => RevisionDates {
            title,
            revision_dates,
            error: None,
        },
        Err(e) => {
            tracing::warn!(title, error = %e, "failed to fetch revision dates");
            RevisionDates {
                title,
                revision_dates: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

/// Corrections of a title; a failure yields zero corrections plus `error`.
pub async fn title_corrections(client: &EcfrClient, title: u32) -> Corrections {
    match download_corrections(client, title).await {
        Ok(corrections) => Corrections {
            title,
            total_corrections: corrections.len(),
            corrections,
            error: None,
        },
        Err(e) => {
            tracing::warn!(title, error = %e, "failed to fetch corrections");
            Corrections {
                title,
                total_corrections: 0,
                corrections: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}
