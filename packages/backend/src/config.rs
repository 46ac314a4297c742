//! Configuration constants, validation functions and runtime configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{EcfrError, Result};

/// Base URL of the public eCFR API.
pub const ECFR_API_BASE_URL: &str = "https://www.ecfr.gov";

/// Days between two consecutive range snapshots (roughly six months).
pub const SNAPSHOT_STEP_DAYS: i64 = 182;

/// Default log file, opened in append mode.
pub const DEFAULT_LOG_FILE: &str = "ecfr_app.log";

/// Default listen address of the HTTP server.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Date pattern: YYYY-MM-DD, month and day may drop their leading zero.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").expect("valid regex"));

/// Validate and parse a date string (YYYY-MM-DD).
///
/// # Returns
/// * `Ok(NaiveDate)` if the string is a real calendar date
/// * `Err(EcfrError::InvalidDate)` otherwise
///
/// # Examples
/// ```
/// use ecfr_backend::config::validate_date;
///
/// assert!(validate_date("2024-01-01").is_ok());
/// assert!(validate_date("invalid").is_err());
/// assert!(validate_date("2024-13-01").is_err()); // Invalid month
/// ```
pub fn validate_date(date_str: &str) -> Result<NaiveDate> {
    if !DATE_PATTERN.is_match(date_str) {
        return Err(EcfrError::InvalidDate(date_str.to_string()));
    }

    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| EcfrError::InvalidDate(date_str.to_string()))
}

/// Build the full-text XML URL of a title as of a date.
///
/// The date is inserted verbatim; the upstream decides whether it exists.
///
/// # Examples
/// ```
/// use ecfr_backend::config::full_text_url;
///
/// assert_eq!(
///     full_text_url("https://www.ecfr.gov", 10, "2024-01-01"),
///     "https://www.ecfr.gov/api/versioner/v1/full/2024-01-01/title-10.xml"
/// );
/// ```
pub fn full_text_url(base_url: &str, title: u32, date: &str) -> String {
    format!(
        "{}/api/versioner/v1/full/{date}/title-{title}.xml",
        base_url.trim_end_matches('/')
    )
}

/// Build the agency directory URL.
pub fn agencies_url(base_url: &str) -> String {
    format!("{}/api/admin/v1/agencies.json", base_url.trim_end_matches('/'))
}

/// Build the revision dates URL of a title.
pub fn revision_dates_url(base_url: &str, title: u32) -> String {
    format!(
        "{}/api/versioner/v1/revision_dates/title-{title}.json",
        base_url.trim_end_matches('/')
    )
}

/// Build the corrections URL of a title.
pub fn corrections_url(base_url: &str, title: u32) -> String {
    format!(
        "{}/api/admin/v1/corrections/title/{title}.json",
        base_url.trim_end_matches('/')
    )
}

/// Runtime configuration of the HTTP server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub bind_addr: SocketAddr,
    pub log_file: PathBuf,
    /// Upstream request timeout. `None` keeps the client default (no timeout).
    pub http_timeout: Option<Duration>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("ECFR_API_BASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| ECFR_API_BASE_URL.to_string());
        url::Url::parse(&api_base_url).map_err(|e| {
            EcfrError::Config(format!("ECFR_API_BASE_URL '{api_base_url}' is invalid: {e}"))
        })?;

        let bind_addr = lookup("ECFR_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr: SocketAddr = bind_addr.parse().map_err(|_| {
            EcfrError::Config(format!("ECFR_BIND_ADDR '{bind_addr}' is not a socket address"))
        })?;

        let log_file = lookup("ECFR_LOG_FILE")
            .unwrap_or_else(|| DEFAULT_LOG_FILE.into())
            .into();

        let http_timeout = match lookup("ECFR_HTTP_TIMEOUT_SECS") {
            Some(v) => {
                let secs: u64 = v.parse().map_err(|_| {
                    EcfrError::Config(format!("ECFR_HTTP_TIMEOUT_SECS '{v}' is not a number"))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            api_base_url,
            bind_addr,
            log_file,
            http_timeout,
        })
    }
}
