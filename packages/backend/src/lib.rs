//! eCFR metrics backend - Word counts and agency titles from the eCFR API.
//!
//! This crate fetches regulatory text and metadata from the public eCFR API
//! (<https://www.ecfr.gov>), derives simple word-count metrics and serves
//! them as JSON for a front-end dashboard.
//!
//! # Example
//!
//! ```
//! use ecfr_backend::xml::count_words;
//! use ecfr_backend::agencies::parse_chapter;
//!
//! assert_eq!(count_words("Protection of Environment"), 3);
//! assert_eq!(parse_chapter("Chapter IV"), Some(4));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, date validation, URL builders, runtime configuration
//! - [`error`]: Error types and Result alias
//! - [`types`]: Response records
//! - [`http`]: HTTP client for the eCFR API
//! - [`xml`]: XML parsing, text extraction and word counting
//! - [`metrics`]: Word counts of a title at one or more dates
//! - [`progress`]: Percent-complete and remaining-time estimates
//! - [`snapshot`]: Word counts sampled across a date range
//! - [`agencies`]: Agency directory flattened to CFR title labels
//! - [`revisions`]: Revision dates and corrections of a title
//! - [`logging`]: Console and file logging setup
//! - [`server`]: Axum router and server

pub mod agencies;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod progress;
pub mod revisions;
pub mod server;
pub mod snapshot;
pub mod types;
pub mod xml;

// Re-export commonly used items
pub use config::{validate_date, AppConfig};
pub use error::{EcfrError, Result};
pub use http::EcfrClient;
pub use server::{router, AppState};
pub use types::{AgencyRecord, MetricRecord, SnapshotEntry, SnapshotSeries};
