//! Axum router exposing the metrics as JSON endpoints.
//!
//! Endpoints:
//! - GET /                  → liveness message
//! - GET /metrics           → word count of a title at a date
//! - GET /metrics/range     → word counts sampled across a date range
//! - GET /history           → word counts at several dates
//! - GET /wordcount         → word count of a title at a date
//! - GET /agencies          → all agencies with their CFR titles
//! - GET /agencies/search   → agencies whose name matches `q`
//! - GET /revision_dates    → revision dates of a title
//! - GET /corrections       → corrections of a title
//!
//! Upstream and date failures are reported in the body (`error`), always
//! with status 200.

use axum::extract::{Query, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::agencies::{list_agencies, search_agencies};
use crate::config::AppConfig;
use crate::error::Result;
use crate::http::{create_client, EcfrClient};
use crate::metrics::{title_history, title_metrics};
use crate::revisions::{title_corrections, title_revision_dates};
use crate::snapshot::range_snapshots;
use crate::types::{AgencyRecord, Corrections, ErrorBody, MetricRecord, RevisionDates};

/// Title used when a request does not name one.
pub const DEFAULT_TITLE: u32 = 10;

/// Date used by `/metrics` when the request does not name one.
pub const DEFAULT_DATE: &str = "2024-01-01";

/// Message returned by `GET /`.
pub const ALIVE_MESSAGE: &str = "ECFR backend is alive";

#[derive(Debug, Clone)]
pub struct AppState {
    pub client: EcfrClient,
}

impl AppState {
    pub fn new(client: EcfrClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http = create_client(config.http_timeout)?;
        Ok(Self::new(EcfrClient::new(http, config.api_base_url.clone())))
    }
}

fn default_title() -> u32 {
    DEFAULT_TITLE
}

fn default_date() -> String {
    DEFAULT_DATE.to_string()
}

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    #[serde(default = "default_title")]
    pub title: u32,
    #[serde(default = "default_date")]
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct WordCountQuery {
    pub title: u32,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub title: u32,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Serialize)]
struct Alive {
    message: &'static str,
}

/// Build the application router with CORS open to any origin.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/metrics", get(metrics))
        .route("/metrics/range", get(metrics_range))
        .route("/history", get(history))
        .route("/wordcount", get(word_count))
        .route("/agencies", get(agencies))
        .route("/agencies/search", get(agencies_search))
        .route("/revision_dates", get(revision_dates))
        .route("/corrections", get(corrections))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &AppConfig) -> Result<()> {
    let app = router(AppState::from_config(config)?);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        upstream = %config.api_base_url,
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

async fn root() -> Json<Alive> {
    Json(Alive {
        message: ALIVE_MESSAGE,
    })
}

async fn metrics(
    State(state): State<AppState>,
    Query(params): Query<MetricsQuery>,
) -> Json<MetricRecord> {
    Json(title_metrics(&state.client, params.title, &params.date).await)
}

async fn word_count(
    State(state): State<AppState>,
    Query(params): Query<WordCountQuery>,
) -> Json<MetricRecord> {
    Json(title_metrics(&state.client, params.title, &params.date).await)
}

async fn metrics_range(
    State(state): State<AppState>,
    Query(params): Query<RangeQuery>,
) -> Response {
    match range_snapshots(
        &state.client,
        params.title,
        &params.start_date,
        &params.end_date,
    )
    .await
    {
        Ok(series) => Json(series).into_response(),
        Err(e) => {
            tracing::warn!(title = params.title, error = %e, "rejected range request");
            Json(ErrorBody::new(e)).into_response()
        }
    }
}

/// Parameters of `/history`: a title and any number of repeated `dates`.
#[derive(Debug, PartialEq, Eq)]
pub struct HistoryParams {
    pub title: u32,
    pub dates: Vec<String>,
}

impl HistoryParams {
    /// Parse a raw query string, keeping repeated `dates` in order.
    pub fn parse(query: Option<&str>) -> std::result::Result<Self, String> {
        let mut title = DEFAULT_TITLE;
        let mut dates = Vec::new();

        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "title" => {
                    title = value
                        .parse()
                        .map_err(|_| format!("title must be an integer, got '{value}'"))?;
                }
                "dates" => dates.push(value.into_owned()),
                _ => {}
            }
        }

        if dates.is_empty() {
            return Err("missing required query parameter 'dates'".to_string());
        }
        Ok(Self { title, dates })
    }
}

async fn history(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> std::result::Result<Json<Vec<MetricRecord>>, (StatusCode, String)> {
    let params = HistoryParams::parse(query.as_deref())
        .map_err(|message| (StatusCode::BAD_REQUEST, message))?;
    Ok(Json(
        title_history(&state.client, params.title, &params.dates).await,
    ))
}

/// Agency records, or the error that prevented loading the directory.
fn agency_response(result: Result<Vec<AgencyRecord>>) -> Response {
    match result {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to load agency directory");
            Json(ErrorBody::new(e)).into_response()
        }
    }
}

async fn agencies(State(state): State<AppState>) -> Response {
    agency_response(list_agencies(&state.client).await)
}

async fn agencies_search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Response {
    agency_response(search_agencies(&state.client, &params.q).await)
}

async fn revision_dates(
    State(state): State<AppState>,
    Query(params): Query<TitleQuery>,
) -> Json<RevisionDates> {
    Json(title_revision_dates(&state.client, params.title).await)
}

async fn corrections(
    State(state): State<AppState>,
    Query(params): Query<TitleQuery>,
) -> Json<Corrections> {
    Json(title_corrections(&state.client, params.title).await)
}
