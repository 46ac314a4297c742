//! End-to-end tests of the HTTP surface against a mocked eCFR API.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use ecfr_backend::http::create_client;
use ecfr_backend::{router, AppState, EcfrClient};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MOCK_TITLE_XML: &str = r#"
    <root>
        <section>This is a test of the ECFR API XML mock response.</section>
        <section>Second section with more words here.</section>
    </root>
"#;

const SNAPSHOT_XML: &str = r#"
    <ECFR_TITLE>
        <SECTION>This is example regulation text.</SECTION>
        <SECTION>Additional content here.</SECTION>
    </ECFR_TITLE>
"#;

fn app_for(server: &MockServer) -> Router {
    let client = EcfrClient::new(create_client(None).expect("client"), server.uri());
    router(AppState::new(client))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).expect("json body");
    (status, body)
}

fn agency_directory() -> Value {
    json!({
        "agencies": [
            {
                "name": "Department of Energy",
                "cfr_references": [
                    {"title": 10, "chapter": "II"},
                    {"title": 10, "chapter": "III"}
                ],
                "children": [
                    {
                        "name": "Federal Energy Regulatory Commission",
                        "cfr_references": [{"title": 18, "chapter": "Chapter I"}]
                    }
                ]
            },
            {
                "name": "Agriculture Department",
                "cfr_references": [{"title": 7}, {"title": 7, "chapter": "XLII-A"}]
            }
        ]
    })
}

async fn mount_title(server: &MockServer, title: u32, date: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/versioner/v1/full/{date}/title-{title}.xml")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_root_route() {
    let server = MockServer::start().await;
    let (status, body) = get_json(app_for(&server), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "ECFR backend is alive"}));
}

#[tokio::test]
async fn test_metrics_counts_words() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/versioner/v1/full/2024-01-01/title-10.xml"))
        .and(header("accept", "application/xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MOCK_TITLE_XML))
        .mount(&server)
        .await;

    // Defaults: title 10 at 2024-01-01.
    let (status, body) = get_json(app_for(&server), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"title": 10, "date": "2024-01-01", "word_count": 16})
    );
}

#[tokio::test]
async fn test_metrics_upstream_failure_is_in_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (status, body) = get_json(app_for(&server), "/metrics?title=3&date=2020-05-05").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], 3);
    assert_eq!(body["date"], "2020-05-05");
    assert_eq!(body["word_count"], Value::Null);
    assert!(body["error"].as_str().expect("error").contains("title 3"));
}

#[tokio::test]
async fn test_metrics_malformed_document() {
    let server = MockServer::start().await;
    mount_title(&server, 10, "2024-01-01", "<root><open></root>").await;

    let (_, body) = get_json(app_for(&server), "/metrics?title=10&date=2024-01-01").await;
    assert_eq!(body["word_count"], Value::Null);
    assert!(body["error"]
        .as_str()
        .expect("error")
        .starts_with("XML parsing failed"));
}

#[tokio::test]
async fn test_metrics_echoes_date_verbatim() {
    let server = MockServer::start().await;
    let (_, body) = get_json(app_for(&server), "/metrics?title=10&date=not-a-date").await;
    assert_eq!(body["date"], "not-a-date");
    assert_eq!(body["word_count"], Value::Null);
}

#[tokio::test]
async fn test_wordcount_uses_null_sentinel() {
    let server = MockServer::start().await;
    mount_title(&server, 40, "2023-03-01", MOCK_TITLE_XML).await;

    let (_, ok) = get_json(app_for(&server), "/wordcount?title=40&date=2023-03-01").await;
    assert_eq!(ok, json!({"title": 40, "date": "2023-03-01", "word_count": 16}));

    let (_, failed) = get_json(app_for(&server), "/wordcount?title=40&date=2023-03-02").await;
    assert_eq!(failed["word_count"], Value::Null);
    assert!(failed["error"].is_string());
}

#[tokio::test]
async fn test_metrics_range_with_mocked_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/versioner/v1/full/[0-9-]+/title-10\.xml$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SNAPSHOT_XML))
        .mount(&server)
        .await;

    let (status, body) = get_json(
        app_for(&server),
        "/metrics/range?title=10&start_date=2022-01-01&end_date=2023-01-01",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], 10);
    assert_eq!(body["start_date"], "2022-01-01");
    assert_eq!(body["end_date"], "2023-01-01");

    let entries = body["word_counts"].as_array().expect("word_counts");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["date"], "2022-01-01");
    for entry in entries {
        assert_eq!(entry["count"], 7);
        assert!(entry.get("estimated_time_remaining").is_some());
    }
    assert_eq!(entries[0]["percent_complete"], 33.33);
    assert_eq!(entries[2]["percent_complete"], 100.0);
}

#[tokio::test]
async fn test_metrics_range_isolates_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/versioner/v1/full/2022-07-02/title-10.xml"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/versioner/v1/full/[0-9-]+/title-10\.xml$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SNAPSHOT_XML))
        .mount(&server)
        .await;

    let (_, body) = get_json(
        app_for(&server),
        "/metrics/range?title=10&start_date=2022-01-01&end_date=2023-01-01",
    )
    .await;
    let counts: Vec<Value> = body["word_counts"]
        .as_array()
        .expect("word_counts")
        .iter()
        .map(|e| e["count"].clone())
        .collect();
    assert_eq!(counts, vec![json!(7), Value::Null, json!(7)]);
}

#[tokio::test]
async fn test_metrics_counts_text_around_comments() {
    let server = MockServer::start().await;
    mount_title(
        &server,
        21,
        "2024-01-01",
        "<ECFR><?xpp qa?><P>alpha<!-- editorial -->beta gamma</P></ECFR>",
    )
    .await;

    let (_, body) = get_json(app_for(&server), "/metrics?title=21&date=2024-01-01").await;
    assert_eq!(body["word_count"], 2);
}

#[tokio::test]
async fn test_metrics_range_accepts_unpadded_dates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/versioner/v1/full/[0-9-]+/title-10\.xml$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SNAPSHOT_XML))
        .mount(&server)
        .await;

    let (_, body) = get_json(
        app_for(&server),
        "/metrics/range?title=10&start_date=2022-1-1&end_date=2023-1-1",
    )
    .await;
    assert_eq!(body["start_date"], "2022-1-1");
    let entries = body["word_counts"].as_array().expect("word_counts");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["date"], "2022-01-01");
}

#[tokio::test]
async fn test_metrics_range_invalid_date() {
    let server = MockServer::start().await;
    let (status, body) = get_json(
        app_for(&server),
        "/metrics/range?title=10&start_date=2022-13-01&end_date=2023-01-01",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["error"]
        .as_str()
        .expect("error")
        .starts_with("Invalid date format"));
    assert!(body.get("word_counts").is_none());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_history_keeps_order_and_isolates_failures() {
    let server = MockServer::start().await;
    mount_title(&server, 10, "2022-01-01", MOCK_TITLE_XML).await;

    let (status, body) = get_json(
        app_for(&server),
        "/history?title=10&dates=2022-01-01&dates=2023-01-01",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let records = body.as_array().expect("list");
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0],
        json!({"title": 10, "date": "2022-01-01", "word_count": 16})
    );
    assert_eq!(records[1]["date"], "2023-01-01");
    assert_eq!(records[1]["word_count"], Value::Null);
    assert!(records[1]["error"].is_string());
}

#[tokio::test]
async fn test_agencies_lists_labels() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/v1/agencies.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(agency_directory()))
        .mount(&server)
        .await;

    let (status, body) = get_json(app_for(&server), "/agencies").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {
                "agency": "Department of Energy",
                "titles": [
                    "Title 10 CFR Chapter 2",
                    "Title 10 CFR Chapter 3",
                    "Title 18 CFR Chapter 1"
                ]
            },
            {
                "agency": "Agriculture Department",
                "titles": ["Title 7", "Title 7 CFR XLII-A"]
            }
        ])
    );
}

#[tokio::test]
async fn test_agency_search_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/v1/agencies.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(agency_directory()))
        .mount(&server)
        .await;

    let (_, body) = get_json(app_for(&server), "/agencies/search?q=energy").await;
    let agencies = body.as_array().expect("list");
    assert_eq!(agencies.len(), 1);
    assert_eq!(agencies[0]["agency"], "Department of Energy");
}

#[tokio::test]
async fn test_agency_search_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/v1/agencies.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(agency_directory()))
        .mount(&server)
        .await;

    let (status, body) = get_json(app_for(&server), "/agencies/search?q=xyznotreal").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_agencies_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/v1/agencies.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let (status, body) = get_json(app_for(&server), "/agencies").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["error"]
        .as_str()
        .expect("error")
        .starts_with("JSON decoding failed"));
}

#[tokio::test]
async fn test_revision_dates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/versioner/v1/revision_dates/title-10.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "revision_dates": ["2022-01-01", "2022-07-01", "2023-01-01"]
        })))
        .mount(&server)
        .await;

    let (_, body) = get_json(app_for(&server), "/revision_dates?title=10").await;
    assert_eq!(
        body,
        json!({
            "title": 10,
            "revision_dates": ["2022-01-01", "2022-07-01", "2023-01-01"]
        })
    );

    let (_, failed) = get_json(app_for(&server), "/revision_dates?title=11").await;
    assert_eq!(failed["revision_dates"], json!([]));
    assert!(failed["error"].is_string());
}

#[tokio::test]
async fn test_corrections() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/v1/corrections/title/10.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ecfr_corrections": [
                {
                    "error_corrected": "2023-05-04",
                    "cfr_references": [{"cfr_reference": "10 CFR 431.97"}]
                },
                {"error_corrected": "2021-11-30"}
            ]
        })))
        .mount(&server)
        .await;

    let (_, body) = get_json(app_for(&server), "/corrections?title=10").await;
    assert_eq!(
        body,
        json!({
            "title": 10,
            "total_corrections": 2,
            "corrections": [
                {"date": "2023-05-04", "location": "10 CFR 431.97"},
                {"date": "2021-11-30", "location": "Unknown location"}
            ]
        })
    );

    let (_, failed) = get_json(app_for(&server), "/corrections?title=99").await;
    assert_eq!(failed["total_corrections"], 0);
    assert_eq!(failed["corrections"], json!([]));
    assert!(failed["error"].is_string());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let server = MockServer::start().await;
    let response = app_for(&server)
        .oneshot(
            Request::builder()
                .uri("/")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
