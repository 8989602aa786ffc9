#![cfg(feature = "http-server")]

//! HTTP API integration tests driven through the router.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use sitehours_rust::db::repositories::LocalRepository;
use sitehours_rust::http::{create_router, AppState};
use sitehours_rust::notify::LogNotifier;

fn app() -> axum::Router {
    let repo = Arc::new(LocalRepository::new())
        as Arc<dyn sitehours_rust::db::repository::FullRepository>;
    create_router(AppState::new(repo, Arc::new(LogNotifier)))
}

fn weekday_entries(closed: &[&str]) -> String {
    let names = [
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
    ];
    let entries: Vec<String> = names
        .iter()
        .map(|name| {
            format!(
                r#"{{"weekday": "{}", "is_open": {}}}"#,
                name,
                !closed.contains(name)
            )
        })
        .collect();
    format!("[{}]", entries.join(","))
}

fn site_body(name: &str, closed: &[&str], exceptions_json: &str) -> String {
    format!(
        r#"{{"name": "{}", "opening_weekdays": {}, "opening_exceptions": {}}}"#,
        name,
        weekday_entries(closed),
        exceptions_json
    )
}

async fn send_json(app: &axum::Router, method: &str, uri: &str, body: Option<String>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => {
            builder = builder.header("content-type", "application/json");
            builder.body(Body::from(body)).unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = app();
    let (status, body) = send_json(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn create_site_then_query_availability() {
    let app = app();

    let body = site_body(
        "Central",
        &["saturday", "sunday"],
        r#"[{"title": "Open house", "start_date": "2000-01-08", "end_date": "2000-01-08", "is_open": true}]"#,
    );
    let (status, created) = send_json(&app, "POST", "/v1/sites", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    let site_id = created["site_id"].as_i64().unwrap();

    // Saturday with an open-house exception is open.
    let (status, open) = send_json(
        &app,
        "GET",
        &format!("/v1/sites/{}/open?date=2000-01-08", site_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(open["is_open"], true);

    // A closed Saturday rolls forward to Monday.
    let (status, next) = send_json(
        &app,
        "GET",
        &format!("/v1/sites/{}/next-open?from=2000-01-15", site_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(next["next_open"], "2000-01-17");
}

#[tokio::test]
async fn invalid_schedule_is_a_bad_request() {
    let app = app();

    // Overlapping exceptions.
    let body = site_body(
        "Broken",
        &[],
        r#"[
            {"start_date": "2000-01-01", "end_date": "2000-01-05", "is_open": false},
            {"start_date": "2000-01-04", "end_date": "2000-01-08", "is_open": true}
        ]"#,
    );
    let (status, error) = send_json(&app, "POST", "/v1/sites", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");

    // Nothing was stored.
    let (_, listing) = send_json(&app, "GET", "/v1/sites", None).await;
    assert_eq!(listing["total"], 0);
}

#[tokio::test]
async fn unknown_weekday_name_is_rejected_by_deserialization() {
    let app = app();

    let body = r#"{
        "name": "Typo",
        "opening_weekdays": [{"weekday": "foobar", "is_open": true}],
        "opening_exceptions": []
    }"#;
    let (status, _) = send_json(&app, "POST", "/v1/sites", Some(body.to_string())).await;
    // Axum's Json extractor rejects the payload before the handler runs.
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn missing_site_is_not_found() {
    let app = app();
    let (status, error) = send_json(&app, "GET", "/v1/sites/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NOT_FOUND");
}

#[tokio::test]
async fn loan_creation_requires_an_existing_site() {
    let app = app();

    let loan = r#"{
        "patron_id": "patron-1",
        "pickup_site_id": 7,
        "state": "active",
        "end_date": "2000-06-01"
    }"#;
    let (status, _) = send_json(&app, "POST", "/v1/loans", Some(loan.to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn batch_job_runs_to_completion() {
    let app = app();

    let body = site_body("Jobsite", &[], "[]");
    let (status, _) = send_json(&app, "POST", "/v1/sites", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, run) = send_json(&app, "POST", "/v1/tasks/clean-exceptions", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let job_id = run["job_id"].as_str().unwrap().to_string();

    // The job is tiny; poll briefly until it leaves the running state.
    let mut status_value = String::new();
    for _ in 0..50 {
        let (code, job) = send_json(&app, "GET", &format!("/v1/jobs/{}", job_id), None).await;
        assert_eq!(code, StatusCode::OK);
        status_value = job["status"].as_str().unwrap_or_default().to_string();
        if status_value != "running" {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(status_value, "completed");
}
