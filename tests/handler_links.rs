mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{ALICE_TOKEN, BOB_TOKEN, TestApp, bearer};
use serde_json::{Value, json};

// ─── CREATE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_link_generated_code() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .post("/api/links")
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .json(&json!({ "original_url": "https://example.com/a" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    let code = body["short_code"].as_str().unwrap();
    assert!((7..=14).contains(&code.len()));
    assert_eq!(body["short_url"], format!("https://s.example.com/{code}"));
    assert_eq!(body["original_url"], "https://example.com/a");
    assert!(body["expiration_date"].is_null());

    let link = app.link(code).await;
    assert_eq!(link.owner_id, "alice");
    assert_eq!(link.clicks, 0);
    assert!(link.analytics.timestamps.is_empty());
}

#[tokio::test]
async fn test_create_link_with_alias_and_expiration() {
    let app = TestApp::new().await;
    let tomorrow = (Utc::now() + Duration::days(1)).date_naive();

    let response = app
        .server()
        .post("/api/links")
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .json(&json!({
            "original_url": "https://example.com/promo",
            "custom_alias": "promo",
            "expiration_date": tomorrow.to_string(),
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    assert_eq!(body["short_code"], "promo");
    assert_eq!(body["expiration_date"], tomorrow.to_string());
}

#[tokio::test]
async fn test_create_link_duplicate_alias() {
    let app = TestApp::new().await;
    app.create_link("promo", "https://example.com/first", "bob", None)
        .await;

    let response = app
        .server()
        .post("/api/links")
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .json(&json!({
            "original_url": "https://example.com/second",
            "custom_alias": "promo",
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["message"], "Custom alias is already in use");

    assert_eq!(app.link("promo").await.original_url, "https://example.com/first");
}

#[tokio::test]
async fn test_create_link_empty_url() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .post("/api/links")
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .json(&json!({ "original_url": "   " }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"]["message"], "Please enter a URL");
    assert!(app.links.is_empty());
}

#[tokio::test]
async fn test_create_link_invalid_url() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .post("/api/links")
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .json(&json!({ "original_url": "not a url" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "Please enter a valid URL"
    );
}

#[tokio::test]
async fn test_create_link_url_with_control_characters() {
    let app = TestApp::new().await;
    let server = app.server();

    for url in ["https://example.com/a\nb", "https://example.com/a\tb"] {
        let response = server
            .post("/api/links")
            .add_header("Authorization", bearer(ALICE_TOKEN))
            .json(&json!({ "original_url": url }))
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["error"]["message"],
            "Please enter a valid URL"
        );
    }
    assert!(app.links.is_empty());
}

#[tokio::test]
async fn test_create_link_past_expiration() {
    let app = TestApp::new().await;
    let yesterday = (Utc::now() - Duration::days(1)).date_naive();

    let response = app
        .server()
        .post("/api/links")
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .json(&json!({
            "original_url": "https://example.com",
            "expiration_date": yesterday.to_string(),
        }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "Expiration date cannot be in the past"
    );
}

#[tokio::test]
async fn test_create_link_reserved_alias() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .post("/api/links")
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .json(&json!({
            "original_url": "https://example.com",
            "custom_alias": "dashboard",
        }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_create_link_requires_token() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .post("/api/links")
        .json(&json!({ "original_url": "https://example.com" }))
        .await;

    response.assert_status_unauthorized();
    assert_eq!(response.header("www-authenticate"), "Bearer");
}

#[tokio::test]
async fn test_create_link_unknown_token() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .post("/api/links")
        .add_header("Authorization", bearer("made-up"))
        .json(&json!({ "original_url": "https://example.com" }))
        .await;

    response.assert_status_unauthorized();
}

// ─── LIST ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_only_own_links_newest_first() {
    let app = TestApp::new().await;
    app.create_link("first", "https://example.com/1", "alice", None)
        .await;
    app.create_link("second", "https://example.com/2", "alice", None)
        .await;
    app.create_link("theirs", "https://example.com/3", "bob", None)
        .await;

    let response = app
        .server()
        .get("/api/links")
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .await;

    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["pagination"]["total_items"], 2);
    assert_eq!(body["pagination"]["total_pages"], 1);

    let codes: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["short_code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["second", "first"]);
}

#[tokio::test]
async fn test_list_pagination() {
    let app = TestApp::new().await;
    for i in 0..5 {
        app.create_link(&format!("code{i}"), "https://example.com", "alice", None)
            .await;
    }

    let response = app
        .server()
        .get("/api/links")
        .add_query_param("page", 2)
        .add_query_param("page_size", 2)
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .await;

    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["total_items"], 5);
    assert_eq!(body["pagination"]["total_pages"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_rejects_oversized_page() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .get("/api/links")
        .add_query_param("page_size", 101)
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .await;

    response.assert_status_bad_request();
}

// ─── REPORT ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_report_after_visits() {
    let app = TestApp::new().await;
    app.create_link("seen", "https://example.com/seen", "alice", None)
        .await;

    let server = app.server();
    server
        .get("/seen")
        .add_header("User-Agent", "Mozilla/5.0 (iPhone) Mobile Safari/604.1")
        .await;
    server.get("/seen").add_header("User-Agent", "curl/8.0").await;

    let response = server
        .get("/api/links/seen")
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .await;

    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["clicks"], 2);
    assert_eq!(body["qr_payload"], "https://s.example.com/seen");
    assert_eq!(body["daily_clicks"].as_array().unwrap().len(), 1);
    assert_eq!(body["daily_clicks"][0]["clicks"], 2);
    assert_eq!(
        body["daily_clicks"][0]["date"],
        Utc::now().date_naive().to_string()
    );

    let devices = body["devices"].as_array().unwrap();
    let device_total: u64 = devices.iter().map(|d| d["count"].as_u64().unwrap()).sum();
    assert_eq!(device_total, 2);

    let browsers = body["browsers"].as_array().unwrap();
    assert!(browsers.iter().any(|b| b["label"] == "Safari" && b["count"] == 1));
    assert!(browsers.iter().any(|b| b["label"] == "Other" && b["count"] == 1));
}

#[tokio::test]
async fn test_report_foreign_link_not_found() {
    let app = TestApp::new().await;
    app.create_link("mine", "https://example.com", "alice", None)
        .await;

    let response = app
        .server()
        .get("/api/links/mine")
        .add_header("Authorization", bearer(BOB_TOKEN))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_report_unknown_code() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .get("/api/links/missing")
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .await;

    response.assert_status_not_found();
}
