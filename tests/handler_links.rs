mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;

use linkhop::api::dto::link::LinkResponse;
use linkhop::domain::repositories::LinkRepository;
use linkhop::error::AppError;

// ─── CREATE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_link_with_random_code() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com/some/long/path" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let link = response.json::<LinkResponse>();
    assert_eq!(link.short_code.len(), 6);
    assert!(link.short_code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(link.original_url, "https://example.com/some/long/path");
    assert_eq!(link.clicks, 0);
    assert!(link.last_clicked_at.is_none());
}

#[tokio::test]
async fn test_create_link_response_is_camel_case() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com", "code": "camel01" }))
        .await;

    let json = response.json::<Value>();
    assert_eq!(json["shortCode"], "camel01");
    assert_eq!(json["originalUrl"], "https://example.com");
    assert_eq!(json["clicks"], 0);
    assert!(json["lastClickedAt"].is_null());
    assert!(json["createdAt"].is_string());
    assert!(json["id"].is_i64());
}

#[tokio::test]
async fn test_create_link_with_custom_code() {
    let (state, repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com", "code": "promo24" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<LinkResponse>().short_code, "promo24");
    assert_eq!(repo.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_link_keeps_url_verbatim() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);
    let url = "HTTPS://Example.COM/Path?b=2&a=1#frag";

    let response = server.post("/api/links").json(&json!({ "url": url })).await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<LinkResponse>().original_url, url);
}

#[tokio::test]
async fn test_create_link_empty_code_means_random() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com", "code": "" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<LinkResponse>().short_code.len(), 6);
}

#[tokio::test]
async fn test_create_link_invalid_url() {
    let (state, repo) = common::create_test_state();
    let server = common::create_test_server(state);

    for body in [
        json!({ "url": "not-a-url" }),
        json!({ "url": "ftp://example.com/file" }),
        json!({ "url": "" }),
        json!({ "url": 42 }),
        json!({}),
    ] {
        let response = server.post("/api/links").json(&body).await;

        response.assert_status_bad_request();
        let json = response.json::<Value>();
        assert_eq!(json["code"], "invalid_url", "body: {body}");
        assert!(json["error"].is_string());
    }

    assert!(repo.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_link_invalid_code_format() {
    let (state, repo) = common::create_test_state();
    let server = common::create_test_server(state);

    for code in [json!("abc"), json!("toolong99"), json!("bad-code"), json!(123456)] {
        let response = server
            .post("/api/links")
            .json(&json!({ "url": "https://example.com", "code": code }))
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["code"],
            "invalid_code_format",
            "code: {code}"
        );
    }

    assert!(repo.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_link_invalid_url_checked_before_code() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "nope", "code": "x" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["code"], "invalid_url");
}

#[tokio::test]
async fn test_create_link_duplicate_code_conflicts() {
    let (state, repo) = common::create_test_state();
    common::create_test_link(&repo, "taken1", "https://first.example").await;
    let server = common::create_test_server(state);

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://second.example", "code": "taken1" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["code"], "code_conflict");

    let kept = repo.find_by_code("taken1").await.unwrap().unwrap();
    assert_eq!(kept.original_url, "https://first.example");
}

#[tokio::test]
async fn test_create_link_malformed_body() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server
        .post("/api/links")
        .json(&json!("just a string"))
        .await;
    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["code"], "bad_request");

    let response = server.post("/api/links").text("url=https://example.com").await;
    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["code"], "bad_request");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_of_same_code_have_one_winner() {
    let (state, repo) = common::create_test_state();

    let mut handles = Vec::new();
    for i in 0..50 {
        let service = Arc::clone(&state.link_service);
        handles.push(tokio::spawn(async move {
            service
                .create_link(&format!("https://example.com/{i}"), Some("race01"))
                .await
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(link) => {
                assert_eq!(link.short_code, "race01");
                created += 1;
            }
            Err(AppError::CodeConflict { .. }) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 49);
    assert_eq!(repo.list_all().await.unwrap().len(), 1);
}

// ─── LIST / GET ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_links_empty() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server.get("/api/links").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_list_links_newest_first() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    for code in ["first1", "second"] {
        server
            .post("/api/links")
            .json(&json!({ "url": "https://example.com", "code": code }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let links = server.get("/api/links").await.json::<Vec<LinkResponse>>();
    let codes: Vec<&str> = links.iter().map(|l| l.short_code.as_str()).collect();

    assert_eq!(codes, vec!["second", "first1"]);
}

#[tokio::test]
async fn test_get_link() {
    let (state, repo) = common::create_test_state();
    let created = common::create_test_link(&repo, "get001", "https://example.com").await;
    let server = common::create_test_server(state);

    let response = server.get("/api/links/get001").await;

    response.assert_status_ok();
    assert_eq!(response.json::<LinkResponse>(), LinkResponse::from(created));
}

#[tokio::test]
async fn test_get_link_not_found() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server.get("/api/links/nothere").await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["code"], "not_found");
}

// ─── DELETE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_link_success() {
    let (state, repo) = common::create_test_state();
    common::create_test_link(&repo, "del001", "https://example.com").await;
    let server = common::create_test_server(state);

    let response = server.delete("/api/links/del001").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "ok": true }));

    server.get("/del001").await.assert_status_not_found();
    server.get("/api/links/del001").await.assert_status_not_found();
}

#[tokio::test]
async fn test_delete_link_twice() {
    let (state, repo) = common::create_test_state();
    common::create_test_link(&repo, "del002", "https://example.com").await;
    let server = common::create_test_server(state);

    server.delete("/api/links/del002").await.assert_status_ok();
    server
        .delete("/api/links/del002")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_deleted_code_can_be_reused() {
    let (state, repo) = common::create_test_state();
    common::create_test_link(&repo, "reuse1", "https://old.example").await;
    let server = common::create_test_server(state);

    server.delete("/api/links/reuse1").await.assert_status_ok();

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://new.example", "code": "reuse1" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let link = response.json::<LinkResponse>();
    assert_eq!(link.original_url, "https://new.example");
    assert_eq!(link.clicks, 0);
}
