//! E2E test: the HTTP API over the real clients

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use content_agent::web::{create_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::{MockServer, ResponseTemplate};

use crate::support::*;

async fn post_query(server: &MockServer, recipient: Option<&str>, body: Value) -> (StatusCode, Value) {
    let ctx = context(server, recipient);
    let app = create_router(AppState::new(ctx.build_flow().unwrap(), "gpt-4o-mini"));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate-content/")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_generate_content_returns_posts_and_delivery() {
    let server = MockServer::start().await;
    mock_classifier(&server, "text_only").await;
    mock_text_writer(
        &server,
        r#"{"blogs": [{"content_of_blog": "One"}, {"content_of_blog": "Two"}]}"#,
    )
    .await;
    mock_twilio(&server, ResponseTemplate::new(201).set_body_json(json!({"sid": "SMx"}))).await;

    let (status, body) = post_query(
        &server,
        Some("+15550001111"),
        json!({"user_query": "two LinkedIn posts"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"],
        json!([{"text": "One", "image": null}, {"text": "Two", "image": null}])
    );
    assert_eq!(body["delivery"], json!(["sent: SMx", "sent: SMx"]));
}

#[tokio::test]
async fn test_classifier_outage_is_empty_success() {
    let server = MockServer::start().await;
    // No chat mocks: the classifier call gets a 404 and the run routes nowhere

    let (status, body) = post_query(&server, None, json!({"user_query": "anything"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["message"], "No content was generated");
}
