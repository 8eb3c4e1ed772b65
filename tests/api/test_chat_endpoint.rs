// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Request handling of /api/chat: methods, validation, normalization, errors

use super::common::{post_chat, router, router_with_timeout, send, Behaviour, MockStage};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use std::time::Duration;
use tower::ServiceExt;

#[tokio::test]
async fn test_non_post_methods_are_rejected() {
    for method in ["GET", "PUT", "DELETE", "PATCH", "OPTIONS", "HEAD"] {
        let primary = MockStage::replying("unused");
        let fallback = MockStage::replying("unused");
        let request = Request::builder()
            .method(method)
            .uri("/api/chat")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(router(primary.clone(), fallback.clone()), request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "method {}", method);
        // HEAD responses carry no body
        if method != "HEAD" {
            assert_eq!(body["error"], "Method not allowed");
        }
        assert_eq!(primary.call_count(), 0);
        assert_eq!(fallback.call_count(), 0);
    }
}

#[tokio::test]
async fn test_cors_preflight_is_rejected() {
    let primary = MockStage::replying("unused");
    let fallback = MockStage::replying("unused");
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/chat")
        .header(header::ORIGIN, "https://app.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(router(primary.clone(), fallback), request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");
    assert_eq!(primary.call_count(), 0);
}

#[tokio::test]
async fn test_missing_or_empty_question_is_bad_request() {
    for body in [
        r#"{}"#,
        r#"{"question": ""}"#,
        r#"{"question": "   \n  "}"#,
        r#"{"history": [["a", "b"]]}"#,
        "not json at all",
        "",
    ] {
        let primary = MockStage::replying("unused");
        let (status, response) =
            send(router(primary.clone(), MockStage::replying("unused")), post_chat(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", body);
        assert_eq!(response["message"], "No question in the request");
        assert_eq!(primary.call_count(), 0);
    }
}

#[tokio::test]
async fn test_question_is_normalized_before_dispatch() {
    let primary = MockStage::replying("fine");
    let body = json!({"question": "\n  Line one\nline two\r\nline three  \n"}).to_string();

    let (status, _) = send(router(primary.clone(), MockStage::replying("unused")), post_chat(&body)).await;

    assert_eq!(status, StatusCode::OK);
    let calls = primary.calls.lock().unwrap();
    let question = &calls[0].0;
    assert_eq!(question, "Line one line two line three");
    assert!(!question.contains('\n'));
}

#[tokio::test]
async fn test_omitted_history_is_empty_for_both_stages() {
    let primary = MockStage::replying("ANSWER NOT FOUND");
    let fallback = MockStage::replying("Based on our conversation and Google search, ok.");

    let (status, _) = send(
        router(primary.clone(), fallback.clone()),
        post_chat(r#"{"question": "anything?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(primary.calls.lock().unwrap()[0].1.is_empty());
    assert!(fallback.calls.lock().unwrap()[0].1.is_empty());
}

#[tokio::test]
async fn test_history_is_passed_to_stages() {
    let primary = MockStage::replying("Yes.");
    let body = json!({
        "question": "Is it covered?",
        "history": [["What is the warranty?", "Two years."]]
    })
    .to_string();

    send(router(primary.clone(), MockStage::replying("unused")), post_chat(&body)).await;

    let calls = primary.calls.lock().unwrap();
    assert_eq!(calls[0].1.len(), 2);
    assert_eq!(
        calls[0].1.to_prompt_string(),
        "Human: What is the warranty?\nAssistant: Two years."
    );
}

#[tokio::test]
async fn test_primary_failure_is_server_error_with_message() {
    let fallback = MockStage::replying("unused");
    let primary = MockStage::new(Behaviour::Fail("Index not found: pdf-index".to_string()));

    let (status, body) = send(
        router(primary, fallback.clone()),
        post_chat(r#"{"question": "q"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Index not found: pdf-index");
    assert_eq!(body["retryable"], true);
    assert!(body["requestId"].is_string());
    assert_eq!(fallback.call_count(), 0);
}

#[tokio::test]
async fn test_fallback_failure_is_server_error_with_message() {
    let primary = MockStage::replying("ANSWER NOT FOUND");
    let fallback = MockStage::new(Behaviour::Fail("Invalid API key".to_string()));

    let (status, body) = send(router(primary, fallback), post_chat(r#"{"question": "q"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Invalid API key");
}

#[tokio::test]
async fn test_empty_failure_message_uses_generic_text() {
    let primary = MockStage::new(Behaviour::Fail(String::new()));

    let (status, body) = send(
        router(primary, MockStage::replying("unused")),
        post_chat(r#"{"question": "q"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Something went wrong");
}

#[tokio::test]
async fn test_stage_deadline_is_gateway_timeout() {
    let primary = MockStage::new(Behaviour::Hang);
    let app = router_with_timeout(
        primary,
        MockStage::replying("unused"),
        Duration::from_millis(50),
    );

    let response = app.oneshot(post_chat(r#"{"question": "q"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
    assert!(response.headers().contains_key("x-request-id"));
}
