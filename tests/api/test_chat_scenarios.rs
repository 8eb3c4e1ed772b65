// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// End-to-end answers through /api/chat with scripted stages

use super::common::{post_chat, router, send, MockStage};
use axum::http::StatusCode;
use serde_json::json;

const QUESTION_BODY: &str = r#"{"question": "What is in the manual?\nPlease be brief.", "history": []}"#;

#[tokio::test]
async fn test_answer_from_documents() {
    let primary = MockStage::replying("The manual states X.");
    let fallback = MockStage::replying("unused");

    let (status, body) = send(router(primary.clone(), fallback.clone()), post_chat(QUESTION_BODY)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "The manual states X.");
    assert_eq!(body["source"], "retrieval");
    assert_eq!(body["answer"], "The manual states X.");
    assert_eq!(body["sourceDocuments"][0]["pageContent"], "chunk from the manual");
    assert!(body.get("data").is_none());

    assert_eq!(
        primary.calls.lock().unwrap()[0].0,
        "What is in the manual? Please be brief."
    );
    assert_eq!(fallback.call_count(), 0);
}

#[tokio::test]
async fn test_sentinel_falls_back_to_search() {
    let primary = MockStage::replying("ANSWER NOT FOUND");
    let fallback = MockStage::replying("Based on our conversation and Google search, X is a widget.");

    let (status, body) = send(router(primary.clone(), fallback.clone()), post_chat(QUESTION_BODY)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "source": "search",
            "answer": "Based on our conversation and Google search, X is a widget.",
            "data": "Based on our conversation and Google search, X is a widget."
        })
    );

    let primary_calls = primary.calls.lock().unwrap();
    let fallback_calls = fallback.calls.lock().unwrap();
    assert_eq!(fallback_calls.len(), 1);
    assert_eq!(fallback_calls[0].0, primary_calls[0].0);
    assert_eq!(fallback_calls[0].1, primary_calls[0].1);
}

#[tokio::test]
async fn test_sentinel_anywhere_in_text_triggers_fallback() {
    let primary = MockStage::replying("Well, ANSWER NOT FOUND in my docs");
    let fallback = MockStage::replying("Based on our conversation and Google search, here it is.");

    let (status, body) = send(router(primary, fallback.clone()), post_chat(QUESTION_BODY)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "Based on our conversation and Google search, here it is.");
    assert!(body.get("text").is_none());
    assert_eq!(fallback.call_count(), 1);
}

#[tokio::test]
async fn test_lowercase_sentinel_does_not_trigger_fallback() {
    let primary = MockStage::replying("answer not found, but here is a guess");
    let fallback = MockStage::replying("unused");

    let (status, body) = send(router(primary, fallback.clone()), post_chat(QUESTION_BODY)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "retrieval");
    assert_eq!(fallback.call_count(), 0);
}
