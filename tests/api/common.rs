// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Shared stage mocks and request helpers for the HTTP tests

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use pdf_qa_node::api::{build_router, AppState};
use pdf_qa_node::qa::{
    ChatHistory, FallbackStage, PrimaryStage, QaDispatcher, QaError, RetrievalOutcome,
};
use pdf_qa_node::vector::Document;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// What a mock stage does when called
#[derive(Clone)]
pub enum Behaviour {
    Reply(String),
    Fail(String),
    Hang,
}

/// Records every call and replies as scripted
pub struct MockStage {
    behaviour: Behaviour,
    pub calls: Mutex<Vec<(String, ChatHistory)>>,
}

impl MockStage {
    pub fn new(behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(Behaviour::Reply(text.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn run(&self, question: &str, history: &ChatHistory) -> Result<String, QaError> {
        self.calls
            .lock()
            .unwrap()
            .push((question.to_string(), history.clone()));
        match &self.behaviour {
            Behaviour::Reply(text) => Ok(text.clone()),
            Behaviour::Fail(message) => Err(QaError::UpstreamUnavailable {
                stage: pdf_qa_node::qa::Stage::Retrieval,
                message: message.clone(),
            }),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(String::new())
            }
        }
    }
}

#[async_trait]
impl PrimaryStage for MockStage {
    async fn answer(
        &self,
        question: &str,
        history: &ChatHistory,
    ) -> Result<RetrievalOutcome, QaError> {
        let text = self.run(question, history).await?;
        Ok(RetrievalOutcome::from_completion(
            text,
            vec![Document::new("chunk from the manual")],
        ))
    }
}

#[async_trait]
impl FallbackStage for MockStage {
    async fn answer(&self, question: &str, history: &ChatHistory) -> Result<String, QaError> {
        self.run(question, history).await
    }
}

pub fn router(primary: Arc<MockStage>, fallback: Arc<MockStage>) -> Router {
    router_with_timeout(primary, fallback, Duration::from_secs(10))
}

pub fn router_with_timeout(
    primary: Arc<MockStage>,
    fallback: Arc<MockStage>,
    stage_timeout: Duration,
) -> Router {
    let dispatcher = QaDispatcher::new(primary, fallback).with_stage_timeout(stage_timeout);
    build_router(AppState::new(dispatcher))
}

pub fn post_chat(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send a request and return the status and parsed JSON body
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
