// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Dispatch rules between the retrieval and search stages

use async_trait::async_trait;
use pdf_qa_node::qa::{
    Answer, ChatHistory, ChatTurn, FallbackStage, PrimaryStage, QaDispatcher, QaError,
    RetrievalOutcome, Stage,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct ScriptedPrimary {
    result: Result<&'static str, &'static str>,
    seen: Mutex<Vec<(String, ChatHistory)>>,
}

impl ScriptedPrimary {
    fn new(result: Result<&'static str, &'static str>) -> Arc<Self> {
        Arc::new(Self {
            result,
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl PrimaryStage for ScriptedPrimary {
    async fn answer(
        &self,
        question: &str,
        history: &ChatHistory,
    ) -> Result<RetrievalOutcome, QaError> {
        self.seen
            .lock()
            .unwrap()
            .push((question.to_string(), history.clone()));
        match self.result {
            Ok(text) => Ok(RetrievalOutcome::from_completion(text.to_string(), Vec::new())),
            Err(message) => Err(QaError::UpstreamUnavailable {
                stage: Stage::Retrieval,
                message: message.to_string(),
            }),
        }
    }
}

struct ScriptedFallback {
    result: Result<&'static str, &'static str>,
    delay: Duration,
    seen: Mutex<Vec<(String, ChatHistory)>>,
}

impl ScriptedFallback {
    fn new(result: Result<&'static str, &'static str>) -> Arc<Self> {
        Arc::new(Self {
            result,
            delay: Duration::ZERO,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            result: Ok("too late"),
            delay,
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl FallbackStage for ScriptedFallback {
    async fn answer(&self, question: &str, history: &ChatHistory) -> Result<String, QaError> {
        self.seen
            .lock()
            .unwrap()
            .push((question.to_string(), history.clone()));
        tokio::time::sleep(self.delay).await;
        match self.result {
            Ok(text) => Ok(text.to_string()),
            Err(message) => Err(QaError::UpstreamUnavailable {
                stage: Stage::Search,
                message: message.to_string(),
            }),
        }
    }
}

fn history() -> ChatHistory {
    ChatHistory::new(vec![
        ChatTurn::human("What is the warranty?"),
        ChatTurn::ai("Two years."),
    ])
}

#[tokio::test]
async fn test_answer_without_sentinel_never_calls_fallback() {
    let primary = ScriptedPrimary::new(Ok("The manual states X."));
    let fallback = ScriptedFallback::new(Ok("unused"));
    let dispatcher = QaDispatcher::new(primary.clone(), fallback.clone());

    let answer = dispatcher.answer("What is X?", &history()).await.unwrap();

    assert!(matches!(answer, Answer::Retrieval { ref text, .. } if text == "The manual states X."));
    assert!(fallback.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_fallback_gets_same_question_and_history() {
    let primary = ScriptedPrimary::new(Ok("ANSWER NOT FOUND"));
    let fallback = ScriptedFallback::new(Ok("Based on our conversation and Google search, X."));
    let dispatcher = QaDispatcher::new(primary.clone(), fallback.clone());

    let answer = dispatcher.answer("What is X?", &history()).await.unwrap();

    assert_eq!(answer.source_label(), "search");
    assert_eq!(answer.text(), "Based on our conversation and Google search, X.");
    let seen = fallback.seen.lock().unwrap();
    assert_eq!(seen[0], ("What is X?".to_string(), history()));
    assert_eq!(primary.seen.lock().unwrap()[0], seen[0]);
}

#[tokio::test]
async fn test_primary_error_ends_request() {
    let primary = ScriptedPrimary::new(Err("Vector store API error: 503 - down"));
    let fallback = ScriptedFallback::new(Ok("unused"));
    let dispatcher = QaDispatcher::new(primary, fallback.clone());

    let err = dispatcher
        .answer("q", &ChatHistory::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Vector store API error: 503 - down");
    assert_eq!(err.stage(), Some(Stage::Retrieval));
    assert!(fallback.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_fallback_error_discards_primary_text() {
    let primary = ScriptedPrimary::new(Ok("ANSWER NOT FOUND"));
    let fallback = ScriptedFallback::new(Err("Search API error: 500 - boom"));
    let dispatcher = QaDispatcher::new(primary, fallback);

    let err = dispatcher
        .answer("q", &ChatHistory::default())
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Search));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_fallback_deadline() {
    let primary = ScriptedPrimary::new(Ok("ANSWER NOT FOUND"));
    let fallback = ScriptedFallback::slow(Duration::from_secs(5));
    let dispatcher = QaDispatcher::new(primary, fallback)
        .with_stage_timeout(Duration::from_millis(30));

    let err = dispatcher
        .answer("q", &ChatHistory::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        QaError::UpstreamTimeout {
            stage: Stage::Search,
            timeout_ms: 30
        }
    ));
}
