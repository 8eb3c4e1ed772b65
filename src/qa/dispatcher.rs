// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Routes a question through retrieval, then search when needed

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

use super::errors::{QaError, Stage};
use super::history::ChatHistory;
use super::outcome::{Answer, RetrievalOutcome};
use super::stages::{FallbackStage, PrimaryStage};

pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(120);

pub struct QaDispatcher {
    primary: Arc<dyn PrimaryStage>,
    fallback: Arc<dyn FallbackStage>,
    stage_timeout: Duration,
}

impl QaDispatcher {
    pub fn new(primary: Arc<dyn PrimaryStage>, fallback: Arc<dyn FallbackStage>) -> Self {
        Self {
            primary,
            fallback,
            stage_timeout: DEFAULT_STAGE_TIMEOUT,
        }
    }

    /// Upper bound on each stage, on top of the per-request client timeouts
    pub fn with_stage_timeout(mut self, stage_timeout: Duration) -> Self {
        self.stage_timeout = stage_timeout;
        self
    }

    pub fn stage_timeout(&self) -> Duration {
        self.stage_timeout
    }

    /// Answer `question`, falling back to search only when retrieval
    /// reports the answer is not in the documents
    ///
    /// Errors from either stage end the request; a retrieval error never
    /// triggers the fallback.
    #[instrument(name = "qa", skip_all, fields(history_turns = history.len()))]
    pub async fn answer(&self, question: &str, history: &ChatHistory) -> Result<Answer, QaError> {
        let start = Instant::now();
        let outcome = self
            .bounded(Stage::Retrieval, self.primary.answer(question, history))
            .await?;

        match outcome {
            RetrievalOutcome::Answered { text, sources } => {
                info!(
                    "Answered from documents in {}ms ({} sources)",
                    start.elapsed().as_millis(),
                    sources.len()
                );
                Ok(Answer::Retrieval { text, sources })
            }
            RetrievalOutcome::NotFound { .. } => {
                info!("Documents do not contain the answer, falling back to search");
                let text = self
                    .bounded(Stage::Search, self.fallback.answer(question, history))
                    .await?;
                info!("Answered from search in {}ms", start.elapsed().as_millis());
                Ok(Answer::Search { text })
            }
        }
    }

    async fn bounded<T>(
        &self,
        stage: Stage,
        fut: impl Future<Output = Result<T, QaError>>,
    ) -> Result<T, QaError> {
        match tokio::time::timeout(self.stage_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!("{} stage exceeded {:?}", stage, self.stage_timeout);
                Err(QaError::UpstreamTimeout {
                    stage,
                    timeout_ms: self.stage_timeout.as_millis() as u64,
                })
            }
        }
    }
}
