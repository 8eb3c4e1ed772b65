// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Two-stage question answering
//!
//! A question is first answered from the PDF index. When the model reports
//! that the documents do not contain the answer, the same question and
//! history go to the web-search agent instead.

pub mod dispatcher;
pub mod errors;
pub mod history;
pub mod outcome;
pub mod stages;

pub use dispatcher::{QaDispatcher, DEFAULT_STAGE_TIMEOUT};
pub use errors::{QaError, Stage};
pub use history::{ChatHistory, ChatTurn, Speaker};
pub use outcome::{Answer, RetrievalOutcome, SENTINEL};
pub use stages::{
    FallbackStage, PrimaryStage, RetrievalSettings, SearchAgentFallbackStage,
    SearchAgentSettings, VectorStorePrimaryStage,
};

/// Normalize a raw question for the retrieval chain
///
/// Surrounding whitespace is trimmed and newlines become single spaces.
/// Returns `None` when nothing is left.
pub fn normalize_question(raw: &str) -> Option<String> {
    let normalized = raw
        .trim()
        .replace("\r\n", " ")
        .replace('\n', " ")
        .trim()
        .to_string();

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}
