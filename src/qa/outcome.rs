// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Stage results and the not-found marker

use crate::vector::Document;

/// Marker the QA prompt tells the model to emit when the retrieved context
/// does not contain the answer
pub const SENTINEL: &str = "ANSWER NOT FOUND";

/// Result of the retrieval stage
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalOutcome {
    Answered {
        text: String,
        sources: Vec<Document>,
    },
    /// The model signalled that the documents do not answer the question
    NotFound { text: String },
}

impl RetrievalOutcome {
    /// Classify raw model output; the marker may appear anywhere in the text
    pub fn from_completion(text: String, sources: Vec<Document>) -> Self {
        if text.contains(SENTINEL) {
            RetrievalOutcome::NotFound { text }
        } else {
            RetrievalOutcome::Answered { text, sources }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RetrievalOutcome::NotFound { .. })
    }
}

/// Final answer of a question, tagged by the stage that produced it
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Retrieval {
        text: String,
        sources: Vec<Document>,
    },
    Search {
        text: String,
    },
}

impl Answer {
    pub fn text(&self) -> &str {
        match self {
            Answer::Retrieval { text, .. } | Answer::Search { text } => text,
        }
    }

    pub fn source_label(&self) -> &'static str {
        match self {
            Answer::Retrieval { .. } => "retrieval",
            Answer::Search { .. } => "search",
        }
    }
}
