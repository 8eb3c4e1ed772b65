// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat API response types

use serde::{Deserialize, Serialize};

use crate::qa::Answer;
use crate::vector::Document;

/// Response body for POST /api/chat
///
/// `source` says which stage answered and `answer` always holds the text.
/// Retrieval answers also carry `text` and `sourceDocuments`; search answers
/// carry `data`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum ChatApiResponse {
    Retrieval {
        answer: String,
        text: String,
        #[serde(rename = "sourceDocuments")]
        source_documents: Vec<Document>,
    },
    Search {
        answer: String,
        data: String,
    },
}

impl From<Answer> for ChatApiResponse {
    fn from(answer: Answer) -> Self {
        match answer {
            Answer::Retrieval { text, sources } => ChatApiResponse::Retrieval {
                answer: text.clone(),
                text,
                source_documents: sources,
            },
            Answer::Search { text } => ChatApiResponse::Search {
                answer: text.clone(),
                data: text,
            },
        }
    }
}
