// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat API request types

use serde_json::Value;

use crate::qa::{normalize_question, ChatHistory};

/// Body of POST /api/chat
///
/// Read leniently: a body that is not a JSON object, or a `question` that is
/// not a string, is treated as having no question.
#[derive(Debug, Clone, Default)]
pub struct ChatApiRequest {
    pub question: Option<String>,
    pub history: ChatHistory,
}

impl ChatApiRequest {
    pub fn from_body(body: &[u8]) -> Self {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(_) => return Self::default(),
        };

        Self {
            question: value
                .get("question")
                .and_then(Value::as_str)
                .and_then(normalize_question),
            history: ChatHistory::from_json(value.get("history")),
        }
    }
}
