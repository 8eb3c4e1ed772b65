// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat message and error types shared by all model clients

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Author of a chat message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message sent to the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Errors returned by language-model clients
#[derive(Debug, Error)]
pub enum LlmError {
    /// The inference API did not answer in time
    #[error("Language model timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Non-success status from the inference API
    #[error("Language model API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the inference API
    #[error("Language model rate limited")]
    RateLimited,

    /// The API answered but returned no choices
    #[error("Language model returned an empty response")]
    EmptyResponse,

    /// Transport-level failure
    #[error("Language model request failed: {0}")]
    Http(String),
}

impl LlmError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, LlmError::Timeout { .. })
    }
}
