// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Language-model access
//!
//! Both stages talk to an OpenAI-compatible chat completions API through the
//! [`LanguageModel`] trait, so tests can swap in scripted models.

pub mod openai;
pub mod types;

pub use openai::{OpenAiChatModel, OpenAiConfig};
pub use types::{ChatMessage, LlmError, Role};

use async_trait::async_trait;

/// A chat-style language model
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for the given conversation
    ///
    /// Generation halts before any of the `stop` sequences.
    async fn complete(&self, messages: &[ChatMessage], stop: &[String])
        -> Result<String, LlmError>;

    /// Model identifier, for logging
    fn model_name(&self) -> &str;
}
