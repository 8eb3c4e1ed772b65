// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Conversational search agent
//!
//! A chat model decides, turn by turn, whether to call a tool or give its
//! final answer. The loop is capped by an iteration limit.

pub mod executor;
pub mod output_parser;
pub mod prompt;
pub mod tool;

pub use executor::{AgentExecutor, DEFAULT_MAX_ITERATIONS, MAX_ITERATIONS_OUTPUT};
pub use output_parser::AgentStep;
pub use prompt::DISCLOSURE_PREFIX;
pub use tool::{SearchTool, Tool, ToolError};

use thiserror::Error;

use crate::llm::LlmError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    /// The model produced neither an action nor a final answer
    #[error("{0}")]
    Parse(String),
}

impl AgentError {
    pub fn timeout_ms(&self) -> Option<u64> {
        match self {
            AgentError::Llm(LlmError::Timeout { timeout_ms })
            | AgentError::Tool(ToolError::Timeout { timeout_ms, .. }) => Some(*timeout_ms),
            _ => None,
        }
    }
}
