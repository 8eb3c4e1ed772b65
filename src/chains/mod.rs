// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Retrieval-augmented answering over the document index

pub mod prompts;
pub mod retrieval;
pub mod tool;

pub use retrieval::{ChainOutput, ConversationalRetrievalChain, DEFAULT_TOP_K};
pub use tool::RetrievalChainTool;

use thiserror::Error;

use crate::llm::LlmError;
use crate::vector::VectorError;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Vector(#[from] VectorError),
}

impl ChainError {
    pub fn timeout_ms(&self) -> Option<u64> {
        match self {
            ChainError::Llm(LlmError::Timeout { timeout_ms })
            | ChainError::Vector(VectorError::Timeout { timeout_ms }) => Some(*timeout_ms),
            _ => None,
        }
    }
}
