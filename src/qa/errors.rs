// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Typed failures of the question-answering path

use std::fmt;
use thiserror::Error;

use crate::agent::AgentError;
use crate::chains::ChainError;
use crate::vector::VectorError;

/// Which stage a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Retrieval,
    Search,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Retrieval => write!(f, "retrieval"),
            Stage::Search => write!(f, "search"),
        }
    }
}

#[derive(Debug, Error)]
pub enum QaError {
    #[error("{0}")]
    InvalidInput(String),

    /// An external service failed; the message is the service's own
    #[error("{message}")]
    UpstreamUnavailable { stage: Stage, message: String },

    #[error("{stage} stage timed out after {timeout_ms}ms")]
    UpstreamTimeout { stage: Stage, timeout_ms: u64 },
}

impl QaError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, QaError::InvalidInput(_))
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            QaError::InvalidInput(_) => None,
            QaError::UpstreamUnavailable { stage, .. } | QaError::UpstreamTimeout { stage, .. } => {
                Some(*stage)
            }
        }
    }
}

impl From<VectorError> for QaError {
    fn from(e: VectorError) -> Self {
        match e {
            VectorError::Timeout { timeout_ms } => QaError::UpstreamTimeout {
                stage: Stage::Retrieval,
                timeout_ms,
            },
            other => QaError::UpstreamUnavailable {
                stage: Stage::Retrieval,
                message: other.to_string(),
            },
        }
    }
}

impl From<ChainError> for QaError {
    fn from(e: ChainError) -> Self {
        match e.timeout_ms() {
            Some(timeout_ms) => QaError::UpstreamTimeout {
                stage: Stage::Retrieval,
                timeout_ms,
            },
            None => QaError::UpstreamUnavailable {
                stage: Stage::Retrieval,
                message: e.to_string(),
            },
        }
    }
}

impl From<AgentError> for QaError {
    fn from(e: AgentError) -> Self {
        match e.timeout_ms() {
            Some(timeout_ms) => QaError::UpstreamTimeout {
                stage: Stage::Search,
                timeout_ms,
            },
            None => QaError::UpstreamUnavailable {
                stage: Stage::Search,
                message: e.to_string(),
            },
        }
    }
}
