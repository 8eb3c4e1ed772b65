// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Documents and errors for the vector-store layer

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A retrieved text chunk with its source metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub page_content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }
}

/// Which index and namespace a store reads from
#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub index_name: String,
    pub namespace: String,
    /// Metadata key holding the chunk text
    pub text_key: String,
}

impl IndexConfig {
    pub fn new(index_name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            namespace: namespace.into(),
            text_key: "text".to_string(),
        }
    }
}

/// Errors from the embedding and vector database clients
#[derive(Debug, Error)]
pub enum VectorError {
    #[error("Vector store timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Vector store API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Vector store request failed: {0}")]
    Http(String),
}

impl VectorError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, VectorError::Timeout { .. })
    }

    pub(crate) fn from_reqwest(e: reqwest::Error, timeout_ms: u64) -> Self {
        if e.is_timeout() {
            VectorError::Timeout { timeout_ms }
        } else {
            VectorError::Http(e.to_string())
        }
    }
}
