// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vector store bound to an existing index and namespace

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::embeddings::Embedder;
use super::pinecone::VectorIndex;
use super::types::{Document, IndexConfig, VectorError};

/// Embeds queries and returns the nearest stored chunks as documents
pub struct VectorStore {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    config: IndexConfig,
}

impl VectorStore {
    /// Wrap an already-populated index. Nothing is written to it.
    pub fn from_existing_index(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        config: IndexConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            config,
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Return up to `k` documents most similar to `query`
    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>, VectorError> {
        let vector = self.embedder.embed_query(query).await?;
        let matches = self
            .index
            .query(&vector, &self.config.namespace, k)
            .await?;

        let total = matches.len();
        let documents: Vec<Document> = matches
            .into_iter()
            .filter_map(|m| {
                let mut metadata = m.metadata?;
                let text = match metadata.remove(&self.config.text_key) {
                    Some(Value::String(text)) => text,
                    _ => return None,
                };
                metadata.insert("id".to_string(), Value::String(m.id));
                metadata.insert("score".to_string(), Value::from(m.score as f64));
                Some(Document {
                    page_content: text,
                    metadata,
                })
            })
            .collect();

        debug!(
            "Similarity search in {}/{}: {} matches, {} with text",
            self.config.index_name,
            self.config.namespace,
            total,
            documents.len()
        );

        Ok(documents)
    }
}
