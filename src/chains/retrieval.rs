// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Conversational retrieval QA chain
//!
//! question + history -> (condense) -> similarity search -> stuffed QA prompt

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::prompts::{condense_question_prompt, qa_prompt};
use super::ChainError;
use crate::llm::{ChatMessage, LanguageModel};
use crate::qa::ChatHistory;
use crate::vector::{Document, VectorStore};

/// Number of chunks retrieved when not configured
pub const DEFAULT_TOP_K: usize = 4;

/// Raw chain output before sentinel classification
#[derive(Debug, Clone)]
pub struct ChainOutput {
    pub text: String,
    pub source_documents: Vec<Document>,
}

pub struct ConversationalRetrievalChain {
    llm: Arc<dyn LanguageModel>,
    store: VectorStore,
    top_k: usize,
}

impl ConversationalRetrievalChain {
    pub fn new(llm: Arc<dyn LanguageModel>, store: VectorStore) -> Self {
        Self {
            llm,
            store,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Answer `question` in the context of `history`
    pub async fn call(&self, question: &str, history: &ChatHistory) -> Result<ChainOutput, ChainError> {
        let start = Instant::now();

        let standalone = if history.is_empty() {
            question.to_string()
        } else {
            let prompt = condense_question_prompt(&history.to_prompt_string(), question);
            let rewritten = self
                .llm
                .complete(&[ChatMessage::user(prompt)], &[])
                .await?;
            let rewritten = rewritten.trim().to_string();
            debug!("Condensed question: {}", rewritten);
            if rewritten.is_empty() {
                question.to_string()
            } else {
                rewritten
            }
        };

        let source_documents = self.store.similarity_search(&standalone, self.top_k).await?;
        let context = source_documents
            .iter()
            .map(|d| d.page_content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let text = self
            .llm
            .complete(&[ChatMessage::user(qa_prompt(&context, &standalone))], &[])
            .await?;

        info!(
            "Retrieval chain answered with {} source documents in {}ms",
            source_documents.len(),
            start.elapsed().as_millis()
        );

        Ok(ChainOutput {
            text,
            source_documents,
        })
    }
}
