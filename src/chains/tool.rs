// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! The retrieval chain exposed as an agent tool

use async_trait::async_trait;
use std::sync::Arc;

use super::retrieval::ConversationalRetrievalChain;
use crate::agent::{Tool, ToolError};
use crate::qa::ChatHistory;

pub const RETRIEVAL_TOOL_NAME: &str = "pinecone-pdf-database";

/// Lets the search agent consult the PDF index before going to the web
pub struct RetrievalChainTool {
    chain: Arc<ConversationalRetrievalChain>,
}

impl RetrievalChainTool {
    pub fn new(chain: Arc<ConversationalRetrievalChain>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl Tool for RetrievalChainTool {
    fn name(&self) -> &str {
        RETRIEVAL_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Retrieves answers from a vectorstore database of PDFs. \
         If you don't find the answer from here, use another tool."
    }

    async fn call(&self, input: &str) -> Result<String, ToolError> {
        let output = self
            .chain
            .call(input, &ChatHistory::default())
            .await
            .map_err(|e| match e.timeout_ms() {
                Some(timeout_ms) => ToolError::Timeout {
                    tool: RETRIEVAL_TOOL_NAME.to_string(),
                    timeout_ms,
                },
                None => ToolError::Failed {
                    tool: RETRIEVAL_TOOL_NAME.to_string(),
                    message: e.to_string(),
                },
            })?;
        Ok(output.text)
    }
}
