// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! The two answering stages and their production wiring

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::errors::{QaError, Stage};
use super::history::ChatHistory;
use super::outcome::RetrievalOutcome;
use crate::agent::{AgentExecutor, SearchTool, Tool, DEFAULT_MAX_ITERATIONS, DISCLOSURE_PREFIX};
use crate::chains::{ChainError, ConversationalRetrievalChain, RetrievalChainTool, DEFAULT_TOP_K};
use crate::llm::{LlmError, OpenAiChatModel, OpenAiConfig};
use crate::search::{SearchLocale, SearchService};
use crate::vector::{IndexConfig, OpenAiEmbeddings, PineconeConfig, PineconeIndex, VectorStore};

/// Answers from the document index, or reports that it cannot
#[async_trait]
pub trait PrimaryStage: Send + Sync {
    async fn answer(&self, question: &str, history: &ChatHistory)
        -> Result<RetrievalOutcome, QaError>;
}

/// Answers anything the primary stage could not
#[async_trait]
pub trait FallbackStage: Send + Sync {
    async fn answer(&self, question: &str, history: &ChatHistory) -> Result<String, QaError>;
}

/// Everything needed to stand up a retrieval chain
#[derive(Debug, Clone)]
pub struct RetrievalSettings {
    pub openai: OpenAiConfig,
    pub qa_model: String,
    pub qa_temperature: f32,
    pub embedding_model: String,
    pub pinecone: PineconeConfig,
    pub index: IndexConfig,
    pub top_k: usize,
}

impl RetrievalSettings {
    pub fn new(openai: OpenAiConfig, pinecone: PineconeConfig, index: IndexConfig) -> Self {
        Self {
            openai,
            qa_model: "gpt-3.5-turbo".to_string(),
            qa_temperature: 0.0,
            embedding_model: "text-embedding-ada-002".to_string(),
            pinecone,
            index,
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Retrieval over Pinecone with an OpenAI chat model
///
/// Clients are built per call, so a bad index or key surfaces on the
/// request that hit it rather than at startup.
pub struct VectorStorePrimaryStage {
    settings: RetrievalSettings,
}

impl VectorStorePrimaryStage {
    pub fn new(settings: RetrievalSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RetrievalSettings {
        &self.settings
    }

    /// Connect to the index and assemble a fresh chain
    pub async fn build_chain(&self) -> Result<ConversationalRetrievalChain, QaError> {
        let s = &self.settings;
        let index = PineconeIndex::connect(&s.pinecone, &s.index.index_name).await?;
        let embeddings = OpenAiEmbeddings::new(&s.openai, &s.embedding_model)?;
        let store =
            VectorStore::from_existing_index(Arc::new(embeddings), Arc::new(index), s.index.clone());
        let model = OpenAiChatModel::new(&s.openai, &s.qa_model, s.qa_temperature)
            .map_err(ChainError::from)?;

        Ok(ConversationalRetrievalChain::new(Arc::new(model), store).with_top_k(s.top_k))
    }
}

#[async_trait]
impl PrimaryStage for VectorStorePrimaryStage {
    async fn answer(
        &self,
        question: &str,
        history: &ChatHistory,
    ) -> Result<RetrievalOutcome, QaError> {
        let chain = self.build_chain().await?;
        let output = chain.call(question, history).await?;
        debug!(
            "Retrieval chain returned {} chars with {} source(s)",
            output.text.len(),
            output.source_documents.len()
        );
        Ok(RetrievalOutcome::from_completion(
            output.text,
            output.source_documents,
        ))
    }
}

#[derive(Debug, Clone)]
pub struct SearchAgentSettings {
    pub openai: OpenAiConfig,
    pub agent_model: String,
    pub locale: SearchLocale,
    pub max_iterations: usize,
}

impl SearchAgentSettings {
    pub fn new(openai: OpenAiConfig) -> Self {
        Self {
            openai,
            agent_model: "gpt-3.5-turbo".to_string(),
            locale: SearchLocale::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Web-search agent driven by a zero-temperature chat model
pub struct SearchAgentFallbackStage {
    search: Arc<SearchService>,
    settings: SearchAgentSettings,
    docs: Option<Arc<VectorStorePrimaryStage>>,
}

impl SearchAgentFallbackStage {
    pub fn new(search: Arc<SearchService>, settings: SearchAgentSettings) -> Self {
        Self {
            search,
            settings,
            docs: None,
        }
    }

    /// Also offer the PDF index to the agent as a tool
    pub fn with_docs_tool(mut self, docs: Arc<VectorStorePrimaryStage>) -> Self {
        self.docs = Some(docs);
        self
    }

    async fn tools(&self) -> Result<Vec<Arc<dyn Tool>>, QaError> {
        let mut tools: Vec<Arc<dyn Tool>> = vec![Arc::new(SearchTool::new(
            self.search.clone(),
            self.settings.locale.clone(),
        ))];

        if let Some(docs) = &self.docs {
            let chain = docs.build_chain().await?;
            tools.push(Arc::new(RetrievalChainTool::new(Arc::new(chain))));
        }
        Ok(tools)
    }
}

#[async_trait]
impl FallbackStage for SearchAgentFallbackStage {
    async fn answer(&self, question: &str, history: &ChatHistory) -> Result<String, QaError> {
        let model = OpenAiChatModel::new(&self.settings.openai, &self.settings.agent_model, 0.0)
            .map_err(agent_model_error)?;
        let executor = AgentExecutor::new(Arc::new(model), self.tools().await?)
            .with_max_iterations(self.settings.max_iterations);

        let output = executor.run(question, history).await?;
        if !output.starts_with(DISCLOSURE_PREFIX) {
            warn!("Search agent answer is missing the disclosure prefix");
        }
        Ok(output)
    }
}

fn agent_model_error(e: LlmError) -> QaError {
    QaError::UpstreamUnavailable {
        stage: Stage::Search,
        message: e.to_string(),
    }
}
