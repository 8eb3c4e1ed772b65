// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration
//!
//! Every setting can be given as a flag or through the environment. A `.env`
//! file is loaded first when present.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::llm::OpenAiConfig;
use crate::qa::{RetrievalSettings, SearchAgentSettings};
use crate::search::{SearchConfig, SearchLocale};
use crate::vector::{IndexConfig, PineconeConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// PDF question-answering node
#[derive(Parser, Debug, Clone)]
#[command(name = "pdf-qa-node")]
#[command(about = "Answers questions from a PDF index, falling back to web search", long_about = None)]
pub struct AppConfig {
    /// Host to bind the HTTP server to
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    pub api_host: String,

    /// Port to bind the HTTP server to
    #[arg(long, env = "API_PORT", default_value_t = 3000)]
    pub api_port: u16,

    /// Key for chat completions and embeddings
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: String,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com")]
    pub openai_base_url: String,

    /// Model answering from retrieved documents
    #[arg(long, env = "QA_MODEL", default_value = "gpt-3.5-turbo")]
    pub qa_model: String,

    #[arg(long, env = "QA_TEMPERATURE", default_value_t = 0.0)]
    pub qa_temperature: f32,

    /// Model driving the search agent
    #[arg(long, env = "AGENT_MODEL", default_value = "gpt-3.5-turbo")]
    pub agent_model: String,

    #[arg(long, env = "EMBEDDING_MODEL", default_value = "text-embedding-ada-002")]
    pub embedding_model: String,

    #[arg(long, env = "PINECONE_API_KEY", hide_env_values = true)]
    pub pinecone_api_key: String,

    #[arg(long, env = "PINECONE_INDEX_NAME")]
    pub pinecone_index_name: String,

    #[arg(long, env = "PINECONE_NAME_SPACE", default_value = "pdf-docs")]
    pub pinecone_namespace: String,

    /// Data-plane host of the index (resolved from the index name if unset)
    #[arg(long, env = "PINECONE_INDEX_HOST")]
    pub pinecone_index_host: Option<String>,

    #[arg(long, env = "PINECONE_CONTROLLER_URL", default_value = "https://api.pinecone.io")]
    pub pinecone_controller_url: String,

    /// Chunks retrieved per question
    #[arg(long, env = "RETRIEVAL_TOP_K", default_value_t = 4)]
    pub retrieval_top_k: usize,

    /// SerpAPI key; searches fail at call time when unset
    #[arg(long, env = "SERPAPI_API_KEY", hide_env_values = true)]
    pub serpapi_api_key: Option<String>,

    #[arg(long, env = "SERPAPI_BASE_URL", default_value = "https://serpapi.com")]
    pub serpapi_base_url: String,

    #[arg(long, env = "SEARCH_CACHE_TTL_SECS", default_value_t = 3600)]
    pub search_cache_ttl_secs: u64,

    #[arg(long, env = "SEARCH_RATE_LIMIT_PER_MINUTE", default_value_t = 60)]
    pub search_rate_limit_per_minute: u32,

    #[arg(long, env = "AGENT_MAX_ITERATIONS", default_value_t = 15)]
    pub agent_max_iterations: usize,

    /// Also give the search agent the PDF index as a tool
    #[arg(long, env = "AGENT_INCLUDE_DOCS_TOOL", default_value_t = false)]
    pub agent_include_docs_tool: bool,

    /// Timeout for each outbound HTTP call
    #[arg(long, env = "UPSTREAM_TIMEOUT_MS", default_value_t = 30000)]
    pub upstream_timeout_ms: u64,

    /// Deadline for a whole stage (retrieval or search)
    #[arg(long, env = "STAGE_TIMEOUT_MS", default_value_t = 120000)]
    pub stage_timeout_ms: u64,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("OPENAI_BASE_URL", &self.openai_base_url),
            ("PINECONE_CONTROLLER_URL", &self.pinecone_controller_url),
            ("SERPAPI_BASE_URL", &self.serpapi_base_url),
        ] {
            Url::parse(value)
                .map_err(|e| ConfigError::Invalid(format!("{} is not a valid URL: {}", name, e)))?;
        }

        if self.openai_api_key.trim().is_empty() {
            return Err(ConfigError::Invalid("OPENAI_API_KEY is empty".to_string()));
        }
        if self.pinecone_index_name.trim().is_empty() {
            return Err(ConfigError::Invalid("PINECONE_INDEX_NAME is empty".to_string()));
        }
        if self.retrieval_top_k == 0 {
            return Err(ConfigError::Invalid("RETRIEVAL_TOP_K must be greater than 0".to_string()));
        }
        if self.agent_max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "AGENT_MAX_ITERATIONS must be greater than 0".to_string(),
            ));
        }
        if self.upstream_timeout_ms == 0 || self.stage_timeout_ms == 0 {
            return Err(ConfigError::Invalid("Timeouts must be greater than 0".to_string()));
        }

        self.search_config().validate().map_err(ConfigError::Invalid)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.api_host, self.api_port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("Invalid bind address: {}", e)))
    }

    pub fn stage_timeout(&self) -> Duration {
        Duration::from_millis(self.stage_timeout_ms)
    }

    pub fn openai_config(&self) -> OpenAiConfig {
        OpenAiConfig {
            api_key: self.openai_api_key.clone(),
            base_url: self.openai_base_url.clone(),
            timeout_ms: self.upstream_timeout_ms,
        }
    }

    pub fn pinecone_config(&self) -> PineconeConfig {
        PineconeConfig {
            api_key: self.pinecone_api_key.clone(),
            controller_url: self.pinecone_controller_url.clone(),
            index_host: self.pinecone_index_host.clone().filter(|h| !h.is_empty()),
            timeout_ms: self.upstream_timeout_ms,
        }
    }

    pub fn index_config(&self) -> IndexConfig {
        IndexConfig::new(&self.pinecone_index_name, &self.pinecone_namespace)
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            serpapi_api_key: self.serpapi_api_key.clone(),
            serpapi_base_url: self.serpapi_base_url.clone(),
            cache_ttl_secs: self.search_cache_ttl_secs,
            rate_limit_per_minute: self.search_rate_limit_per_minute,
            request_timeout_ms: self.upstream_timeout_ms,
            ..SearchConfig::default()
        }
    }

    pub fn retrieval_settings(&self) -> RetrievalSettings {
        RetrievalSettings {
            openai: self.openai_config(),
            qa_model: self.qa_model.clone(),
            qa_temperature: self.qa_temperature,
            embedding_model: self.embedding_model.clone(),
            pinecone: self.pinecone_config(),
            index: self.index_config(),
            top_k: self.retrieval_top_k,
        }
    }

    pub fn agent_settings(&self) -> SearchAgentSettings {
        SearchAgentSettings {
            openai: self.openai_config(),
            agent_model: self.agent_model.clone(),
            locale: SearchLocale::default(),
            max_iterations: self.agent_max_iterations,
        }
    }
}
