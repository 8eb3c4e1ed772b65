// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use pdf_qa_node::{
    api::{start_server, AppState},
    config::AppConfig,
    qa::{QaDispatcher, SearchAgentFallbackStage, VectorStorePrimaryStage},
    search::SearchService,
    version,
};
use std::{env, sync::Arc};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting {}", version::get_version_string());

    let config = AppConfig::parse();
    config.validate().context("invalid configuration")?;
    let addr = config.bind_addr()?;

    let search_config = config.search_config();
    if !search_config.has_api_key() {
        warn!("SERPAPI_API_KEY is not set; questions that need web search will fail");
    }
    let search = Arc::new(SearchService::new(search_config)?);

    let primary = Arc::new(VectorStorePrimaryStage::new(config.retrieval_settings()));
    let mut fallback = SearchAgentFallbackStage::new(search, config.agent_settings());
    if config.agent_include_docs_tool {
        fallback = fallback.with_docs_tool(primary.clone());
    }

    info!(
        "Retrieval from index {} (namespace {}), search agent model {}",
        config.pinecone_index_name, config.pinecone_namespace, config.agent_model
    );

    let dispatcher = QaDispatcher::new(primary, Arc::new(fallback))
        .with_stage_timeout(config.stage_timeout());

    start_server(addr, AppState::new(dispatcher)).await
}
