// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::chat::chat_handler;
use crate::qa::QaDispatcher;
use crate::version;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<QaDispatcher>,
}

impl AppState {
    pub fn new(dispatcher: QaDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    // Kept outside the CORS layer so OPTIONS reaches the handler's method check
    let chat = Router::new().route("/api/chat", any(chat_handler));

    let health = Router::new().route("/health", get(health_handler)).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    chat.merge(health)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down API server");
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": version::VERSION_NUMBER,
        "stageTimeoutMs": state.dispatcher.stage_timeout().as_millis() as u64,
    }))
}
