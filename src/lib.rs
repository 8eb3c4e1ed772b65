// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod agent;
pub mod api;
pub mod chains;
pub mod config;
pub mod llm;
pub mod qa;
pub mod search;
pub mod vector;
pub mod version;

pub use api::{build_router, start_server, AppState};
pub use config::{AppConfig, ConfigError};
pub use qa::{Answer, ChatHistory, QaDispatcher, QaError};
