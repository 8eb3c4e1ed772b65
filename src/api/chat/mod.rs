// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Question-answering endpoint
//!
//! Provides the `/api/chat` HTTP endpoint.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::chat_handler;
pub use request::ChatApiRequest;
pub use response::ChatApiResponse;
