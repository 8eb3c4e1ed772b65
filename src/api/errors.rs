// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::qa::QaError;

/// Used when an upstream failure carries no message of its own
pub const GENERIC_ERROR: &str = "Something went wrong";

/// Seconds a client is told to wait after a stage timeout
pub const TIMEOUT_RETRY_AFTER_SECS: u64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Client input errors report under `message`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    MethodNotAllowed,
    MissingQuestion,
    InvalidRequest(String),
    Upstream(String),
    Timeout { message: String, retry_after: u64 },
}

impl ApiError {
    pub fn to_response(&self, request_id: Option<String>) -> ErrorResponse {
        let (error, message) = match self {
            ApiError::MissingQuestion | ApiError::InvalidRequest(_) => (None, Some(self.to_string())),
            _ => (Some(self.to_string()), None),
        };

        ErrorResponse {
            error,
            message,
            retryable: self.is_retryable(),
            request_id,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::MissingQuestion | ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Upstream(_) | ApiError::Timeout { .. })
    }

    /// Build the HTTP response, tagging the body with the request id
    pub fn into_response_with_id(self, request_id: Option<String>) -> Response {
        let body = self.to_response(request_id);
        let mut response = (self.status_code(), Json(body)).into_response();
        if let ApiError::Timeout { retry_after, .. } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
        }
        response
    }
}

impl From<QaError> for ApiError {
    fn from(e: QaError) -> Self {
        match e {
            QaError::InvalidInput(message) => ApiError::InvalidRequest(message),
            QaError::UpstreamUnavailable { message, .. } => {
                if message.trim().is_empty() {
                    ApiError::Upstream(GENERIC_ERROR.to_string())
                } else {
                    ApiError::Upstream(message)
                }
            }
            timeout @ QaError::UpstreamTimeout { .. } => ApiError::Timeout {
                message: timeout.to_string(),
                retry_after: TIMEOUT_RETRY_AFTER_SECS,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_response_with_id(None)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MethodNotAllowed => write!(f, "Method not allowed"),
            ApiError::MissingQuestion => write!(f, "No question in the request"),
            ApiError::InvalidRequest(msg) => write!(f, "{}", msg),
            ApiError::Upstream(msg) => write!(f, "{}", msg),
            ApiError::Timeout { message, .. } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ApiError {}
