// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat API endpoint handler

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::request::ChatApiRequest;
use super::response::ChatApiResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// ANY /api/chat - Answer a question from the PDF index or the web
///
/// # Request
/// - `question`: Question text (required, non-empty)
/// - `history`: Prior conversation turns (optional, read leniently)
///
/// # Response
/// - `source`: `"retrieval"` or `"search"`
/// - `answer`: The answer text
/// - `text`, `sourceDocuments`: Present on retrieval answers
/// - `data`: Present on search answers
///
/// # Errors
/// - 405 Method Not Allowed: Anything but POST
/// - 400 Bad Request: Missing or empty question
/// - 500 Internal Server Error: An upstream service failed
/// - 504 Gateway Timeout: A stage ran past its deadline, or an upstream
///   call inside it hit its client timeout. Timeouts never surface as 500.
pub async fn chat_handler(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let span = info_span!("chat", request_id = %request_id);

    let result = answer_request(&state, &method, &body).instrument(span.clone()).await;

    let mut response = span.in_scope(|| match result {
        Ok(answer) => {
            info!("Responding 200 with a {} answer", source_of(&answer));
            (StatusCode::OK, Json(answer)).into_response()
        }
        Err(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                error!("Responding {}: {}", status.as_u16(), e);
            } else {
                warn!("Responding {}: {}", status.as_u16(), e);
            }
            e.into_response_with_id(Some(request_id.clone()))
        }
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

async fn answer_request(
    state: &AppState,
    method: &Method,
    body: &[u8],
) -> Result<ChatApiResponse, ApiError> {
    if *method != Method::POST {
        return Err(ApiError::MethodNotAllowed);
    }

    let request = ChatApiRequest::from_body(body);
    let question = request.question.ok_or(ApiError::MissingQuestion)?;
    info!(
        "Question received ({} chars, {} history turns)",
        question.len(),
        request.history.len()
    );

    let answer = state.dispatcher.answer(&question, &request.history).await?;
    Ok(answer.into())
}

fn source_of(response: &ChatApiResponse) -> &'static str {
    match response {
        ChatApiResponse::Retrieval { .. } => "retrieval",
        ChatApiResponse::Search { .. } => "search",
    }
}
