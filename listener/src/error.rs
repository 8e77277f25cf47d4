//! Request rejection taxonomy.
//!
//! Every variant is terminal for the request that raised it and is never
//! retried. The server keeps running.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Message returned for a topic that does not follow the grammar.
pub const TOPIC_ERROR_MESSAGE: &str = "Topic Validation Error";

/// Message returned for any `hub.mode` other than `subscribe`.
pub const MODE_ERROR_MESSAGE: &str = "hub.mode must be 'subscribe'";

/// Message returned when the delivery signature does not match.
pub const SIGNATURE_ERROR_MESSAGE: &str = "Signature is not valid";

/// Reasons a listener request is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ListenerError {
    #[error("Topic Validation Error")]
    TopicInvalid,

    #[error("hub.mode must be 'subscribe'")]
    ModeInvalid,

    #[error("Signature is not valid")]
    SignatureInvalid,

    /// Request did not match the expected query, header or body shape.
    #[error("{0}")]
    BadRequest(String),
}

impl ListenerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ListenerError::SignatureInvalid => StatusCode::UNAUTHORIZED,
            ListenerError::TopicInvalid
            | ListenerError::ModeInvalid
            | ListenerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Short snake_case label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ListenerError::TopicInvalid => "topic_invalid",
            ListenerError::ModeInvalid => "mode_invalid",
            ListenerError::SignatureInvalid => "signature_invalid",
            ListenerError::BadRequest(_) => "request_shape_invalid",
        }
    }
}

/// Error body, shaped like the hub's reference implementation responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for ListenerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        warn!(
            kind = self.kind(),
            status = status.as_u16(),
            reason = %message,
            "request_rejected"
        );

        let body = ErrorResponse {
            status_code: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error"),
            message,
        };

        (status, Json(body)).into_response()
    }
}
