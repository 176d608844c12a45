//! Gateway error types and the uniform error envelope.

use std::any::Any;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::contract::QueryError;
use crate::upstream::UpstreamError;

/// Machine-readable failure category sent in every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    NotFound,
    TooManyRequests,
    ConfigurationError,
    UpstreamError,
    UpstreamTimeout,
    SchemaValidationError,
    InternalServerError,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::ConfigurationError
            | ErrorKind::UpstreamError
            | ErrorKind::SchemaValidationError
            | ErrorKind::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body of every non-2xx reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorKind,
    pub message: String,
}

/// Gateway-level errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid query: {0}")]
    BadRequest(#[from] QueryError),

    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("no route for {0}")]
    NotFound(String),

    #[error("rate limit exceeded for client {client}")]
    TooManyRequests { client: String, retry_after_secs: u64 },

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The whole request outlived its deadline.
    #[error("Request timed out after {secs} seconds")]
    RequestTimeout { secs: u64 },

    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::BadRequest(_) => ErrorKind::BadRequest,
            GatewayError::Unauthorized(_) => ErrorKind::Unauthorized,
            GatewayError::NotFound(_) => ErrorKind::NotFound,
            GatewayError::TooManyRequests { .. } => ErrorKind::TooManyRequests,
            GatewayError::Upstream(e) => match e {
                UpstreamError::MissingEndpoint(_) => ErrorKind::ConfigurationError,
                UpstreamError::Status { .. } | UpstreamError::Transport { .. } => {
                    ErrorKind::UpstreamError
                }
                UpstreamError::Timeout { .. } => ErrorKind::UpstreamTimeout,
                UpstreamError::Contract { .. } => ErrorKind::SchemaValidationError,
                UpstreamError::Client(_) => ErrorKind::InternalServerError,
            },
            GatewayError::RequestTimeout { .. } => ErrorKind::UpstreamTimeout,
            GatewayError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.kind().status()
    }

    /// Message shown to the caller. Shape violations and internal failures
    /// stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::BadRequest(e) => format!("Invalid query: {}", e),
            GatewayError::Unauthorized(reason) => reason.to_string(),
            GatewayError::NotFound(route) => format!("Route {} not found", route),
            GatewayError::TooManyRequests {
                retry_after_secs, ..
            } => format!("Rate limit exceeded, retry in {} seconds", retry_after_secs),
            GatewayError::Upstream(e) => match e {
                UpstreamError::Contract { upstream, .. } => {
                    format!("{} response did not match the expected shape", upstream)
                }
                UpstreamError::Client(_) => "Internal server error".to_string(),
                other => other.to_string(),
            },
            GatewayError::RequestTimeout { .. } => self.to_string(),
            GatewayError::Internal(_) => "Internal server error".to_string(),
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.kind(),
            message: self.public_message(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        if status.is_server_error() {
            tracing::error!(kind = ?kind, status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(kind = ?kind, status = status.as_u16(), error = %self, "Request rejected");
        }

        let mut response = (status, Json(self.envelope())).into_response();
        if let GatewayError::TooManyRequests {
            retry_after_secs, ..
        } = &self
        {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(*retry_after_secs));
        }
        response
    }
}

/// Backstop for panics in request handling: 500 with a generic message.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    GatewayError::Internal(detail).into_response()
}

pub type GatewayResult<T> = Result<T, GatewayError>;
