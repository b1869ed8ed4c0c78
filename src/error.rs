//! Error handling
//!
//! Every failure leaving a handler goes through [`AppError::into_envelope`],
//! which owns the kind → status mapping.

use axum::{
    extract::rejection::BytesRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::error::Error as StdError;
use thiserror::Error;

use crate::provider::ProviderError;

pub type AppResult<T> = Result<T, AppError>;

/// Message returned to clients for an empty `csv` field
pub const MISSING_CSV: &str = "Missing CSV data";

#[derive(Debug, Error)]
pub enum AppError {
    /// Bad or missing input
    #[error("{0}")]
    ValidationError(String),

    /// Request body could not be read (too large, aborted upload)
    #[error("{message}")]
    BodyRejected { status: StatusCode, message: String },

    /// Model returned text that could not be recovered as a JSON object
    #[error("{message}")]
    UpstreamFormatError {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Network, auth or rate-limit failure from the model provider
    #[error(transparent)]
    ProviderError(#[from] ProviderError),

    /// Catch-all
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl AppError {
    pub fn upstream_format(message: impl Into<String>) -> Self {
        AppError::UpstreamFormatError { message: message.into(), source: None }
    }

    /// Error kind as reported to clients
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "ValidationError",
            AppError::BodyRejected { .. } => "BodyRejected",
            AppError::UpstreamFormatError { .. } => "UpstreamFormatError",
            AppError::ProviderError(_) => "ProviderError",
            AppError::UnexpectedError(_) => "UnexpectedError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::BodyRejected { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the error and its cause chain
    pub fn trace(&self) -> String {
        let mut trace = format!("{}: {}", self.kind(), self);
        let mut source = self.source();
        let mut index = 0;
        while let Some(cause) = source {
            if index == 0 {
                trace.push_str("\n\nCaused by:");
            }
            trace.push_str(&format!("\n    {}: {}", index, cause));
            source = cause.source();
            index += 1;
        }
        trace
    }

    /// Build the JSON error body
    ///
    /// Client-side errors carry their message verbatim; everything else is
    /// reported as `"<Kind>: <message>"` plus an optional trace.
    pub fn envelope(&self, include_trace: bool) -> (StatusCode, Value) {
        let status = self.status();

        if status.is_client_error() {
            return (status, json!({ "error": self.to_string() }));
        }

        let mut body = json!({ "error": format!("{}: {}", self.kind(), self) });
        if include_trace {
            body["trace"] = Value::String(self.trace());
        }
        (status, body)
    }

    /// Log and convert into an HTTP response
    pub fn into_envelope(self, include_trace: bool) -> Response {
        if self.status().is_client_error() {
            tracing::debug!("Rejected request: {}", self);
        } else {
            tracing::error!("Analysis failed:\n{}", self.trace());
        }

        let (status, body) = self.envelope(include_trace);
        (status, Json(body)).into_response()
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        AppError::BodyRejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::UnexpectedError(err.into())
    }
}
