//! Mapping of request failures onto HTTP responses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Everything that can stop `/extract` from returning fields.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No file part named `document`.
    #[error("No document provided")]
    MissingDocument,

    /// The `document` part has an empty filename.
    #[error("No selected file")]
    EmptyFilename,

    /// Missing or disallowed file extension.
    #[error("Invalid file type")]
    InvalidFileType,

    /// The upload could not be decoded as an image.
    #[error("Invalid image file")]
    InvalidImage,

    /// The multipart body itself is malformed or too large.
    #[error("{}", .0.body_text())]
    Multipart(#[from] MultipartError),

    /// Preprocessing, OCR or an unexpected failure.
    #[error("Internal server error")]
    Internal { details: Option<String> },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    /// Internal failure, exposing `cause` only when `debug` is on.
    pub fn internal(cause: impl std::fmt::Display, debug: bool) -> Self {
        ApiError::Internal {
            details: debug.then(|| cause.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingDocument
            | ApiError::EmptyFilename
            | ApiError::InvalidFileType
            | ApiError::InvalidImage => StatusCode::BAD_REQUEST,
            ApiError::Multipart(err) => err.status(),
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.to_string();
        let details = match self {
            ApiError::Internal { details } => details,
            _ => None,
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}
