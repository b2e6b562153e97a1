//! Request handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{debug, error, info};

use docscan_core::{DocumentFields, ScanError};

use super::{ApiError, AppState};

/// Multipart field carrying the document image.
const DOCUMENT_FIELD: &str = "document";

/// An uploaded file part.
struct Upload {
    filename: String,
    bytes: Bytes,
}

/// `POST /extract`: run OCR on the uploaded `document` and return its fields.
pub async fn extract(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DocumentFields>, ApiError> {
    // Not a multipart body at all: there is no file to look at.
    let mut multipart = multipart.map_err(|rejection| {
        debug!("Rejected non-multipart request: {}", rejection.body_text());
        ApiError::MissingDocument
    })?;

    let upload = read_document(&mut multipart)
        .await?
        .ok_or(ApiError::MissingDocument)?;

    if upload.filename.is_empty() {
        return Err(ApiError::EmptyFilename);
    }
    if !state.server.is_allowed_file(&upload.filename) {
        return Err(ApiError::InvalidFileType);
    }

    debug!(
        "Received {} ({} bytes)",
        upload.filename,
        upload.bytes.len()
    );

    let debug_mode = state.server.debug;
    let worker = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || worker.scanner.scan_bytes(&upload.bytes))
        .await
        .map_err(|e| {
            error!("Unexpected error: scan task failed: {}", e);
            ApiError::internal(e, debug_mode)
        })?;

    let fields = match result {
        Ok(fields) => fields,
        Err(ScanError::InvalidImage(e)) => {
            error!("Error opening image: {}", e);
            return Err(ApiError::InvalidImage);
        }
        Err(e) => {
            error!("Unexpected error: {}", e);
            return Err(ApiError::internal(e, debug_mode));
        }
    };

    if fields.is_empty() {
        info!("No value populated");
    }
    info!("Successfully processed document");

    Ok(Json(fields))
}

/// First file part named `document`, skipping everything else.
///
/// A `document` part without a filename is a plain form value, not a file.
async fn read_document(multipart: &mut Multipart) -> Result<Option<Upload>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(DOCUMENT_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let bytes = field.bytes().await?;
        return Ok(Some(Upload { filename, bytes }));
    }

    Ok(None)
}
