//! Upload gateway
//!
//! Pulls exactly one image out of a multipart form, checks it against the
//! allowed extensions and shapes the JSON the page expects back.

use crate::error::{GatewayError, OcrError};
use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Name of the form field carrying the image
pub const IMAGE_FIELD: &str = "image";

/// Accepted file extensions, compared case-insensitively
pub const VALID_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

/// A fully buffered upload
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub image_bytes: Bytes,
    pub filename: String,
    pub declared_size: usize,
}

/// Outcome of one recognition; `error` is `None` on success
#[derive(Debug)]
pub struct RecognitionResult {
    pub text: String,
    pub error: Option<OcrError>,
}

impl From<Result<String, OcrError>> for RecognitionResult {
    fn from(result: Result<String, OcrError>) -> Self {
        match result {
            Ok(text) => Self { text, error: None },
            Err(e) => Self {
                text: String::new(),
                error: Some(e),
            },
        }
    }
}

/// Successful upload response
#[derive(Serialize)]
pub struct UploadResponse {
    pub text: String,
    pub filename: String,
}

/// Returns true when `filename` ends in one of [`VALID_EXTENSIONS`]
pub fn is_valid_image_type(filename: &str) -> bool {
    let base = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);

    match base.rsplit_once('.') {
        Some((_, ext)) => VALID_EXTENSIONS
            .iter()
            .any(|valid| valid.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Read the multipart form and buffer the `image` file field.
///
/// Only the first file sent under [`IMAGE_FIELD`] is kept; other fields are
/// skipped. Checks run in order: form parse, presence, extension. The size
/// cap is the `DefaultBodyLimit` the router installs, which surfaces here as a
/// multipart error.
pub async fn accept_upload(mut multipart: Multipart) -> Result<UploadRequest, GatewayError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(classify)? {
        if upload.is_some() || field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        // A part without a filename is a plain value, not a file
        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };

        let data = field.bytes().await.map_err(classify)?;
        upload = Some((filename, data));
    }

    let (filename, image_bytes) = upload.ok_or(GatewayError::MissingFile)?;

    if !is_valid_image_type(&filename) {
        return Err(GatewayError::UnsupportedType);
    }

    Ok(UploadRequest {
        declared_size: image_bytes.len(),
        image_bytes,
        filename,
    })
}

/// Limit overruns and malformed bodies are the client's fault; anything the
/// multipart layer reports as a server error is a read failure.
fn classify(err: MultipartError) -> GatewayError {
    tracing::debug!("Multipart error: {}", err);
    if err.status().is_server_error() {
        GatewayError::ReadFailure
    } else {
        GatewayError::FormTooLarge
    }
}

/// Turn a recognition outcome into the upload endpoint's JSON response
pub fn render_result(result: RecognitionResult, filename: &str) -> Response {
    if let Some(err) = result.error {
        return GatewayError::Ocr(err).into_response();
    }

    let body = UploadResponse {
        text: result.text.trim().to_string(),
        filename: filename.to_string(),
    };

    match serde_json::to_vec(&body) {
        Ok(bytes) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode response: {}", e);
            GatewayError::Serialization.into_response()
        }
    }
}
