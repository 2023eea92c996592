use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Failures raised while driving the OCR engine. All of them surface to the
/// client as a single "OCR failed" category.
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("failed to initialize engine: {0}")]
    EngineInit(String),

    #[error("failed to set image: {0}")]
    ImageLoad(String),

    #[error("failed to extract text: {0}")]
    Recognition(String),

    #[error("recognition did not finish within {0:?}")]
    Timeout(Duration),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Failures of the upload endpoint, each mapped to a status code and a JSON body
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("File too large or invalid form data")]
    FormTooLarge,

    #[error("No file uploaded or invalid file")]
    MissingFile,

    #[error("Please upload a valid image file (PNG, JPG, JPEG, GIF, BMP)")]
    UnsupportedType,

    #[error("Failed to read uploaded file")]
    ReadFailure,

    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),

    #[error("Failed to encode response")]
    Serialization,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::FormTooLarge
            | GatewayError::MissingFile
            | GatewayError::UnsupportedType => StatusCode::BAD_REQUEST,
            GatewayError::ReadFailure | GatewayError::Ocr(_) | GatewayError::Serialization => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
        };

        // An object holding a single string field always encodes; the
        // fallback keeps the JSON contract even so.
        let bytes = serde_json::to_vec(&body)
            .unwrap_or_else(|_| br#"{"error":"Failed to encode response"}"#.to_vec());

        (
            status,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )],
            bytes,
        )
            .into_response()
    }
}
