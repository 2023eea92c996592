//! OCR invoker
//!
//! Drives one engine session per call: open with the fixed profile, load the
//! bytes, extract, trim. The session is released on every exit path by
//! [`SessionGuard`].

use crate::engine::{OcrEngine, SessionGuard};
use crate::error::OcrError;
use crate::profile::{RecognitionProfile, RECOGNITION_PROFILE};
use axum::body::Bytes;
use std::sync::Arc;
use std::time::Duration;

pub struct OcrInvoker {
    engine: Arc<dyn OcrEngine>,
    profile: &'static RecognitionProfile,
    timeout: Option<Duration>,
}

impl OcrInvoker {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            engine,
            profile: &RECOGNITION_PROFILE,
            timeout: None,
        }
    }

    /// Abandon calls that run longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    pub fn profile(&self) -> &'static RecognitionProfile {
        self.profile
    }

    /// Recognize text in `image_bytes` on the current thread
    pub fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        let mut session = SessionGuard::new(self.engine.open_session(self.profile)?);

        session.load_image(image_bytes)?;
        let text = session.extract_text()?;

        Ok(text.trim().to_string())
    }

    /// Recognize text on the blocking pool, honouring the configured deadline.
    ///
    /// When the deadline passes the blocking task is left to finish on its
    /// own; it still releases its session when it does.
    pub async fn recognize_async(self: &Arc<Self>, image_bytes: Bytes) -> Result<String, OcrError> {
        let invoker = Arc::clone(self);
        let task = tokio::task::spawn_blocking(move || invoker.recognize(&image_bytes));

        let joined = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, task)
                .await
                .map_err(|_| OcrError::Timeout(timeout))?,
            None => task.await,
        };

        joined.map_err(|e| OcrError::Internal(format!("OCR task failed: {}", e)))?
    }
}
