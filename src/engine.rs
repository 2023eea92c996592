use crate::error::OcrError;
use crate::profile::RecognitionProfile;

/// Trait that all OCR engines must implement
pub trait OcrEngine: Send + Sync {
    /// Returns the engine identifier (e.g., "tesseract")
    fn name(&self) -> &'static str;

    /// Create a fresh session configured with `profile`. Sessions are never
    /// shared, so settings applied to one cannot leak into another.
    fn open_session(&self, profile: &RecognitionProfile) -> Result<Box<dyn OcrSession>, OcrError>;
}

/// A single configured engine handle, used for exactly one recognition on the
/// thread that opened it
pub trait OcrSession {
    /// Hand the raw upload bytes to the engine; decoding is the engine's job
    fn load_image(&mut self, bytes: &[u8]) -> Result<(), OcrError>;

    /// Run recognition on the loaded image and return the raw text
    fn extract_text(&mut self) -> Result<String, OcrError>;

    /// Free the engine resources held by this session
    fn release(&mut self);
}

/// Owns a session and releases it exactly once when dropped, whether the
/// recognition succeeded, failed, or unwound.
pub struct SessionGuard {
    session: Box<dyn OcrSession>,
}

impl SessionGuard {
    pub fn new(session: Box<dyn OcrSession>) -> Self {
        Self { session }
    }
}

impl std::ops::Deref for SessionGuard {
    type Target = dyn OcrSession;

    fn deref(&self) -> &Self::Target {
        self.session.as_ref()
    }
}

impl std::ops::DerefMut for SessionGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session.as_mut()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.session.release();
    }
}
