//! OCR engine implementations
//!
//! Engines are conditionally compiled based on feature flags.

#[cfg(feature = "engine-tesseract")]
pub mod tesseract;

use crate::config::Config;
use crate::engine::OcrEngine;
use crate::error::OcrError;
use std::sync::Arc;

/// Build the engine this binary was compiled with
pub fn build(config: &Config) -> Result<Arc<dyn OcrEngine>, OcrError> {
    #[cfg(feature = "engine-tesseract")]
    {
        tracing::info!("Initializing tesseract engine...");
        let engine = tesseract::TesseractEngine::new(config)?;
        Ok(Arc::new(engine))
    }

    #[cfg(not(feature = "engine-tesseract"))]
    {
        let _ = config;
        Err(OcrError::EngineInit(
            "No OCR engine available. Build with --features engine-tesseract".to_string(),
        ))
    }
}
