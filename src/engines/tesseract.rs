//! Tesseract engine implementation
//!
//! Uses tesseract-static crate for static linking (no system dependencies).
//! Downloads tessdata (training data) automatically on first use.

use crate::config::Config;
use crate::engine::{OcrEngine, OcrSession};
use crate::error::OcrError;
use crate::profile::{RecognitionProfile, RECOGNITION_PROFILE};
use std::path::{Path, PathBuf};
use tesseract_static::tesseract::Tesseract;

/// Tesseract OCR Engine
pub struct TesseractEngine {
    /// Path to tessdata directory
    tessdata_path: String,
}

impl TesseractEngine {
    /// Resolve tessdata and check that Tesseract starts with it
    pub fn new(config: &Config) -> Result<Self, OcrError> {
        let language = RECOGNITION_PROFILE.language;

        let tessdata_path = match &config.tessdata_path {
            Some(path) => path.clone(),
            None => TessdataCache::in_user_cache().ensure(language)?,
        };

        // Validate that tessdata is accessible by doing a test initialization
        let probe = Tesseract::new(Some(&tessdata_path), Some(language)).map_err(|e| {
            OcrError::EngineInit(format!("Failed to initialize Tesseract: {}", e))
        })?;
        drop(probe);

        tracing::info!(
            "Tesseract engine initialized (tessdata: {}, language: {})",
            tessdata_path,
            language
        );

        Ok(Self { tessdata_path })
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn open_session(&self, profile: &RecognitionProfile) -> Result<Box<dyn OcrSession>, OcrError> {
        let mut tess = Tesseract::new(Some(&self.tessdata_path), Some(profile.language))
            .map_err(|e| OcrError::EngineInit(e.to_string()))?;

        for (name, value) in profile.variables() {
            tess = tess.set_variable(name, value).map_err(|e| {
                OcrError::EngineInit(format!("Failed to set {}={}: {}", name, value, e))
            })?;
        }

        Ok(Box::new(TesseractSession { tess: Some(tess) }))
    }
}

/// One configured Tesseract handle. The builder-style binding consumes the
/// handle on every call, so it lives in an `Option` between calls.
struct TesseractSession {
    tess: Option<Tesseract>,
}

impl TesseractSession {
    fn take(&mut self) -> Result<Tesseract, OcrError> {
        self.tess
            .take()
            .ok_or_else(|| OcrError::Internal("Tesseract session already released".to_string()))
    }
}

impl OcrSession for TesseractSession {
    fn load_image(&mut self, bytes: &[u8]) -> Result<(), OcrError> {
        let bmp_data = to_bmp(bytes)?;
        let tess = self.take()?;

        let tess = tess
            .set_image_from_mem(&bmp_data)
            .map_err(|e| OcrError::ImageLoad(e.to_string()))?;

        self.tess = Some(tess);
        Ok(())
    }

    fn extract_text(&mut self) -> Result<String, OcrError> {
        let tess = self.take()?;

        let mut tess = tess
            .recognize()
            .map_err(|e| OcrError::Recognition(e.to_string()))?;

        let text = tess
            .get_text()
            .map_err(|e| OcrError::Recognition(e.to_string()))?;

        self.tess = Some(tess);
        Ok(text)
    }

    fn release(&mut self) {
        drop(self.tess.take());
    }
}

/// Re-encode the upload as BMP, the one format the static leptonica build
/// always reads.
fn to_bmp(bytes: &[u8]) -> Result<Vec<u8>, OcrError> {
    let img = image::load_from_memory(bytes).map_err(|e| OcrError::ImageLoad(e.to_string()))?;

    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();

    let mut bmp_data = Vec::new();
    rgb_img
        .write_to(&mut std::io::Cursor::new(&mut bmp_data), image::ImageFormat::Bmp)
        .map_err(|e| OcrError::ImageLoad(format!("Failed to convert to BMP: {}", e)))?;

    tracing::debug!(
        "Normalized image: {}x{}, BMP size: {} bytes",
        width,
        height,
        bmp_data.len()
    );

    Ok(bmp_data)
}

/// Directory of `<language>.traineddata` files, filled from tessdata_fast on demand
struct TessdataCache {
    dir: PathBuf,
}

impl TessdataCache {
    const BASE_URL: &'static str = "https://github.com/tesseract-ocr/tessdata_fast/raw/main";

    fn in_user_cache() -> Self {
        Self::at(
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("ocr-simple-server")
                .join("tessdata"),
        )
    }

    fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn traineddata(&self, language: &str) -> PathBuf {
        self.dir.join(format!("{}.traineddata", language))
    }

    fn url(language: &str) -> String {
        format!("{}/{}.traineddata", Self::BASE_URL, language)
    }

    /// Returns the directory to hand to Tesseract, downloading `language` first if missing
    fn ensure(&self, language: &str) -> Result<String, OcrError> {
        let dir = self
            .dir
            .to_str()
            .map(str::to_string)
            .ok_or_else(|| OcrError::EngineInit("Invalid tessdata path".to_string()))?;

        let target = self.traineddata(language);
        if target.exists() {
            tracing::info!("Using cached tessdata from {}", dir);
            return Ok(dir);
        }

        std::fs::create_dir_all(&self.dir).map_err(|e| {
            OcrError::EngineInit(format!("Failed to create tessdata directory: {}", e))
        })?;

        tracing::info!("Downloading tessdata for '{}'", language);
        self.fetch(language, &target)?;
        tracing::info!("Stored tessdata at {:?}", target);

        Ok(dir)
    }

    fn fetch(&self, language: &str, target: &Path) -> Result<(), OcrError> {
        let data = ureq::get(&Self::url(language))
            .call()
            .and_then(|response| response.into_body().read_to_vec())
            .map_err(|e| OcrError::EngineInit(format!("Failed to download tessdata: {}", e)))?;

        // Partial downloads must never look like a cached file
        let partial = target.with_extension("part");
        std::fs::write(&partial, &data)
            .and_then(|_| std::fs::rename(&partial, target))
            .map_err(|e| OcrError::EngineInit(format!("Failed to store tessdata: {}", e)))
    }
}
