//! Fixed recognition profile
//!
//! Every OCR call applies exactly this configuration. The values are tuned for
//! fast single-block recognition of screenshots and changing any of them
//! changes recognition output, so none of them is exposed as a setting.

/// Characters Tesseract is allowed to emit
pub const CHAR_WHITELIST: &str =
    r#"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz.,!?@#$%^&*()_+-=[]{}|;':,.<>?/~` "#;

/// Tesseract page segmentation modes used by the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSegMode {
    /// Assume a single uniform block of text
    SingleBlock,
}

impl PageSegMode {
    pub fn as_tesseract_value(self) -> &'static str {
        match self {
            PageSegMode::SingleBlock => "6",
        }
    }
}

/// Tesseract engine modes used by the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    /// Neural net (LSTM) recognizer only
    LstmOnly,
}

impl EngineMode {
    pub fn as_tesseract_value(self) -> &'static str {
        match self {
            EngineMode::LstmOnly => "1",
        }
    }
}

/// Immutable engine configuration applied to a fresh session on every call
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionProfile {
    pub language: &'static str,
    pub page_seg_mode: PageSegMode,
    pub engine_mode: EngineMode,
    pub char_whitelist: &'static str,
    /// Tuning variables applied after the mode variables, in this order
    pub tuning: &'static [(&'static str, &'static str)],
}

/// The profile every request uses
pub static RECOGNITION_PROFILE: RecognitionProfile = RecognitionProfile {
    language: "eng",
    page_seg_mode: PageSegMode::SingleBlock,
    engine_mode: EngineMode::LstmOnly,
    char_whitelist: CHAR_WHITELIST,
    tuning: &[
        ("classify_enable_learning", "0"),
        ("classify_enable_adaptive_matcher", "0"),
        ("textord_really_old_xheight", "1"),
        ("segment_penalty_dict_nonword", "1.25"),
        ("language_model_penalty_non_freq_dict_word", "0.1"),
        ("language_model_penalty_non_dict_word", "0.15"),
    ],
};

impl RecognitionProfile {
    /// Every Tesseract variable the profile sets, in application order
    pub fn variables(&self) -> Vec<(&'static str, &'static str)> {
        let mut vars = vec![
            ("tessedit_char_whitelist", self.char_whitelist),
            (
                "tessedit_ocr_engine_mode",
                self.engine_mode.as_tesseract_value(),
            ),
            (
                "tessedit_pageseg_mode",
                self.page_seg_mode.as_tesseract_value(),
            ),
        ];
        vars.extend_from_slice(self.tuning);
        vars
    }

    /// Look up a single variable by name
    pub fn variable(&self, name: &str) -> Option<&'static str> {
        self.variables()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}
