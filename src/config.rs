use clap::Parser;
use std::time::Duration;

/// Default cap on the whole multipart body (3 MiB)
pub const DEFAULT_MAX_FORM_SIZE: usize = 3 << 20;

#[derive(Parser, Debug)]
#[command(name = "ocr-simple-server")]
#[command(about = "Upload an image, get its text back as JSON")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "OCR_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "OCR_PORT", default_value = "8080")]
    pub port: u16,

    /// Maximum size of the multipart form in bytes (default: 3MB)
    #[arg(long, env = "OCR_MAX_FORM_SIZE", default_value_t = DEFAULT_MAX_FORM_SIZE)]
    pub max_form_size: usize,

    /// Path to tessdata directory (trained data is downloaded if not set)
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_path: Option<String>,

    /// Abandon an OCR call after this many seconds (no deadline if not set)
    #[arg(long, env = "OCR_TIMEOUT_SECS")]
    pub ocr_timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_form_size: usize,
    pub tessdata_path: Option<String>,
    pub ocr_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_form_size: DEFAULT_MAX_FORM_SIZE,
            tessdata_path: None,
            ocr_timeout: None,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_form_size: args.max_form_size,
            tessdata_path: args.tessdata_path,
            ocr_timeout: args.ocr_timeout_secs.map(Duration::from_secs),
        }
    }
}
