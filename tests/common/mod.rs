#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request};
use ocr_simple_server::config::Config;
use ocr_simple_server::engine::{OcrEngine, OcrSession};
use ocr_simple_server::error::OcrError;
use ocr_simple_server::invoker::OcrInvoker;
use ocr_simple_server::profile::RecognitionProfile;
use ocr_simple_server::server::{self, AppState};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BOUNDARY: &str = "ocr-test-boundary-7MA4YWxkTrZu0gW";

/// How every session of a [`MockEngine`] behaves
#[derive(Clone, Debug)]
pub enum Behavior {
    /// Return the uploaded bytes as text
    Echo,
    /// Always return this text, ignoring the image
    Fixed(String),
    FailOpen(String),
    FailLoad(String),
    FailExtract(String),
    PanicOnExtract,
    /// Sleep before echoing
    Slow(Duration),
    /// Echo, but overwrite this session's whitelist after recording it
    Tamper,
}

/// Everything the mock engine observed
#[derive(Default)]
pub struct Calls {
    pub opened: AtomicUsize,
    pub released: AtomicUsize,
    pub loaded: AtomicUsize,
    /// Variables each session held when its image was loaded
    pub snapshots: Mutex<Vec<HashMap<String, String>>>,
}

impl Calls {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn loaded(&self) -> usize {
        self.loaded.load(Ordering::SeqCst)
    }

    pub fn snapshots(&self) -> Vec<HashMap<String, String>> {
        self.snapshots.lock().unwrap().clone()
    }
}

pub struct MockEngine {
    pub behavior: Behavior,
    pub calls: Arc<Calls>,
}

impl MockEngine {
    pub fn new(behavior: Behavior) -> (Self, Arc<Calls>) {
        let calls = Arc::new(Calls::default());
        (
            Self {
                behavior,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl OcrEngine for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn open_session(&self, profile: &RecognitionProfile) -> Result<Box<dyn OcrSession>, OcrError> {
        self.calls.opened.fetch_add(1, Ordering::SeqCst);

        if let Behavior::FailOpen(msg) = &self.behavior {
            return Err(OcrError::EngineInit(msg.clone()));
        }

        let vars = profile
            .variables()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Ok(Box::new(MockSession {
            behavior: self.behavior.clone(),
            calls: Arc::clone(&self.calls),
            vars,
            image: None,
        }))
    }
}

struct MockSession {
    behavior: Behavior,
    calls: Arc<Calls>,
    vars: HashMap<String, String>,
    image: Option<Vec<u8>>,
}

impl OcrSession for MockSession {
    fn load_image(&mut self, bytes: &[u8]) -> Result<(), OcrError> {
        self.calls.loaded.fetch_add(1, Ordering::SeqCst);
        self.calls.snapshots.lock().unwrap().push(self.vars.clone());

        match &self.behavior {
            Behavior::FailLoad(msg) => return Err(OcrError::ImageLoad(msg.clone())),
            Behavior::Tamper => {
                self.vars
                    .insert("tessedit_char_whitelist".to_string(), "X".to_string());
            }
            _ => {}
        }

        self.image = Some(bytes.to_vec());
        Ok(())
    }

    fn extract_text(&mut self) -> Result<String, OcrError> {
        let echo = String::from_utf8_lossy(self.image.as_deref().unwrap_or_default()).to_string();

        match &self.behavior {
            Behavior::FailExtract(msg) => Err(OcrError::Recognition(msg.clone())),
            Behavior::PanicOnExtract => panic!("engine crashed"),
            Behavior::Fixed(text) => Ok(text.clone()),
            Behavior::Slow(delay) => {
                std::thread::sleep(*delay);
                Ok(echo)
            }
            Behavior::Echo | Behavior::Tamper | Behavior::FailOpen(_) | Behavior::FailLoad(_) => {
                Ok(format!("\n  {}  \n", echo))
            }
        }
    }

    fn release(&mut self) {
        self.calls.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Router backed by a mock engine
pub fn test_app(behavior: Behavior, config: Config) -> (axum::Router, Arc<Calls>) {
    let (engine, calls) = MockEngine::new(behavior);
    let invoker = OcrInvoker::new(Arc::new(engine)).with_timeout(config.ocr_timeout);
    (server::router(AppState::new(invoker, config)), calls)
}

/// Encode a single multipart part; `filename: None` sends a plain value
pub fn multipart_body(field: &str, filename: Option<&str>, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    match filename {
        Some(name) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                field, name
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", field).as_bytes(),
        ),
    }
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn image_upload(filename: &str, data: &[u8]) -> Request<Body> {
    upload_request(multipart_body("image", Some(filename), data))
}

pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
