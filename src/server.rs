use crate::config::Config;
use crate::engines;
use crate::error::GatewayError;
use crate::gateway::{self, VALID_EXTENSIONS};
use crate::invoker::OcrInvoker;
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

/// Home page, served as-is
const INDEX_HTML: &str = include_str!("../static/index.html");

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub invoker: Arc<OcrInvoker>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(invoker: OcrInvoker, config: Config) -> Self {
        Self {
            invoker: Arc::new(invoker),
            config: Arc::new(config),
        }
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub engine: String,
    pub language: String,
    pub supported_extensions: Vec<String>,
    pub max_form_size_bytes: usize,
}

/// Build the application router around the injected state
pub fn router(state: AppState) -> Router {
    let max_form_size = state.config.max_form_size;

    Router::new()
        .route("/", get(handle_home))
        .route("/upload", post(handle_upload).fallback(redirect_home))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(max_form_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let engine = engines::build(&config)?;
    let invoker = OcrInvoker::new(engine).with_timeout(config.ocr_timeout);
    let addr = format!("{}:{}", config.host, config.port);

    let app = router(AppState::new(invoker, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn handle_home() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn redirect_home() -> Redirect {
    Redirect::to("/")
}

/// Handle image uploads
async fn handle_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let start = Instant::now();

    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(e) => {
            tracing::warn!("Rejected upload: {}", e);
            return GatewayError::FormTooLarge.into_response();
        }
    };

    let upload = match gateway::accept_upload(multipart).await {
        Ok(upload) => upload,
        Err(e) => {
            tracing::warn!("Rejected upload: {}", e);
            return e.into_response();
        }
    };

    let result = state
        .invoker
        .recognize_async(upload.image_bytes.clone())
        .await;

    let processing_time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    match &result {
        Ok(text) => tracing::info!(
            "OCR completed for {} ({} bytes) in {}ms, text length: {}",
            upload.filename,
            upload.declared_size,
            processing_time_ms,
            text.len()
        ),
        Err(e) => tracing::error!(
            "OCR failed for {} after {}ms: {}",
            upload.filename,
            processing_time_ms,
            e
        ),
    }

    gateway::render_result(result.into(), &upload.filename)
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: state.invoker.engine_name().to_string(),
        language: state.invoker.profile().language.to_string(),
        supported_extensions: VALID_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        max_form_size_bytes: state.config.max_form_size,
    })
}
