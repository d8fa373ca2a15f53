//! HTTP JSON API in front of the resolver.
//!
//! Each handler validates its input, builds an explicit language pair and
//! calls the shared resolver; no request state outlives the request.

use crate::batch::{self, BatchOptions};
use crate::error::TranslationError;
use crate::files::translated_file_name;
use crate::i18n::{LanguageConfig, LanguagePair, LanguageRegistry, AUTO_DETECT};
use crate::resolver::{Resolver, TranslationRequest, TranslationSource};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Everything a handler needs, passed down explicitly
pub struct AppState {
    pub resolver: Resolver,
    pub batch: BatchOptions,
    pub max_text_chars: usize,
    /// Cancelled on shutdown; each request resolves under a child token
    pub shutdown: CancellationToken,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Translation was cancelled because the server is shutting down")]
    Cancelled,
}

impl From<TranslationError> for ApiError {
    fn from(_: TranslationError) -> Self {
        // Cancellation is the only error the resolver lets through
        ApiError::Cancelled
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

fn default_source() -> String {
    AUTO_DETECT.to_string()
}

fn default_target() -> String {
    LanguagePair::default().target().to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateTextRequest {
    pub text: String,
    #[serde(default = "default_source")]
    pub source_lang: String,
    #[serde(default = "default_target")]
    pub target_lang: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateTextResponse {
    pub text: String,
    pub source: TranslationSource,
    pub target_lang: String,
    pub target_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateFileRequest {
    pub file_name: String,
    pub content: String,
    #[serde(default = "default_source")]
    pub source_lang: String,
    #[serde(default = "default_target")]
    pub target_lang: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateFileResponse {
    pub file_name: String,
    pub content: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/languages", get(list_languages))
        .route("/api/translate", post(translate_text))
        .route("/api/translate/file", post(translate_file))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Cancel `shutdown` once `signal` fires.
///
/// A signal listener that fails to install never fires, so the server keeps
/// running instead of stopping straight away.
pub async fn shutdown_on<F>(signal: F, shutdown: CancellationToken)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!("Failed to listen for shutdown signal, graceful shutdown disabled: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested, cancelling in-flight translations");
    shutdown.cancel();
}

async fn health_check() -> &'static str {
    "OK"
}

async fn list_languages() -> Json<Vec<LanguageConfig>> {
    Json(
        LanguageRegistry::get()
            .list_all()
            .into_iter()
            .cloned()
            .collect(),
    )
}

fn language_pair(source: &str, target: &str) -> Result<LanguagePair, ApiError> {
    LanguagePair::new(source, target).map_err(|e| ApiError::BadRequest(e.to_string()))
}

async fn translate_text(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TranslateTextRequest>,
) -> Result<Json<TranslateTextResponse>, ApiError> {
    let text = payload.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("Please enter text to translate".to_string()));
    }
    let length = text.chars().count();
    if length > state.max_text_chars {
        warn!("Rejected text of {} characters", length);
        return Err(ApiError::BadRequest(format!(
            "Text is {} characters long; the limit is {}",
            length, state.max_text_chars
        )));
    }

    let pair = language_pair(&payload.source_lang, &payload.target_lang)?;
    let request = TranslationRequest::new(text, pair.source(), pair.target());
    let cancel = state.shutdown.child_token();
    let result = state.resolver.resolve_with_cancel(&request, &cancel).await?;

    Ok(Json(TranslateTextResponse {
        text: result.text,
        source: result.source,
        target_lang: pair.target().to_string(),
        target_name: pair.target_name().to_string(),
    }))
}

async fn translate_file(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TranslateFileRequest>,
) -> Result<Json<TranslateFileResponse>, ApiError> {
    if payload.content.trim().is_empty() {
        return Err(ApiError::BadRequest("Please select a file first".to_string()));
    }
    let file_name = payload.file_name.trim();
    if file_name.is_empty() {
        return Err(ApiError::BadRequest("File name must not be empty".to_string()));
    }
    // Each line becomes one request URL
    let longest = batch::longest_line_chars(&payload.content);
    if longest > state.max_text_chars {
        warn!("Rejected file \"{}\" with a {} character line", file_name, longest);
        return Err(ApiError::BadRequest(format!(
            "A line of the file is {} characters long; the limit is {}",
            longest, state.max_text_chars
        )));
    }

    let pair = language_pair(&payload.source_lang, &payload.target_lang)?;
    info!(
        "Translating file \"{}\" ({} bytes) to {}",
        file_name,
        payload.content.len(),
        pair.target()
    );

    let cancel = state.shutdown.child_token();
    let content = batch::translate_document(
        &state.resolver,
        &payload.content,
        pair.source(),
        pair.target(),
        &state.batch,
        &cancel,
    )
    .await?;

    Ok(Json(TranslateFileResponse {
        file_name: translated_file_name(file_name),
        content,
    }))
}
