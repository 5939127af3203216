//! HTTP surface: `POST /predict` and `GET /health`.
//!
//! The router only translates between HTTP and [`TaggingService`]; every
//! decision about what tags to return lives in `phototag-core`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use phototag_core::{Config, PipelineError, ServiceInfo, TagResult, TaggingService};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::signal;

/// State shared by every handler. Built once, never mutated.
pub struct AppState {
    pub service: Arc<TaggingService>,
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl PredictResponse {
    fn tags(tags: &TagResult) -> Self {
        Self {
            tags: tags.tags().to_vec(),
            error: None,
        }
    }

    fn single(tag: &str) -> Self {
        Self {
            tags: vec![tag.to_string()],
            error: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            tags: vec!["error".to_string()],
            error: Some(message),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse<'a> {
    status: &'static str,
    #[serde(flatten)]
    info: &'a ServiceInfo,
}

/// Build the router over an already-loaded service.
pub fn build_app(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

async fn predict(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!("Could not read /predict body: {rejection}");
            return (
                rejection.status(),
                Json(PredictResponse::error(rejection.body_text())),
            )
                .into_response();
        }
    };

    if body.is_empty() {
        tracing::warn!("Rejected /predict request with empty body");
        return (
            StatusCode::BAD_REQUEST,
            Json(PredictResponse::single("no-image")),
        )
            .into_response();
    }

    let result = state.service.clone().tag_blocking(body.to_vec()).await;
    into_predict_response(&state.service, result)
}

fn into_predict_response(
    service: &TaggingService,
    result: Result<TagResult, PipelineError>,
) -> Response {
    match result {
        Ok(tags) => (StatusCode::OK, Json(PredictResponse::tags(&tags))).into_response(),
        Err(PipelineError::EmptyRequest) => (
            StatusCode::BAD_REQUEST,
            Json(PredictResponse::single("no-image")),
        )
            .into_response(),
        Err(e) if e.is_input_error() => {
            tracing::warn!("Could not decode upload: {e}");
            (
                StatusCode::OK,
                Json(PredictResponse::tags(service.fallback())),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!("Inference failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(PredictResponse::error(e.to_string())),
            )
                .into_response()
        }
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Response {
    let body = HealthResponse {
        status: "healthy",
        info: state.service.info(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Load the configured service and serve until a shutdown signal arrives.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let service = TaggingService::load(config)?;
    let info = service.info();
    tracing::info!(
        "Strategy {} with model {} ({} categories from {})",
        info.strategy,
        info.model,
        info.categories,
        info.category_source
    );

    let state = Arc::new(AppState {
        service: Arc::new(service),
    });
    let app = build_app(state, config.limits.max_body_bytes());

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received terminate signal, starting graceful shutdown"),
    }
}
