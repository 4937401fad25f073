use crate::config::Config;
use crate::error::FormatError;
use crate::layout::{self, LayoutOptions, Pipeline};
use crate::llm::LlmFormatter;
use crate::models::{FormatRequest, FormatResponse, FormattedResult, OcrResult};
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::HeaderValue,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<LlmFormatter>,
    pub config: Arc<Config>,
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
    pub llm_configured: bool,
    pub llm_model: Option<String>,
    pub layout: LayoutOptions,
    pub max_body_size_bytes: usize,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let llm = LlmFormatter::new(config.llm.clone())?;
    let addr = format!("{}:{}", config.host, config.port);
    let max_body_size = config.max_body_size;
    let cors = cors_layer(&config.allowed_origins);

    let state = AppState {
        llm: Arc::new(llm),
        config: Arc::new(config),
    };

    let app = Router::new()
        .route("/format", post(handle_format))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Handle layout formatting requests
async fn handle_format(
    State(state): State<AppState>,
    payload: Result<Json<FormatRequest>, JsonRejection>,
) -> Result<Json<FormatResponse>, FormatError> {
    let start = Instant::now();
    let Json(request) = payload.map_err(|e| FormatError::InvalidRequest(e.body_text()))?;

    let results = request.pixel_results();
    let image_size = request.image_size;
    let options = state.config.layout.clone();

    // Layout is CPU bound, keep it off the async workers
    let (local_format, stats) = {
        let results = results.clone();
        let options = options.clone();
        match tokio::task::spawn_blocking(move || {
            layout::format_locally(&results, image_size, &options)
        })
        .await
        {
            Ok(output) => output,
            Err(e) => {
                tracing::error!("Layout worker failed: {}", e);
                (
                    FormattedResult::failed(FormatError::Internal(format!(
                        "Layout worker failed: {}",
                        e
                    ))),
                    None,
                )
            }
        }
    };

    let llm_format = if request.enable_llm_format {
        let lines = reading_order_text(&results, options);
        Some(state.llm.format(&lines).await)
    } else {
        None
    };

    let processing_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        "Formatted {} fragments in {}ms, local success: {}, llm: {}",
        results.len(),
        processing_time_ms,
        local_format.success,
        match &llm_format {
            Some(r) if r.success => "ok",
            Some(_) => "failed",
            None => "skipped",
        }
    );

    Ok(Json(FormatResponse {
        results,
        local_format,
        llm_format,
        stats,
        processing_time_ms,
        image_size,
    }))
}

/// Fragment texts for the LLM, in reading order when the geometry allows it
fn reading_order_text(results: &[OcrResult], options: LayoutOptions) -> Vec<String> {
    Pipeline::new(options)
        .reading_order(results)
        .unwrap_or_else(|e| {
            tracing::warn!("Falling back to input order for LLM text: {}", e);
            results.iter().map(|r| r.rec_txt.clone()).collect()
        })
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
        llm_configured: state.llm.is_configured(),
        llm_model: state
            .llm
            .is_configured()
            .then(|| state.llm.model().to_string()),
        layout: state.config.layout.clone(),
        max_body_size_bytes: state.config.max_body_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_order_falls_back_to_input_order() {
        let results = vec![
            OcrResult {
                dt_boxes: vec![vec![0.0, 50.0], vec![10.0, 50.0], vec![10.0, 60.0]],
                rec_txt: "second".to_string(),
                score: 1.0,
            },
            OcrResult {
                dt_boxes: vec![],
                rec_txt: "broken".to_string(),
                score: 1.0,
            },
        ];

        let lines = reading_order_text(&results, LayoutOptions::default());

        assert_eq!(lines, vec!["second".to_string(), "broken".to_string()]);
    }

    #[test]
    fn test_cors_layer_accepts_wildcard_and_lists() {
        // Construction must not panic for either form
        let _ = cors_layer(&["*".to_string()]);
        let _ = cors_layer(&["https://a.example".to_string(), "bad\norigin".to_string()]);
    }
}
