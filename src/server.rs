use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::fetch::{extract_title, PageFetcher};

const DEFAULT_OWNER_PHONE: &str = "919999999999";
const DEFAULT_VALIDATION_TOKEN: &str = "changeme";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(6);

const SERVICE_NAME: &str = "puch-trust-brief";

const VERDICT_UNVERIFIED: &str = "unverified";
const CONFIDENCE_MVP: f64 = 0.4;
const MAX_BULLETS: usize = 3;
const MAX_CITATIONS: usize = 1;

const BULLET_LINK_SCANNED: &str = "Scanned the linked page and extracted the title.";
const BULLET_LINK_FAILED: &str = "Tried to fetch the link but timed out; treated as text.";
const BULLET_TEXT_CLAIM: &str = "Processed as a text claim; no external link provided.";
const BULLET_MVP_NOTE: &str = "MVP result: preliminary only, not a full fact-check.";

/// Runtime configuration for the trust-brief service.
///
/// Read once at startup from the environment and immutable afterwards.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    owner_phone: String,
    validation_token: String,
    port: u16,
    fetch_timeout: Duration,
}

impl ServiceConfig {
    /// Build runtime configuration from environment variables.
    ///
    /// - `OWNER_PHONE` (default `919999999999`)
    /// - `VALIDATION_TOKEN` (default `changeme`)
    /// - `PORT` (default `8080`)
    pub fn from_env() -> Self {
        let owner_phone =
            std::env::var("OWNER_PHONE").unwrap_or_else(|_| DEFAULT_OWNER_PHONE.to_string());
        let validation_token = std::env::var("VALIDATION_TOKEN")
            .unwrap_or_else(|_| DEFAULT_VALIDATION_TOKEN.to_string());
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            owner_phone,
            validation_token,
            port,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Build deterministic test configuration with a short fetch timeout so
    /// failure-path tests do not wait out the full production timeout.
    pub fn for_test(owner_phone: impl Into<String>, validation_token: impl Into<String>) -> Self {
        Self {
            owner_phone: owner_phone.into(),
            validation_token: validation_token.into(),
            port: 0,
            fetch_timeout: Duration::from_millis(500),
        }
    }
}

#[derive(Clone)]
struct AppState {
    config: Arc<ServiceConfig>,
    fetcher: PageFetcher,
}

fn build_state(config: &ServiceConfig) -> anyhow::Result<AppState> {
    Ok(AppState {
        config: Arc::new(config.clone()),
        fetcher: PageFetcher::new(config.fetch_timeout)?,
    })
}

fn router_for_state(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/mcp", get(mcp_metadata))
        .route("/mcp/validate", post(validate))
        .route("/mcp/analyze_claim", post(analyze_claim))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Build an in-process router from explicit runtime config.
pub fn build_app(config: &ServiceConfig) -> anyhow::Result<Router> {
    Ok(router_for_state(build_state(config)?))
}

/// Run the service with explicit runtime configuration.
pub async fn run_with_config(config: ServiceConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = build_app(&config)?;

    info!("{} v{} listening on {}", SERVICE_NAME, env!("CARGO_PKG_VERSION"), addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("{} shutdown complete", SERVICE_NAME);
    Ok(())
}

/// Run the service using environment-driven configuration.
pub async fn run_from_env() -> anyhow::Result<()> {
    run_with_config(ServiceConfig::from_env()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[derive(Serialize)]
struct ErrorDetail {
    detail: &'static str,
}

fn unauthorized(detail: &'static str) -> (StatusCode, Json<ErrorDetail>) {
    (StatusCode::UNAUTHORIZED, Json(ErrorDetail { detail }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn mcp_metadata() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "tools": [
            {
                "name": "validate",
                "schema": { "bearer_token": "string" },
                "description": "Return owner phone in {country_code}{number} format.",
            },
            {
                "name": "analyze_claim",
                "schema": { "input": "string" },
                "description": "Trust Brief for a text or URL.",
            },
        ],
    }))
}

#[derive(Debug, Deserialize)]
struct ValidateRequest {
    bearer_token: String,
}

#[derive(Debug, Serialize)]
struct ValidateResponse {
    phone: String,
}

async fn validate(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, (StatusCode, Json<ErrorDetail>)> {
    if request.bearer_token != state.config.validation_token {
        return Err(unauthorized("invalid bearer_token"));
    }

    Ok(Json(ValidateResponse {
        phone: state.config.owner_phone.clone(),
    }))
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    input: String,
}

#[derive(Debug, Serialize)]
struct Citation {
    title: String,
    source: String,
    link: Option<String>,
}

#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    verdict: String,
    bullets: Vec<String>,
    citations: Vec<Citation>,
    confidence: f64,
    latency_ms: u64,
}

async fn analyze_claim(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    let started = Instant::now();
    let text = request.input.trim();

    let mut bullets: Vec<String> = Vec::new();
    let mut citations: Vec<Citation> = Vec::new();

    if text.starts_with("http://") || text.starts_with("https://") {
        match state.fetcher.fetch_page(text).await {
            Ok(page) => {
                let title = extract_title(&page.body).unwrap_or_else(|| "Source".to_string());
                citations.push(Citation {
                    title,
                    source: "Link".to_string(),
                    link: Some(page.resolved_url),
                });
                bullets.push(BULLET_LINK_SCANNED.to_string());
            }
            Err(err) => {
                tracing::debug!("Fetch failed for analyze input: {:#}", err);
                bullets.push(BULLET_LINK_FAILED.to_string());
            }
        }
    } else {
        bullets.push(BULLET_TEXT_CLAIM.to_string());
    }

    bullets.push(BULLET_MVP_NOTE.to_string());
    bullets.truncate(MAX_BULLETS);
    citations.truncate(MAX_CITATIONS);

    Json(AnalyzeResponse {
        verdict: VERDICT_UNVERIFIED.to_string(),
        bullets,
        citations,
        confidence: CONFIDENCE_MVP,
        latency_ms: started.elapsed().as_millis() as u64,
    })
}
