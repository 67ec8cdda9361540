//! PromptCraft Gateway: relays prompts to the configured model and hosts the results.
//! Config-driven via RelayConfig; API keys stay server-side in `.env`.

mod handlers;

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{Html, Response},
    routing::{get, post},
    Router,
};
use promptcraft_core::{
    build_collaborator, ArtifactStore, ModelCollaborator, MonotonicIds, RelayConfig, RelayService,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Clone)]
pub(crate) struct AppState {
    pub config: Arc<RelayConfig>,
    pub relay: Arc<RelayService>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[promptcraft-gateway] .env not loaded: {} (using system environment)", e);
    }

    let config = match RelayConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[promptcraft-gateway] invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let _log_guard = init_tracing(&config);

    let collaborator = build_collaborator(&config);
    let addr = config.bind_addr();
    let state = match build_state(config, collaborator) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("cannot prepare artifact directory: {}", e);
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("{} gateway listening on http://{}", state.config.app_name, addr);

    if let Err(e) = axum::serve(listener, build_app(state)).await {
        tracing::error!("server error: {}", e);
        std::process::exit(1);
    }
}

/// Console logging plus, when `log_dir` is set, a daily-rolling file.
fn init_tracing(config: &RelayConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "promptcraft-gateway.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();
    guard
}

/// Artifact store (created on disk if missing) and relay service for `config`.
fn build_state(config: RelayConfig, collaborator: Arc<dyn ModelCollaborator>) -> std::io::Result<AppState> {
    let ids = Arc::new(MonotonicIds::new());
    let store = ArtifactStore::new(&config.public_dir, &config.generated_dir, Arc::clone(&ids))?;
    store.ensure_dirs()?;

    let relay = RelayService::new(collaborator, store, ids, config.build_delay());
    Ok(AppState {
        config: Arc::new(config),
        relay: Arc::new(relay),
    })
}

fn build_app(state: AppState) -> Router {
    let artifacts = state.relay.artifacts();
    let generated = ServeDir::new(artifacts.dir());
    let generated_prefix = artifacts.url_prefix().to_string();

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/generate/website", post(handlers::generate::generate_website))
        .route("/api/generate/apk", post(handlers::generate::generate_apk))
        .with_state(state)
        .nest_service(&generated_prefix, generated)
        .layer(axum::middleware::from_fn(log_requests))
        // Any origin: the shell page may be served from a dev server on another port.
        .layer(CorsLayer::permissive())
}

async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

async fn health() -> &'static str {
    "OK"
}

/// Browser shell: prompt form, code view, sandboxed preview.
async fn index() -> Html<&'static str> {
    const INDEX: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/index.html"));
    Html(INDEX)
}
