use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use flyme::config::AppConfig;
use flyme::handlers;
use flyme::services::ai::ollama::OllamaProvider;
use flyme::services::sessions::SessionStore;
use flyme::state::AppState;

const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    tracing::info!(
        "using Ollama LLM provider (url: {}, model: {})",
        config.ollama_url,
        config.ollama_model
    );
    let llm = OllamaProvider::new(
        config.ollama_url.clone(),
        config.ollama_model.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )
    .context("failed to build LLM client")?;

    if !config.public_dir.join("index.html").exists() {
        tracing::warn!(public_dir = %config.public_dir.display(), "index.html not found, widget will not be served");
    }

    let state = Arc::new(AppState {
        config: config.clone(),
        llm: Box::new(llm),
        sessions: SessionStore::new(),
    });

    if config.session_idle_minutes > 0 {
        let state = Arc::clone(&state);
        let max_idle = chrono::Duration::minutes(config.session_idle_minutes);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(EVICTION_INTERVAL);
            loop {
                ticker.tick().await;
                let removed = state.sessions.evict_idle(chrono::Utc::now(), max_idle).await;
                if removed > 0 {
                    tracing::info!(removed, "evicted idle sessions");
                }
            }
        });
    }

    let app = handlers::router(state)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
