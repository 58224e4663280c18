//! Router construction and the serve loop with graceful shutdown.

use crate::routes::{abstracts, health, not_found, save};
use crate::state::ServerState;
use anyhow::Context;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the router with every route and the middleware stack.
///
/// The browser UI is served from another origin, so CORS is permissive.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let timeout = state.request_timeout;
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/create-abstract", get(abstracts::create_abstract))
        .route("/api/save", post(save::save_results))
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `bind` and serve until Ctrl+C or SIGTERM.
///
/// ```rust,no_run
/// # async fn demo(state: std::sync::Arc<precis_server::ServerState>) -> anyhow::Result<()> {
/// precis_server::start_server(state, "127.0.0.1:8000").await?;
/// # Ok(()) }
/// ```
pub async fn start_server(state: Arc<ServerState>, bind: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address {bind:?}"))?;

    tracing::info!(
        %addr,
        llm = state.llm.as_ref().map(|l| l.model_name()).unwrap_or("none"),
        output_dir = %state.output_dir.display(),
        timeout_secs = state.request_timeout.as_secs(),
        "server.starting"
    );

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    tracing::info!("server.shutdown_complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "server.ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "server.sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("server.received_ctrl_c"),
        _ = terminate => tracing::info!("server.received_sigterm"),
    }
}
