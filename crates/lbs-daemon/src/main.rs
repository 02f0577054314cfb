//! lbs-daemon entry point.
//!
//! Thin: loads config, sets up tracing, wires collaborators, runs the sync
//! loop until SIGINT/SIGTERM, and optionally serves the status API.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use lbs_config::AppConfig;
use lbs_daemon::{routes, scheduler::Scheduler, state::AppState, wiring};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Silent if the files do not exist; production injects env vars directly.
    let _ = dotenvy::dotenv();
    let _ = dotenvy::from_filename(".env.local");

    let cfg = AppConfig::from_env().context("load configuration failed")?;
    wiring::init_tracing(cfg.log_file.as_deref())?;

    let key = wiring::board_key(&cfg);
    let engine = wiring::build_engine(&cfg)?;
    let shared = Arc::new(AppState::new(&key));

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_shutdown_signal(cancel.clone()));

    let server = cfg
        .daemon_addr
        .map(|addr| tokio::spawn(serve_status(addr, Arc::clone(&shared), cancel.clone())));

    Scheduler::new(engine, key, cfg.update_interval, cfg.error_backoff, shared)
        .run(cancel.clone())
        .await;

    cancel.cancel();
    if let Some(handle) = server {
        handle.await.context("status api task panicked")??;
    }

    info!("shutdown complete");
    Ok(())
}

async fn serve_status(
    addr: SocketAddr,
    shared: Arc<AppState>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let app = routes::build_router(shared)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_localhost_only());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind status api on {addr} failed"))?;
    info!("lbs-daemon status api listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("server crashed")?;
    Ok(())
}

async fn cancel_on_shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("received shutdown signal; finishing current cycle");
    cancel.cancel();
}

/// CORS: allow only localhost origins.
fn cors_localhost_only() -> CorsLayer {
    let allowed_origins = [
        "http://localhost",
        "http://127.0.0.1",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
    ];

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .allow_headers(tower_http::cors::Any)
}
