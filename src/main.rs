use std::{net::SocketAddr, sync::Arc};
use taskflow_ui::{router, AppState, Config, Dashboard, HttpBackend};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    info!(api_base = %config.api_base, timeout = ?config.request_timeout, "using backend");

    let backend = HttpBackend::new(config.api_base.clone(), config.request_timeout)?;
    let state = AppState::new(Dashboard::new(Arc::new(backend)));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{addr}");

    let dashboard = Arc::clone(&state.dashboard);
    tokio::spawn(async move { dashboard.boot().await });

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}
