use ferrous_doh_api::{create_doh_routes, AppState};
use ferrous_doh_domain::Config;
use std::future::IntoFuture;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Serve DoH until a termination signal, then drain in-flight requests.
///
/// Requests still running when the grace period ends are dropped.
pub async fn start_web_server(
    config: &Config,
    state: AppState,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let app = create_doh_routes(state).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(config.listen_address()).await?;
    info!(
        address = %listener.local_addr()?,
        upstream = %config.upstream.address,
        "DoH proxy started"
    );

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Shutdown signal received, draining requests");
        signal_token.cancel();
    });

    let drain_token = shutdown.clone();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move { drain_token.cancelled().await })
        .into_future();
    tokio::pin!(server);

    let grace = Duration::from_secs(config.server.shutdown_timeout_secs);

    tokio::select! {
        result = &mut server => result?,
        _ = async {
            shutdown.cancelled().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(
                grace_secs = grace.as_secs(),
                "Shutdown grace period elapsed, dropping open requests"
            );
        }
    }

    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
