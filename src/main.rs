use mood_tracker::{router, AppState, Config, GoogleSheetsStore};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();

    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    if let Err(err) = dotenv {
        if !err.not_found() {
            warn!("failed to load .env: {err}");
        }
    }

    let config = Config::from_env();
    if !config.sheets.credentials_path.exists() {
        warn!(
            "credential file {} not found; mood data stays unavailable until it is added",
            config.sheets.credentials_path.display()
        );
    }

    let store = GoogleSheetsStore::new(config.sheets.clone());
    let app = router(AppState::new(Arc::new(store)));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(spreadsheet = %config.sheets.spreadsheet_name, "listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("failed to listen for SIGTERM: {err}");
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

    info!("shutting down");
}
