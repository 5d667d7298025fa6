use std::net::SocketAddr;

use eventlog::{build_router, BrowserContext, EventRepository};
use eventlog_core::config::CoreConfig;
use eventlog_core::db::DatabasePool;
use eventlog_core::errors::EventLogError;
use eventlog_core::logging;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = load_browser_config()?;
    if let Err(err) = logging::init_tracing(None, config.environment) {
        eprintln!("failed to initialise tracing: {err}");
    }

    let bind_addr: SocketAddr = config.http_bind.parse()?;

    let pool = DatabasePool::connect(&config).await?;
    let repository = EventRepository::from_pool(pool).await?;
    let context = BrowserContext::new(repository, config.page_size);
    let app = build_router(context);

    let listener = TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr()?;
    info!(
        %actual_addr,
        environment = ?config.environment,
        page_size = config.page_size,
        "starting eventlog server"
    );

    if let Err(err) = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(?err, "eventlog server terminated with error");
        return Err(err.into());
    }

    Ok(())
}

fn load_browser_config() -> Result<CoreConfig, EventLogError> {
    CoreConfig::from_env_with_prefix("BROWSER_")
        .or_else(|_| CoreConfig::from_env())
        .map_err(Into::into)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sigterm) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error("failed to bind eventlog server: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid bind address: {0}")]
    Addr(#[from] std::net::AddrParseError),
    #[error("startup error: {0}")]
    Startup(#[from] EventLogError),
}
