use anyhow::Context;
use dotenv::dotenv;
use todo_service::config::AppConfig;
use todo_service::{SharedData, build_router, db, logging, persistence};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let loaded_env_file = dotenv().is_ok();
    let config = AppConfig::from_env().context("reading configuration")?;

    let otel_exporters = config
        .otel
        .as_ref()
        .map(logging::init_exporters)
        .transpose()?;
    logging::setup_logging_and_tracing(logging::init_env_filter()?, otel_exporters);
    if !loaded_env_file {
        info!("No .env file found, using the process environment only");
    }

    let pool = db::connect_sqlx(&config.db_url, &config.pool)
        .await
        .context("connecting to the database")?;
    let router = build_router(
        SharedData {
            ext_cxn: persistence::ExternalConnectivity::new(pool.clone()),
        },
        config.request_timeout,
    );

    let listener = TcpListener::bind(("0.0.0.0", config.server_port))
        .await
        .with_context(|| format!("binding to port {}", config.server_port))?;
    info!("Starting ToDo RPC server on port {}", config.server_port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving RPCs")?;

    info!("In-flight calls drained, closing the database pool");
    pool.close().await;

    Ok(())
}

/// Resolves once the process is asked to stop. The server stops accepting new calls at
/// that point and finishes the ones already running before [axum::serve] returns.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Could not listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Could not listen for SIGTERM: {err}");
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

    info!("Shutting down the ToDo RPC server");
}
