use std::sync::Arc;

use anyhow::Result;
use axum::http::HeaderValue;
use tracing::info;
use tracing_subscriber::EnvFilter;

use organisations_api::{router, AppState};
use organisations_common::{ConceptUris, Config};
use organisations_graph::{GraphClient, OrganisationReader};

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("organisations=info".parse()?))
        .init();

    let config = Config::from_env()?;

    let client =
        GraphClient::connect(&config.neo4j_uri, &config.neo4j_user, &config.neo4j_password)
            .await?;

    let reader = OrganisationReader::new(client, Arc::new(ConceptUris::new(&config.api_url)));
    let cache_control = HeaderValue::from_str(&config.cache_control())?;
    let state = Arc::new(AppState::new(reader, cache_control));

    let app = router(state);

    let addr = format!("{}:{}", config.api_host, config.api_port);
    info!("Public Organisations API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
