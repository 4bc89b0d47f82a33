//! Fiscal Bridge HTTP server.

use std::process::ExitCode;
use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::signal;

use fiscal_bridge::adapters::focus::{FocusConfig, FocusGateway};
use fiscal_bridge::adapters::http::{app_router, CompanyAppState};
use fiscal_bridge::adapters::memory::InMemoryIntegrationRepository;
use fiscal_bridge::adapters::postgres::PostgresIntegrationRepository;
use fiscal_bridge::adapters::postgrest::{
    PostgrestClient, PostgrestConfig, PostgrestIntegrationRepository,
};
use fiscal_bridge::config::{AppConfig, PersistenceBackend, PersistenceConfig};
use fiscal_bridge::ports::IntegrationRepository;
use fiscal_bridge::telemetry::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("FATAL: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&config.server.log_level, config.server.log_format) {
        eprintln!("FATAL: {e}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    let focus = FocusConfig::with_secret(&config.provider.base_url, config.provider.api_token())
        .with_timeout(config.provider.timeout());
    if config.provider.api_token().expose_secret().trim().is_empty() {
        tracing::warn!("Fiscal provider API token is not set; provider calls will fail");
    }
    let provider = Arc::new(FocusGateway::new(focus)?);

    let repository = build_repository(&config.persistence).await?;
    let state = CompanyAppState::new(provider, repository);
    let app = app_router(state, &config.server.cors_origins_list());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        backend = ?config.persistence.backend,
        "Fiscal bridge listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn build_repository(
    config: &PersistenceConfig,
) -> Result<Arc<dyn IntegrationRepository>, Box<dyn std::error::Error>> {
    let repository: Arc<dyn IntegrationRepository> = match config.backend {
        PersistenceBackend::Postgrest => {
            let key = config
                .key
                .clone()
                .ok_or("persistence key is required for the postgrest backend")?;
            let client = PostgrestClient::new(PostgrestConfig::new(&config.url, key, &config.schema))?;
            Arc::new(
                PostgrestIntegrationRepository::new(client)
                    .with_certificate_window_rpc(config.certificate_window_rpc.clone()),
            )
        }
        PersistenceBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.url)
                .await?;
            Arc::new(PostgresIntegrationRepository::new(pool, &config.schema))
        }
        PersistenceBackend::Memory => {
            tracing::warn!("Using in-memory persistence; integration facts are not durable");
            Arc::new(InMemoryIntegrationRepository::new())
        }
    };
    Ok(repository)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
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
                tracing::error!("Failed to install SIGTERM handler: {e}");
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

    tracing::info!("Shutdown signal received");
}
