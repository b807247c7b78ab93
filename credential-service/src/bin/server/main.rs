use std::sync::Arc;

use auth::TokenIssuer;
use axum::Router;
use credential_service::config::Config;
use credential_service::config::StoreBackend;
use credential_service::domain::account::ports::CredentialStore;
use credential_service::domain::account::service::AccountService;
use credential_service::inbound::http::router::create_router;
use credential_service::outbound::repositories::InMemoryCredentialStore;
use credential_service::outbound::repositories::PostgresCredentialStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credential_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "credential-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        store_backend = ?config.store.backend,
        session_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    let signing_key = config.jwt.signing_key()?;
    let token_issuer = Arc::new(TokenIssuer::new(
        &signing_key,
        config.jwt.session_window(),
    ));

    let http_application = match config.store.backend {
        StoreBackend::Postgres => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            build_application(
                PostgresCredentialStore::new(pg_pool),
                token_issuer,
                &config,
            )
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory credential store, accounts are lost on exit");
            build_application(InMemoryCredentialStore::new(), token_issuer, &config)
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");
    Ok(())
}

fn build_application<S: CredentialStore>(
    store: S,
    token_issuer: Arc<TokenIssuer>,
    config: &Config,
) -> Router {
    let account_service = Arc::new(AccountService::new(
        Arc::new(store),
        Arc::clone(&token_issuer),
    ));

    create_router(
        account_service,
        token_issuer,
        config.server.request_timeout(),
    )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
