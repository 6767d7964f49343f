//! Application setup and wiring

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;

use bearded_core::Config;
use bearded_core::config::StorageBackend;
use bearded_orchestrator::infrastructure::postgres::run_migrations;
use bearded_orchestrator::infrastructure::{
    CatalogSeed, InMemoryStore, NoopScanDispatcher, Repositories, SeedError,
};
use bearded_orchestrator::presentation::auth::{AuthState, KeyConfigError, StaticApiKeyResolver};
use bearded_orchestrator::presentation::controllers::OrchestratorState;
use bearded_orchestrator::presentation::routes::create_router;

/// Handle returned from create_app for graceful shutdown coordination
pub struct AppHandle {
    pub router: Router,
    pub shutdown_token: CancellationToken,
}

/// Errors raised while wiring the application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to load catalog seed: {0}")]
    Seed(#[from] SeedError),

    #[error("Failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to run database migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid API key configuration: {0}")]
    ApiKeys(#[from] KeyConfigError),
}

/// Build the repositories for the in-memory backend
async fn memory_repositories(config: &Config) -> Result<Repositories, AppError> {
    let store = match &config.storage.seed_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading catalog seed");
            let seed = CatalogSeed::load(path).await?;
            InMemoryStore::from_seed(seed).await?
        }
        None => {
            tracing::warn!("No catalog seed configured; every scan request will be rejected");
            InMemoryStore::new()
        }
    };

    Ok(Repositories::in_memory(Arc::new(store)))
}

/// Create the application router and its shutdown token
pub async fn create_app(config: Config) -> Result<AppHandle, AppError> {
    let resolver = StaticApiKeyResolver::from_config(&config.auth)?;
    if config.auth.api_keys.is_empty() {
        tracing::warn!("No API keys configured; all scan endpoints will answer 401");
    }
    let auth_state = AuthState::new(Arc::new(resolver));
    let dispatcher = Arc::new(NoopScanDispatcher);

    let orchestrator_state = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            let repositories = memory_repositories(&config).await?;
            OrchestratorState::new(repositories, dispatcher, auth_state)
        }
        StorageBackend::Postgres => {
            tracing::info!("Connecting to PostgreSQL");
            let db_pool = Arc::new(
                PgPoolOptions::new()
                    .max_connections(config.database.max_connections)
                    .min_connections(config.database.min_idle.unwrap_or(0))
                    .acquire_timeout(Duration::from_secs(config.database.connect_timeout_seconds))
                    .max_lifetime(config.database.max_lifetime_seconds.map(Duration::from_secs))
                    .idle_timeout(config.database.idle_timeout_seconds.map(Duration::from_secs))
                    .test_before_acquire(config.database.enable_health_checks)
                    .connect(&config.database.url)
                    .await?,
            );

            if config.database.run_migrations {
                tracing::info!("Running database migrations");
                run_migrations(&db_pool).await?;
            }

            OrchestratorState::new(Repositories::postgres(db_pool.clone()), dispatcher, auth_state)
                .with_db_pool(db_pool)
        }
    };

    let router = create_router(orchestrator_state, &config.server);

    Ok(AppHandle {
        router,
        shutdown_token: CancellationToken::new(),
    })
}
