use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, ConfigError, IdentitySource};
use crate::database::{DatabaseError, DatabaseManager, MemoryRepository, PgRepository, Repository};
use crate::handlers::{protected, public};
use crate::middleware::{
    cors_layer, identity_middleware, redact_internal_errors, site_guard_middleware, with_response_headers,
};

/// Shared router state.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, config: Arc<AppConfig>) -> Self {
        Self { repo, config }
    }
}

/// Where the server keeps its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Postgres,
    /// Process-local, lost on exit. For local runs only.
    InMemory,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn app(state: AppState) -> Router {
    let security = state.config.security.clone();
    let body_limit = state.config.api.max_request_size_bytes;

    // Layers run bottom-up: identity resolution first, then the site guard.
    let protected_routes = Router::new()
        .route(
            "/api/observations",
            get(protected::observations::list).post(protected::observations::create),
        )
        .route("/api/users", get(protected::users::list))
        .route("/api/sites", get(protected::sites::list))
        .route_layer(middleware::from_fn(site_guard_middleware))
        .route_layer(middleware::from_fn_with_state(state.clone(), identity_middleware));

    let public_routes = Router::new()
        .route("/api/public", get(public::server_status))
        .route("/health", get(public::health));

    let router = public_routes
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(state.clone(), redact_internal_errors));

    with_response_headers(router)
        .layer(cors_layer(&security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Validate configuration, open storage, and serve until Ctrl-C.
///
/// A storage connection failure aborts before the listener is bound.
pub async fn run(config: AppConfig, storage: Storage) -> Result<(), ServerError> {
    config.validate()?;

    if config.security.identity_source == IdentitySource::Headers {
        tracing::warn!(
            "IDENTITY_SOURCE=headers: trusting X-User-Site / X-User-Site-Admin from the network. \
             Only run this behind a proxy that sets them."
        );
    }

    let config = Arc::new(config);
    match storage {
        Storage::Postgres => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;

            let repo = Arc::new(PgRepository::new(pool.clone()));
            let served = serve(AppState::new(repo, config)).await;
            DatabaseManager::close(pool).await;
            served
        }
        Storage::InMemory => {
            tracing::warn!("Using in-memory storage; data is discarded on exit");
            serve(AppState::new(Arc::new(MemoryRepository::new()), config)).await
        }
    }
}

async fn serve(state: AppState) -> Result<(), ServerError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.api.port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    tracing::info!(
        "Observation API listening on http://{} ({:?}, identity from {:?})",
        addr,
        state.config.environment,
        state.config.security.identity_source
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
