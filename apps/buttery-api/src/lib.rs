//! # Buttery API
//!
//! HTTP JSON server for the Buttery Management System.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Buttery API Routes                             │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  auth_service  │  │product_service │  │  sale_service              ││
//! │  │                │  │                │  │                            ││
//! │  │ • login        │  │ • list / get   │  │ • list / get               ││
//! │  │ • register     │  │ • create/update│  │ • create (one transaction) ││
//! │  │ • logout / me  │  │ • soft delete  │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────┐            │
//! │  │inventory_svc   │  │catalog_service │  │ user_service   │            │
//! │  │ • ledger       │  │ • locations    │  │ • list / edit  │            │
//! │  │ • IN/OUT/DAMAGE│  │ • categories   │  │ • toggle status│            │
//! │  └────────────────┘  └────────────────┘  └────────────────┘            │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐                                │
//! │  │ report_service │  │ health_service │                                │
//! │  └────────────────┘  └────────────────┘                                │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │  ┌──────────────┐  ┌──────────────────────┐  ┌─────────────────┐ │  │
//! │  │  │ buttery-db   │  │ JwtManager / AuthUser│  │  TraceLayer     │ │  │
//! │  │  │ SQLite pool  │  │ session + role gate  │  │  request logs   │ │  │
//! │  │  └──────────────┘  └──────────────────────┘  └─────────────────┘ │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ApiConfig`]. Environment variables use the `BUTTERY_` prefix:
//! - `BUTTERY_DATABASE_URL` - SQLite connection string
//! - `BUTTERY_PORT` - HTTP port (default: 3000)
//! - `BUTTERY_JWT_SECRET` - Secret for session token signing
//! - `BUTTERY_SESSION_LIFETIME_SECS` - Session lifetime (default: 604800)
//! - `BUTTERY_ENVIRONMENT` - `development` or `production`

use std::sync::Arc;

use axum::Router;
use buttery_db::{Database, DbConfig, DbResult};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod services;

// Re-exports
pub use auth::{AuthUser, JwtManager};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.session_lifetime_secs);
        AppState {
            db,
            jwt: Arc::new(jwt),
            config: Arc::new(config),
        }
    }

    /// Opens the database described by `config` and builds the state.
    pub async fn connect(config: ApiConfig) -> DbResult<Self> {
        let db_config = DbConfig::new(&config.database_url)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout());
        let db = Database::new(db_config).await?;
        Ok(AppState::new(db, config))
    }
}

/// Builds the full router with request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(services::health_service::routes())
        .merge(services::auth_service::routes())
        .merge(services::product_service::routes())
        .merge(services::sale_service::routes())
        .merge(services::inventory_service::routes())
        .merge(services::catalog_service::routes())
        .merge(services::user_service::routes())
        .merge(services::report_service::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
