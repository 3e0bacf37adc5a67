//! Forewarn Portal Library
//!
//! Credential store, form controllers and HTTP routes for the portal's
//! login, registration and dashboard pages.

pub mod auth;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod forms;
pub mod models;
pub mod routes;
pub mod storage;
pub mod validation;

pub use auth::CredentialStore;
pub use config::Config;
pub use db::{Db, RedbStorage, open_database};
pub use error::{AppError, AuthError, Result, StorageError};
pub use storage::{MemoryStorage, Storage};

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::{
    dashboard_overview, dashboard_stats, health_check, login_user, logout_user, password_check,
    list_roles, list_users, register_user, session_status, user_profile,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CredentialStore>,
    pub config: Config,
}

impl AppState {
    /// Create a new AppState over the given storage and configuration
    pub fn new(storage: Arc<dyn Storage>, config: Config) -> Self {
        Self {
            store: Arc::new(CredentialStore::load(storage)),
            config,
        }
    }
}

/// Build the portal router
pub fn app(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid allowed origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(register_user))
        .route("/api/auth/login", post(login_user))
        .route("/api/auth/logout", post(logout_user))
        .route("/api/auth/session", get(session_status))
        .route("/api/auth/password-check", post(password_check))
        .route("/api/users/profile", get(user_profile))
        .route("/api/users/list", get(list_users))
        .route("/api/users/roles", get(list_roles))
        .route("/api/dashboard/stats", get(dashboard_stats))
        .route("/api/dashboard/overview", get(dashboard_overview))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
