//! Taxi Service - Backend
//!
//! Server-rendered administration of a taxi fleet's manufacturers, cars
//! and drivers, behind a login.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod templates;

pub use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::page_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
