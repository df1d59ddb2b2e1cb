//! HTTP handlers for the Taxi Service pages

pub mod auth;
pub mod car;
pub mod driver;
pub mod health;
pub mod index;
pub mod manufacturer;

pub use auth::*;
pub use car::*;
pub use driver::*;
pub use health::*;
pub use index::*;
pub use manufacturer::*;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use shared::{ListQuery, Pagination};

use crate::AppState;

/// Re-rendered form page carrying validation errors
fn invalid_form(page: Html<String>) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
}

/// Requested page of a list view, sized from configuration
fn list_pagination(state: &AppState, query: &ListQuery) -> Pagination {
    Pagination::new(query.page, state.config.pagination.per_page)
}
