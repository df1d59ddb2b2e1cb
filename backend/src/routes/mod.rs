//! Route definitions for the Taxi Service

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create all page routes
pub fn page_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .merge(account_routes())
        // Protected routes
        .merge(protected_routes(state))
}

/// Login and logout (public)
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/login/", get(handlers::login_page).post(handlers::login))
        .route("/accounts/logout/", post(handlers::logout))
}

/// Every page behind the login
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index))
        .merge(manufacturer_routes())
        .merge(car_routes())
        .merge(driver_routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Manufacturer management routes
fn manufacturer_routes() -> Router<AppState> {
    Router::new()
        .route("/manufacturers/", get(handlers::list_manufacturers))
        .route(
            "/manufacturers/create/",
            get(handlers::new_manufacturer).post(handlers::create_manufacturer),
        )
        .route(
            "/manufacturers/:manufacturer_id/update/",
            get(handlers::edit_manufacturer).post(handlers::update_manufacturer),
        )
        .route(
            "/manufacturers/:manufacturer_id/delete/",
            get(handlers::confirm_delete_manufacturer).post(handlers::delete_manufacturer),
        )
}

/// Car management routes
fn car_routes() -> Router<AppState> {
    Router::new()
        .route("/cars/", get(handlers::list_cars))
        .route("/cars/create/", get(handlers::new_car).post(handlers::create_car))
        .route("/cars/:car_id/", get(handlers::get_car))
        .route(
            "/cars/:car_id/update/",
            get(handlers::edit_car).post(handlers::update_car),
        )
        .route(
            "/cars/:car_id/delete/",
            get(handlers::confirm_delete_car).post(handlers::delete_car),
        )
        .route(
            "/cars/:car_id/toggle-assign/",
            post(handlers::toggle_assign_to_car),
        )
}

/// Driver management routes
fn driver_routes() -> Router<AppState> {
    Router::new()
        .route("/drivers/", get(handlers::list_drivers))
        .route(
            "/drivers/create/",
            get(handlers::new_driver).post(handlers::create_driver),
        )
        .route("/drivers/:driver_id/", get(handlers::get_driver))
        .route(
            "/drivers/:driver_id/update/",
            get(handlers::edit_license).post(handlers::update_license),
        )
        .route(
            "/drivers/:driver_id/delete/",
            get(handlers::confirm_delete_driver).post(handlers::delete_driver),
        )
}
