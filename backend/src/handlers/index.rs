//! Home page handler

use axum::{extract::State, response::Html, Extension};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::{CarService, DriverService, ManufacturerService};
use crate::templates::{render, IndexTemplate};
use crate::AppState;

/// Cookie counting how often this browser opened the home page
pub const VISITS_COOKIE: &str = "num_visits";

/// Home page with record counts and the visit counter
pub async fn index(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let num_visits = jar
        .get(VISITS_COOKIE)
        .and_then(|c| c.value().parse::<u64>().ok())
        .unwrap_or(0)
        .saturating_add(1);

    let drivers = DriverService::new(state.db.clone());
    let cars = CarService::new(state.db.clone());
    let manufacturers = ManufacturerService::new(state.db.clone());

    let (num_drivers, num_cars, num_manufacturers) =
        tokio::try_join!(drivers.count(), cars.count(), manufacturers.count())?;

    let page = render(&IndexTemplate {
        current_user: current_user.0.username,
        num_drivers,
        num_cars,
        num_manufacturers,
        num_visits,
    })?;

    let jar = jar.add(
        Cookie::build((VISITS_COOKIE, num_visits.to_string()))
            .path("/")
            .http_only(true)
            .build(),
    );

    Ok((jar, page))
}
