//! Car page handlers

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use axum_extra::extract::{Form, Query};
use shared::{CarForm, FormErrors, ListQuery};

use super::{invalid_form, list_pagination};
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::{CarService, DriverService, ManufacturerService};
use crate::templates::{
    render, CarDetailTemplate, CarFormTemplate, CarListTemplate, ConfirmDeleteTemplate,
};
use crate::AppState;

const LIST_URL: &str = "/cars/";
const CREATE_URL: &str = "/cars/create/";

/// List cars
pub async fn list_cars(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Html<String>> {
    let service = CarService::new(state.db.clone());
    let page = service
        .list(query.search_term(), list_pagination(&state, &query))
        .await?;

    render(&CarListTemplate {
        current_user: current_user.0.username,
        car_list: page.data,
        pagination: page.pagination,
        search: query.search_term().unwrap_or_default().to_string(),
    })
}

/// Car with its manufacturer and drivers
pub async fn get_car(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(car_id): Path<i64>,
) -> AppResult<Html<String>> {
    let service = CarService::new(state.db.clone());
    let car = service.get_detail(car_id).await?;
    let is_assigned = car.has_driver(current_user.0.driver_id);

    render(&CarDetailTemplate {
        current_user: current_user.0.username,
        car,
        is_assigned,
    })
}

/// Empty car form
pub async fn new_car(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Html<String>> {
    form_page(
        &state,
        current_user,
        CREATE_URL.to_string(),
        false,
        CarForm::default(),
        FormErrors::new(),
    )
    .await
}

/// Create a car
pub async fn create_car(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Form(form): Form<CarForm>,
) -> AppResult<Response> {
    let action = CREATE_URL.to_string();
    let cleaned = match form.clone().clean() {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            let page = form_page(&state, current_user, action, false, form, errors).await?;
            return Ok(invalid_form(page));
        }
    };

    let service = CarService::new(state.db.clone());
    match service.create(&cleaned).await {
        Ok(car) => Ok(Redirect::to(&detail_url(car.id)).into_response()),
        Err(e) => {
            let errors = e.into_form_errors()?;
            let page = form_page(&state, current_user, action, false, form, errors).await?;
            Ok(invalid_form(page))
        }
    }
}

/// Car form filled with the current values
pub async fn edit_car(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(car_id): Path<i64>,
) -> AppResult<Html<String>> {
    let service = CarService::new(state.db.clone());
    let car = service.get_detail(car_id).await?;

    let form = CarForm {
        model: car.car.model.clone(),
        manufacturer: Some(car.manufacturer.id),
        drivers: car.driver_ids(),
    };

    form_page(
        &state,
        current_user,
        update_url(car_id),
        true,
        form,
        FormErrors::new(),
    )
    .await
}

/// Update a car and its drivers
pub async fn update_car(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(car_id): Path<i64>,
    Form(form): Form<CarForm>,
) -> AppResult<Response> {
    let action = update_url(car_id);
    let cleaned = match form.clone().clean() {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            let page = form_page(&state, current_user, action, true, form, errors).await?;
            return Ok(invalid_form(page));
        }
    };

    let service = CarService::new(state.db.clone());
    match service.update(car_id, &cleaned).await {
        Ok(_) => Ok(Redirect::to(&detail_url(car_id)).into_response()),
        Err(e) => {
            let errors = e.into_form_errors()?;
            let page = form_page(&state, current_user, action, true, form, errors).await?;
            Ok(invalid_form(page))
        }
    }
}

/// Delete confirmation page
pub async fn confirm_delete_car(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(car_id): Path<i64>,
) -> AppResult<Html<String>> {
    let service = CarService::new(state.db.clone());
    let car = service.get_detail(car_id).await?;

    render(&ConfirmDeleteTemplate {
        current_user: current_user.0.username,
        kind: "car",
        object_label: car.car.to_string(),
        action: format!("/cars/{}/delete/", car_id),
        cancel_url: detail_url(car_id),
    })
}

/// Delete a car
pub async fn delete_car(
    State(state): State<AppState>,
    Path(car_id): Path<i64>,
) -> AppResult<Redirect> {
    let service = CarService::new(state.db.clone());
    service.delete(car_id).await?;
    Ok(Redirect::to(LIST_URL))
}

/// Assign the current driver to the car, or remove them from it
pub async fn toggle_assign_to_car(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(car_id): Path<i64>,
) -> AppResult<Redirect> {
    let service = CarService::new(state.db.clone());
    service
        .toggle_assign(car_id, current_user.0.driver_id)
        .await?;
    Ok(Redirect::to(&detail_url(car_id)))
}

fn detail_url(car_id: i64) -> String {
    format!("/cars/{}/", car_id)
}

fn update_url(car_id: i64) -> String {
    format!("/cars/{}/update/", car_id)
}

/// Render the car form with manufacturer and driver choices
async fn form_page(
    state: &AppState,
    current_user: CurrentUser,
    action: String,
    is_update: bool,
    form: CarForm,
    errors: FormErrors,
) -> AppResult<Html<String>> {
    let manufacturers = ManufacturerService::new(state.db.clone());
    let drivers = DriverService::new(state.db.clone());
    let (manufacturers, drivers) = tokio::try_join!(manufacturers.all(), drivers.all())?;

    let (manufacturer_choices, driver_choices) =
        CarFormTemplate::choices(&form, &manufacturers, &drivers);

    render(&CarFormTemplate {
        current_user: current_user.0.username,
        action,
        is_update,
        form,
        manufacturers: manufacturer_choices,
        drivers: driver_choices,
        errors,
    })
}
