//! Driver page handlers

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use axum_extra::extract::{Form, Query};
use shared::{DriverCreationForm, DriverLicenseUpdateForm, FormErrors, ListQuery};

use super::{invalid_form, list_pagination};
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::DriverService;
use crate::templates::{
    render, ConfirmDeleteTemplate, DriverDetailTemplate, DriverFormTemplate,
    DriverLicenseFormTemplate, DriverListTemplate,
};
use crate::AppState;

const LIST_URL: &str = "/drivers/";

/// List drivers
pub async fn list_drivers(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Html<String>> {
    let service = DriverService::new(state.db.clone());
    let page = service
        .list(query.search_term(), list_pagination(&state, &query))
        .await?;

    render(&DriverListTemplate {
        current_user_id: current_user.0.driver_id,
        current_user: current_user.0.username,
        driver_list: page.data,
        pagination: page.pagination,
        search: query.search_term().unwrap_or_default().to_string(),
    })
}

/// Driver profile with assigned cars
pub async fn get_driver(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(driver_id): Path<i64>,
) -> AppResult<Html<String>> {
    let service = DriverService::new(state.db.clone());
    let driver = service.get(driver_id).await?;
    let cars = service.cars_of(driver_id).await?;

    render(&DriverDetailTemplate {
        current_user: current_user.0.username,
        driver,
        cars,
    })
}

/// Empty sign-up form
pub async fn new_driver(
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Html<String>> {
    render(&DriverFormTemplate {
        current_user: current_user.0.username,
        form: DriverCreationForm::default(),
        errors: FormErrors::new(),
    })
}

/// Create a driver account
pub async fn create_driver(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Form(form): Form<DriverCreationForm>,
) -> AppResult<Response> {
    let cleaned = match form.clone().clean() {
        Ok(cleaned) => cleaned,
        Err(errors) => return creation_form_page(current_user, form, errors),
    };

    let service = DriverService::new(state.db.clone());
    match service.create(cleaned).await {
        Ok(driver) => Ok(Redirect::to(&detail_url(driver.id)).into_response()),
        Err(e) => creation_form_page(current_user, form, e.into_form_errors()?),
    }
}

/// License number form
pub async fn edit_license(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(driver_id): Path<i64>,
) -> AppResult<Html<String>> {
    let service = DriverService::new(state.db.clone());
    let driver = service.get(driver_id).await?;

    render(&DriverLicenseFormTemplate {
        current_user: current_user.0.username,
        form: DriverLicenseUpdateForm {
            license_number: driver.license_display().to_string(),
        },
        driver,
        errors: FormErrors::new(),
    })
}

/// Update a driver's license number
pub async fn update_license(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(driver_id): Path<i64>,
    Form(form): Form<DriverLicenseUpdateForm>,
) -> AppResult<Response> {
    let service = DriverService::new(state.db.clone());

    let errors = match form.clone().clean() {
        Ok(cleaned) => match service
            .update_license(driver_id, &cleaned.license_number)
            .await
        {
            Ok(driver) => return Ok(Redirect::to(&detail_url(driver.id)).into_response()),
            Err(e) => e.into_form_errors()?,
        },
        Err(errors) => errors,
    };

    let driver = service.get(driver_id).await?;
    let page = render(&DriverLicenseFormTemplate {
        current_user: current_user.0.username,
        driver,
        form,
        errors,
    })?;
    Ok(invalid_form(page))
}

/// Delete confirmation page
pub async fn confirm_delete_driver(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(driver_id): Path<i64>,
) -> AppResult<Html<String>> {
    let service = DriverService::new(state.db.clone());
    let driver = service.get(driver_id).await?;

    render(&ConfirmDeleteTemplate {
        current_user: current_user.0.username,
        kind: "driver",
        object_label: driver.to_string(),
        action: format!("/drivers/{}/delete/", driver_id),
        cancel_url: detail_url(driver_id),
    })
}

/// Delete a driver account
pub async fn delete_driver(
    State(state): State<AppState>,
    Path(driver_id): Path<i64>,
) -> AppResult<Redirect> {
    let service = DriverService::new(state.db.clone());
    service.delete(driver_id).await?;
    Ok(Redirect::to(LIST_URL))
}

fn detail_url(driver_id: i64) -> String {
    format!("/drivers/{}/", driver_id)
}

fn creation_form_page(
    current_user: CurrentUser,
    form: DriverCreationForm,
    errors: FormErrors,
) -> AppResult<Response> {
    let page = render(&DriverFormTemplate {
        current_user: current_user.0.username,
        form: DriverCreationForm {
            password1: String::new(),
            password2: String::new(),
            ..form
        },
        errors,
    })?;
    Ok(invalid_form(page))
}
