//! Manufacturer page handlers

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use axum_extra::extract::{Form, Query};
use shared::{FormErrors, ListQuery, ManufacturerForm};

use super::{invalid_form, list_pagination};
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::ManufacturerService;
use crate::templates::{
    render, ConfirmDeleteTemplate, ManufacturerFormTemplate, ManufacturerListTemplate,
};
use crate::AppState;

const LIST_URL: &str = "/manufacturers/";

/// List manufacturers
pub async fn list_manufacturers(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Html<String>> {
    let service = ManufacturerService::new(state.db.clone());
    let page = service
        .list(query.search_term(), list_pagination(&state, &query))
        .await?;

    render(&ManufacturerListTemplate {
        current_user: current_user.0.username,
        manufacturer_list: page.data,
        pagination: page.pagination,
        search: query.search_term().unwrap_or_default().to_string(),
    })
}

/// Empty manufacturer form
pub async fn new_manufacturer(
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Html<String>> {
    render(&ManufacturerFormTemplate {
        current_user: current_user.0.username,
        action: "/manufacturers/create/".to_string(),
        is_update: false,
        form: ManufacturerForm::default(),
        errors: FormErrors::new(),
    })
}

/// Create a manufacturer
pub async fn create_manufacturer(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Form(form): Form<ManufacturerForm>,
) -> AppResult<Response> {
    let action = "/manufacturers/create/".to_string();
    let cleaned = match form.clone().clean() {
        Ok(cleaned) => cleaned,
        Err(errors) => return form_page(current_user, action, false, form, errors),
    };

    let service = ManufacturerService::new(state.db.clone());
    match service.create(&cleaned).await {
        Ok(_) => Ok(Redirect::to(LIST_URL).into_response()),
        Err(e) => form_page(current_user, action, false, form, e.into_form_errors()?),
    }
}

/// Manufacturer form filled with the current values
pub async fn edit_manufacturer(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(manufacturer_id): Path<i64>,
) -> AppResult<Html<String>> {
    let service = ManufacturerService::new(state.db.clone());
    let manufacturer = service.get(manufacturer_id).await?;

    render(&ManufacturerFormTemplate {
        current_user: current_user.0.username,
        action: update_url(manufacturer_id),
        is_update: true,
        form: ManufacturerForm {
            name: manufacturer.name,
            country: manufacturer.country,
        },
        errors: FormErrors::new(),
    })
}

/// Update a manufacturer
pub async fn update_manufacturer(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(manufacturer_id): Path<i64>,
    Form(form): Form<ManufacturerForm>,
) -> AppResult<Response> {
    let action = update_url(manufacturer_id);
    let cleaned = match form.clone().clean() {
        Ok(cleaned) => cleaned,
        Err(errors) => return form_page(current_user, action, true, form, errors),
    };

    let service = ManufacturerService::new(state.db.clone());
    match service.update(manufacturer_id, &cleaned).await {
        Ok(_) => Ok(Redirect::to(LIST_URL).into_response()),
        Err(e) => form_page(current_user, action, true, form, e.into_form_errors()?),
    }
}

/// Delete confirmation page
pub async fn confirm_delete_manufacturer(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(manufacturer_id): Path<i64>,
) -> AppResult<Html<String>> {
    let service = ManufacturerService::new(state.db.clone());
    let manufacturer = service.get(manufacturer_id).await?;

    render(&ConfirmDeleteTemplate {
        current_user: current_user.0.username,
        kind: "manufacturer",
        object_label: manufacturer.to_string(),
        action: format!("/manufacturers/{}/delete/", manufacturer_id),
        cancel_url: LIST_URL.to_string(),
    })
}

/// Delete a manufacturer
pub async fn delete_manufacturer(
    State(state): State<AppState>,
    Path(manufacturer_id): Path<i64>,
) -> AppResult<Redirect> {
    let service = ManufacturerService::new(state.db.clone());
    service.delete(manufacturer_id).await?;
    Ok(Redirect::to(LIST_URL))
}

fn update_url(manufacturer_id: i64) -> String {
    format!("/manufacturers/{}/update/", manufacturer_id)
}

fn form_page(
    current_user: CurrentUser,
    action: String,
    is_update: bool,
    form: ManufacturerForm,
    errors: FormErrors,
) -> AppResult<Response> {
    let page = render(&ManufacturerFormTemplate {
        current_user: current_user.0.username,
        action,
        is_update,
        form,
        errors,
    })?;
    Ok(invalid_form(page))
}
