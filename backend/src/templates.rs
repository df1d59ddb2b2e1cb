//! Page templates rendered by the handlers
//!
//! Template files live in `backend/templates/`. Every page behind the login
//! extends `layout.html`, which expects a `current_user` field.

use askama::Template;
use axum::response::Html;
use shared::{
    CarDetail, CarForm, CarWithManufacturer, Driver, DriverCreationForm, DriverLicenseUpdateForm,
    FormErrors, LoginForm, Manufacturer, ManufacturerForm, PaginationMeta,
};

use crate::error::AppResult;

/// Render a template into an HTML response body
pub fn render<T: Template>(template: &T) -> AppResult<Html<String>> {
    Ok(Html(template.render()?))
}

/// An option of a select or checkbox group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: i64,
    pub label: String,
    pub selected: bool,
}

impl Choice {
    pub fn new(value: i64, label: impl ToString, selected: bool) -> Self {
        Self {
            value,
            label: label.to_string(),
            selected,
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub code: &'static str,
    pub message: String,
}

#[derive(Template)]
#[template(path = "registration/login.html")]
pub struct LoginTemplate {
    pub form: LoginForm,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "taxi/index.html")]
pub struct IndexTemplate {
    pub current_user: String,
    pub num_drivers: i64,
    pub num_cars: i64,
    pub num_manufacturers: i64,
    pub num_visits: u64,
}

/// Confirmation page shared by every delete view
#[derive(Template)]
#[template(path = "taxi/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub current_user: String,
    pub kind: &'static str,
    pub object_label: String,
    pub action: String,
    pub cancel_url: String,
}

// ============================================================================
// Manufacturers
// ============================================================================

#[derive(Template)]
#[template(path = "taxi/manufacturer_list.html")]
pub struct ManufacturerListTemplate {
    pub current_user: String,
    pub manufacturer_list: Vec<Manufacturer>,
    pub pagination: PaginationMeta,
    pub search: String,
}

#[derive(Template)]
#[template(path = "taxi/manufacturer_form.html")]
pub struct ManufacturerFormTemplate {
    pub current_user: String,
    pub action: String,
    pub is_update: bool,
    pub form: ManufacturerForm,
    pub errors: FormErrors,
}

// ============================================================================
// Cars
// ============================================================================

#[derive(Template)]
#[template(path = "taxi/car_list.html")]
pub struct CarListTemplate {
    pub current_user: String,
    pub car_list: Vec<CarWithManufacturer>,
    pub pagination: PaginationMeta,
    pub search: String,
}

#[derive(Template)]
#[template(path = "taxi/car_detail.html")]
pub struct CarDetailTemplate {
    pub current_user: String,
    pub car: CarDetail,
    pub is_assigned: bool,
}

#[derive(Template)]
#[template(path = "taxi/car_form.html")]
pub struct CarFormTemplate {
    pub current_user: String,
    pub action: String,
    pub is_update: bool,
    pub form: CarForm,
    pub manufacturers: Vec<Choice>,
    pub drivers: Vec<Choice>,
    pub errors: FormErrors,
}

impl CarFormTemplate {
    /// Build the choice lists, marking what the form currently selects
    pub fn choices(
        form: &CarForm,
        manufacturers: &[Manufacturer],
        drivers: &[Driver],
    ) -> (Vec<Choice>, Vec<Choice>) {
        let manufacturer_choices = manufacturers
            .iter()
            .map(|m| Choice::new(m.id, m, form.manufacturer == Some(m.id)))
            .collect();
        let driver_choices = drivers
            .iter()
            .map(|d| Choice::new(d.id, d, form.drivers.contains(&d.id)))
            .collect();
        (manufacturer_choices, driver_choices)
    }
}

// ============================================================================
// Drivers
// ============================================================================

#[derive(Template)]
#[template(path = "taxi/driver_list.html")]
pub struct DriverListTemplate {
    pub current_user: String,
    pub current_user_id: i64,
    pub driver_list: Vec<Driver>,
    pub pagination: PaginationMeta,
    pub search: String,
}

#[derive(Template)]
#[template(path = "taxi/driver_detail.html")]
pub struct DriverDetailTemplate {
    pub current_user: String,
    pub driver: Driver,
    pub cars: Vec<CarWithManufacturer>,
}

#[derive(Template)]
#[template(path = "taxi/driver_form.html")]
pub struct DriverFormTemplate {
    pub current_user: String,
    pub form: DriverCreationForm,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "taxi/driver_license_form.html")]
pub struct DriverLicenseFormTemplate {
    pub current_user: String,
    pub driver: Driver,
    pub form: DriverLicenseUpdateForm,
    pub errors: FormErrors,
}
