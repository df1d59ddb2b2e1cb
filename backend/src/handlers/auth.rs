//! Login and logout handlers

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{cookie::CookieJar, Form, Query};
use serde::Deserialize;
use shared::{FormErrors, LoginForm, NON_FIELD_ERRORS};

use super::invalid_form;
use crate::error::{AppError, AppResult};
use crate::middleware::{is_safe_redirect, removal_cookie, session_cookie, LOGIN_PATH};
use crate::services::AuthService;
use crate::templates::{render, LoginTemplate};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// Login form page
pub async fn login_page(Query(query): Query<LoginQuery>) -> AppResult<Html<String>> {
    let next = query
        .next
        .filter(|n| is_safe_redirect(n))
        .unwrap_or_default();

    render(&LoginTemplate {
        form: LoginForm {
            next,
            ..LoginForm::default()
        },
        errors: FormErrors::new(),
    })
}

/// Verify credentials and start a session
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let form = match form.clone().clean() {
        Ok(form) => form,
        Err(errors) => return login_failed(form, errors),
    };

    let auth = AuthService::new(state.db.clone(), &state.config);
    let driver = match auth.authenticate(&form.username, &form.password).await {
        Ok(driver) => driver,
        Err(AppError::Unauthorized(message)) => {
            tracing::info!(username = %form.username, "Failed login");
            return login_failed(form, FormErrors::single(NON_FIELD_ERRORS, message));
        }
        Err(e) => return Err(e),
    };

    let token = auth.issue_token(driver.id, &driver.username)?;
    let jar = jar.add(session_cookie(&state.config.session, token));

    let target = if is_safe_redirect(&form.next) {
        form.next.as_str()
    } else {
        "/"
    };

    tracing::info!(driver_id = driver.id, "Driver {} logged in", driver.username);
    Ok((jar, Redirect::to(target)).into_response())
}

fn login_failed(form: LoginForm, errors: FormErrors) -> AppResult<Response> {
    let page = render(&LoginTemplate {
        form: LoginForm {
            password: String::new(),
            ..form
        },
        errors,
    })?;
    Ok(invalid_form(page))
}

/// End the session
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.remove(removal_cookie(&state.config.session));
    (jar, Redirect::to(LOGIN_PATH))
}
