//! Authentication middleware
//!
//! Resolves the session token from the session cookie (or a bearer token)
//! and redirects unauthenticated requests to the login page.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::SessionConfig;
use crate::services::AuthService;
use crate::AppState;

/// Path of the login page
pub const LOGIN_PATH: &str = "/accounts/login/";

/// Authenticated driver extracted from the session token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub driver_id: i64,
    pub username: String,
}

/// Request extension holding the authenticated user.
/// Handlers behind `auth_middleware` take it as `Extension<CurrentUser>`.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

/// Authentication middleware that validates the session token
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(request.headers(), &state.config.session.cookie_name) else {
        tracing::debug!(path = %request.uri().path(), "No session, redirecting to login");
        return login_redirect(request.uri());
    };

    let auth = AuthService::new(state.db.clone(), &state.config);
    let claims = match auth.validate_token(&token) {
        Ok(claims) => claims,
        Err(_) => return login_redirect(request.uri()),
    };

    let driver_id = match claims.sub.parse::<i64>() {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!("Session token with invalid subject: {}", claims.sub);
            return login_redirect(request.uri());
        }
    };

    // The account may have been deleted or deactivated since the token was issued
    let username = match auth.active_driver(driver_id).await {
        Ok(Some(username)) => username,
        Ok(None) => {
            tracing::info!(driver_id, "Session for missing or inactive driver");
            return login_redirect(request.uri());
        }
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(CurrentUser(AuthUser {
        driver_id,
        username,
    }));

    next.run(request).await
}

/// Session token from the session cookie, falling back to a bearer token
fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(cookie_name) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn login_redirect(uri: &Uri) -> Response {
    Redirect::to(&login_url(uri.path())).into_response()
}

/// Login page URL that continues to `next` after logging in
pub fn login_url(next: &str) -> String {
    if is_safe_redirect(next) && next != "/" {
        format!("{}?next={}", LOGIN_PATH, urlencoding::encode(next))
    } else {
        LOGIN_PATH.to_string()
    }
}

/// Only allow redirects to local paths
pub fn is_safe_redirect(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.starts_with("/\\")
        && !target.contains(['\r', '\n', '&', '#'])
}

/// Cookie carrying a freshly issued session token
pub fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookie)
        .build()
}

/// Cookie that clears the session on the client
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), "")).path("/").build()
}
