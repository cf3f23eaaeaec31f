//! Account Handlers
//!
//! Sign-up, login and logout. The session lives in an HttpOnly cookie holding
//! a signed token.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::application::dto::{safe_next, LoginForm, SignupForm};
use crate::application::services::{AuthError, AuthService, SESSION_COOKIE};
use crate::config::AuthSettings;
use crate::presentation::http::extractors::{found, Viewer};
use crate::presentation::http::views::{render, LoggedOutPage, LoginPage, SignupPage};
use crate::shared::error::AppError;
use crate::shared::validation::FormErrors;
use crate::startup::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

fn session_cookie(token: String, settings: &AuthSettings) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure_cookie)
        .build()
}

fn auth_error(e: AuthError) -> AppError {
    match e {
        AuthError::Storage(e) => e,
        e => AppError::Internal(e.to_string()),
    }
}

fn signup_page(viewer: Viewer, form: &SignupForm, errors: FormErrors) -> SignupPage {
    SignupPage {
        viewer: viewer.0,
        username: form.username.clone(),
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        email: form.email.clone(),
        errors,
    }
}

pub async fn signup_form(viewer: Viewer) -> Result<Response, AppError> {
    render(&signup_page(viewer, &SignupForm::default(), FormErrors::new()))
}

pub async fn signup(
    State(state): State<AppState>,
    viewer: Viewer,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    if let Err(e) = form.validate() {
        return render(&signup_page(viewer, &form, e.into()));
    }

    let auth = state.auth_service();
    let user = match auth.signup(&form).await {
        Ok(user) => user,
        Err(AuthError::UsernameExists) => {
            let mut errors = FormErrors::new();
            errors.add("username", AuthError::UsernameExists.to_string());
            return render(&signup_page(viewer, &form, errors));
        }
        Err(e) => return Err(auth_error(e)),
    };

    let token = auth.issue_session(user.id).map_err(auth_error)?;
    let jar = jar.add(session_cookie(token, &state.settings.auth));
    Ok((jar, found("/")).into_response())
}

pub async fn login_form(
    viewer: Viewer,
    Query(query): Query<NextQuery>,
) -> Result<Response, AppError> {
    render(&LoginPage {
        viewer: viewer.0,
        username: String::new(),
        next: query.next.unwrap_or_default(),
        errors: FormErrors::new(),
    })
}

pub async fn login(
    State(state): State<AppState>,
    viewer: Viewer,
    jar: CookieJar,
    Query(query): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    // The form field wins over the query string.
    let next = form
        .next
        .clone()
        .filter(|n| !n.is_empty())
        .or(query.next)
        .unwrap_or_default();
    let page = |errors: FormErrors| LoginPage {
        viewer: viewer.0.clone(),
        username: form.username.clone(),
        next: next.clone(),
        errors,
    };

    if let Err(e) = form.validate() {
        return render(&page(e.into()));
    }

    let auth = state.auth_service();
    let user = match auth.login(&form.username, &form.password).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            let mut errors = FormErrors::new();
            errors.add_non_field(AuthError::InvalidCredentials.to_string());
            return render(&page(errors));
        }
        Err(e) => return Err(auth_error(e)),
    };

    let token = auth.issue_session(user.id).map_err(auth_error)?;
    let jar = jar.add(session_cookie(token, &state.settings.auth));
    info!(user_id = user.id, "User logged in");

    let target = safe_next(Some(next.as_str()).filter(|n| !n.is_empty())).unwrap_or("/");
    Ok((jar, found(target)).into_response())
}

pub async fn logout(jar: CookieJar) -> Result<Response, AppError> {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    let page = render(&LoggedOutPage { viewer: None })?;
    Ok((jar, page).into_response())
}
