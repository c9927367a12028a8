use axum::{
    extract::{FromRef, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, RegisterForm},
        error::AuthError,
        services,
        session::{self, SessionKeys},
    },
    cookies::{self, Flash},
    db::DbConn,
    state::AppState,
    ui,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .route("/register", get(register_page).post(register_submit))
        .route("/logout", get(logout))
}

fn flash_redirect(flash: Flash, to: &str) -> Response {
    let mut headers = HeaderMap::new();
    cookies::set_flash(&mut headers, flash);
    (headers, Redirect::to(to)).into_response()
}

pub async fn login_page(headers: HeaderMap) -> impl IntoResponse {
    let (flash, response_headers) = cookies::take_flash(&headers);
    let body = r#"<nav><a href="/">Home</a><a href="/register">Register</a></nav>
<h1>Login</h1>
<form method="post" action="/login">
    <label>Email <input type="email" name="email" required></label>
    <label>Password <input type="password" name="password" required></label>
    <button type="submit">Log in</button>
</form>"#;
    (response_headers, ui::page("Login", flash, body))
}

#[instrument(skip(state, conn, payload))]
pub async fn login_submit(
    State(state): State<AppState>,
    DbConn(mut conn): DbConn,
    Form(mut payload): Form<LoginForm>,
) -> Response {
    payload.email = payload.email.trim().to_lowercase();

    match services::verify(&mut conn, &payload.email, &payload.password).await {
        Ok(user) => {
            let keys = SessionKeys::from_ref(&state);
            match session::establish(&keys, &user) {
                Ok(headers) => {
                    info!(user_id = %user.user_id, email = %user.email, "user logged in");
                    (headers, Redirect::to("/songs")).into_response()
                }
                Err(e) => {
                    error!(error = %e, "session establish failed");
                    (StatusCode::INTERNAL_SERVER_ERROR, "login failed".to_string()).into_response()
                }
            }
        }
        // Unknown email and wrong password look identical to the client.
        Err(AuthError::NotFound) | Err(AuthError::BadCredential) => {
            warn!(email = %payload.email, "login rejected");
            flash_redirect(Flash::InvalidCredentials, "/login")
        }
        Err(e) => {
            error!(error = %e, "login failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "login failed".to_string()).into_response()
        }
    }
}

pub async fn register_page(headers: HeaderMap) -> impl IntoResponse {
    let (flash, response_headers) = cookies::take_flash(&headers);
    let body = r#"<nav><a href="/">Home</a><a href="/login">Login</a></nav>
<h1>Register</h1>
<form method="post" action="/register">
    <label>Email <input type="email" name="email" required></label>
    <label>Password <input type="password" name="password" required></label>
    <label>Username (optional) <input type="text" name="username"></label>
    <button type="submit">Create account</button>
</form>"#;
    (response_headers, ui::page("Register", flash, body))
}

#[instrument(skip(conn, payload))]
pub async fn register_submit(
    DbConn(mut conn): DbConn,
    Form(mut payload): Form<RegisterForm>,
) -> Response {
    payload.email = payload.email.trim().to_lowercase();

    if !services::is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return flash_redirect(Flash::InvalidEmail, "/register");
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return flash_redirect(Flash::PasswordTooShort, "/register");
    }

    match services::register(
        &mut conn,
        &payload.email,
        &payload.password,
        payload.username.as_deref(),
    )
    .await
    {
        Ok(user) => {
            info!(user_id = %user.user_id, email = %user.email, "user registered");
            flash_redirect(Flash::Registered, "/login")
        }
        Err(AuthError::DuplicateEmail) => {
            warn!(email = %payload.email, "email already registered");
            flash_redirect(Flash::DuplicateEmail, "/register")
        }
        Err(e) => {
            error!(error = %e, "register failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "registration failed".to_string(),
            )
                .into_response()
        }
    }
}

#[instrument]
pub async fn logout() -> impl IntoResponse {
    (session::destroy(), Redirect::to("/login"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn flash_redirect_sets_cookie_and_location() {
        let response = flash_redirect(Flash::InvalidCredentials, "/login");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(cookie.starts_with("flash=invalid_credentials"));
    }

    #[tokio::test]
    async fn logout_clears_session_and_redirects() {
        let response = logout().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(cookie.starts_with("session=;"));
    }
}
