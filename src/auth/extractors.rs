use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::Redirect,
};

use crate::auth::session::{SessionClaims, SessionKeys};
use crate::cookies::{cookie_value, SESSION_COOKIE};

fn claims_from_parts<S>(parts: &Parts, state: &S) -> Option<SessionClaims>
where
    SessionKeys: FromRef<S>,
{
    let keys = SessionKeys::from_ref(state);
    let token = cookie_value(&parts.headers, SESSION_COOKIE)?;
    keys.verify(token)
}

/// The active session, if the request carries a valid token.
pub struct MaybeSession(pub Option<SessionClaims>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(claims_from_parts(parts, state)))
    }
}

/// Authorization gate for protected pages: requests without a valid
/// session are redirected to the login page before the handler runs.
pub struct SessionUser(pub SessionClaims);

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match claims_from_parts(parts, state) {
            Some(claims) => Ok(SessionUser(claims)),
            None => Err(Redirect::to("/login")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Request, StatusCode};
    use axum::response::IntoResponse;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use crate::auth::repo_types::User;
    use crate::auth::session;
    use crate::state::AppState;

    fn parts_with_cookie(cookie: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/songs");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    fn signed_cookie(state: &AppState, user: &User) -> String {
        let keys = SessionKeys::from_ref(state);
        format!("{}={}", SESSION_COOKIE, keys.sign(user).expect("sign"))
    }

    fn make_user() -> User {
        User {
            user_id: Uuid::new_v4(),
            email: "a@x.com".into(),
            username: "ada".into(),
            password_hash: "unused".into(),
            joined_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn maybe_session_returns_claims_for_valid_cookie() {
        let state = AppState::fake();
        let user = make_user();
        let mut parts = parts_with_cookie(Some(&signed_cookie(&state, &user)));
        let MaybeSession(claims) = MaybeSession::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        let claims = claims.expect("session should be present");
        assert_eq!(claims.sub, user.user_id);
        assert_eq!(claims.email, user.email);
    }

    #[tokio::test]
    async fn maybe_session_is_none_without_cookie() {
        let state = AppState::fake();
        let mut parts = parts_with_cookie(None);
        let MaybeSession(claims) = MaybeSession::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(claims.is_none());
    }

    #[tokio::test]
    async fn maybe_session_is_none_for_tampered_cookie() {
        let state = AppState::fake();
        let user = make_user();
        let cookie = format!("{}corrupt", signed_cookie(&state, &user));
        let mut parts = parts_with_cookie(Some(&cookie));
        let MaybeSession(claims) = MaybeSession::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(claims.is_none());
    }

    #[tokio::test]
    async fn session_user_redirects_to_login_without_session() {
        let state = AppState::fake();
        let mut parts = parts_with_cookie(None);
        let rejection = SessionUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("should reject");
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login"
        );
    }

    #[tokio::test]
    async fn session_user_passes_with_valid_session() {
        let state = AppState::fake();
        let user = make_user();
        let mut parts = parts_with_cookie(Some(&signed_cookie(&state, &user)));
        let SessionUser(claims) = SessionUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(claims.sub, user.user_id);
    }

    #[tokio::test]
    async fn destroyed_session_no_longer_resolves() {
        // destroy() clears the cookie; a request without it has no session.
        let state = AppState::fake();
        let cleared = session::destroy();
        let cookie = cleared
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(cookie.contains("Max-Age=0"));
        let mut parts = parts_with_cookie(None);
        let MaybeSession(claims) = MaybeSession::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(claims.is_none());
    }
}
