use std::time::Duration;

use axum::{
    extract::FromRef,
    http::{header, HeaderMap, HeaderValue},
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::config::SessionConfig;
use crate::cookies::SESSION_COOKIE;
use crate::state::AppState;

/// Identity facts trusted for the duration of a login, carried in a signed
/// cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,     // user ID
    pub email: String, // login email
    pub iat: usize,    // issued at (unix timestamp)
    pub exp: usize,    // expires at (unix timestamp)
    pub iss: String,   // issuer
    pub aud: String,   // audience
}

/// Signing and verification keys for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.session)
    }
}

impl SessionKeys {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(&config.secret),
            decoding: DecodingKey::from_secret(&config.secret),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl: Duration::from_secs((config.ttl_minutes.max(0) as u64) * 60),
        }
    }

    pub fn sign(&self, user: &User) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = SessionClaims {
            sub: user.user_id,
            email: user.email.clone(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user.user_id, "session token signed");
        Ok(token)
    }

    /// Validate a presented token. Invalid, expired, or tampered tokens all
    /// degrade to `None`; there is no error path out of session checking.
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        match decode::<SessionClaims>(token, &self.decoding, &validation) {
            Ok(data) => {
                debug!(user_id = %data.claims.sub, "session token verified");
                Some(data.claims)
            }
            Err(e) => {
                debug!(error = %e, "session token rejected");
                None
            }
        }
    }
}

/// Headers that bind a fresh session to the client.
pub fn establish(keys: &SessionKeys, user: &User) -> anyhow::Result<HeaderMap> {
    let token = keys.sign(user)?;
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        keys.ttl.as_secs()
    );
    let mut headers = HeaderMap::new();
    headers.append(header::SET_COOKIE, HeaderValue::from_str(&cookie)?);
    Ok(headers)
}

/// Headers that invalidate the session cookie.
pub fn destroy() -> HeaderMap {
    let cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    );
    let mut headers = HeaderMap::new();
    headers.append(header::SET_COOKIE, HeaderValue::from_str(&cookie).unwrap());
    headers
}
