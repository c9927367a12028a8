use axum::http::{header, HeaderMap, HeaderValue};

pub const SESSION_COOKIE: &str = "session";
pub const FLASH_COOKIE: &str = "flash";

/// Look up one cookie in the request's `Cookie` header.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').map(str::trim).find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == name).then_some(v)
    })
}

/// One-shot notice carried across a redirect.
///
/// Stored in the cookie as a fixed token rather than free text, so cookie
/// values never need escaping; the user-facing message is resolved at
/// render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    InvalidCredentials,
    DuplicateEmail,
    InvalidEmail,
    PasswordTooShort,
    Registered,
}

impl Flash {
    pub fn as_token(self) -> &'static str {
        match self {
            Flash::InvalidCredentials => "invalid_credentials",
            Flash::DuplicateEmail => "duplicate_email",
            Flash::InvalidEmail => "invalid_email",
            Flash::PasswordTooShort => "password_too_short",
            Flash::Registered => "registered",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "invalid_credentials" => Some(Flash::InvalidCredentials),
            "duplicate_email" => Some(Flash::DuplicateEmail),
            "invalid_email" => Some(Flash::InvalidEmail),
            "password_too_short" => Some(Flash::PasswordTooShort),
            "registered" => Some(Flash::Registered),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Flash::InvalidCredentials => "Invalid email or password",
            Flash::DuplicateEmail => "Email already registered",
            Flash::InvalidEmail => "That does not look like an email address",
            Flash::PasswordTooShort => "Password must be at least 8 characters",
            Flash::Registered => "Account created successfully, please login.",
        }
    }
}

// Set-Cookie values below are built only from fixed names and tokens we
// produce ourselves, so the HeaderValue parses are infallible.

pub fn set_flash(headers: &mut HeaderMap, flash: Flash) {
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=60",
        FLASH_COOKIE,
        flash.as_token()
    );
    headers.append(header::SET_COOKIE, HeaderValue::from_str(&cookie).unwrap());
}

/// Read the pending flash, if any, and produce the response headers that
/// clear it so it shows exactly once.
pub fn take_flash(request_headers: &HeaderMap) -> (Option<Flash>, HeaderMap) {
    let flash = cookie_value(request_headers, FLASH_COOKIE).and_then(Flash::from_token);
    let mut response_headers = HeaderMap::new();
    if flash.is_some() {
        let cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", FLASH_COOKIE);
        response_headers.append(header::SET_COOKIE, HeaderValue::from_str(&cookie).unwrap());
    }
    (flash, response_headers)
}
