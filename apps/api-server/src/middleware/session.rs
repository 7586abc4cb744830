//! Session cookie handling and the authenticated identity extractor.
//!
//! The session travels in a signed cookie named `token` whose value is
//! `Bearer <jwt>`. Signing uses a key derived from `COOKIE_SECRET`; the JWT
//! inside is verified separately by the token service.

use std::future::{Ready, ready};

use actix_web::cookie::time::{Duration, OffsetDateTime};
use actix_web::cookie::{Cookie, CookieJar, Key, SameSite};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use serde::Serialize;
use sha2::{Digest, Sha512};
use uuid::Uuid;

use quill_core::ports::{AuthError, TokenClaims};
use quill_shared::ErrorResponse;

use crate::config::SessionConfig;
use crate::middleware::error::AppError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Scheme tag prepended to the JWT in the cookie value.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Value written on logout. It carries no scheme, so it never verifies.
pub const LOGOUT_SENTINEL: &str = "logout";

/// Mints and reads the signed session cookie.
#[derive(Clone)]
pub struct SessionCookies {
    key: Key,
    ttl: Duration,
}

impl SessionCookies {
    /// `ttl_seconds` should match the lifetime of the tokens the cookie carries.
    pub fn new(config: &SessionConfig, ttl_seconds: i64) -> Self {
        // Key::from needs 64 bytes; SHA-512 stretches any secret to that.
        let digest = Sha512::digest(config.cookie_secret.as_bytes());

        Self {
            key: Key::from(digest.as_slice()),
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    /// Cookie carrying a freshly issued token.
    pub fn issue(&self, token: &str) -> Result<Cookie<'static>, AppError> {
        let cookie = Self::builder(format!("{BEARER_PREFIX}{token}"))
            .expires(OffsetDateTime::now_utc() + self.ttl)
            .finish();

        self.sign(cookie)
    }

    /// Cookie that overwrites the session with the logout sentinel.
    pub fn logout(&self) -> Result<Cookie<'static>, AppError> {
        self.sign(Self::builder(LOGOUT_SENTINEL.to_string()).finish())
    }

    /// Extract the raw JWT from a request's session cookie.
    ///
    /// Fails on a missing cookie, a bad signature, or a value without the
    /// `Bearer ` scheme (which includes the logout sentinel).
    pub fn token_from(&self, req: &HttpRequest) -> Result<String, AuthError> {
        let raw = req.cookie(SESSION_COOKIE).ok_or(AuthError::MissingAuth)?;

        let mut jar = CookieJar::new();
        jar.add_original(raw);

        let verified = jar
            .signed(&self.key)
            .get(SESSION_COOKIE)
            .ok_or_else(|| AuthError::InvalidToken("cookie signature mismatch".to_string()))?;

        verified
            .value()
            .strip_prefix(BEARER_PREFIX)
            .map(str::to_owned)
            .ok_or_else(|| AuthError::InvalidToken("expected Bearer scheme".to_string()))
    }

    fn builder(value: String) -> actix_web::cookie::CookieBuilder<'static> {
        Cookie::build(SESSION_COOKIE, value)
            .path("/")
            .http_only(true)
            .secure(true)
            .same_site(SameSite::None)
    }

    fn sign(&self, cookie: Cookie<'static>) -> Result<Cookie<'static>, AppError> {
        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key).add(cookie);

        jar.get(SESSION_COOKIE)
            .cloned()
            .ok_or_else(|| AppError::Internal("session cookie was not signed".to_string()))
    }
}

/// Authenticated user, taken from a verified session cookie.
///
/// Serializes as the token payload, which is what `/profile` returns.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            iat: claims.iat,
            exp: claims.exp,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match &self.0 {
            AuthError::HashingError(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            _ => actix_web::http::StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let error = match &self.0 {
            AuthError::HashingError(_) => ErrorResponse::internal_error(),
            _ => ErrorResponse::credential_error(),
        };

        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState not found in app data");
            return ready(Err(AuthenticationError(AuthError::InvalidToken(
                "Server configuration error".to_string(),
            ))));
        };

        let result = state
            .sessions
            .token_from(req)
            .and_then(|token| state.tokens.verify(&token))
            .map(Identity::from);

        if let Err(e) = &result {
            tracing::debug!(error = %e, "Session rejected");
        }

        ready(result.map_err(AuthenticationError))
    }
}
