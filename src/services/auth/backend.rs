//! Pluggable authentication backends.
//!
//! A backend looks at the request head and decides who is calling. The
//! generic middleware in [`crate::middleware::authentication`] runs it and
//! stores the outcome in the request extensions.
//!
//! Return values:
//! - `Ok(Some((credentials, user)))`: the backend resolved the caller
//! - `Ok(None)`: no opinion, the request continues as anonymous
//! - `Err(_)`: the request is rejected

use std::sync::Arc;

use axum::http::{header, request::Parts};

use crate::error::AuthError;
use crate::services::auth::identity::{AuthUser, Credentials};
use crate::services::auth::validator::JwtValidator;

pub type AuthOutcome = (Credentials, AuthUser);

pub trait AuthBackend: Send + Sync {
    fn authenticate(&self, parts: &Parts) -> Result<Option<AuthOutcome>, AuthError>;
}

/// Reads the token from the `Authorization` header.
///
/// A request without the header gets no opinion (`Ok(None)`).
#[derive(Debug, Clone)]
pub struct JwtBackend {
    validator: Arc<JwtValidator>,
}

impl JwtBackend {
    pub fn new(validator: Arc<JwtValidator>) -> Self {
        Self { validator }
    }
}

impl AuthBackend for JwtBackend {
    fn authenticate(&self, parts: &Parts) -> Result<Option<AuthOutcome>, AuthError> {
        let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(None);
        };
        let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;

        let token = self.validator.token_from_header(Some(value))?;
        let identity = self.validator.authenticate(token)?;

        Ok(Some((
            Credentials::authenticated(),
            AuthUser::Authenticated(identity),
        )))
    }
}

/// Reads the token from a query parameter (`?jwt=<token>` by default).
///
/// Browsers cannot set headers on a WebSocket handshake, hence the query
/// parameter. Without it the connection is anonymous; routes that need a user
/// must require the `authenticated` scope.
#[derive(Debug, Clone)]
pub struct WebSocketJwtBackend {
    validator: Arc<JwtValidator>,
}

impl WebSocketJwtBackend {
    pub fn new(validator: Arc<JwtValidator>) -> Self {
        Self { validator }
    }

    fn token_from_query(&self, parts: &Parts) -> Option<String> {
        let query = parts.uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(name, _)| name == self.validator.query_param())
            .map(|(_, value)| value.into_owned())
    }
}

impl AuthBackend for WebSocketJwtBackend {
    fn authenticate(&self, parts: &Parts) -> Result<Option<AuthOutcome>, AuthError> {
        let Some(token) = self.token_from_query(parts) else {
            return Ok(Some((Credentials::default(), AuthUser::Anonymous)));
        };

        let identity = self.validator.authenticate(&token)?;

        Ok(Some((
            Credentials::authenticated(),
            AuthUser::Authenticated(identity),
        )))
    }
}
