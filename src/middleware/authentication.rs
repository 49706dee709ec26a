//! Generic authentication middleware driven by an [`AuthBackend`].
//!
//! Responsibility:
//! - run the backend on the request head
//! - store `Credentials` + `AuthUser` in the request extensions
//! - turn a backend error into `400 Bad Request` with the message as a plain-text body
//!
//! The error kind is dropped from the response but kept in the log line.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::error::AuthError;
use crate::services::auth::{AuthBackend, AuthUser, Credentials};

pub fn apply<S>(router: Router<S>, backend: Arc<dyn AuthBackend>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(
        backend,
        authentication_middleware,
    ))
}

/// Response for any error raised while authenticating.
pub fn authentication_failed(err: &AuthError) -> Response {
    (StatusCode::BAD_REQUEST, err.to_string()).into_response()
}

async fn authentication_middleware(
    State(backend): State<Arc<dyn AuthBackend>>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let (credentials, user) = match backend.authenticate(&parts) {
        Ok(Some(outcome)) => outcome,
        Ok(None) => (Credentials::default(), AuthUser::Anonymous),
        Err(err) => {
            tracing::warn!(
                kind = err.kind().as_str(),
                error = %err,
                path = %parts.uri.path(),
                "authentication failed"
            );
            return authentication_failed(&err);
        }
    };

    if let AuthUser::Authenticated(identity) = &user {
        tracing::debug!(username = identity.username(), "request authenticated");
    }

    parts.extensions.insert(credentials);
    parts.extensions.insert(user);

    next.run(Request::from_parts(parts, body)).await
}
