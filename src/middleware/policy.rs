//! Per-route access policy.
//!
//! Each route declares what it needs when it is registered; a single guard
//! checks the request's [`Credentials`] before the handler runs. The
//! credentials are put there by the session or authentication middleware, so
//! the guard must sit inside one of them.
//!
//! ```ignore
//! Router::new()
//!     .route("/me", protect(get(me), AccessPolicy::AuthenticationRequired))
//!     .route("/public", get(public));
//! ```

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};

use crate::error::AuthError;
use crate::services::auth::{AUTHENTICATED, Credentials};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Anyone may call the route.
    AnonymousAllowed,
    /// 401 `NotAuthenticated` unless the request carries the `authenticated` scope.
    AuthenticationRequired,
    /// 403 `Forbidden` unless every listed scope is present.
    Requires(Vec<String>),
}

impl AccessPolicy {
    pub fn requires<I, T>(scopes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::Requires(scopes.into_iter().map(Into::into).collect())
    }

    pub fn check(&self, credentials: &Credentials) -> Result<(), AuthError> {
        match self {
            Self::AnonymousAllowed => Ok(()),
            Self::AuthenticationRequired if credentials.contains(AUTHENTICATED) => Ok(()),
            Self::AuthenticationRequired => Err(AuthError::NotAuthenticated),
            Self::Requires(scopes) if scopes.iter().all(|s| credentials.contains(s)) => Ok(()),
            Self::Requires(_) => Err(AuthError::Forbidden),
        }
    }
}

pub fn protect<S>(route: MethodRouter<S>, policy: AccessPolicy) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(policy, enforce))
}

async fn enforce(State(policy): State<AccessPolicy>, req: Request, next: Next) -> Response {
    let verdict = match req.extensions().get::<Credentials>() {
        Some(credentials) => policy.check(credentials),
        None => policy.check(&Credentials::default()),
    };

    match verdict {
        Ok(()) => next.run(req).await,
        Err(err) => {
            tracing::debug!(
                ?policy,
                path = %req.uri().path(),
                error = %err,
                "access policy rejected request"
            );
            err.into_response()
        }
    }
}
