//! JWT authentication for axum routers.
//!
//! Two ways to plug it in:
//!
//! - [`middleware::session`]: validates `Authorization: JWT <token>` and puts
//!   the decoded claims in the request as a [`middleware::Session`]. Failures
//!   are answered by a replaceable [`error::ErrorHandler`] (JSON by default).
//! - [`middleware::authentication`] with an [`services::auth::AuthBackend`]:
//!   the backend resolves `(Credentials, AuthUser)`; failures become a
//!   plain-text 400. [`services::auth::JwtBackend`] reads the header,
//!   [`services::auth::WebSocketJwtBackend`] reads `?jwt=`.
//!
//! Routes declare what they need with [`middleware::AccessPolicy`].
//!
//! ```ignore
//! let settings = AuthSettings::new(KeyMaterial::secret("example"));
//! let validator = Arc::new(JwtValidator::new(&settings)?);
//!
//! let router = Router::new()
//!     .route("/me", protect(get(me), AccessPolicy::AuthenticationRequired));
//! let router = middleware::session::apply(router, SessionAuth::new(validator));
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;

pub use error::{AuthError, AuthErrorKind, ErrorHandler, SetupError, json_error_handler};
pub use middleware::{AccessPolicy, Session, SessionAuth, protect};
pub use services::auth::{
    AuthBackend, AuthSettings, AuthUser, Claims, Credentials, DecodeOptions, Identity,
    JwtBackend, JwtValidator, KeyMaterial, WebSocketJwtBackend,
};
