/*
 * Responsibility
 * - 認証エラーの分類 (AuthError / AuthErrorKind)
 * - IntoResponse 実装 (plain text, framework default)
 * - JSON error responder と差し替え可能な ErrorHandler
 * - 起動時の鍵設定エラー (SetupError)
 */
use std::sync::Arc;

use axum::{
    Json,
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jsonwebtoken::Algorithm;
use serde::Serialize;
use thiserror::Error;

/// Why a request could not be authenticated.
///
/// The first four variants come out of header parsing and token validation.
/// `NotAuthenticated` and `Forbidden` are raised by the per-route policy guard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is missing")]
    MissingHeader,

    #[error("Could not separate Authorization scheme and token")]
    MalformedHeader,

    #[error("Authorization scheme {scheme} is not supported")]
    UnsupportedScheme { scheme: String },

    #[error("{detail}")]
    InvalidToken { detail: String },

    #[error("Authentication credentials were not provided")]
    NotAuthenticated,

    #[error("Forbidden")]
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    MissingHeader,
    MalformedHeader,
    UnsupportedScheme,
    InvalidToken,
    NotAuthenticated,
    Forbidden,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingHeader => "MissingHeader",
            Self::MalformedHeader => "MalformedHeader",
            Self::UnsupportedScheme => "UnsupportedScheme",
            Self::InvalidToken => "InvalidToken",
            Self::NotAuthenticated => "NotAuthenticated",
            Self::Forbidden => "Forbidden",
        }
    }
}

impl AuthError {
    pub fn invalid_token(detail: impl Into<String>) -> Self {
        Self::InvalidToken {
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> AuthErrorKind {
        match self {
            Self::MissingHeader => AuthErrorKind::MissingHeader,
            Self::MalformedHeader => AuthErrorKind::MalformedHeader,
            Self::UnsupportedScheme { .. } => AuthErrorKind::UnsupportedScheme,
            Self::InvalidToken { .. } => AuthErrorKind::InvalidToken,
            Self::NotAuthenticated => AuthErrorKind::NotAuthenticated,
            Self::Forbidden => AuthErrorKind::Forbidden,
        }
    }

    /// Status carried by the error itself.
    ///
    /// `InvalidToken` carries none; responders fall back to 500 for it.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::InvalidToken { .. } => None,
            Self::Forbidden => Some(StatusCode::FORBIDDEN),
            _ => Some(StatusCode::UNAUTHORIZED),
        }
    }

    fn status_or_500(&self) -> StatusCode {
        self.status_code().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status_or_500(), self.to_string()).into_response()
    }
}

/// Turns a rejected request into the response sent back to the client.
///
/// Used by the session middleware; the default is [`json_error_handler`].
pub type ErrorHandler = Arc<dyn Fn(&Request, &AuthError) -> Response + Send + Sync>;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    detail: &'a str,
}

/// `{"error": "<kind>", "detail": "<message>"}` with the error's status code,
/// or 500 when it has none.
pub fn json_error_handler(_req: &Request, err: &AuthError) -> Response {
    let detail = err.to_string();
    let body = ErrorBody {
        error: err.kind().as_str(),
        detail: &detail,
    };

    (err.status_or_500(), Json(body)).into_response()
}

pub fn default_error_handler() -> ErrorHandler {
    Arc::new(json_error_handler)
}

/// Key material that cannot be used with the configured algorithm.
///
/// Raised once while building the validator, never per request.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("algorithm {algorithm:?} cannot be used with {key} key material")]
    KeyMismatch {
        algorithm: Algorithm,
        key: &'static str,
    },

    #[error("an empty \"{claim}\" list would accept no token; omit it instead")]
    EmptyClaimList { claim: &'static str },

    #[error("invalid {algorithm:?} key: {source}")]
    InvalidKey {
        algorithm: Algorithm,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};

    fn request() -> Request {
        Request::builder().uri("/").body(Body::empty()).unwrap()
    }

    #[test]
    fn unsupported_scheme_echoes_the_scheme() {
        let err = AuthError::UnsupportedScheme {
            scheme: "Bearer".into(),
        };
        assert_eq!(err.to_string(), "Authorization scheme Bearer is not supported");
        assert_eq!(err.kind().as_str(), "UnsupportedScheme");
    }

    #[test]
    fn guard_errors_map_to_401_and_403() {
        assert_eq!(
            AuthError::NotAuthenticated.status_code(),
            Some(StatusCode::UNAUTHORIZED)
        );
        assert_eq!(
            AuthError::MalformedHeader.status_code(),
            Some(StatusCode::UNAUTHORIZED)
        );
        assert_eq!(AuthError::Forbidden.status_code(), Some(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn invalid_token_has_no_status_and_falls_back_to_500() {
        let err = AuthError::invalid_token("Signature verification failed");
        assert_eq!(err.status_code(), None);

        let response = json_error_handler(&request(), &err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "InvalidToken");
        assert_eq!(body["detail"], "Signature verification failed");
    }

    #[tokio::test]
    async fn json_handler_reports_kind_and_detail() {
        let response = json_error_handler(&request(), &AuthError::MalformedHeader);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "MalformedHeader");
        assert_eq!(
            body["detail"],
            "Could not separate Authorization scheme and token"
        );
    }

    #[tokio::test]
    async fn into_response_is_plain_text() {
        let response = AuthError::NotAuthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            &body_bytes[..],
            b"Authentication credentials were not provided"
        );
    }
}
