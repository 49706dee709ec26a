//! JWT 検証 → decoded claims を Session として extensions に入れる
//!
//! - `Authorization` が無いリクエストはそのまま通す (`Session(None)`)
//! - ヘッダがあれば抽出 → 検証し、失敗したら handler を呼ばずに ErrorHandler の出力を返す
//! - 成功時は `Session(Some(claims))` と `Credentials` を extensions に格納する

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
};
use serde_json::Value;

use crate::error::{AuthError, ErrorHandler, default_error_handler};
use crate::services::auth::{Claims, Credentials, JwtValidator};

/// Decoded claims of the current request, `None` when no token was sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session(pub Option<Claims>);

impl Session {
    pub fn claims(&self) -> Option<&Claims> {
        self.0.as_ref()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.as_ref().and_then(|claims| claims.get(key))
    }

    pub fn is_empty(&self) -> bool {
        self.0.as_ref().is_none_or(|claims| claims.is_empty())
    }
}

/// State handed to the session middleware.
#[derive(Clone)]
pub struct SessionAuth {
    validator: Arc<JwtValidator>,
    error_handler: ErrorHandler,
}

impl std::fmt::Debug for SessionAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAuth")
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

impl SessionAuth {
    /// Rejections are rendered by [`crate::error::json_error_handler`] unless
    /// replaced with [`SessionAuth::with_error_handler`].
    pub fn new(validator: Arc<JwtValidator>) -> Self {
        Self {
            validator,
            error_handler: default_error_handler(),
        }
    }

    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Request, &AuthError) -> Response + Send + Sync + 'static,
    {
        self.error_handler = Arc::new(handler);
        self
    }

    fn claims_from_header(&self, value: &HeaderValue) -> Result<Claims, AuthError> {
        let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;
        let token = self.validator.token_from_header(Some(value))?;
        self.validator.decode(token)
    }
}

/// 配下の route に session middleware を掛ける。
///
/// 例：
/// ```ignore
/// let validator = Arc::new(JwtValidator::new(&settings)?);
/// let router = middleware::session::apply(router, SessionAuth::new(validator));
/// ```
pub fn apply<S>(router: Router<S>, auth: SessionAuth) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(auth, session_middleware))
}

async fn session_middleware(
    State(auth): State<SessionAuth>,
    mut req: Request,
    next: Next,
) -> Response {
    let decoded = match req.headers().get(header::AUTHORIZATION) {
        Some(value) if !value.is_empty() => auth.claims_from_header(value).map(Some),
        _ => Ok(None),
    };

    let claims = match decoded {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                kind = err.kind().as_str(),
                error = %err,
                "session token rejected"
            );
            return (auth.error_handler)(&req, &err);
        }
    };

    let session = Session(claims);
    // 空の payload は session 無しと同じ扱い
    let credentials = if session.is_empty() {
        Credentials::default()
    } else {
        tracing::debug!(
            username = ?session.get(auth.validator.username_field()),
            "session token accepted"
        );
        Credentials::authenticated()
    };

    req.extensions_mut().insert(session);
    req.extensions_mut().insert(credentials);

    next.run(req).await
}
