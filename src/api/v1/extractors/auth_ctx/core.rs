use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::middleware::session::Session;
use crate::services::auth::AuthUser;

/// Handler で decoded claims を受け取るための extractor
/// session middleware を通っていない、またはトークンが無い場合は `Session(None)`
#[derive(Debug, Clone)]
pub struct SessionClaims(pub Session);

impl<S> FromRequestParts<S> for SessionClaims
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(SessionClaims(
            parts.extensions.get::<Session>().cloned().unwrap_or_default(),
        ))
    }
}

/// Handler で AuthUser を受け取るための extractor
/// authentication middleware が AuthUser を insert 済みである前提
/// 見つからない場合は 401 を返す（ミドルウェア未設定）
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
