/*
 * Responsibility
 * - authentication middleware (JwtBackend) 配下の handler
 * - GET /backend/auth    (requires "authenticated")
 * - GET /backend/no-auth
 */
use axum::Json;
use serde_json::{Value, json};

use crate::api::v1::extractors::CurrentUser;

pub async fn with_auth(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(json!({"auth": {"username": user.display_name()}}))
}

pub async fn without_auth() -> Json<Value> {
    Json(json!({"auth": null}))
}
