/*
 * Responsibility
 * - session middleware 配下の handler
 * - GET /session/auth    (AuthenticationRequired)
 * - GET /session/no-auth (AnonymousAllowed)
 */
use axum::Json;
use serde_json::{Value, json};

use crate::api::v1::extractors::SessionClaims;

pub async fn with_auth(SessionClaims(session): SessionClaims) -> Json<Value> {
    Json(json!({"session": {"username": session.get("username")}}))
}

pub async fn without_auth() -> Json<Value> {
    Json(json!({"session": null}))
}
