/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /session, /backend, /ws を nest し、それぞれに認証 middleware を掛ける
 * - route ごとのアクセス方針 (AccessPolicy) もここで決める
 */
use std::sync::Arc;

use axum::{Router, routing::get};

use crate::api::v1::handlers::{backend, session, ws};
use crate::middleware::{self, AccessPolicy, SessionAuth, protect};
use crate::services::auth::{AUTHENTICATED, JwtBackend, JwtValidator, WebSocketJwtBackend};

pub fn routes(validator: Arc<JwtValidator>) -> Router {
    Router::new()
        .nest("/session", session_routes(validator.clone()))
        .nest("/backend", backend_routes(validator.clone()))
        .nest("/ws", ws_routes(validator))
}

fn session_routes(validator: Arc<JwtValidator>) -> Router {
    let router = Router::new()
        .route(
            "/auth",
            protect(get(session::with_auth), AccessPolicy::AuthenticationRequired),
        )
        .route(
            "/no-auth",
            protect(get(session::without_auth), AccessPolicy::AnonymousAllowed),
        );

    middleware::session::apply(router, SessionAuth::new(validator))
}

fn backend_routes(validator: Arc<JwtValidator>) -> Router {
    let router = Router::new()
        .route(
            "/auth",
            protect(get(backend::with_auth), AccessPolicy::requires([AUTHENTICATED])),
        )
        .route("/no-auth", get(backend::without_auth));

    middleware::authentication::apply(router, Arc::new(JwtBackend::new(validator)))
}

fn ws_routes(validator: Arc<JwtValidator>) -> Router {
    let router = Router::new()
        .route(
            "/auth",
            protect(get(ws::with_auth), AccessPolicy::requires([AUTHENTICATED])),
        )
        .route("/no-auth", get(ws::without_auth));

    middleware::authentication::apply(router, Arc::new(WebSocketJwtBackend::new(validator)))
}
