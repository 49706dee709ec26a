//! Cross-cutting HTTP layers wrapped around the whole router.
//!
//! - `x-request-id`: generated when the client sent none, echoed back on the response
//! - access log via `TraceLayer`
//! - a per-request deadline answered with `408 Request Timeout`
//!
//! WebSocket upgrades pass through unchanged; the deadline only bounds the
//! handshake response, not the socket's lifetime.

use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::{StatusCode, header::HeaderName};
use tower::timeout::{TimeoutLayer, error::Elapsed};
use tower::{BoxError, ServiceBuilder};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

async fn layer_error_status(err: BoxError) -> StatusCode {
    if err.is::<Elapsed>() {
        tracing::warn!("request exceeded its deadline");
        StatusCode::REQUEST_TIMEOUT
    } else {
        tracing::error!(error = %err, "unhandled middleware error");
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

pub fn apply(router: Router, request_timeout: Duration) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router.layer(
        ServiceBuilder::new()
            // TimeoutLayer yields an error, the router needs an Infallible service.
            .layer(HandleErrorLayer::new(layer_error_status))
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(PropagateRequestIdLayer::new(request_id))
            .layer(TimeoutLayer::new(request_timeout))
            .layer(TraceLayer::new_for_http()),
    )
}
