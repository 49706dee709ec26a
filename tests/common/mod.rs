#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use jsonwebtoken::{EncodingKey, Header};
use jwt_gate::middleware::http::DEFAULT_REQUEST_TIMEOUT;
use jwt_gate::{AuthSettings, JwtValidator, KeyMaterial, app};
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "example";

pub fn hs256_token(claims: &Value, secret: &str) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn validator(settings: AuthSettings) -> Arc<JwtValidator> {
    Arc::new(JwtValidator::new(&settings).unwrap())
}

pub fn router() -> Router {
    app::build_router(
        validator(AuthSettings::new(KeyMaterial::secret(SECRET))),
        DEFAULT_REQUEST_TIMEOUT,
    )
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub async fn get(router: Router, uri: &str, authorization: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }

    let response = router
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        body: String::from_utf8(body.to_vec()).unwrap(),
    }
}
