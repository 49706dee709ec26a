mod common;

use std::net::SocketAddr;

use futures::StreamExt;
use serde_json::json;
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite};

use common::{SECRET, hs256_token, router};

async fn serve() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router()).await.unwrap();
    });
    addr
}

async fn first_text(url: &str) -> String {
    let (mut socket, _) = connect_async(url).await.unwrap();
    let message = socket.next().await.unwrap().unwrap();
    message.to_text().unwrap().to_string()
}

#[tokio::test]
async fn anonymous_connection_to_open_route() {
    let addr = serve().await;
    let text = first_text(&format!("ws://{addr}/api/v1/ws/no-auth")).await;
    assert_eq!(text, "No Authentication");
}

#[tokio::test]
async fn anonymous_connection_to_protected_route_is_refused() {
    let addr = serve().await;
    let err = connect_async(format!("ws://{addr}/api/v1/ws/auth"))
        .await
        .err()
        .unwrap();

    match err {
        tungstenite::Error::Http(response) => assert_eq!(response.status(), 403),
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn token_in_query_param_authenticates() {
    let addr = serve().await;
    let token = hs256_token(&json!({"username": "user"}), SECRET);

    let text = first_text(&format!("ws://{addr}/api/v1/ws/auth?jwt={token}")).await;
    assert_eq!(text, "Hello, user");
}

#[tokio::test]
async fn bad_token_in_query_param_is_refused() {
    let addr = serve().await;
    let token = hs256_token(&json!({"username": "user"}), "BAD SECRET");

    let err = connect_async(format!("ws://{addr}/api/v1/ws/no-auth?jwt={token}"))
        .await
        .err()
        .unwrap();

    match err {
        tungstenite::Error::Http(response) => assert_eq!(response.status(), 400),
        other => panic!("unexpected error {other:?}"),
    }
}
