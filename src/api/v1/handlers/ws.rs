/*
 * Responsibility
 * - WebSocketJwtBackend 配下の handler (token は ?jwt= で渡す)
 * - GET /ws/auth    (requires "authenticated", 未認証なら handshake 前に 403)
 * - GET /ws/no-auth (匿名で接続可)
 */
use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::Response,
};

use crate::api::v1::extractors::CurrentUser;

pub async fn with_auth(ws: WebSocketUpgrade, CurrentUser(user): CurrentUser) -> Response {
    let greeting = format!("Hello, {}", user.display_name());
    ws.on_upgrade(move |socket| send_and_close(socket, greeting))
}

pub async fn without_auth(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(|socket| send_and_close(socket, "No Authentication".to_string()))
}

async fn send_and_close(mut socket: WebSocket, text: String) {
    if let Err(err) = socket.send(Message::Text(text.into())).await {
        tracing::debug!(error = %err, "websocket send failed");
        return;
    }
    if let Err(err) = socket.send(Message::Close(None)).await {
        tracing::debug!(error = %err, "websocket close failed");
    }
}
