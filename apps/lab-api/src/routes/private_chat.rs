//! Private chat: room and per-user feed sockets, plus the post-commit event
//! shims the CRUD service calls after persisting a change.

use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::fanout::private_chat::{PrivateMessagePosted, PrivateReadUpdate};
use crate::realtime::socket::{self, EchoPolicy};
use crate::AppState;

use super::Delivered;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ws/private-chat/rooms/{room_id}", get(room_socket))
        .route("/ws/private-chat/users/{user_id}", get(feed_socket))
        .route("/api/v1/events/private-chat/messages", post(message_posted))
        .route("/api/v1/events/private-chat/reads", post(reads_marked))
        .route(
            "/api/v1/events/private-chat/message-read",
            post(message_read),
        )
}

async fn room_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(room_id): Path<i64>,
) -> impl IntoResponse {
    let registry = state.hub.private_chat.rooms.clone();
    ws.on_upgrade(move |socket| {
        socket::serve_topic(socket, registry, room_id, EchoPolicy::Envelope)
    })
}

async fn feed_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    let registry = state.hub.private_chat.feeds.clone();
    ws.on_upgrade(move |socket| {
        socket::serve_topic(socket, registry, user_id, EchoPolicy::Envelope)
    })
}

async fn message_posted(
    State(state): State<AppState>,
    Json(event): Json<PrivateMessagePosted>,
) -> Json<Delivered> {
    let delivered = state.hub.private_chat.message_posted(&event);
    Json(Delivered { delivered })
}

#[derive(Debug, Deserialize)]
struct ReadsMarkedRequest {
    private_chat_room_id: i64,
    updates: Vec<PrivateReadUpdate>,
}

async fn reads_marked(
    State(state): State<AppState>,
    Json(body): Json<ReadsMarkedRequest>,
) -> Json<Delivered> {
    let delivered = state
        .hub
        .private_chat
        .reads_marked(body.private_chat_room_id, &body.updates);
    Json(Delivered { delivered })
}

#[derive(Debug, Deserialize)]
struct MessageReadRequest {
    private_chat_room_id: i64,
    id: i64,
    is_read: bool,
}

async fn message_read(
    State(state): State<AppState>,
    Json(body): Json<MessageReadRequest>,
) -> Json<Delivered> {
    let delivered =
        state
            .hub
            .private_chat
            .message_read(body.private_chat_room_id, body.id, body.is_read);
    Json(Delivered { delivered })
}
