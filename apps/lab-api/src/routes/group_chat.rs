//! Group chat: room and per-user feed sockets, plus the post-commit event
//! shims.

use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::ApiError;
use crate::fanout::group_chat::{GroupMessagePosted, GroupReadUpdate};
use crate::realtime::socket::{self, EchoPolicy};
use crate::AppState;

use super::Delivered;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ws/group-chat/rooms/{room_id}", get(room_socket))
        .route("/ws/group-chat/users/{user_id}", get(feed_socket))
        .route("/api/v1/events/group-chat/messages", post(message_posted))
        .route("/api/v1/events/group-chat/reads", post(reads_marked))
        .route("/api/v1/events/group-chat/message-read", post(message_read))
}

async fn room_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(room_id): Path<i64>,
) -> impl IntoResponse {
    let registry = state.hub.group_chat.rooms.clone();
    ws.on_upgrade(move |socket| {
        socket::serve_topic(socket, registry, room_id, EchoPolicy::Envelope)
    })
}

async fn feed_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    let registry = state.hub.group_chat.feeds.clone();
    ws.on_upgrade(move |socket| {
        socket::serve_topic(socket, registry, user_id, EchoPolicy::Envelope)
    })
}

async fn message_posted(
    State(state): State<AppState>,
    Json(event): Json<GroupMessagePosted>,
) -> Result<Json<Delivered>, ApiError> {
    // A group room always has other members; an empty recipient list means
    // the caller resolved membership against uncommitted state.
    if event.recipient_ids.is_empty() {
        return Err(ApiError::unprocessable(
            "no other members in the group chat room",
        ));
    }
    let delivered = state.hub.group_chat.message_posted(&event);
    Ok(Json(Delivered { delivered }))
}

#[derive(Debug, Deserialize)]
struct ReadsMarkedRequest {
    group_chat_room_id: i64,
    updates: Vec<GroupReadUpdate>,
}

async fn reads_marked(
    State(state): State<AppState>,
    Json(body): Json<ReadsMarkedRequest>,
) -> Json<Delivered> {
    let delivered = state
        .hub
        .group_chat
        .reads_marked(body.group_chat_room_id, &body.updates);
    Json(Delivered { delivered })
}

#[derive(Debug, Deserialize)]
struct MessageReadRequest {
    group_chat_room_id: i64,
    group_message_id: i64,
}

async fn message_read(
    State(state): State<AppState>,
    Json(body): Json<MessageReadRequest>,
) -> Json<Delivered> {
    let delivered = state
        .hub
        .group_chat
        .message_read(body.group_chat_room_id, body.group_message_id);
    Json(Delivered { delivered })
}
