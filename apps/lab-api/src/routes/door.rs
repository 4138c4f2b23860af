//! Door status feed. The sensor posts a status; attached clients get the raw
//! string.

use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::fanout::door::DoorStatusPosted;
use crate::realtime::socket::{self, EchoPolicy};
use crate::realtime::Global;
use crate::AppState;

use super::Delivered;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ws/door", get(door_socket))
        .route("/api/v1/events/door", post(status_posted))
}

async fn door_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.hub.door.topic.clone();
    ws.on_upgrade(move |socket| {
        socket::serve_topic(socket, registry, Global, EchoPolicy::RawText)
    })
}

async fn status_posted(
    State(state): State<AppState>,
    Json(event): Json<DoorStatusPosted>,
) -> Json<Delivered> {
    let delivered = state.hub.door.status_posted(&event.status);
    Json(Delivered { delivered })
}
