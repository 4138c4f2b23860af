//! Meeting live-text sockets (one topic per meeting) and the main-text
//! replacement shim.

use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::fanout::meeting::MeetingTextReplaced;
use crate::realtime::socket::{self, EchoPolicy};
use crate::AppState;

use super::Delivered;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ws/meetings/{meeting_id}", get(meeting_socket))
        .route("/api/v1/events/meetings/main-text", post(main_text_replaced))
}

async fn meeting_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(meeting_id): Path<i64>,
) -> impl IntoResponse {
    let registry = state.hub.meetings.documents.clone();
    ws.on_upgrade(move |socket| {
        socket::serve_topic(socket, registry, meeting_id, EchoPolicy::Verbatim)
    })
}

async fn main_text_replaced(
    State(state): State<AppState>,
    Json(event): Json<MeetingTextReplaced>,
) -> Json<Delivered> {
    let delivered = state.hub.meetings.main_text_replaced(&event);
    Json(Delivered { delivered })
}
