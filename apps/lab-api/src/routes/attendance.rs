//! Attendance roster feed and event shim.

use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::fanout::attendance::AttendanceEvent;
use crate::realtime::socket::{self, EchoPolicy};
use crate::realtime::Global;
use crate::AppState;

use super::Delivered;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ws/attendance", get(attendance_socket))
        .route("/api/v1/events/attendance", post(record_changed))
}

async fn attendance_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let registry = state.hub.attendance.topic.clone();
    ws.on_upgrade(move |socket| {
        socket::serve_topic(socket, registry, Global, EchoPolicy::Verbatim)
    })
}

async fn record_changed(
    State(state): State<AppState>,
    Json(event): Json<AttendanceEvent>,
) -> Json<Delivered> {
    let delivered = state.hub.attendance.record_changed(&event);
    Json(Delivered { delivered })
}
