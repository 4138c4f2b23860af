//! Shared calendar feed and event shim.

use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::fanout::schedule::ScheduleEvent;
use crate::realtime::socket::{self, EchoPolicy};
use crate::realtime::Global;
use crate::AppState;

use super::Delivered;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ws/schedule", get(schedule_socket))
        .route("/api/v1/events/schedule", post(event_changed))
}

async fn schedule_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.hub.schedule.topic.clone();
    ws.on_upgrade(move |socket| {
        socket::serve_topic(socket, registry, Global, EchoPolicy::Verbatim)
    })
}

async fn event_changed(
    State(state): State<AppState>,
    Json(event): Json<ScheduleEvent>,
) -> Json<Delivered> {
    let delivered = state.hub.schedule.event_changed(&event);
    Json(Delivered { delivered })
}
