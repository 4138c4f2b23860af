//! Lab presence: the global socket every dashboard keeps open, plus the
//! location/status event shims.

use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::fanout::presence::{LocationChanged, StatusChanged};
use crate::realtime::socket::{self, EchoPolicy};
use crate::realtime::Global;
use crate::AppState;

use super::Delivered;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ws/presence", get(presence_socket))
        .route("/api/v1/events/presence/location", post(location_changed))
        .route("/api/v1/events/presence/status", post(status_changed))
}

async fn presence_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.hub.presence.topic.clone();
    ws.on_upgrade(move |socket| {
        socket::serve_topic(socket, registry, Global, EchoPolicy::Verbatim)
    })
}

async fn location_changed(
    State(state): State<AppState>,
    Json(event): Json<LocationChanged>,
) -> Json<Delivered> {
    let delivered = state.hub.presence.location_changed(&event);
    Json(Delivered { delivered })
}

async fn status_changed(
    State(state): State<AppState>,
    Json(event): Json<StatusChanged>,
) -> Json<Delivered> {
    let delivered = state.hub.presence.status_changed(&event);
    Json(Delivered { delivered })
}
