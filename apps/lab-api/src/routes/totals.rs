//! Per-user unread-total feed: one socket covers both chat domains, so the
//! badge in the app shell updates no matter which screen is open.

use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::realtime::socket::{self, EchoPolicy};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/ws/unread-totals/{user_id}", get(totals_socket))
}

async fn totals_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    let registry = state.hub.totals.clone();
    ws.on_upgrade(move |socket| {
        socket::serve_topic(socket, registry, user_id, EchoPolicy::Envelope)
    })
}
