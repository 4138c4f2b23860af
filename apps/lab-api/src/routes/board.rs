//! Bulletin board and acknowledgement feeds, plus their event shims.

use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::fanout::board::{AcknowledgementEvent, BoardEvent};
use crate::realtime::socket::{self, EchoPolicy};
use crate::realtime::Global;
use crate::AppState;

use super::Delivered;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ws/board", get(board_socket))
        .route("/ws/acknowledgements", get(acknowledgement_socket))
        .route("/api/v1/events/board", post(post_changed))
        .route(
            "/api/v1/events/acknowledgements",
            post(acknowledgement_changed),
        )
}

async fn board_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.hub.board.posts.clone();
    ws.on_upgrade(move |socket| {
        socket::serve_topic(socket, registry, Global, EchoPolicy::Verbatim)
    })
}

async fn acknowledgement_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let registry = state.hub.board.acknowledgements.clone();
    ws.on_upgrade(move |socket| {
        socket::serve_topic(socket, registry, Global, EchoPolicy::Verbatim)
    })
}

async fn post_changed(
    State(state): State<AppState>,
    Json(event): Json<BoardEvent>,
) -> Json<Delivered> {
    let delivered = state.hub.board.post_changed(&event);
    Json(Delivered { delivered })
}

async fn acknowledgement_changed(
    State(state): State<AppState>,
    Json(event): Json<AcknowledgementEvent>,
) -> Json<Delivered> {
    let delivered = state.hub.board.acknowledgement_changed(&event);
    Json(Delivered { delivered })
}
