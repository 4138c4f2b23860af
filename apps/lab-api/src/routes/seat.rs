//! Seat map feed. Server-fed only: clients watch, the CRUD service posts
//! committed batch updates.

use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::fanout::seat::SeatRecord;
use crate::realtime::socket::{self, EchoPolicy};
use crate::realtime::Global;
use crate::AppState;

use super::Delivered;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ws/seats", get(seats_socket))
        .route("/api/v1/events/seats", post(seats_updated))
}

async fn seats_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.hub.seats.topic.clone();
    ws.on_upgrade(move |socket| socket::serve_topic(socket, registry, Global, EchoPolicy::Ignore))
}

async fn seats_updated(
    State(state): State<AppState>,
    Json(seats): Json<Vec<SeatRecord>>,
) -> Json<Delivered> {
    let delivered = state.hub.seats.seats_updated(&seats);
    Json(Delivered { delivered })
}
