pub mod attendance;
pub mod board;
pub mod door;
pub mod group_chat;
pub mod health;
pub mod meeting;
pub mod presence;
pub mod private_chat;
pub mod schedule;
pub mod seat;
pub mod totals;

use axum::Router;
use serde::Serialize;

use crate::AppState;

/// Delivery receipt returned by every event shim: how many live connections
/// the event was fanned out to, summed across all targeted topics.
#[derive(Debug, Serialize)]
pub struct Delivered {
    pub delivered: usize,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(private_chat::router())
        .merge(group_chat::router())
        .merge(totals::router())
        .merge(presence::router())
        .merge(attendance::router())
        .merge(schedule::router())
        .merge(board::router())
        .merge(door::router())
        .merge(seat::router())
        .merge(meeting::router())
}
