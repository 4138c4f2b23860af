pub mod config;
pub mod error;
pub mod fanout;
pub mod realtime;
pub mod routes;

use std::sync::Arc;

use config::Config;
use fanout::FanoutHub;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub hub: Arc<FanoutHub>,
}
