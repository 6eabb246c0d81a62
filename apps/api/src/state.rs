use std::sync::Arc;

use crate::config::Config;
use crate::workflow::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Live wizard sessions. Each one owns its own workflow controller.
    pub sessions: Arc<SessionStore>,
    pub config: Config,
}
