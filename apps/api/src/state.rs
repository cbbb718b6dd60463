use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The workflow engine, validated once at startup and shared by all
    /// requests. Each run gets its own state record, so no locking here.
    pub pipeline: Arc<Pipeline>,
    pub config: Config,
}
