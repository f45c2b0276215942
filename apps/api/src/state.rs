use std::sync::Arc;

use crate::config::Config;
use crate::cv::store::CvStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable persistence backend. Postgres by default; in-memory via STORAGE_BACKEND=memory.
    pub store: Arc<dyn CvStore>,
    pub config: Config,
}
