use std::sync::Arc;

use crate::gateway::ResumeGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Resume storage. Postgres in production; swapped for the in-memory
    /// gateway in router tests.
    pub gateway: Arc<dyn ResumeGateway>,
}
