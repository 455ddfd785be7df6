use aura_entities::registry::Entities;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub entities: Entities,
    /// Backend label reported by the health check.
    pub backend: &'static str,
}
