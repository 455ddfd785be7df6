//! aura-api
//!
//! HTTP surface of the Aura registry: axum routes over the entity layer,
//! served under AWS Lambda or as a plain HTTP server.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use state::AppState;

/// Build the application router. Request bodies are capped at `max_upload_bytes`.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/dashboard/stats", get(routes::dashboard::get_stats))
        .route("/api/patients", get(routes::patients::list_patients))
        .route("/api/patients/{id}", get(routes::patients::get_patient))
        .route(
            "/api/patients/{id}/evidence",
            put(routes::evidence::create_evidence),
        )
        .route(
            "/api/patients/{id}/evidence/image",
            post(routes::evidence::upload_image),
        )
        .route(
            "/api/patients/{id}/evidence/{evidence_id}",
            axum::routing::delete(routes::evidence::delete_evidence),
        )
        .route(
            "/api/patients/{id}/evidence/{evidence_id}/image",
            get(routes::evidence::get_image),
        )
        .route(
            "/api/patients/{id}/evidence/{evidence_id}/reanalyze",
            post(routes::evidence::reanalyze),
        )
        .route("/api/users", get(routes::users::list_users))
        .route("/api/chats", get(routes::chats::list_chats))
        .route(
            "/api/chats/{chat_id}/messages",
            get(routes::chats::list_messages).post(routes::chats::send_message),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum_mw::from_fn(middleware::audit::audit_log))
                .layer(cors)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}
