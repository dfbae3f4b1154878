//! Axum router configuration with middleware.
//!
//! All REST routes are under `/api/v1/`; the realtime channel is `/ws`.
//! Middleware: CORS, tracing.

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Accounts
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/users/me",
            get(handlers::user::me).patch(handlers::user::update_me),
        )
        .route(
            "/users/psychologists",
            get(handlers::user::list_psychologists),
        )
        // Conversations
        .route(
            "/conversations",
            post(handlers::conversation::create_conversation)
                .get(handlers::conversation::list_conversations),
        )
        .route(
            "/conversations/{id}/messages",
            get(handlers::conversation::list_messages),
        )
        // Bookings
        .route(
            "/bookings",
            post(handlers::booking::create_booking).get(handlers::booking::list_bookings),
        )
        .route("/bookings/{id}", get(handlers::booking::get_booking))
        .route("/bookings/{id}", patch(handlers::booking::update_booking))
        .route("/bookings/{id}", delete(handlers::booking::cancel_booking))
        // Materials library
        .route(
            "/materials",
            get(handlers::material::list_materials).post(handlers::material::create_material),
        )
        .route(
            "/materials/categories",
            get(handlers::material::list_categories)
                .post(handlers::material::create_category),
        )
        .route("/materials/{id}", get(handlers::material::get_material));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/ws", get(handlers::ws::ws_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
