//! Route table, built explicitly during initialization

use crate::server::state::AppState;
use crate::server::{orders, users};
use axum::Json;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// GET /
async fn health() -> Json<Value> {
    Json(json!({ "message": "Server is running" }))
}

/// Assemble the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route(
            "/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        .route(
            "/orders/{id}",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
        .route("/orders/{id}/comments", post(orders::add_comment))
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
