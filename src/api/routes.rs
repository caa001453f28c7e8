use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use super::handlers;
use crate::store::MemoryStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: MemoryStore,
}

impl AppState {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

/// Creates the main API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/live", get(handlers::liveness_check))
        // User endpoints
        .route("/users", get(handlers::list_users))
        .route("/users", post(handlers::create_user))
        .route("/users/:id", get(handlers::get_user))
        .route("/users/:id", delete(handlers::delete_user))
        // Group endpoints
        .route("/groups", get(handlers::list_groups))
        .route("/groups", post(handlers::create_group))
        .route("/groups/:id", get(handlers::get_group))
        .route("/groups/:id", delete(handlers::delete_group))
        // Transaction endpoints
        .route("/transactions", get(handlers::list_transactions))
        .route("/transactions", post(handlers::create_transaction))
        .route("/transactions/:id", get(handlers::get_transaction))
        .route("/transactions/:id", patch(handlers::update_transaction_price))
        .route("/transactions/:id", delete(handlers::delete_transaction))
        .with_state(state)
}
