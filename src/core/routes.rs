// HTTP routes configuration

use crate::auth::gate;
use crate::core::state::AppState;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    // Everything under /api/sweets sits behind the access gate; the
    // admin-only handlers additionally require the admin tier through
    // their extractor.
    let protected = Router::new()
        .route(
            "/api/sweets",
            get(crate::handlers::sweets::list_sweets).post(crate::handlers::sweets::create_sweet),
        )
        .route(
            "/api/sweets/search",
            get(crate::handlers::sweets::search_sweets),
        )
        .route(
            "/api/sweets/{id}",
            put(crate::handlers::sweets::update_sweet)
                .delete(crate::handlers::sweets::delete_sweet),
        )
        .route(
            "/api/sweets/{id}/purchase",
            post(crate::handlers::sweets::purchase_sweet),
        )
        .route(
            "/api/sweets/{id}/restock",
            post(crate::handlers::sweets::restock_sweet),
        )
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            gate::authenticate,
        ));

    Router::new()
        // Public endpoints
        .route("/api/auth/register", post(crate::handlers::auth::register))
        .route("/api/auth/login", post(crate::handlers::auth::login))
        .route("/health", get(crate::handlers::health::health_handler))
        .merge(protected)
        // 404 fallback for all unmatched routes
        .fallback(crate::handlers::fallback::fallback_handler)
        .with_state(state)
}
